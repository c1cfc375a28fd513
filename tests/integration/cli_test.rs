use crate::fixtures::TestFixture;
use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial]
    fn test_cli_help() {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcp-sync"));
        cmd.arg("--help").assert().success().stdout(
            predicate::str::contains("mcp-sync keeps the MCP servers enabled")
                .and(predicate::str::contains("--project"))
                .and(predicate::str::contains("--clean")),
        );
    }

    #[test]
    #[serial]
    fn test_cli_version() {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcp-sync"));
        cmd.arg("--version").assert().success().stdout(predicate::str::contains("mcp-sync"));
    }

    #[test]
    #[serial]
    fn test_edit_with_url_is_rejected() {
        let fixture = TestFixture::new().unwrap();

        fixture
            .command()
            .args(["--edit", "--url", "http://127.0.0.1:1/mcp.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error: --edit option cannot be used with --url"));

        assert!(!fixture.catalog_path().exists());
    }

    #[test]
    #[serial]
    fn test_binding_with_url_is_rejected() {
        let fixture = TestFixture::new().unwrap();

        fixture
            .command()
            .args(["-b", "-u", "http://127.0.0.1:1/mcp.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--binding option cannot be used with --url"));
    }

    #[test]
    #[serial]
    fn test_missing_target_fails() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_catalog(r#"{"a": {"type": "sse"}}"#).unwrap();

        fixture
            .command()
            .assert()
            .code(1)
            .stderr(
                predicate::str::contains("File not found:")
                    .and(predicate::str::contains(".claude.json")),
            );
    }

    #[test]
    #[serial]
    fn test_missing_target_with_explicit_path() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_catalog(r#"{"a": {}}"#).unwrap();

        fixture
            .command()
            .args(["--claude-config", "/nonexistent/dir/.claude.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/nonexistent/dir/.claude.json"));
    }

    #[test]
    #[serial]
    fn test_malformed_catalog_fails() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_catalog("{ not json").unwrap().with_target("{}").unwrap();

        fixture
            .command()
            .args(["-c", ".claude.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid JSON in"));
    }

    #[test]
    #[serial]
    fn test_unreachable_url_fails() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_target("{}").unwrap();

        fixture
            .command()
            .args(["--url", "http://127.0.0.1:1/mcp.json", "-c", ".claude.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error fetching URL http://127.0.0.1:1/mcp.json"));
    }
}
