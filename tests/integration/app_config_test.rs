use crate::fixtures::TestFixture;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    #[serial]
    fn test_defaults_from_app_config() {
        let fixture = TestFixture::new().unwrap();
        fixture
            .with_app_config(
                r#"
[defaults]
mcp-file = "catalogs/servers.json"
claude-config = ".claude.json"
backup = false
"#,
            )
            .unwrap()
            .with_target("{}")
            .unwrap();
        std::fs::create_dir_all(fixture.work.join("catalogs")).unwrap();
        std::fs::write(fixture.work.join("catalogs/servers.json"), r#"{"x": {"command": "x"}}"#)
            .unwrap();

        fixture
            .command()
            .write_stdin("1\n\ny\n")
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Enabling servers: x")
                    .and(predicate::str::contains("Created backup:").not()),
            );

        assert_eq!(fixture.read_target(), json!({"mcpServers": {"x": {"command": "x"}}}));
        assert!(fixture.backup_names().is_empty());
    }

    #[test]
    #[serial]
    fn test_flags_override_app_config() {
        let fixture = TestFixture::new().unwrap();
        fixture
            .with_app_config("[defaults]\nclaude-config = \"/nonexistent/.claude.json\"\n")
            .unwrap()
            .with_catalog(r#"{"a": {}}"#)
            .unwrap()
            .with_target("{}")
            .unwrap();

        fixture
            .command()
            .args(["--claude-config", ".claude.json"])
            .write_stdin("\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("No changes to make."));
    }

    #[test]
    #[serial]
    fn test_env_var_selects_catalog() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_target("{}").unwrap();
        std::fs::write(fixture.work.join("other.json"), r#"{"a": {}, "b": {}, "c": {}}"#).unwrap();

        fixture
            .command()
            .env("MCP_SYNC_CATALOG", "other.json")
            .env("MCP_SYNC_TARGET", ".claude.json")
            .write_stdin("\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Available servers: 3"));
    }

    #[test]
    #[serial]
    fn test_invalid_app_config_fails() {
        let fixture = TestFixture::new().unwrap();
        fixture.with_app_config("[defaults\nbroken").unwrap();

        fixture
            .command()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to load app configuration"));
    }
}
