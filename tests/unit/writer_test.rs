use chrono::{TimeZone, Utc};
use mcp_sync::config::{self, backup_path_for, Document, DocumentSource};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_backup_is_deep_equal_to_previous_document() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path().join(".claude.json");
        let before = json!({
            "numStartups": 12,
            "mcpServers": {"a": {"type": "sse", "url": "http://x"}},
            "projects": {"/p": {"history": [], "mcpServers": {}}}
        });
        // Compact on disk; the backup is re-serialized
        fs::write(&path, before.to_string()).unwrap();

        let report = config::save(&path, &document(json!({"mcpServers": {}})), true).unwrap();
        let backup = report.backup_path.expect("backup should be written");

        let restored = config::load(&DocumentSource::Path(backup.clone()), false).unwrap();
        assert_eq!(serde_json::Value::Object(restored), before);
        assert!(fs::read_to_string(&backup).unwrap().contains("\n  \"numStartups\": 12"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"mcpServers\": {}\n}");
    }

    #[test]
    fn test_save_without_backup() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path().join(".claude.json");
        fs::write(&path, "{}").unwrap();

        let report = config::save(&path, &document(json!({"a": 1})), false).unwrap();
        assert!(report.backup_path.is_none());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_preserves_unrelated_keys_in_order() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path().join(".claude.json");

        let doc =
            document(json!({"zeta": true, "mcpServers": {"b": {}, "a": {}}, "alpha": [1, 2]}));
        config::save(&path, &doc, true).unwrap();

        let reloaded = config::load(&DocumentSource::Path(path), false).unwrap();
        let keys: Vec<&String> = reloaded.keys().collect();
        assert_eq!(keys, vec!["zeta", "mcpServers", "alpha"]);
        let entries: Vec<&String> = reloaded["mcpServers"].as_object().unwrap().keys().collect();
        assert_eq!(entries, vec!["b", "a"]);
    }

    #[test]
    fn test_backup_path_naming() {
        let timestamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(
            backup_path_for(Path::new("/home/u/.claude.json"), timestamp),
            Path::new("/home/u/.claude.backup.20250102_030405.json")
        );
        assert_eq!(
            backup_path_for(Path::new("servers/mcpServers.json"), timestamp),
            Path::new("servers/mcpServers.backup.20250102_030405.json")
        );
    }
}
