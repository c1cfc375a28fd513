use mcp_sync::config::Document;
use mcp_sync::{get_enabled, set_enabled, ScopeRecord};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn entries(value: Value) -> Document {
        document(value)
    }

    #[test]
    fn test_new_scope_record_has_all_defaults() {
        let mut doc = document(json!({"numStartups": 3}));
        set_enabled(&mut doc, entries(json!({"a": {"type": "sse"}})), Some("/work/app"));

        let record = &doc["projects"]["/work/app"];
        for field in ScopeRecord::DEFAULT_FIELDS {
            assert!(record.get(field).is_some(), "missing default field {field}");
        }
        assert_eq!(record["allowedTools"], json!([]));
        assert_eq!(record["hasTrustDialogAccepted"], json!(false));
        assert_eq!(record["projectOnboardingSeenCount"], json!(0));
        assert_eq!(record["mcpServers"], json!({"a": {"type": "sse"}}));
        assert_eq!(doc["numStartups"], json!(3));
        assert!(doc.get("mcpServers").is_none());
    }

    #[test]
    fn test_later_writes_only_touch_mcp_servers() {
        let mut doc = Document::new();
        set_enabled(&mut doc, entries(json!({"a": {}})), Some("/p"));

        let mut expected = doc["projects"]["/p"].clone();
        set_enabled(&mut doc, entries(json!({"b": {"command": "x"}})), Some("/p"));
        expected["mcpServers"] = json!({"b": {"command": "x"}});

        assert_eq!(doc["projects"]["/p"], expected);
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut doc = document(json!({
            "mcpServers": {"root": {}},
            "projects": {"/one": {"mcpServers": {"one": {}}, "history": ["cmd"]}}
        }));

        set_enabled(&mut doc, entries(json!({"two": {}})), Some("/two"));

        assert_eq!(get_enabled(&doc, None), entries(json!({"root": {}})));
        assert_eq!(get_enabled(&doc, Some("/one")), entries(json!({"one": {}})));
        assert_eq!(get_enabled(&doc, Some("/two")), entries(json!({"two": {}})));
        assert_eq!(doc["projects"]["/one"]["history"], json!(["cmd"]));
    }

    #[test]
    fn test_get_enabled_reads_missing_as_empty() {
        let doc = document(json!({"projects": {"/p": {"history": []}}}));

        assert!(get_enabled(&doc, None).is_empty());
        assert!(get_enabled(&doc, Some("/p")).is_empty());
        assert!(get_enabled(&doc, Some("/unknown")).is_empty());
    }

    #[test]
    fn test_scope_key_is_matched_exactly() {
        let doc = document(json!({"projects": {"/p/": {"mcpServers": {"a": {}}}}}));

        assert!(get_enabled(&doc, Some("/p")).is_empty());
        assert_eq!(get_enabled(&doc, Some("/p/")).len(), 1);
    }

    #[test]
    fn test_builder_record() {
        let record = ScopeRecord::builder().entries(entries(json!({"a": {}}))).build();
        assert_eq!(record.entries(), Some(&entries(json!({"a": {}}))));

        let value = record.into_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[3], "mcpServers");
    }
}
