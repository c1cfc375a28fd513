//! Locating the enabled entries inside a target document.
//!
//! Without a scope the entries live under the root `mcpServers` key. With a
//! scope they live under `projects.<scope>.mcpServers`, next to a fixed set of
//! per-project fields that must exist whenever the record exists.

use crate::config::{Document, EntryMap, MCP_SERVERS_KEY, PROJECTS_KEY};
use serde_json::{Map, Value};
use tracing::debug;

/// A per-scope record, always carrying every sibling field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRecord {
    fields: Map<String, Value>,
}

impl ScopeRecord {
    /// Sibling field defaults, in the order they are written
    pub const DEFAULT_FIELDS: [&'static str; 9] = [
        "allowedTools",
        "history",
        "mcpContextUris",
        "enabledMcpjsonServers",
        "disabledMcpjsonServers",
        "hasTrustDialogAccepted",
        "projectOnboardingSeenCount",
        "hasClaudeMdExternalIncludesApproved",
        "hasClaudeMdExternalIncludesWarningShown",
    ];

    pub fn builder() -> ScopeRecordBuilder {
        ScopeRecordBuilder::default()
    }

    pub fn entries(&self) -> Option<&EntryMap> {
        self.fields.get(MCP_SERVERS_KEY).and_then(Value::as_object)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Builds a [`ScopeRecord`] with every default filled in
#[derive(Debug, Clone, Default)]
pub struct ScopeRecordBuilder {
    entries: EntryMap,
}

impl ScopeRecordBuilder {
    #[must_use]
    pub fn entries(mut self, entries: EntryMap) -> Self {
        self.entries = entries;
        self
    }

    pub fn build(self) -> ScopeRecord {
        let mut fields = Map::new();
        fields.insert("allowedTools".to_string(), Value::Array(Vec::new()));
        fields.insert("history".to_string(), Value::Array(Vec::new()));
        fields.insert("mcpContextUris".to_string(), Value::Array(Vec::new()));
        fields.insert(MCP_SERVERS_KEY.to_string(), Value::Object(self.entries));
        fields.insert("enabledMcpjsonServers".to_string(), Value::Array(Vec::new()));
        fields.insert("disabledMcpjsonServers".to_string(), Value::Array(Vec::new()));
        fields.insert("hasTrustDialogAccepted".to_string(), Value::Bool(false));
        fields.insert("projectOnboardingSeenCount".to_string(), Value::from(0));
        fields.insert("hasClaudeMdExternalIncludesApproved".to_string(), Value::Bool(false));
        fields.insert("hasClaudeMdExternalIncludesWarningShown".to_string(), Value::Bool(false));
        ScopeRecord { fields }
    }
}

/// Currently enabled entries for the root or for `scope`
///
/// Missing keys read as an empty map; nothing is created.
pub fn get_enabled(document: &Document, scope: Option<&str>) -> EntryMap {
    let holder = match scope {
        None => Some(document),
        Some(scope) => document
            .get(PROJECTS_KEY)
            .and_then(Value::as_object)
            .and_then(|projects| projects.get(scope))
            .and_then(Value::as_object),
    };

    holder
        .and_then(|map| map.get(MCP_SERVERS_KEY))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Replace the enabled entries for the root or for `scope`
///
/// A scope without a record gets a fully defaulted one. An existing record
/// only has its `mcpServers` replaced.
pub fn set_enabled(document: &mut Document, entries: EntryMap, scope: Option<&str>) {
    let Some(scope) = scope else {
        document.insert(MCP_SERVERS_KEY.to_string(), Value::Object(entries));
        return;
    };

    if !document.get(PROJECTS_KEY).is_some_and(Value::is_object) {
        document.insert(PROJECTS_KEY.to_string(), Value::Object(Map::new()));
    }
    let Some(Value::Object(projects)) = document.get_mut(PROJECTS_KEY) else {
        return;
    };

    match projects.get_mut(scope) {
        Some(Value::Object(record)) => {
            record.insert(MCP_SERVERS_KEY.to_string(), Value::Object(entries));
        },
        _ => {
            debug!("Creating scope record for {scope}");
            let record = ScopeRecord::builder().entries(entries).build();
            projects.insert(scope.to_string(), record.into_value());
        },
    }
}
