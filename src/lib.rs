#![allow(missing_docs)]

pub mod app_config;
pub mod cli;
pub mod config;
pub mod editor;
pub mod interrupt;
pub mod merge;
pub mod prompt;
pub mod retention;
pub mod scope;
pub mod sync_operations;

pub use config::{Document, DocumentSource, EntryMap};
pub use merge::{compute_diff, fold_back, materialize, EntryDiff};
pub use scope::{get_enabled, set_enabled, ScopeRecord};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in {origin}: {reason}")]
    MalformedDocument { origin: String, reason: String },

    #[error("Error fetching URL {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("{0}")]
    OptionConflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
