#![allow(clippy::self_named_module_files)]

use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod reader;
pub mod writer;

pub use reader::load;
pub use writer::{backup_path_for, save, SaveReport};

/// A whole JSON document (catalog or target). Key order is preserved.
pub type Document = Map<String, Value>;

/// Entry name to opaque entry value.
pub type EntryMap = Map<String, Value>;

/// Key holding the enabled entries, both at the root and inside a scope record.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

/// Key holding the per-scope records.
pub const PROJECTS_KEY: &str = "projects";

pub const DEFAULT_CATALOG_FILE: &str = "mcpServers.json";
pub const DEFAULT_TARGET_FILE: &str = "~/.claude.json";

/// Where a document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(String),
}

impl DocumentSource {
    pub const fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Url(_) => None,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Expand a leading `~` against the home directory
///
/// Paths without a leading `~` (and `~user` forms) are returned unchanged.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    directories::BaseDirs::new()
        .map_or_else(|| path.to_path_buf(), |dirs| dirs.home_dir().join(rest))
}

/// Expand `~` and make the path absolute against the current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn resolve_path<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}
