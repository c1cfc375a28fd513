use crate::interrupt::ChildGuard;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::SystemTime;
use tracing::{debug, warn};

const FALLBACK_EDITOR: &str = "vi";

/// What happened when the operator was handed a file to edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Modified,
    Unchanged,
    /// The editor could not be started or exited unsuccessfully
    Failed(String),
}

/// Operator-configured external editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Parse a command line such as `code --wait`
    ///
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self { program, args: parts.collect() })
    }

    /// Configured editor, then `$EDITOR`, then `vi`
    pub fn resolve(configured: Option<&str>) -> Self {
        configured
            .and_then(Self::parse)
            .or_else(|| std::env::var("EDITOR").ok().as_deref().and_then(Self::parse))
            .unwrap_or_else(|| Self { program: FALLBACK_EDITOR.to_string(), args: Vec::new() })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the editor on `path` and report whether the file's mtime changed
    pub fn edit(&self, path: &Path) -> EditOutcome {
        let before = modified_time(path);
        debug!("Launching editor {} {:?} on {}", self.program, self.args, path.display());

        let _interrupts = ChildGuard::enter();
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) if status.success() => {
                if modified_time(path) == before {
                    EditOutcome::Unchanged
                } else {
                    EditOutcome::Modified
                }
            },
            Ok(status) => {
                warn!("Editor {} exited with {status}", self.program);
                EditOutcome::Failed(format!("Failed to open editor '{}' ({status})", self.program))
            },
            Err(e) => {
                warn!("Failed to launch editor {}: {e}", self.program);
                EditOutcome::Failed(format!("Failed to open editor '{}': {e}", self.program))
            },
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
