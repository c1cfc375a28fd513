#![allow(missing_docs)]

use crate::app_config::Defaults;
use crate::cli::Cli;
use crate::config::{
    self, reader, resolve_path, Document, DocumentSource, EntryMap, SaveReport,
    DEFAULT_CATALOG_FILE, DEFAULT_TARGET_FILE,
};
use crate::editor::{EditOutcome, Editor};
use crate::merge::{build_choices, compute_diff, fold_back, materialize, EntryDiff};
use crate::prompt::{Cancelled, Operator, SelectAction};
use crate::retention::{self, PurgeReport};
use crate::scope::{get_enabled, set_enabled};
use crate::SyncError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a session needs, resolved from flags, environment and app config
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub scope: Option<String>,
    pub catalog: DocumentSource,
    pub target: PathBuf,
    pub edit: bool,
    pub binding: bool,
    pub clean: bool,
    pub backup: bool,
}

/// How a session ended; every variant except a partial purge exits with 0
#[derive(Debug)]
pub enum SessionOutcome {
    Applied { diff: EntryDiff, report: SaveReport },
    NoChange,
    NothingToSync,
    Cancelled,
    Cleaned(PurgeReport),
    NoBackups,
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cleaned(report) if !report.is_complete() => 1,
            _ => 0,
        }
    }
}

impl SyncOptions {
    /// Reject flag combinations that cannot work together
    ///
    /// # Errors
    ///
    /// Returns `OptionConflict` when `--edit` or `--binding` is combined with `--url`
    pub fn validate(cli: &Cli) -> Result<(), SyncError> {
        if cli.url.is_none() {
            return Ok(());
        }
        if cli.edit {
            return Err(SyncError::OptionConflict(
                "--edit option cannot be used with --url".to_string(),
            ));
        }
        if cli.binding {
            return Err(SyncError::OptionConflict(
                "--binding option cannot be used with --url".to_string(),
            ));
        }
        Ok(())
    }

    /// Combine command-line flags with app config defaults
    ///
    /// Flags win over the config file; the built-in defaults come last.
    ///
    /// # Errors
    ///
    /// Returns `OptionConflict` as [`Self::validate`] does, and `Io` when the
    /// working directory cannot be determined.
    pub fn from_cli(cli: &Cli, defaults: &Defaults) -> Result<Self, SyncError> {
        Self::validate(cli)?;

        let catalog = if let Some(url) = &cli.url {
            DocumentSource::Url(url.clone())
        } else {
            let path = cli
                .mcp_file
                .clone()
                .or_else(|| defaults.mcp_file.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));
            DocumentSource::Path(resolve_path(path)?)
        };

        let target = cli
            .claude_config
            .clone()
            .or_else(|| defaults.claude_config.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_FILE));

        Ok(Self {
            scope: cli.project.clone(),
            catalog,
            target: resolve_path(target)?,
            edit: cli.edit,
            binding: cli.binding,
            clean: cli.clean,
            backup: !cli.no_backup && defaults.backup.unwrap_or(true),
        })
    }
}

/// Run one clean or sync session
///
/// Operator cancellations anywhere inside the session end up here and become
/// [`SessionOutcome::Cancelled`]. Every other error is returned unchanged.
///
/// # Errors
///
/// Returns an error if a document cannot be read, parsed, fetched or written,
/// or if the operator's terminal fails.
pub fn run_session(
    options: &SyncOptions,
    operator: &mut dyn Operator,
    editor: &Editor,
) -> Result<SessionOutcome> {
    let result = if options.clean {
        run_clean(&options.target, operator)
    } else {
        run_sync(options, operator, editor)
    };

    match result {
        Err(e) if e.downcast_ref::<Cancelled>().is_some() => {
            println!("\n{e}");
            Ok(SessionOutcome::Cancelled)
        },
        other => other,
    }
}

/// List backups of `target` and delete them all once the operator agrees
///
/// # Errors
///
/// Returns an error if the backup directory cannot be listed. Individual
/// deletion failures are collected in the returned report instead.
pub fn run_clean(target: &Path, operator: &mut dyn Operator) -> Result<SessionOutcome> {
    let backups = retention::list_backups(target)
        .with_context(|| format!("Failed to list backups of {}", target.display()))?;

    if backups.is_empty() {
        println!("No backup files found.");
        return Ok(SessionOutcome::NoBackups);
    }

    println!("Found {} backup file(s):", backups.len());
    for backup in &backups {
        println!("  {}", backup.describe());
    }
    println!();

    if !operator.confirm("Delete all backup files?", false)?.into_result()? {
        println!("Cancelled. No files deleted.");
        return Ok(SessionOutcome::Cancelled);
    }

    let report = retention::purge(&backups);
    println!("✓ Deleted {} backup file(s)", report.deleted.len());
    for (path, reason) in &report.failures {
        println!("✗ Failed to delete {}: {reason}", path.display());
    }

    Ok(SessionOutcome::Cleaned(report))
}

/// Pick entries from the catalog and write them into the target document
///
/// # Errors
///
/// See [`run_session`].
pub fn run_sync(
    options: &SyncOptions,
    operator: &mut dyn Operator,
    editor: &Editor,
) -> Result<SessionOutcome> {
    let catalog_path = options.catalog.as_path();
    let scope = options.scope.as_deref();

    if options.edit {
        if let Some(path) = catalog_path {
            edit_before_sync(path, editor);
        }
    }

    let mut catalog = load_catalog(&options.catalog)?;
    let mut target = config::load(&DocumentSource::Path(options.target.clone()), false)?;
    let current = get_enabled(&target, scope);
    debug!("{} entr(ies) enabled in {}", current.len(), options.target.display());

    if options.binding {
        if let Some(path) = catalog_path {
            catalog = bind_target_entries(path, catalog, &current)?;
        }
    }

    if catalog.is_empty() {
        print_empty_catalog_help(&options.catalog);
        return Ok(SessionOutcome::NothingToSync);
    }

    match scope {
        Some(scope) => println!("Syncing MCP servers for project: {scope}"),
        None => println!("Syncing global MCP servers"),
    }
    println!("Available servers: {}", catalog.len());
    println!("Currently enabled: {}", current.len());
    println!();

    let selection = loop {
        let choices = build_choices(&catalog, &current);
        match operator.select(&choices, catalog_path.is_some())?.into_result()? {
            SelectAction::Selected(names) => break names,
            SelectAction::EditRequested => {
                let Some(path) = catalog_path else {
                    continue;
                };
                println!("\nOpening {} in editor...", path.display());
                match editor.edit(path) {
                    EditOutcome::Modified => {
                        println!("File modified. Reloading configurations...\n");
                        catalog = config::load(&options.catalog, false)?;
                        if catalog.is_empty() {
                            println!("\nNo MCP servers found after edit!");
                            println!("Please add server configurations to the file.");
                            return Ok(SessionOutcome::NothingToSync);
                        }
                    },
                    EditOutcome::Unchanged => println!("No changes made to the file.\n"),
                    EditOutcome::Failed(message) => println!("Error: {message}\n"),
                }
            },
        }
    };

    let enabled = materialize(&catalog, &selection);
    let diff = compute_diff(&current, &enabled);

    if !diff.added.is_empty() {
        println!("\nEnabling servers: {}", join_names(&diff.added));
    }
    if !diff.removed.is_empty() {
        println!("Disabling servers: {}", join_names(&diff.removed));
    }
    if diff.is_empty() {
        println!("\nNo changes to make.");
        return Ok(SessionOutcome::NoChange);
    }

    if !operator.confirm("Apply these changes?", true)?.into_result()? {
        return Err(Cancelled.into());
    }

    set_enabled(&mut target, enabled, scope);
    let report = config::save(&options.target, &target, options.backup)?;
    print_save_report(&options.target, &report);
    info!("Applied {} addition(s) and {} removal(s)", diff.added.len(), diff.removed.len());
    println!("\nSync completed successfully!");

    Ok(SessionOutcome::Applied { diff, report })
}

fn edit_before_sync(path: &Path, editor: &Editor) {
    println!("Opening {} in editor...", path.display());
    println!("Make your changes and save the file to continue.");
    match editor.edit(path) {
        EditOutcome::Modified => println!("\nFile modified. Proceeding with sync...\n"),
        EditOutcome::Unchanged => println!("\nNo changes detected or edit cancelled."),
        EditOutcome::Failed(message) => println!("\nError: {message}"),
    }
}

fn load_catalog(source: &DocumentSource) -> Result<Document, SyncError> {
    match source {
        DocumentSource::Url(url) => {
            println!("Fetching MCP servers from URL: {url}");
            reader::fetch_document(url)
        },
        DocumentSource::Path(path) => {
            let loaded = reader::read_document(path, true)?;
            if loaded.created {
                println!("Created empty {}", path.display());
                println!(
                    "\nNote: The file is empty. Please add your MCP server configurations to this file."
                );
            }
            Ok(loaded.document)
        },
    }
}

/// Copy target-only entries into the catalog file, backing it up first
fn bind_target_entries(path: &Path, catalog: EntryMap, current: &EntryMap) -> Result<EntryMap> {
    let folded = fold_back(&catalog, current);

    if folded.added.is_empty() {
        println!("No new servers found in .claude.json to add to mcpServers.json");
        println!("Proceeding with sync...\n");
        return Ok(folded.catalog);
    }

    println!("Found {} server(s) in .claude.json not in mcpServers.json:", folded.added.len());
    for name in &folded.added {
        println!("  - {name}");
    }
    println!();

    let report = config::save(path, &folded.catalog, true)
        .with_context(|| format!("Failed to update catalog {}", path.display()))?;
    print_save_report(path, &report);
    println!("\nAdded {} server(s) to mcpServers.json", folded.added.len());
    println!("Proceeding with sync...\n");

    Ok(folded.catalog)
}

fn print_empty_catalog_help(source: &DocumentSource) {
    match source {
        DocumentSource::Url(url) => {
            println!("\nNo MCP servers found at URL: {url}");
            println!("Please ensure the URL returns a valid JSON with MCP server configurations.");
        },
        DocumentSource::Path(_) => {
            println!("\nNo MCP servers found in mcpServers.json!");
            println!("Please add your MCP server configurations to the file.");
            println!("\nExample configuration:");
            println!("  \"server-name\": {{");
            println!("    \"type\": \"sse\",");
            println!("    \"url\": \"http://localhost:8765/mcp/claude/sse\"");
            println!("  }}");
        },
    }
}

fn print_save_report(path: &Path, report: &SaveReport) {
    if let Some(backup) = &report.backup_path {
        println!("Created backup: {}", backup.display());
    }
    println!("Updated: {}", path.display());
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
