use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "mcp-sync",
    about = "Sync MCP server definitions from a catalog into ~/.claude.json",
    long_about = "mcp-sync keeps the MCP servers enabled in ~/.claude.json in step with a catalog file.

It lets you:
  • Pick which catalog servers are enabled, globally or for one project
  • Edit the catalog in $EDITOR before choosing
  • Pull servers that only exist in ~/.claude.json back into the catalog
  • Clean up the timestamped backups written on every change

Defaults can be set in $XDG_CONFIG_HOME/mcp-sync/config.toml:
  [defaults]
  mcp-file = \"~/mcp/mcpServers.json\"
  claude-config = \"~/.claude.json\"
  editor = \"nvim\"
  backup = true

Examples:
  # Choose global servers from ./mcpServers.json
  mcp-sync

  # Choose servers for one project
  mcp-sync --project /home/me/src/app

  # Use a remote catalog
  mcp-sync --url https://example.com/mcpServers.json

  # Remove old backups of ~/.claude.json
  mcp-sync --clean",
    version,
    author
)]
pub struct Cli {
    /// Project path whose servers should be synced (exact key under `projects`)
    #[arg(short, long, value_name = "PATH")]
    pub project: Option<String>,

    /// Path to the MCP server catalog
    #[arg(short, long, env = "MCP_SYNC_CATALOG", value_hint = clap::ValueHint::FilePath)]
    pub mcp_file: Option<PathBuf>,

    /// Fetch the catalog from a URL instead of a file
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Open the catalog in your editor before syncing
    #[arg(short, long)]
    pub edit: bool,

    /// Add servers found only in .claude.json to the catalog before syncing
    #[arg(short, long)]
    pub binding: bool,

    /// Path to the Claude configuration file
    #[arg(short = 'c', long, env = "MCP_SYNC_TARGET", value_hint = clap::ValueHint::FilePath)]
    pub claude_config: Option<PathBuf>,

    /// List and delete backups of the Claude configuration file
    #[arg(long)]
    pub clean: bool,

    /// Do not back up the Claude configuration file before writing it
    #[arg(long)]
    pub no_backup: bool,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long, global = true)]
    pub trace: bool,
}
