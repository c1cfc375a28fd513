use mcp_sync::app_config::{AppConfig, Defaults};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
[defaults]
mcp-file = "~/mcp/mcpServers.json"
claude-config = "~/.claude.json"
editor = "nvim"
backup = false
"#,
        )
        .unwrap();

        assert_eq!(
            config.defaults(),
            Defaults {
                mcp_file: Some("~/mcp/mcpServers.json".to_string()),
                claude_config: Some("~/.claude.json".to_string()),
                editor: Some("nvim".to_string()),
                backup: Some(false),
            }
        );
    }

    #[test]
    fn test_empty_file_means_no_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.defaults(), Defaults::default());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = toml::from_str::<AppConfig>("[defaults]\nbackup = \"sometimes\"\n");
        assert!(result.is_err());
    }
}
