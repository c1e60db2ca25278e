use clap::Parser;

/// Suggest Linux commands from natural language, informed by the packages
/// installed on this machine.
#[derive(Parser, Debug, Default)]
#[command(name = "snapshell", version)]
pub struct Cli {
    /// Refresh the package inventory from the system package manager
    #[arg(long)]
    pub update_db: bool,

    /// Show previously suggested commands and exit
    #[arg(long)]
    pub view_history: bool,

    /// Delete the suggestion history and exit
    #[arg(long)]
    pub clear_history: bool,

    /// Save the API key to the config file and exit
    #[arg(long, value_name = "KEY")]
    pub set_api_key: Option<String>,

    /// Override the model for this run
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_means_interactive() {
        let cli = Cli::try_parse_from(["snapshell"]).unwrap();
        assert!(!cli.update_db && !cli.view_history && !cli.clear_history);
        assert!(cli.set_api_key.is_none());
    }

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "snapshell",
            "--update-db",
            "--set-api-key",
            "gsk_abc",
            "--model",
            "mixtral",
        ])
        .unwrap();
        assert!(cli.update_db);
        assert_eq!(cli.set_api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(cli.model.as_deref(), Some("mixtral"));
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["snapshell", "--install"]).is_err());
    }
}
