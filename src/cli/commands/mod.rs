//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod extract;
mod serve;
mod simplify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "plainpolicy")]
#[command(about = "Plain-English summaries of government policy documents")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "PLAINPOLICY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface and API
    Serve {
        /// Bind address: PORT, HOST, or HOST:PORT (default from config)
        bind: Option<String>,
    },

    /// Extract text from a policy document
    Extract {
        /// Text, PDF, or Word file
        file: PathBuf,
    },

    /// Summarize a policy with pros and cons
    Simplify {
        /// Text, PDF, or Word file to analyze
        #[arg(required_unless_present = "text", conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Policy text to analyze instead of a file
        #[arg(short, long)]
        text: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&config, bind.as_deref()).await,
        Commands::Extract { file } => extract::cmd_extract(&config, &file).await,
        Commands::Simplify { file, text, json } => {
            let input = match (file, text) {
                (Some(path), _) => simplify::Input::File(path),
                (None, Some(text)) => simplify::Input::Text(text),
                (None, None) => anyhow::bail!("Provide a FILE or --text"),
            };
            simplify::cmd_simplify(&config, input, json).await
        }
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simplify_text() {
        let cli = Cli::try_parse_from(["plainpolicy", "simplify", "--text", "A bill", "--json"])
            .unwrap();
        match cli.command {
            Commands::Simplify { file, text, json } => {
                assert!(file.is_none());
                assert_eq!(text.as_deref(), Some("A bill"));
                assert!(json);
            }
            _ => panic!("expected simplify"),
        }
    }

    #[test]
    fn test_simplify_requires_input() {
        assert!(Cli::try_parse_from(["plainpolicy", "simplify"]).is_err());
        assert!(
            Cli::try_parse_from(["plainpolicy", "simplify", "a.txt", "--text", "x"]).is_err()
        );
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["plainpolicy", "serve", "8080", "-v", "--config", "p.toml"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("p.toml")));
        assert!(matches!(cli.command, Commands::Serve { bind: Some(b) } if b == "8080"));
    }
}
