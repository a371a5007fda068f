//! CLI command definitions and handlers

mod analyze;
mod health;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repocat::config::Config;
use std::path::PathBuf;

/// Repocat - repository quality scoring
#[derive(Parser, Debug)]
#[command(name = "repocat")]
#[command(
    version,
    about = "Score a GitHub repository's code quality and turn it into a cat",
    long_about = "Repocat samples up to five representative files from a GitHub repository, \
scores them with static heuristics and a model-based review, fuses the two scores \
(30% heuristic / 70% review), and maps the result onto cat attributes for an image renderer.",
    after_help = "\
Examples:
  repocat analyze https://github.com/octo/demo              Full run with rendering
  repocat analyze https://github.com/octo/demo --no-render  Scores and attributes only
  repocat analyze https://github.com/octo/demo -f json      JSON output for scripting
  repocat health                                            Check external services
  repocat init                                              Write an example config"
)]
pub struct Cli {
    /// Config file (default: ~/.config/repocat/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a GitHub repository
    Analyze {
        /// Repository URL (https://github.com/<owner>/<repo>)
        url: String,

        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Skip the image renderer
        #[arg(long)]
        no_render: bool,
    },

    /// Check connectivity to GitHub, OpenRouter and Together
    Health {
        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write an example config file
    Init,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(cli.config.as_deref()),

        Commands::Analyze {
            url,
            format,
            no_render,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            analyze::run(&config, &url, &format, no_render)
        }

        Commands::Health { format } => {
            let config = Config::load(cli.config.as_deref())?;
            health::run(&config, &format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "repocat",
            "analyze",
            "https://github.com/octo/demo",
            "--format",
            "json",
            "--no-render",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                url,
                format,
                no_render,
            } => {
                assert_eq!(url, "https://github.com/octo/demo");
                assert_eq!(format, "json");
                assert!(no_render);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "repocat",
            "health",
            "--log-level",
            "debug",
            "--config",
            "/tmp/repocat.toml",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/repocat.toml")));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = Cli::try_parse_from(["repocat", "health", "--format", "xml"]);
        assert!(result.is_err());
    }
}
