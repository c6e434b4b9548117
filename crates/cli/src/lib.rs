mod check;
mod document;
mod symbols;
mod tokens;

use clap::{Parser, Subcommand};
use pickscope_core::Config;
use pickscope_core::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pickscope",
    version,
    about = "Language server and source checker for Pick BASIC",
    long_about = "Pickscope answers editor queries over Pick BASIC programs: definitions, \
                  references, hover, outline, completion, highlighting and syntax diagnostics. \
                  The same analysis is available from the command line."
)]
pub struct Cli {
    /// Directory for log files (default ~/.pickscope/logs, or PICKSCOPE_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `pickscope_core=trace` (or PICKSCOPE_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Mirror logs to stderr
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol (LSP) server on stdio
    Lsp,
    /// Report syntax problems in source files
    #[command(
        long_about = "Parses each file and prints one line per missing or malformed construct. \
                      Exits with an error if any file has problems."
    )]
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the labels, subroutines and declarations of a file
    Symbols {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print symbols as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how each token of a file is highlighted
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// Environment-derived configuration with command-line overrides on top.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(filter) = &self.log_filter {
            config.log_filter = filter.clone();
        }
        config
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.config();

    let component = match &cli.command {
        Commands::Lsp => "lsp",
        _ => "cli",
    };
    let _guard = init_logging(component, &config.log_dir, &config.log_filter, cli.log_stderr);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Lsp => {
            rt.block_on(async { pickscope_lsp::run_server(config).await })?;
            Ok(())
        }
        Commands::Check { files, json } => check::run(&files, json, config),
        Commands::Symbols { file, json } => symbols::run(&file, json, config),
        Commands::Tokens { file } => tokens::run(&file, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_environment() {
        let cli = Cli::parse_from([
            "pickscope",
            "--log-dir",
            "/tmp/pickscope-test-logs",
            "--log-filter",
            "trace",
            "check",
            "MAIN.B",
        ]);
        let config = cli.config();
        assert_eq!(config.log_dir, PathBuf::from("/tmp/pickscope-test-logs"));
        assert_eq!(config.log_filter, "trace");
    }

    #[test]
    fn check_requires_a_file() {
        assert!(Cli::try_parse_from(["pickscope", "check"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["pickscope", "symbols", "MAIN.B", "--json", "--log-stderr"]);
        assert!(cli.log_stderr);
        assert!(matches!(cli.command, Commands::Symbols { json: true, .. }));
    }
}
