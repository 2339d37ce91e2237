use clap::{Parser, Subcommand, ValueEnum};

/// Restage - refresh a staging RDS instance from the latest live snapshot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Restore the latest live snapshot, mangle it, and swap it into staging
    Run {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show the latest automated snapshot of the live instance
    Snapshot {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Wait until an instance reports available
    Wait {
        /// Instance identifier to poll
        identifier: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Swap an already restored instance into staging (no restore, no mangling)
    Swap {
        /// Identifier of the restored instance to promote (e.g., "restore-1a2b3c4d")
        restore_identifier: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Print the Mermaid flow diagram of an orchestration
    Flow {
        /// Orchestration name (e.g., "swap-identities"); all when omitted
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults_to_table() {
        let args = Args::try_parse_from(["restage", "run"]).unwrap();
        assert!(matches!(args.mode, Mode::Run { output: OutputFormat::Table }));
    }

    #[test]
    fn test_parse_swap_with_json_output() {
        let args = Args::try_parse_from(["restage", "swap", "restore-1a2b3c4d", "-o", "json"]).unwrap();
        match args.mode {
            Mode::Swap { restore_identifier, output } => {
                assert_eq!(restore_identifier, "restore-1a2b3c4d");
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_wait_requires_identifier() {
        assert!(Args::try_parse_from(["restage", "wait"]).is_err());
    }
}
