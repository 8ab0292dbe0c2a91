use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "IPL score prediction form backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the form API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Validate a JSON match draft ("-" reads stdin)
    Validate {
        /// Path to the draft
        source: String,
    },
    /// Validate a JSON match draft and request a prediction for it
    Predict {
        /// Path to the draft
        source: String,
    },
    /// Print every option list the form offers
    Options,
    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
