use clap::{Parser, Subcommand};

/// kupo-query: run one query against a Kupo chain indexer and print JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Kupo HTTP endpoint.
    #[arg(long, default_value = "http://127.0.0.1:1442", env = "KUPO_URL")]
    pub kupo_url: String,

    /// Overall timeout for each request, in seconds.
    #[arg(long, default_value = "300", env = "KUPO_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Connection establishment timeout, in seconds.
    #[arg(long, default_value = "10")]
    pub connect_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List matches, optionally restricted to a pattern.
    Matches {
        /// Match pattern, e.g. `addr1.../*`. Must already be URL-safe.
        pattern: Option<String>,
    },

    /// Fetch transaction metadata at a slot.
    Metadata {
        slot_no: u64,

        /// Only return metadata of this transaction.
        #[arg(long)]
        transaction_id: Option<String>,
    },

    /// List registered patterns, optionally only those overlapping a pattern.
    Patterns { pattern: Option<String> },

    /// Look up a script by hash.
    Script { hash: String },

    /// Look up a datum by hash.
    Datum { hash: String },
}
