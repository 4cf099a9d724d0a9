use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sets the level of tracing
    #[arg(long, global = true, ignore_case = true, default_value = "INFO")]
    pub trace: TraceLevel,

    /// Seconds to keep retrying the PostgreSQL connection at startup
    #[arg(long, global = true, default_value_t = 30)]
    pub connect_timeout: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Save the tickers once, keep refreshing them in the background and serve `GET /tickers`.
    Serve {
        /// Seconds between two background refreshes (1 to 86400)
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=86_400))]
        interval: u64,
    },

    /// Save the tickers once and exit.
    Update,

    /// Print the stored tickers as JSON.
    Show,

    /// Drop the tickers table.
    Drop,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}
