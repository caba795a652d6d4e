use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SQLite file holding shot history and tendencies. Omit to keep everything in memory.
    #[arg(
        short = 'n',
        long,
        value_name = "DATABASE_NAME",
        value_parser = crate::args::validation::check_db_path
    )]
    pub db_name: Option<String>,
    #[arg(long, value_name = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(short = 'p', long, value_name = "PORT", default_value = "5201")]
    pub port: u16,
    /// Upper bound on any single tendency store call before advice proceeds without it.
    #[arg(
        long,
        value_name = "MILLISECONDS",
        default_value = "1500",
        value_parser = crate::args::validation::check_positive_millis
    )]
    pub store_timeout_ms: u64,
    #[arg(long, value_name = "COUNT", default_value = "3")]
    pub free_advice_limit: u32,
    /// tracing filter directive, overridden by RUST_LOG when set.
    #[arg(long, value_name = "FILTER", default_value = "rusty_caddy=info")]
    pub log_filter: String,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub db_name: Option<String>,
    pub host: String,
    pub port: u16,
    pub store_timeout: Duration,
    pub free_advice_limit: u32,
    pub log_filter: String,
}
