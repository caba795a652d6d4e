use crate::caddy::CaddyConfig;
use clap::Parser;
use std::time::Duration;

pub mod types;
pub mod validation;

pub use types::{Args, CleanArgs};

/// # Errors
///
/// Will return `Err` if the parsed arguments are inconsistent
pub fn args_checks() -> Result<CleanArgs, String> {
    let args = Args::parse();
    args.validate()?;
    Ok(CleanArgs::new(args))
}

impl Args {
    /// # Errors
    ///
    /// Will return `Err` if the free tier would allow no advice at all
    pub fn validate(&self) -> Result<(), String> {
        if self.free_advice_limit == 0 {
            return Err("free_advice_limit must be at least 1".to_string());
        }
        Ok(())
    }
}

impl CleanArgs {
    #[must_use]
    pub fn new(args: Args) -> Self {
        CleanArgs {
            db_name: args.db_name.filter(|n| !n.trim().is_empty()),
            host: args.host,
            port: args.port,
            store_timeout: Duration::from_millis(args.store_timeout_ms),
            free_advice_limit: args.free_advice_limit,
            log_filter: args.log_filter,
        }
    }

    #[must_use]
    pub fn caddy_config(&self) -> CaddyConfig {
        CaddyConfig {
            store_timeout: self.store_timeout,
            free_advice_limit: self.free_advice_limit,
        }
    }
}
