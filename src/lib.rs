pub mod args;
pub mod caddy;
pub mod error;
pub mod model;
pub mod storage;
pub mod controller {
    pub mod advice;
}
pub mod view {
    pub mod advice;
}

pub use caddy::{CaddyConfig, CaddyService};
pub use error::{CaddyError, ErrorCode};
