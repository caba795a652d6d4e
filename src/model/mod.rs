pub mod clubs;
pub mod types;
pub mod utils;

pub use clubs::*;
pub use types::*;
pub use utils::*;
