pub mod adjuster;
pub mod personalization;
pub mod recommend;
pub mod selector;
pub mod service;

pub use adjuster::*;
pub use personalization::*;
pub use recommend::*;
pub use selector::*;
pub use service::*;
