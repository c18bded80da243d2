pub mod config;
pub mod signing;
pub mod utils;

pub use config::*;
pub use signing::*;
