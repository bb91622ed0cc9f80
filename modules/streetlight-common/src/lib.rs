pub mod classify;
pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use classify::*;
pub use config::Config;
pub use error::StreetlightError;
pub use types::*;
