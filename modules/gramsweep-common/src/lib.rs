pub mod config;
pub mod types;

pub use config::{Config, INSTAGRAM_ORIGIN};
pub use types::{RunResult, UnfollowCandidate};
