pub mod differ;
pub mod error;
pub mod export;
pub mod unpack;

pub use differ::{ArchiveDiffer, DiffStats};
pub use error::{DifferError, Result};
