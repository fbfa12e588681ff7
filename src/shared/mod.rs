/// Shared utilities: error taxonomy and the crate-wide result alias
pub mod error;
pub mod result;

pub use result::Result;
