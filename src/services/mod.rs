pub mod analyzer;
pub mod roster;

pub use analyzer::*;
pub use roster::*;
