//! Player identity, tokens, and the in-memory player registry.
//!
//! Pure data and data manipulation, like `scavenger-world` — owned
//! exclusively by the coordinator's single-writer strand.
mod player;
mod registry;
mod token;

pub use player::*;
pub use registry::*;
pub use token::*;
