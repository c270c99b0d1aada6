//! The `logger` module is a simple utility that requires manual verification.
//! `main.rs` bootstraps it and reloads the filter once settings are parsed.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
