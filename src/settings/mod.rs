//! The `settings` module is a simple utility that requires manual verification.
//! See `settings/dev.toml` for the development configuration it loads.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
