//! Configuration loader and schema types.
//!
//! Settings are layered from struct defaults, an optional TOML file and
//! `CADENZA__` environment variables. The same module resolves the XDG paths
//! used for favorites storage and the log file.

mod load;
mod schema;

pub use schema::*;
