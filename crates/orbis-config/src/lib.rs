//! Configuration for the orbis terrain tools.
//!
//! Settings persist to disk as RON, tolerate missing and unknown fields, and
//! can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, ProbeConfig, TerrainConfig};
pub use error::ConfigError;
