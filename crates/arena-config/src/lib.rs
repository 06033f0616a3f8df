//! Configuration for the Worley arena generator.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line via clap. Unknown fields are ignored and missing ones take their
//! defaults, so old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GenerationRequest, OutputConfig, default_config_dir};
pub use error::ConfigFileError;
