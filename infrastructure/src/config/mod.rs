//! Configuration file loading for relay-tally
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RELAY_TALLY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tally.toml` or `./.tally.toml`
//! 4. Global: `~/.config/relay-tally/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top of the result by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileFetchConfig, FileOutputConfig, FileQueryConfig, FileRelaysConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
