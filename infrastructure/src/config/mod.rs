//! Configuration file loading for intern-stack
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `INTERN_STACK_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./intern-stack.toml` or `./.intern-stack.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/intern-stack/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
