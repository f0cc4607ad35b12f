//! Leadflow configuration management using Figment
//!
//! Configuration is layered: built-in defaults, then `leadflow.{toml,yaml,yml,json}`
//! from `~/.leadflow/` and `./.leadflow/`, then `LEADFLOW_` environment variables.
//!
//! ```no_run
//! use leadflow_config::load_configuration;
//!
//! let config = load_configuration()?;
//! println!("storing pipeline data in {}", config.data_dir.display());
//! # Ok::<(), leadflow_config::ConfigError>(())
//! ```
//!
//! ## Example TOML configuration
//!
//! ```toml
//! data_dir = "/var/lib/leadflow"
//! actor = "ops-team"
//!
//! [latency.fixed]
//! ms = 150
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use types::{LatencySetting, PipelineConfig, DEFAULT_DATA_DIR};

/// Load the pipeline configuration from all standard sources
pub fn load_configuration() -> ConfigResult<PipelineConfig> {
    ConfigProvider::new().load()
}
