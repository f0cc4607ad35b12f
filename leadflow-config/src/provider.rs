//! Configuration provider using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, FileDiscovery},
    types::PipelineConfig,
    ConfigResult,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, info, trace};

/// Environment variable prefix, e.g. `LEADFLOW_DATA_DIR`
pub const ENV_PREFIX: &str = "LEADFLOW_";

/// Loads `PipelineConfig` from layered sources.
///
/// Precedence, lowest first:
/// 1. Built-in defaults
/// 2. Global then project configuration files
/// 3. `LEADFLOW_` environment variables (`__` separates nested keys)
///
/// Nothing is cached; every call reads the sources again.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    /// Provider over the standard discovery directories
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider over a custom discovery
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the pipeline configuration
    pub fn load(&self) -> ConfigResult<PipelineConfig> {
        let config: PipelineConfig = self.build_figment().extract()?;
        config.validate()?;
        info!(
            data_dir = %config.data_dir.display(),
            latency = ?config.latency,
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    /// Build the figment with all sources in precedence order
    pub fn build_figment(&self) -> Figment {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

        for file in self.discovery.discover_all() {
            trace!("Merging config file: {}", file.path.display());
            figment = figment.merge(Self::file_provider(&file));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}
