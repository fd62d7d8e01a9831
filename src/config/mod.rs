#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::scenario::Scenario;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use toml_config::ScenarioFile;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Resolved run configuration, handed to the transport and driver at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub echo_json: bool,
    pub scenario: Scenario,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            echo_json: false,
            scenario: Scenario::default(),
        }
    }
}

/// Explicit overrides, typically from the command line. `None`/`false` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub echo_json: bool,
}

impl SmokeSettings {
    /// Precedence: explicit override, then scenario file, then built-in default.
    pub fn resolve(overrides: Overrides, file: Option<&ScenarioFile>) -> Self {
        let file_base_url = file.and_then(|f| f.base_url()).map(str::to_string);
        let file_timeout = file.and_then(|f| f.timeout_seconds());
        let file_echo = file.and_then(|f| f.echo_json()).unwrap_or(false);

        Self {
            base_url: overrides
                .base_url
                .or(file_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file_timeout)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            echo_json: overrides.echo_json || file_echo,
            scenario: file.map(|f| f.to_scenario()).unwrap_or_default(),
        }
    }

    /// Loads the optional scenario file and resolves against it.
    /// File values are checked before merging so errors name the `target.*` key.
    pub fn load(overrides: Overrides, scenario_path: Option<&str>) -> Result<Self> {
        let file = match scenario_path {
            Some(path) => {
                tracing::debug!("Loading scenario file: {}", path);
                let file = ScenarioFile::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        let settings = Self::resolve(overrides, file.as_ref());
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl From<&cli::CliConfig> for Overrides {
    fn from(config: &cli::CliConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_seconds: config.timeout_seconds,
            echo_json: config.echo_json,
        }
    }
}

impl ConfigProvider for SmokeSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for SmokeSettings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        self.scenario.validate()
    }
}
