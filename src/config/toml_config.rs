use crate::core::scenario::{default_seed_meals, Scenario};
use crate::domain::model::{LeaderboardSort, NewMeal};
use crate::utils::error::{Result, SmokeError};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scenario file. Every section is optional; missing values fall back to the built-in run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub target: Option<TargetConfig>,
    pub scenario: Option<ScenarioConfig>,
    pub seed_meals: Option<Vec<NewMeal>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub echo_json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub leaderboard_sorts: Option<Vec<LeaderboardSort>>,
}

impl ScenarioFile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SmokeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SmokeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are an error.
    /// Whole-line `#` comments are passed through untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SmokeError::ConfigError {
            message: format!("env pattern: {}", e),
        })?;

        let mut missing: Vec<String> = Vec::new();
        let mut lines: Vec<String> = Vec::new();

        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            missing.extend(
                re.captures_iter(line)
                    .map(|caps| caps[1].to_string())
                    .filter(|name| std::env::var(name).is_err()),
            );
            let replaced = re.replace_all(line, |caps: &regex::Captures| {
                std::env::var(&caps[1]).unwrap_or_default()
            });
            lines.push(replaced.into_owned());
        }

        if !missing.is_empty() {
            return Err(SmokeError::ConfigError {
                message: format!("Environment variables not set: {}", missing.join(", ")),
            });
        }

        Ok(lines.join("\n"))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.base_url.as_deref())
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.target.as_ref().and_then(|t| t.timeout_seconds)
    }

    pub fn echo_json(&self) -> Option<bool> {
        self.target.as_ref().and_then(|t| t.echo_json)
    }

    pub fn to_scenario(&self) -> Scenario {
        let defaults = Scenario::default();
        Scenario {
            seed_meals: self.seed_meals.clone().unwrap_or_else(default_seed_meals),
            leaderboard_sorts: self
                .scenario
                .as_ref()
                .and_then(|s| s.leaderboard_sorts.clone())
                .unwrap_or(defaults.leaderboard_sorts),
        }
    }
}

impl Validate for ScenarioFile {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.base_url() {
            validate_url("target.base_url", url)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            validate_positive_number("target.timeout_seconds", timeout, 1)?;
        }
        self.to_scenario().validate()
    }
}
