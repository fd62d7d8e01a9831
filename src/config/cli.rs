use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "mealmax-smoke")]
#[command(version)]
#[command(about = "Smoke-test a running meal max API end to end")]
pub struct CliConfig {
    #[arg(long, help = "API root, e.g. http://localhost:5000/api [default: http://localhost:5000/api]")]
    pub base_url: Option<String>,

    #[arg(long, help = "Print every raw response body")]
    pub echo_json: bool,

    #[arg(long, help = "Per-request timeout in seconds [default: 30]")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "TOML scenario file with seed meals and target settings")]
    pub scenario: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// Like `parse_from`, but leaves the exit code to the caller.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }
}

/// Exit status for a failed parse: `--help`/`--version` are not failures.
pub fn usage_exit_code(error: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from_args(["mealmax-smoke"]).unwrap();
        assert!(config.base_url.is_none());
        assert!(!config.echo_json);
        assert!(config.timeout_seconds.is_none());
        assert!(config.scenario.is_none());
    }

    #[test]
    fn test_echo_json_flag() {
        let config = CliConfig::parse_from_args(["mealmax-smoke", "--echo-json"]).unwrap();
        assert!(config.echo_json);
    }

    #[test]
    fn test_all_flags() {
        let config = CliConfig::parse_from_args([
            "mealmax-smoke",
            "--base-url",
            "http://api.internal:8080/api",
            "--timeout-seconds",
            "5",
            "--scenario",
            "smoke.toml",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://api.internal:8080/api"));
        assert_eq!(config.timeout_seconds, Some(5));
        assert_eq!(config.scenario.as_deref(), Some("smoke.toml"));
        assert!(config.verbose);
    }

    #[test]
    fn test_unknown_argument_exits_1() {
        let err = CliConfig::parse_from_args(["mealmax-smoke", "--bogus"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        let err = CliConfig::parse_from_args(["mealmax-smoke", "stray"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_help_exits_0() {
        let err = CliConfig::parse_from_args(["mealmax-smoke", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }
}
