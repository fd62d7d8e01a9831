pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::HttpTransport;
pub use config::{Overrides, SmokeSettings};
pub use crate::core::{driver::SmokeDriver, scenario::Scenario};
pub use utils::error::{Result, SmokeError};

/// Printed on stdout when every probe passed.
pub const SUCCESS_MESSAGE: &str = "All tests passed successfully!";

/// Builds the transport and probe list from resolved settings and runs them in order.
pub async fn run_smoke(settings: &SmokeSettings) -> Result<crate::core::driver::RunReport> {
    let transport = HttpTransport::new(settings)?;
    let probes = settings.scenario.probes()?;

    SmokeDriver::new(transport, probes)
        .with_echo_json(settings.echo_json)
        .run()
        .await
}
