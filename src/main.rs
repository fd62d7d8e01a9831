use mealmax_smoke::config::cli::usage_exit_code;
use mealmax_smoke::utils::logger::{self, LogFormat};
use mealmax_smoke::{run_smoke, CliConfig, Overrides, SmokeSettings, SUCCESS_MESSAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 參數錯誤一律以 1 結束，且不發出任何請求
    let config = match CliConfig::parse_from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(config.log_json), config.verbose);

    tracing::info!("Starting mealmax-smoke");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match SmokeSettings::load(Overrides::from(&config), config.scenario.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            println!("❌ {}", e.user_friendly_message());
            println!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "🎯 Target: {} (timeout {}s, echo_json={})",
        settings.base_url,
        settings.timeout_seconds,
        settings.echo_json
    );

    match run_smoke(&settings).await {
        Ok(report) => {
            tracing::info!("📈 Run summary: {:?}", report.summary());
            println!("{}", SUCCESS_MESSAGE);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Smoke run halted: {}", e);
            println!("❌ {}", e.user_friendly_message());
            println!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
