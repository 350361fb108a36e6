use clap::Parser;
use graas_openeo::config::toml_config::TomlConfig;
use graas_openeo::core::ConfigProvider;
use graas_openeo::utils::error::ErrorSeverity;
use graas_openeo::utils::{logger, validation::Validate};
use graas_openeo::{start_server, CliConfig, GraasClient, GraasError};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            // 載入 TOML 配置
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            init_logger(config.json_logs() || cli.log_json, config.verbose() || cli.verbose);
            tracing::info!("📁 Loaded configuration from: {}", path);
            run(config).await
        }
        None => {
            init_logger(cli.log_json, cli.verbose);
            if cli.verbose {
                tracing::debug!("CLI config: {:?}", cli);
            }
            run(cli).await
        }
    }
}

fn init_logger(json: bool, verbose: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("🚀 Starting graas-openeo adapter");

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let backend = match GraasClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => fail(&e),
    };
    tracing::info!("🔗 GRaaS endpoint: {}", config.graas_endpoint());

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => fail(&e),
    };

    let (_, handle) = match start_server(backend, addr).await {
        Ok(started) => started,
        Err(e) => fail(&e),
    };

    handle.await??;
    tracing::info!("✅ Server stopped");
    Ok(())
}

fn fail(e: &GraasError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
