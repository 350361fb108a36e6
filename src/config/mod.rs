pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "graas-openeo")]
#[command(about = "openEO REST adapter for GRASS GIS as a Service")]
pub struct CliConfig {
    #[arg(long, env = "GRAAS_ENDPOINT", default_value = "http://localhost:8080/api/v1")]
    pub graas_endpoint: String,

    #[arg(long, env = "GRAAS_USER", default_value = "user")]
    pub graas_user: String,

    #[arg(long, env = "GRAAS_PASSWORD", default_value = "", hide_env_values = true)]
    pub graas_password: String,

    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(short, long, help = "Load settings from a TOML file instead of the command line")]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn graas_endpoint(&self) -> &str {
        &self.graas_endpoint
    }

    fn graas_user(&self) -> &str {
        &self.graas_user
    }

    fn graas_password(&self) -> &str {
        &self.graas_password
    }

    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// CLI 與 TOML 共用的檢查
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_url("graas.endpoint", config.graas_endpoint())?;
    validation::validate_non_empty_string("graas.user", config.graas_user())?;
    validation::validate_socket_addr("server.bind", config.bind_address())?;
    validation::validate_range(
        "graas.timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;
    Ok(())
}
