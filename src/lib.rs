pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GraasClient, OpenEoClient};
pub use api::server::start_server;
pub use crate::core::{data_product::DataProductService, jobs::JobService, poller::JobPoller};
pub use utils::error::{GraasError, Result};
