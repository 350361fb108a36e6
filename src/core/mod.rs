pub mod data_product;
pub mod jobs;
pub mod poller;

pub use crate::domain::model::{DataProductInfo, ExecutionMode, JobRecord, JobStatus};
pub use crate::domain::ports::{ConfigProvider, GraasBackend};
pub use crate::utils::error::Result;
