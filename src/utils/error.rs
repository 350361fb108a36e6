use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraasError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("GRaaS responded with HTTP {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Invalid product id <{product_id}>: {reason}")]
    InvalidProductId { product_id: String, reason: String },

    #[error("Missing field '{field}' in GRASS metadata")]
    MissingField { field: String },

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFieldValue { field: String, value: String },

    #[error("Invalid process graph: {message}")]
    InvalidProcessGraph { message: String },

    #[error("Wrong return values: {body}")]
    UnexpectedResponse { body: String },

    #[error("Job <{job_id}> did not reach a terminal status within {timeout:?}")]
    PollTimeout { job_id: String, timeout: Duration },

    /// 已處理過的請求錯誤，訊息直接回傳給 openEO 客戶端
    #[error("{description}")]
    RequestFailed { description: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Request,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GraasError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GraasError::ApiError(_) | GraasError::PollTimeout { .. } => ErrorCategory::Network,
            GraasError::BackendError { .. } | GraasError::UnexpectedResponse { .. } => {
                ErrorCategory::Backend
            }
            GraasError::InvalidProductId { .. }
            | GraasError::MissingField { .. }
            | GraasError::InvalidFieldValue { .. }
            | GraasError::InvalidProcessGraph { .. }
            | GraasError::RequestFailed { .. } => ErrorCategory::Request,
            GraasError::ConfigError { .. }
            | GraasError::ConfigValidationError { .. }
            | GraasError::InvalidConfigValueError { .. }
            | GraasError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GraasError::IoError(_) | GraasError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GraasError::ApiError(_) => "Check that the GRaaS endpoint is reachable",
            GraasError::PollTimeout { .. } => "Increase the poll timeout or check the job on GRaaS",
            GraasError::BackendError { status: 401, .. } => "Check the GRaaS user and password",
            GraasError::BackendError { .. } => "Inspect the GRaaS error message and resubmit",
            GraasError::UnexpectedResponse { .. } => "Check that the server speaks the openEO jobs API",
            GraasError::InvalidProductId { .. } => {
                "Use a product id of the form location.mapset.datatype.layer"
            }
            GraasError::MissingField { .. } | GraasError::InvalidFieldValue { .. } => {
                "The GRASS layer metadata is incomplete; check the layer in GRaaS"
            }
            GraasError::InvalidProcessGraph { .. } => {
                "Submit a JSON document with a process_graph object referencing a product_id"
            }
            GraasError::RequestFailed { .. } => "Check the request and retry",
            GraasError::ConfigError { .. }
            | GraasError::ConfigValidationError { .. }
            | GraasError::InvalidConfigValueError { .. }
            | GraasError::MissingConfigError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            GraasError::IoError(_) => "Check file paths and permissions",
            GraasError::SerializationError(_) => "Check that the JSON input is well formed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not talk to the service: {}", self),
            ErrorCategory::Backend => format!("The GRaaS backend reported a problem: {}", self),
            ErrorCategory::Request => self.to_string(),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraasError>;
