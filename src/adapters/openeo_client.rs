use crate::domain::model::{ExecutionMode, JobStatus};
use crate::utils::error::{GraasError, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

/// openEO REST 回應：HTTP 狀態碼加上 JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct JobResponse {
    pub http_status: u16,
    pub body: Value,
}

impl JobResponse {
    pub fn job_id(&self) -> Option<&str> {
        self.body.get("job_id").and_then(|v| v.as_str())
    }

    pub fn status(&self) -> Option<JobStatus> {
        self.body
            .get("status")
            .and_then(|v| v.as_str())
            .map(|s| JobStatus::from(s.to_string()))
    }

    pub fn description(&self) -> Option<&str> {
        self.body.get("description").and_then(|v| v.as_str())
    }
}

/// 本服務 `/jobs` 與 `/data` API 的客戶端
#[derive(Debug, Clone)]
pub struct OpenEoClient {
    client: Client,
    base_url: Url,
}

impl OpenEoClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| GraasError::InvalidConfigValueError {
            field: "server".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GraasError::ConfigError {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<JobResponse> {
        let response = request.send().await?;
        let http_status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text)
            .map_err(|_| GraasError::UnexpectedResponse { body: text })?;
        Ok(JobResponse { http_status, body })
    }

    pub async fn submit(&self, document: &Value, mode: ExecutionMode) -> Result<JobResponse> {
        let url = self.url(&["jobs"])?;
        let request = match mode {
            ExecutionMode::Ephemeral => self.client.post(url),
            ExecutionMode::Persistent => self.client.put(url),
        };
        Self::send(request.json(document)).await
    }

    pub async fn status(&self, job_id: &str) -> Result<JobResponse> {
        let url = self.url(&["jobs", job_id])?;
        Self::send(self.client.get(url)).await
    }

    pub async fn delete(&self, job_id: &str) -> Result<JobResponse> {
        let url = self.url(&["jobs", job_id])?;
        Self::send(self.client.delete(url)).await
    }

    pub async fn data_product(&self, product_id: &str) -> Result<JobResponse> {
        let url = self.url(&["data", product_id])?;
        Self::send(self.client.get(url)).await
    }
}
