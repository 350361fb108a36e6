use crate::domain::model::{ExecutionMode, GrassRecord, JobRecord, MapsetInfo, ProcessGraph};
use crate::domain::ports::{ConfigProvider, GraasBackend};
use crate::utils::error::{GraasError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// 透過 GRaaS REST API 存取 GRASS GIS location / mapset
#[derive(Debug, Clone)]
pub struct GraasClient {
    client: Client,
    base_url: Url,
    user: String,
    password: String,
}

impl GraasClient {
    pub fn new(base_url: &str, user: &str, password: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| GraasError::InvalidConfigValueError {
            field: "graas.endpoint".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.graas_endpoint(),
            config.graas_user(),
            config.graas_password(),
            config.request_timeout(),
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GraasError::ConfigError {
                message: format!("GRaaS endpoint {} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_process_results(&self, url: Url) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("GRaaS response status: {}", status);
        if !status.is_success() {
            return Err(backend_error(response).await);
        }

        let mut body: Value = response.json().await?;
        if let Some(results) = body.get_mut("process_results") {
            return Ok(results.take());
        }
        Ok(body)
    }

    /// GRaaS 對失敗的 resource 回 400，但 body 仍是完整的狀態紀錄
    async fn read_resource(&self, response: Response) -> Result<JobRecord> {
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<JobRecord>(&text) {
            Ok(record) => Ok(record),
            Err(_) if status.is_success() => Err(GraasError::UnexpectedResponse { body: text }),
            Err(_) => Err(GraasError::BackendError {
                status: status.as_u16(),
                message: error_message(&text),
            }),
        }
    }
}

async fn backend_error(response: Response) -> GraasError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(text) => error_message(&text),
        Err(e) => e.to_string(),
    };
    GraasError::BackendError { status, message }
}

/// 優先取 JSON body 的 message 欄位，否則回傳原始內容
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.to_string())
}

#[async_trait]
impl GraasBackend for GraasClient {
    async fn layer_info(&self, product_id: &str) -> Result<GrassRecord> {
        let layer = self.layer_def_to_components(product_id)?;
        let url = self.endpoint(&[
            "locations",
            &layer.location,
            "mapsets",
            &layer.mapset,
            layer.datatype.path_segment(),
            &layer.layer,
        ])?;

        let results = self.get_process_results(url).await?;
        serde_json::from_value(results).map_err(|_| GraasError::UnexpectedResponse {
            body: format!("layer info for <{}> is not a key/value record", product_id),
        })
    }

    async fn mapset_info(&self, location: &str, mapset: &str) -> Result<MapsetInfo> {
        let url = self.endpoint(&["locations", location, "mapsets", mapset, "info"])?;
        let results = self.get_process_results(url).await?;

        let projection = results
            .get("projection")
            .and_then(|p| p.as_str())
            .ok_or_else(|| GraasError::MissingField {
                field: "projection".to_string(),
            })?
            .to_string();

        Ok(MapsetInfo {
            projection,
            region: results.get("region").cloned(),
        })
    }

    async fn submit_job(&self, graph: &ProcessGraph, mode: ExecutionMode) -> Result<JobRecord> {
        let target = graph.target_layer()?;
        let url = match mode {
            ExecutionMode::Ephemeral => {
                self.endpoint(&["locations", &target.location, "process_graph"])?
            }
            ExecutionMode::Persistent => self.endpoint(&[
                "locations",
                &target.location,
                "mapsets",
                &target.mapset,
                "process_graph",
            ])?,
        };

        tracing::debug!("POST {} ({:?})", url, mode);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.user, Some(&self.password))
            .json(graph.document())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        self.read_resource(response).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobRecord> {
        let url = self.endpoint(&["resources", &self.user, job_id])?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        self.read_resource(response).await
    }

    async fn delete_job(&self, job_id: &str) -> Result<JobRecord> {
        let url = self.endpoint(&["resources", &self.user, job_id])?;
        tracing::debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if let Ok(record) = serde_json::from_str::<JobRecord>(&text) {
            return Ok(record);
        }
        if !status.is_success() {
            return Err(GraasError::BackendError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        // 終止請求只回傳訊息時，再查一次狀態
        tracing::debug!("Termination accepted for {}: {}", job_id, error_message(&text));
        self.job_status(job_id).await
    }
}
