use crate::domain::model::{
    ExecutionMode, GrassRecord, JobRecord, LayerComponents, MapsetInfo, ProcessGraph,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;

/// GRaaS 服務的抽象介面。非成功的回應以 `GraasError::BackendError` 回傳。
#[async_trait]
pub trait GraasBackend: Send + Sync {
    fn layer_def_to_components(&self, product_id: &str) -> Result<LayerComponents> {
        LayerComponents::parse(product_id)
    }

    async fn layer_info(&self, product_id: &str) -> Result<GrassRecord>;

    async fn mapset_info(&self, location: &str, mapset: &str) -> Result<MapsetInfo>;

    async fn submit_job(&self, graph: &ProcessGraph, mode: ExecutionMode) -> Result<JobRecord>;

    async fn job_status(&self, job_id: &str) -> Result<JobRecord>;

    async fn delete_job(&self, job_id: &str) -> Result<JobRecord>;
}

pub trait ConfigProvider: Send + Sync {
    fn graas_endpoint(&self) -> &str;
    fn graas_user(&self) -> &str;
    fn graas_password(&self) -> &str;
    fn bind_address(&self) -> &str;
    fn request_timeout(&self) -> Duration;

    fn socket_addr(&self) -> Result<SocketAddr> {
        crate::utils::validation::validate_socket_addr("bind_address", self.bind_address())
    }
}
