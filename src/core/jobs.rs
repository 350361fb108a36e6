use crate::domain::model::{ExecutionMode, JobRecord, ProcessGraph};
use crate::domain::ports::GraasBackend;
use crate::utils::error::{GraasError, Result};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct JobService {
    backend: Arc<dyn GraasBackend>,
}

impl JobService {
    pub fn new(backend: Arc<dyn GraasBackend>) -> Self {
        Self { backend }
    }

    pub async fn submit(&self, document: Value, mode: ExecutionMode) -> Result<JobRecord> {
        let graph = ProcessGraph::from_value(document)?;
        tracing::info!(
            "📨 Submitting {:?} job for products {:?}",
            mode,
            graph.product_ids()
        );

        let record = self.backend.submit_job(&graph, mode).await?;
        tracing::info!("✅ Job {} accepted ({})", record.job_id, record.status);
        Ok(record)
    }

    pub async fn status(&self, job_id: &str) -> Result<JobRecord> {
        check_job_id(job_id)?;
        let record = self.backend.job_status(job_id).await?;
        tracing::debug!("Job {} is {}", job_id, record.status);
        Ok(record)
    }

    pub async fn delete(&self, job_id: &str) -> Result<JobRecord> {
        check_job_id(job_id)?;
        tracing::info!("🛑 Terminating job {}", job_id);
        self.backend.delete_job(job_id).await
    }
}

fn check_job_id(job_id: &str) -> Result<()> {
    if job_id.trim().is_empty() {
        return Err(GraasError::RequestFailed {
            description: "Job id must not be empty".to_string(),
        });
    }
    Ok(())
}
