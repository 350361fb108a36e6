use crate::adapters::openeo_client::{JobResponse, OpenEoClient};
use crate::utils::error::{GraasError, Result};
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 反覆查詢 `/jobs/{id}` 直到 finished、error 或 terminated
pub struct JobPoller {
    client: OpenEoClient,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl JobPoller {
    pub fn new(client: OpenEoClient) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn client(&self) -> &OpenEoClient {
        &self.client
    }

    /// 從 submit / delete 的回應取出 job_id 再開始輪詢。回應必須是 HTTP 200。
    pub async fn wait_for(&self, accepted: &JobResponse) -> Result<JobResponse> {
        if accepted.http_status != 200 {
            return Err(GraasError::RequestFailed {
                description: accepted
                    .description()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!("HTTP status {} for {}", accepted.http_status, accepted.body)
                    }),
            });
        }

        let job_id = accepted
            .job_id()
            .ok_or_else(|| GraasError::UnexpectedResponse {
                body: accepted.body.to_string(),
            })?;
        self.wait_until_finished(job_id).await
    }

    pub async fn wait_until_finished(&self, job_id: &str) -> Result<JobResponse> {
        let started = Instant::now();

        loop {
            tracing::debug!("⏳ Waiting for job {} to finish", job_id);
            let response = self.client.status(job_id).await?;

            let status = response
                .status()
                .ok_or_else(|| GraasError::UnexpectedResponse {
                    body: response.body.to_string(),
                })?;

            if status.is_terminal() {
                tracing::info!(
                    "🏁 Job {} ended with status {} (HTTP {})",
                    job_id,
                    status,
                    response.http_status
                );
                return Ok(response);
            }

            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    return Err(GraasError::PollTimeout {
                        job_id: job_id.to_string(),
                        timeout,
                    });
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
