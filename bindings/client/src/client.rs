use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use click_demo_instruments::{report_operation, OperationRecord, Reporter};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::PrecheckError;
use crate::types::{
    AlertSnapshot, AlertsResponse, HealthSnapshot, IngestEndpoint, LogRecord, MetricSnapshot,
    MetricsResponse, QueryRequest,
};

pub const DEFAULT_API_URL: &str = "http://localhost:20002/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound for every call apart from the liveness precheck.
    pub request_timeout: Duration,
    pub liveness_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            liveness_timeout: Duration::from_secs(2),
        }
    }
}

/// Async client for the Click-Lite REST API. Every call is timed and recorded with the
/// [Reporter] whether it succeeds or not.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: Url,
    liveness_timeout: Duration,
    reporter: Arc<Reporter>,
}

impl AnalyticsClient {
    pub fn new(config: &ClientConfig, reporter: Arc<Reporter>) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API URL: {}", config.base_url))?;
        // Without a trailing slash `Url::join` would replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            liveness_timeout: config.liveness_timeout,
            reporter,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /monitoring/health/live` with the short liveness timeout.
    pub async fn check_live(&self) -> Result<(), PrecheckError> {
        let url = self
            .endpoint("monitoring/health/live")
            .map_err(|e| PrecheckError::Unreachable {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let record = OperationRecord::new("check_live");
        let result = match self
            .http
            .get(url.clone())
            .timeout(self.liveness_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == reqwest::StatusCode::OK => Ok(()),
            Ok(response) => Err(PrecheckError::Unhealthy {
                status: response.status().as_u16(),
            }),
            Err(e) => {
                log::debug!("Liveness check against {url} failed: {e}");
                Err(PrecheckError::Unreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        report_operation(&self.reporter, record, &result);

        result
    }

    pub async fn health(&self) -> anyhow::Result<HealthSnapshot> {
        self.instrumented("get_health", self.get_json("monitoring/health"))
            .await
    }

    pub async fn metrics(&self) -> anyhow::Result<Vec<MetricSnapshot>> {
        self.instrumented("get_metrics", async {
            let response: MetricsResponse = self.get_json("monitoring/metrics").await?;
            Ok(response.metrics)
        })
        .await
    }

    pub async fn active_alerts(&self) -> anyhow::Result<Vec<AlertSnapshot>> {
        self.instrumented("get_active_alerts", async {
            let response: AlertsResponse = self.get_json("monitoring/alerts/active").await?;
            Ok(response.alerts)
        })
        .await
    }

    pub async fn post_logs(
        &self,
        records: &[LogRecord],
        endpoint: IngestEndpoint,
    ) -> anyhow::Result<()> {
        let operation_id = match endpoint {
            IngestEndpoint::Ingest => "post_logs",
            IngestEndpoint::Bulk => "post_logs_bulk",
        };
        self.instrumented(operation_id, self.post_json(endpoint.path(), records))
            .await
    }

    pub async fn post_query(&self, sql: &str) -> anyhow::Result<()> {
        self.instrumented("post_query", self.post_json("query/execute", &QueryRequest { sql }))
            .await
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {path}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {url}"))
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<()> {
        let url = self.endpoint(path)?;
        self.http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?
            .error_for_status()?;

        Ok(())
    }

    async fn instrumented<T>(
        &self,
        operation_id: &str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        let record = OperationRecord::new(operation_id);
        let result = fut.await;
        report_operation(&self.reporter, record, &result);
        result
    }
}
