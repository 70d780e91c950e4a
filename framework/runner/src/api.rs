use std::sync::Arc;

use click_demo_core::prelude::ShutdownSignalError;
use click_lite_client::prelude::{
    AlertSnapshot, AnalyticsClient, HealthSnapshot, IngestEndpoint, LogRecord, MetricSnapshot,
    PrecheckError,
};

use crate::executor::Executor;

/// The blocking view of the Click-Lite API that the load driver and dashboard work against.
///
/// Reads propagate their errors. Writes are fire-and-forget: an implementation must swallow every
/// failure so that the calling loop carries on as if the call had succeeded.
pub trait AnalyticsApi: Send + Sync {
    /// Liveness precheck, run once before anything else.
    fn check_live(&self) -> Result<(), PrecheckError>;

    fn health(&self) -> anyhow::Result<HealthSnapshot>;

    fn metrics(&self) -> anyhow::Result<Vec<MetricSnapshot>>;

    fn active_alerts(&self) -> anyhow::Result<Vec<AlertSnapshot>>;

    fn post_logs(&self, records: &[LogRecord], endpoint: IngestEndpoint);

    fn post_query(&self, sql: &str);
}

/// [AnalyticsApi] over HTTP, blocking on the async [AnalyticsClient] through the [Executor].
pub struct ExecutorApi {
    executor: Arc<Executor>,
    client: AnalyticsClient,
}

impl ExecutorApi {
    pub fn new(executor: Arc<Executor>, client: AnalyticsClient) -> Self {
        Self { executor, client }
    }
}

impl AnalyticsApi for ExecutorApi {
    fn check_live(&self) -> Result<(), PrecheckError> {
        self.executor
            .execute_in_place(async { Ok(self.client.check_live().await) })
            .unwrap_or_else(|e| {
                if e.is::<ShutdownSignalError>() {
                    Err(PrecheckError::Cancelled)
                } else {
                    Err(PrecheckError::Unreachable {
                        url: self.client.base_url().to_string(),
                        reason: e.to_string(),
                    })
                }
            })
    }

    fn health(&self) -> anyhow::Result<HealthSnapshot> {
        self.executor.execute_in_place(self.client.health())
    }

    fn metrics(&self) -> anyhow::Result<Vec<MetricSnapshot>> {
        self.executor.execute_in_place(self.client.metrics())
    }

    fn active_alerts(&self) -> anyhow::Result<Vec<AlertSnapshot>> {
        self.executor.execute_in_place(self.client.active_alerts())
    }

    fn post_logs(&self, records: &[LogRecord], endpoint: IngestEndpoint) {
        if let Err(e) = self
            .executor
            .execute_in_place(self.client.post_logs(records, endpoint))
        {
            log::debug!("Ignoring failed log submission: {e:#}");
        }
    }

    fn post_query(&self, sql: &str) {
        if let Err(e) = self.executor.execute_in_place(self.client.post_query(sql)) {
            log::debug!("Ignoring failed query submission: {e:#}");
        }
    }
}
