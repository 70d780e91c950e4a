#![allow(dead_code)]

use click_demo_runner::prelude::*;
use parking_lot::Mutex;

#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub check_live: usize,
    pub health: usize,
    pub metrics: usize,
    pub active_alerts: usize,
    pub ingest_batches: Vec<usize>,
    pub bulk_batches: Vec<usize>,
    pub queries: Vec<String>,
}

impl Calls {
    /// Every call apart from the liveness precheck.
    pub fn after_precheck(&self) -> usize {
        self.health
            + self.metrics
            + self.active_alerts
            + self.ingest_batches.len()
            + self.bulk_batches.len()
            + self.queries.len()
    }
}

/// An in-memory [AnalyticsApi] that counts what it is asked to do.
#[derive(Debug, Default)]
pub struct StubApi {
    /// HTTP status the liveness check answers with, anything but 200 fails the precheck.
    live_status: Option<u16>,
    fail_reads: bool,
    /// Stopped from inside the liveness check, as if the user interrupted the precheck.
    stop_during_precheck: Option<RunState>,
    calls: Mutex<Calls>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_live_status(mut self, status: u16) -> Self {
        self.live_status = Some(status);
        self
    }

    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn with_interrupted_precheck(mut self, run_state: RunState) -> Self {
        self.stop_during_precheck = Some(run_state);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().clone()
    }

    fn read<T>(&self, value: T) -> anyhow::Result<T> {
        if self.fail_reads {
            Err(anyhow::anyhow!("connection refused"))
        } else {
            Ok(value)
        }
    }
}

impl AnalyticsApi for StubApi {
    fn check_live(&self) -> Result<(), PrecheckError> {
        self.calls.lock().check_live += 1;
        if let Some(run_state) = &self.stop_during_precheck {
            run_state.stop();
            return Err(PrecheckError::Cancelled);
        }
        match self.live_status {
            None | Some(200) => Ok(()),
            Some(status) => Err(PrecheckError::Unhealthy { status }),
        }
    }

    fn health(&self) -> anyhow::Result<HealthSnapshot> {
        self.calls.lock().health += 1;
        self.read(HealthSnapshot {
            status: HealthStatus::Ok,
            version: "test".to_string(),
            uptime_seconds: 90000.0,
        })
    }

    fn metrics(&self) -> anyhow::Result<Vec<MetricSnapshot>> {
        self.calls.lock().metrics += 1;
        self.read(vec![MetricSnapshot {
            name: "total_logs_ingested".to_string(),
            value: 1500.0,
        }])
    }

    fn active_alerts(&self) -> anyhow::Result<Vec<AlertSnapshot>> {
        self.calls.lock().active_alerts += 1;
        self.read(vec![AlertSnapshot {
            severity: AlertSeverity::Warning,
            name: "HighIngestionRate".to_string(),
            message: "Ingestion rate above threshold".to_string(),
        }])
    }

    fn post_logs(&self, records: &[LogRecord], endpoint: IngestEndpoint) {
        let mut calls = self.calls.lock();
        match endpoint {
            IngestEndpoint::Ingest => calls.ingest_batches.push(records.len()),
            IngestEndpoint::Bulk => calls.bulk_batches.push(records.len()),
        }
    }

    fn post_query(&self, sql: &str) {
        self.calls.lock().queries.push(sql.to_string());
    }
}
