use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Down,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "ok",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Down => "down",
            HealthStatus::Unknown => "unknown",
        }
    }
}

/// Response of `GET /monitoring/health`. Only the fields the dashboard shows are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthSnapshot {
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default = "unknown_version")]
    pub version: String,
    #[serde(default)]
    pub uptime_seconds: f64,
}

fn unknown_version() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricSnapshot {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricsResponse {
    #[serde(default)]
    pub metrics: Vec<MetricSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
    #[serde(other)]
    Unknown,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
            AlertSeverity::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertSnapshot {
    pub severity: AlertSeverity,
    pub name: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<AlertSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// A synthetic log line as accepted by the ingest endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    pub timestamp: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Which ingest route a batch of logs is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestEndpoint {
    /// `POST /ingest/logs`
    Ingest,
    /// `POST /ingest/bulk`
    Bulk,
}

impl IngestEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            IngestEndpoint::Ingest => "ingest/logs",
            IngestEndpoint::Bulk => "ingest/bulk",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub sql: &'a str,
}
