mod client;
mod error;
mod types;

pub mod prelude {
    pub use crate::client::{AnalyticsClient, ClientConfig, DEFAULT_API_URL};
    pub use crate::error::PrecheckError;
    pub use crate::types::{
        AlertSeverity, AlertSnapshot, HealthSnapshot, HealthStatus, IngestEndpoint, LogLevel,
        LogRecord, MetricSnapshot,
    };
}
