/// Why the liveness precheck refused to start the demo.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum PrecheckError {
    /// The service answered, but not with `200 OK`.
    #[display("liveness check returned HTTP {status}")]
    Unhealthy { status: u16 },
    /// No answer at all, either a connection failure or a timeout.
    #[display("cannot connect to {url}: {reason}")]
    Unreachable { url: String, reason: String },
    /// The run was stopped before the service answered.
    #[display("liveness check cancelled by shutdown signal")]
    Cancelled,
}
