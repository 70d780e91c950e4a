/// Recommended error type for the demo binary and any code built on top of the runner.
pub type DemoResult<T> = anyhow::Result<T>;
