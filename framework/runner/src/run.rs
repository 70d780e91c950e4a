use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use click_demo_core::prelude::RunState;
use click_demo_instruments::Reporter;
use click_lite_client::prelude::{AnalyticsClient, PrecheckError};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{AnalyticsApi, ExecutorApi};
use crate::config::DemoConfig;
use crate::dashboard::Dashboard;
use crate::executor::Executor;
use crate::load::{DriverOutcome, LoadDriver};
use crate::shutdown::start_interrupt_listener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoOutcome {
    /// Every phase ran to the end.
    Completed,
    /// The user stopped the run part way through.
    Interrupted,
    /// The liveness precheck failed so nothing was run.
    ServiceUnavailable,
}

impl From<DriverOutcome> for DemoOutcome {
    fn from(outcome: DriverOutcome) -> Self {
        match outcome {
            DriverOutcome::Completed => DemoOutcome::Completed,
            DriverOutcome::Interrupted => DemoOutcome::Interrupted,
        }
    }
}

/// Wire up the runtime, HTTP client and interrupt handling, then run the demo.
pub fn run(config: DemoConfig) -> anyhow::Result<DemoOutcome> {
    log::info!("Running monitoring demo against {}", config.client.base_url);

    let run_state = RunState::new();
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let executor = Arc::new(Executor::new(runtime, run_state.clone()));
    start_interrupt_listener(&executor, run_state.clone());

    let reporter = Arc::new(Reporter::new());
    let client = AnalyticsClient::new(&config.client, reporter.clone())?;
    let api = Arc::new(ExecutorApi::new(executor, client));

    let outcome = run_demo(api, &config, run_state)?;

    if config.show_summary && outcome != DemoOutcome::ServiceUnavailable {
        reporter.finalize();
    }

    Ok(outcome)
}

/// Run the load phases on this thread while the dashboard redraws on a background thread.
///
/// Nothing is started unless the liveness precheck passes. However the phases end, the
/// [RunState] is stopped and the dashboard thread joined before returning.
pub fn run_demo<A: AnalyticsApi + 'static>(
    api: Arc<A>,
    config: &DemoConfig,
    run_state: RunState,
) -> anyhow::Result<DemoOutcome> {
    if let Err(e) = api.check_live() {
        log::debug!("Liveness precheck failed: {e}");
        write_precheck_failure(&mut io::stdout().lock(), &e)?;
        return Ok(match e {
            PrecheckError::Cancelled => DemoOutcome::Interrupted,
            _ => DemoOutcome::ServiceUnavailable,
        });
    }

    println!("Starting Click-Lite Monitoring Demo...");
    println!();

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut driver =
        LoadDriver::new(api.clone(), run_state.clone(), rng)?.with_pacing(config.pacing.clone());

    let dashboard =
        Dashboard::new(api, run_state.clone()).with_refresh_interval(config.refresh_interval);
    let dashboard_handle = std::thread::Builder::new()
        .name("dashboard".to_string())
        .spawn(move || dashboard.run(&mut io::stdout()))
        .context("Failed to start dashboard thread")?;

    let outcome = driver.run(&config.plan);
    stop_and_announce(
        &mut io::stdout().lock(),
        outcome,
        &run_state,
        &config.web_dashboard_url,
    )?;

    let frames = dashboard_handle
        .join()
        .map_err(|e| anyhow::anyhow!("Error joining dashboard thread: {:?}", e))?;
    log::debug!("Demo finished with {outcome:?} after {frames} dashboard frames");

    Ok(outcome.into())
}

/// Clear the [RunState] before printing, so the dashboard cannot draw over the final message.
pub fn stop_and_announce<W: Write>(
    out: &mut W,
    outcome: DriverOutcome,
    run_state: &RunState,
    web_dashboard_url: &str,
) -> io::Result<()> {
    run_state.stop();

    match outcome {
        DriverOutcome::Completed => writeln!(
            out,
            "\nDemo complete! Check {web_dashboard_url} for the web dashboard."
        ),
        DriverOutcome::Interrupted => writeln!(out, "\nDemo stopped by user."),
    }
}

pub fn write_precheck_failure<W: Write>(out: &mut W, error: &PrecheckError) -> io::Result<()> {
    match error {
        PrecheckError::Cancelled => writeln!(out, "\nDemo stopped by user."),
        PrecheckError::Unhealthy { .. } => {
            writeln!(
                out,
                "Error: Click-Lite services are not responding properly ({error})."
            )?;
            writeln!(out, "Please ensure the backend is running on port 20002.")
        }
        PrecheckError::Unreachable { .. } => {
            writeln!(out, "Error: Cannot connect to Click-Lite services ({error}).")?;
            writeln!(out, "Please ensure:")?;
            writeln!(out, "1. Backend is running: cd backend && go run main.go")?;
            writeln!(out, "2. Frontend is running: cd frontend && pnpm dev")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(error: &PrecheckError) -> String {
        let mut out = Vec::new();
        write_precheck_failure(&mut out, error).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unhealthy_diagnostic() {
        assert_eq!(
            "Error: Click-Lite services are not responding properly (liveness check returned HTTP 500).\n\
             Please ensure the backend is running on port 20002.\n",
            render(&PrecheckError::Unhealthy { status: 500 })
        );
    }

    #[test]
    fn unreachable_diagnostic_lists_startup_commands() {
        let rendered = render(&PrecheckError::Unreachable {
            url: "http://localhost:20002/api/v1/monitoring/health/live".to_string(),
            reason: "connection refused".to_string(),
        });

        assert!(rendered.starts_with("Error: Cannot connect to Click-Lite services"));
        assert!(rendered.contains("cd backend && go run main.go"));
        assert!(rendered.contains("cd frontend && pnpm dev"));
    }

    #[test]
    fn cancelled_precheck_is_a_clean_stop() {
        assert_eq!("\nDemo stopped by user.\n", render(&PrecheckError::Cancelled));
    }

    /// Remembers whether the run was still active at each write.
    struct RunStateWriter {
        run_state: RunState,
        running_at_write: Vec<bool>,
        written: Vec<u8>,
    }

    impl Write for RunStateWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.running_at_write.push(self.run_state.is_running());
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn final_message_is_written_after_stop() {
        for outcome in [DriverOutcome::Completed, DriverOutcome::Interrupted] {
            let run_state = RunState::new();
            let mut out = RunStateWriter {
                run_state: run_state.clone(),
                running_at_write: Vec::new(),
                written: Vec::new(),
            };

            stop_and_announce(&mut out, outcome, &run_state, "http://localhost:5173/monitoring")
                .unwrap();

            assert!(!out.running_at_write.is_empty());
            assert!(out.running_at_write.iter().all(|running| !running));
            let written = String::from_utf8(out.written).unwrap();
            match outcome {
                DriverOutcome::Completed => assert_eq!(
                    "\nDemo complete! Check http://localhost:5173/monitoring for the web dashboard.\n",
                    written
                ),
                DriverOutcome::Interrupted => assert_eq!("\nDemo stopped by user.\n", written),
            }
        }
    }

    #[test]
    fn driver_outcome_maps_to_demo_outcome() {
        assert_eq!(
            DemoOutcome::Completed,
            DemoOutcome::from(DriverOutcome::Completed)
        );
        assert_eq!(
            DemoOutcome::Interrupted,
            DemoOutcome::from(DriverOutcome::Interrupted)
        );
    }
}
