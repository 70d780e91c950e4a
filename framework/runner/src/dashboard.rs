use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use click_demo_core::prelude::{RunState, ShutdownSignalError};
use click_lite_client::prelude::{
    AlertSeverity, AlertSnapshot, HealthSnapshot, HealthStatus, MetricSnapshot,
};

use crate::api::AnalyticsApi;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(2);

const MAX_ALERTS: usize = 5;
const WIDTH: usize = 80;
const TITLE: &str = "CLICK-LITE MONITORING DASHBOARD";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";

/// Everything one dashboard frame shows, fetched fresh on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub health: HealthSnapshot,
    pub metrics: Vec<MetricSnapshot>,
    pub alerts: Vec<AlertSnapshot>,
}

impl DashboardSnapshot {
    pub fn fetch<A: AnalyticsApi + ?Sized>(api: &A) -> anyhow::Result<Self> {
        Ok(Self {
            health: api.health()?,
            metrics: api.metrics()?,
            alerts: api.active_alerts()?,
        })
    }

    /// The value of the named metric, or zero if the service did not report it.
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
            .unwrap_or_default()
    }
}

/// Polls the service and redraws the terminal until the [RunState] is cleared.
pub struct Dashboard<A: ?Sized> {
    api: Arc<A>,
    run_state: RunState,
    refresh_interval: Duration,
}

impl<A: AnalyticsApi + ?Sized> Dashboard<A> {
    pub fn new(api: Arc<A>, run_state: RunState) -> Self {
        Self {
            api,
            run_state,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Returns the number of frames drawn.
    pub fn run<W: Write>(&self, out: &mut W) -> usize {
        let mut ticks = 0;
        while self.run_state.is_running() {
            if let Err(e) = self.tick(out) {
                log::warn!("Failed to draw dashboard: {e}");
            }
            ticks += 1;

            if !self.run_state.pause(self.refresh_interval) {
                break;
            }
        }

        log::debug!("Dashboard stopped after {ticks} frames");
        ticks
    }

    /// Draw a single frame. A failed fetch replaces the frame with a one line error.
    pub fn tick<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{CLEAR_SCREEN}")?;

        match DashboardSnapshot::fetch(self.api.as_ref()) {
            Ok(snapshot) => render(out, &snapshot)?,
            // The run stopped mid-fetch, the loop is about to exit.
            Err(e) if e.is::<ShutdownSignalError>() => {}
            Err(e) => writeln!(out, "Error updating dashboard: {e:#}")?,
        }

        out.flush()
    }
}

pub fn render<W: Write>(out: &mut W, snapshot: &DashboardSnapshot) -> io::Result<()> {
    let rule = "=".repeat(WIDTH);
    let section_rule = "-".repeat(WIDTH / 2);

    writeln!(out, "{rule}")?;
    writeln!(out, "{TITLE:^WIDTH$}")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    let status = snapshot.health.status;
    writeln!(
        out,
        "System Status: {}{}{RESET}",
        status_color(status),
        status.as_str().to_uppercase()
    )?;
    writeln!(out, "Version: {}", snapshot.health.version)?;
    writeln!(
        out,
        "Uptime: {}",
        format_uptime(snapshot.health.uptime_seconds)
    )?;
    writeln!(out)?;

    writeln!(out, "KEY METRICS:")?;
    writeln!(out, "{section_rule}")?;
    writeln!(
        out,
        "Ingestion Rate: {:.1} logs/sec",
        snapshot.metric("ingestion_rate_per_second")
    )?;
    writeln!(
        out,
        "Query Rate: {:.1} queries/sec",
        snapshot.metric("query_rate_per_second")
    )?;
    writeln!(
        out,
        "Total Logs: {}",
        with_thousands(snapshot.metric("total_logs_ingested"))
    )?;
    writeln!(
        out,
        "Total Queries: {}",
        with_thousands(snapshot.metric("total_queries_executed"))
    )?;
    writeln!(out)?;

    writeln!(out, "PERFORMANCE:")?;
    writeln!(out, "{section_rule}")?;
    writeln!(
        out,
        "Avg Query Duration: {:.1} ms",
        snapshot.metric("query_duration_ms_avg")
    )?;
    writeln!(
        out,
        "P99 Query Duration: {:.1} ms",
        snapshot.metric("query_duration_ms_p99")
    )?;
    writeln!(out)?;

    writeln!(out, "ACTIVE ALERTS:")?;
    writeln!(out, "{section_rule}")?;
    if snapshot.alerts.is_empty() {
        writeln!(out, "{GREEN}No active alerts{RESET}")?;
    } else {
        for alert in snapshot.alerts.iter().take(MAX_ALERTS) {
            writeln!(
                out,
                "{}[{}]{RESET} {}: {}",
                severity_color(alert.severity),
                alert.severity.as_str().to_uppercase(),
                alert.name,
                alert.message
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Press Ctrl+C to stop monitoring...")
}

/// Whole days, hours and minutes, dropping any leftover seconds.
pub fn format_uptime(seconds: f64) -> String {
    // Casting saturates, so negative or NaN input shows as zero.
    let total = seconds as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    format!("{days}d {hours}h {minutes}m")
}

fn status_color(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Degraded => YELLOW,
        HealthStatus::Down => RED,
        HealthStatus::Unknown => RESET,
    }
}

fn severity_color(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Critical => RED,
        AlertSeverity::Warning => YELLOW,
        AlertSeverity::Info => BLUE,
        AlertSeverity::Unknown => RESET,
    }
}

fn with_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = (rounded.abs() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
