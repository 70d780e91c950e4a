use std::time::Duration;

use clap::Parser;
use click_lite_client::prelude::{ClientConfig, DEFAULT_API_URL};

use crate::config::{DemoConfig, DEFAULT_WEB_DASHBOARD_URL};
use crate::load::{LoadPlan, Pacing};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct DemoCli {
    /// Base URL of the Click-Lite REST API
    #[clap(long, env = "CLICK_LITE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Web dashboard to point the user at once the demo completes
    #[clap(long, default_value = DEFAULT_WEB_DASHBOARD_URL)]
    pub web_dashboard_url: String,

    /// Seconds of normal load at the start of the demo
    #[clap(long, default_value_t = 60)]
    pub normal_duration: u64,

    /// Seconds of high load
    #[clap(long, default_value_t = 30)]
    pub high_load_duration: u64,

    /// Number of slow aggregation queries to submit
    #[clap(long, default_value_t = 10)]
    pub slow_queries: usize,

    /// Seconds of normal load after the slow queries
    #[clap(long, default_value_t = 30)]
    pub recovery_duration: u64,

    /// How often the dashboard refreshes, in milliseconds
    #[clap(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_interval_ms: u64,

    /// Timeout for each API call, in seconds
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_s: u64,

    /// Seed for the random generator so that a run can be reproduced
    #[clap(long)]
    pub seed: Option<u64>,

    /// Do not print the summary of operations when the demo ends
    #[clap(long, default_value = "false")]
    pub no_summary: bool,
}

impl From<DemoCli> for DemoConfig {
    fn from(cli: DemoCli) -> Self {
        DemoConfig {
            client: ClientConfig {
                base_url: cli.api_url,
                request_timeout: Duration::from_secs(cli.request_timeout_s),
                ..Default::default()
            },
            web_dashboard_url: cli.web_dashboard_url,
            plan: LoadPlan::standard(
                Duration::from_secs(cli.normal_duration),
                Duration::from_secs(cli.high_load_duration),
                cli.slow_queries,
                Duration::from_secs(cli.recovery_duration),
            ),
            pacing: Pacing::default(),
            refresh_interval: Duration::from_millis(cli.refresh_interval_ms),
            seed: cli.seed,
            show_summary: !cli.no_summary,
        }
    }
}
