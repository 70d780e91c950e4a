use std::time::Duration;

use click_lite_client::prelude::ClientConfig;

use crate::dashboard::DEFAULT_REFRESH_INTERVAL;
use crate::load::{LoadPlan, Pacing};

pub const DEFAULT_WEB_DASHBOARD_URL: &str = "http://localhost:5173/monitoring";

/// Settings for a single demo run, usually built from the [crate::cli::DemoCli].
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub client: ClientConfig,
    pub web_dashboard_url: String,
    pub plan: LoadPlan,
    pub pacing: Pacing,
    pub refresh_interval: Duration,
    /// Seed for the load generator. Seeded from entropy when not set.
    pub seed: Option<u64>,
    pub show_summary: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            web_dashboard_url: DEFAULT_WEB_DASHBOARD_URL.to_string(),
            plan: LoadPlan::default(),
            pacing: Pacing::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            seed: None,
            show_summary: true,
        }
    }
}
