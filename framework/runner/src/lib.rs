mod api;
mod cli;
mod config;
mod dashboard;
mod executor;
mod init;
mod load;
mod records;
mod run;
mod sampler;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::api::{AnalyticsApi, ExecutorApi};
    pub use crate::cli::DemoCli;
    pub use crate::config::{DemoConfig, DEFAULT_WEB_DASHBOARD_URL};
    pub use crate::dashboard::{
        format_uptime, render, Dashboard, DashboardSnapshot, DEFAULT_REFRESH_INTERVAL,
    };
    pub use crate::executor::Executor;
    pub use crate::init::init;
    pub use crate::load::{DriverOutcome, LoadDriver, LoadPlan, Pacing, Phase, PhaseStats};
    pub use crate::records::{
        utc_timestamp, RecordGenerator, HIGH_LOAD_BATCH_SIZE, HIGH_LOAD_SERVICE,
        NORMAL_BATCH_SIZE, NORMAL_LEVEL_WEIGHTS, RANDOM_QUERIES, SLOW_AGGREGATION_QUERY,
    };
    pub use crate::run::{run, run_demo, stop_and_announce, write_precheck_failure, DemoOutcome};
    pub use crate::sampler::WeightedSampler;
    pub use crate::shutdown::start_interrupt_listener;
    pub use crate::types::DemoResult;

    pub use click_demo_core::prelude::{RunState, ShutdownListener, ShutdownSignalError};
    pub use click_lite_client::prelude::*;
}
