use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use click_demo_core::prelude::RunState;
use click_lite_client::prelude::IngestEndpoint;
use rand::Rng;

use crate::api::AnalyticsApi;
use crate::records::{RecordGenerator, SLOW_AGGREGATION_QUERY};

/// One segment of the load sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Small mixed batches to `/ingest/logs` with the occasional query.
    NormalLoad { duration: Duration },
    /// Large batches to `/ingest/bulk` in quick succession.
    HighLoad { duration: Duration },
    /// A fixed number of expensive aggregation queries.
    SlowQueries { count: usize },
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::NormalLoad { duration } => {
                write!(f, "Normal operation ({} seconds)", duration.as_secs())
            }
            Phase::HighLoad { duration } => {
                write!(f, "High load test ({} seconds)", duration.as_secs())
            }
            Phase::SlowQueries { count } => write!(f, "Slow query test ({count} queries)"),
        }
    }
}

/// The ordered phases that the driver runs through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    phases: Vec<Phase>,
}

impl LoadPlan {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// Normal load, a burst of high load, slow queries and then back to normal.
    pub fn standard(
        normal: Duration,
        high_load: Duration,
        slow_queries: usize,
        recovery: Duration,
    ) -> Self {
        Self::new(vec![
            Phase::NormalLoad { duration: normal },
            Phase::HighLoad {
                duration: high_load,
            },
            Phase::SlowQueries {
                count: slow_queries,
            },
            Phase::NormalLoad { duration: recovery },
        ])
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}

impl Default for LoadPlan {
    fn default() -> Self {
        Self::standard(
            Duration::from_secs(60),
            Duration::from_secs(30),
            10,
            Duration::from_secs(30),
        )
    }
}

/// Delays between iterations of each phase and how often normal load also runs a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    pub normal_delay: Duration,
    pub high_load_delay: Duration,
    pub slow_query_delay: Duration,
    pub query_probability: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            normal_delay: Duration::from_secs(1),
            high_load_delay: Duration::from_millis(100),
            slow_query_delay: Duration::from_millis(500),
            query_probability: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOutcome {
    Completed,
    Interrupted,
}

/// What a single phase submitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStats {
    pub iterations: usize,
    pub records: usize,
    pub queries: usize,
}

/// Runs the [LoadPlan] phase by phase on the calling thread.
///
/// Every loop checks the [RunState] before each iteration and waits on it between iterations, so
/// clearing the flag ends the current phase after at most one iteration's work.
pub struct LoadDriver<A: ?Sized, R> {
    api: Arc<A>,
    run_state: RunState,
    rng: R,
    generator: RecordGenerator,
    pacing: Pacing,
}

impl<A: AnalyticsApi + ?Sized, R: Rng> LoadDriver<A, R> {
    pub fn new(api: Arc<A>, run_state: RunState, rng: R) -> anyhow::Result<Self> {
        Ok(Self {
            api,
            run_state,
            rng,
            generator: RecordGenerator::new()?,
            pacing: Pacing::default(),
        })
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn run(&mut self, plan: &LoadPlan) -> DriverOutcome {
        for (index, phase) in plan.phases().iter().enumerate() {
            if !self.run_state.is_running() {
                break;
            }

            println!("\nPhase {}: {}", index + 1, phase);
            let stats = self.run_phase(phase);
            log::debug!("Phase {} finished: {:?}", index + 1, stats);
        }

        if self.run_state.is_running() {
            DriverOutcome::Completed
        } else {
            DriverOutcome::Interrupted
        }
    }

    pub fn run_phase(&mut self, phase: &Phase) -> PhaseStats {
        match *phase {
            Phase::NormalLoad { duration } => self.normal_load(duration),
            Phase::HighLoad { duration } => self.high_load(duration),
            Phase::SlowQueries { count } => self.slow_queries(count),
        }
    }

    fn normal_load(&mut self, duration: Duration) -> PhaseStats {
        let mut stats = PhaseStats::default();
        // `gen_bool` panics outside [0, 1], and clamping alone lets NaN through.
        let query_probability = if self.pacing.query_probability.is_nan() {
            0.0
        } else {
            self.pacing.query_probability.clamp(0.0, 1.0)
        };

        let started = Instant::now();
        while started.elapsed() < duration && self.run_state.is_running() {
            let batch = self.generator.normal_batch(&mut self.rng);
            stats.iterations += 1;
            stats.records += batch.len();
            self.api.post_logs(&batch, IngestEndpoint::Ingest);

            if self.rng.gen_bool(query_probability) {
                let sql = self.generator.random_query(&mut self.rng);
                self.api.post_query(sql);
                stats.queries += 1;
            }

            if !self.run_state.pause(self.pacing.normal_delay) {
                break;
            }
        }

        stats
    }

    fn high_load(&mut self, duration: Duration) -> PhaseStats {
        let mut stats = PhaseStats::default();

        let started = Instant::now();
        while started.elapsed() < duration && self.run_state.is_running() {
            let batch = self.generator.high_load_batch(&mut self.rng);
            stats.iterations += 1;
            stats.records += batch.len();
            self.api.post_logs(&batch, IngestEndpoint::Bulk);

            if !self.run_state.pause(self.pacing.high_load_delay) {
                break;
            }
        }

        stats
    }

    fn slow_queries(&mut self, count: usize) -> PhaseStats {
        let mut stats = PhaseStats::default();

        for _ in 0..count {
            if !self.run_state.is_running() {
                break;
            }

            stats.iterations += 1;
            stats.queries += 1;
            self.api.post_query(SLOW_AGGREGATION_QUERY);

            if !self.run_state.pause(self.pacing.slow_query_delay) {
                break;
            }
        }

        stats
    }
}
