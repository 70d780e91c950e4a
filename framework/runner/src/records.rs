//! Synthetic log records and queries submitted during the load phases.

use std::ops::RangeInclusive;

use chrono::{SecondsFormat, Utc};
use click_lite_client::prelude::{LogLevel, LogRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{Map, Value};

use crate::sampler::WeightedSampler;

pub const NORMAL_BATCH_SIZE: RangeInclusive<usize> = 10..=50;
pub const HIGH_LOAD_BATCH_SIZE: RangeInclusive<usize> = 500..=1000;

/// Level mix for normal operation: mostly info with a little noise either side.
pub const NORMAL_LEVEL_WEIGHTS: [(LogLevel, u32); 4] = [
    (LogLevel::Debug, 10),
    (LogLevel::Info, 70),
    (LogLevel::Warning, 15),
    (LogLevel::Error, 5),
];

const HIGH_LOAD_LEVELS: [LogLevel; 3] = [LogLevel::Info, LogLevel::Warning, LogLevel::Error];

pub const NORMAL_SERVICES: [&str; 4] = ["web", "api", "worker", "cache"];

pub const HIGH_LOAD_SERVICE: &str = "load-test";

const ACTIVITIES: [&str; 5] = [
    "User login",
    "API request",
    "Data processed",
    "Cache hit",
    "Task completed",
];

pub const RANDOM_QUERIES: [&str; 4] = [
    "SELECT COUNT(*) FROM logs WHERE level = 'error'",
    "SELECT service, COUNT(*) as count FROM logs GROUP BY service",
    "SELECT * FROM logs ORDER BY timestamp DESC LIMIT 100",
    "SELECT level, COUNT(*) FROM logs WHERE timestamp > datetime('now', '-5 minutes') GROUP BY level",
];

/// Aggregation over the last hour of logs, heavy enough to trip the slow query alerts.
pub const SLOW_AGGREGATION_QUERY: &str = "
SELECT
    service,
    level,
    DATE_TRUNC('minute', timestamp) as minute,
    COUNT(*) as count,
    AVG(CAST(json_extract(attributes, '$.duration_ms') as FLOAT)) as avg_duration
FROM logs
WHERE timestamp > datetime('now', '-1 hour')
GROUP BY service, level, minute
ORDER BY minute DESC, count DESC
";

#[derive(Debug, Clone)]
pub struct RecordGenerator {
    normal_levels: WeightedSampler<LogLevel>,
}

impl RecordGenerator {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            normal_levels: WeightedSampler::new(NORMAL_LEVEL_WEIGHTS)?,
        })
    }

    pub fn normal_level<R: Rng + ?Sized>(&self, rng: &mut R) -> LogLevel {
        *self.normal_levels.sample(rng)
    }

    pub fn normal_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LogRecord> {
        let batch_size = rng.gen_range(NORMAL_BATCH_SIZE);
        (0..batch_size).map(|_| self.normal_record(rng)).collect()
    }

    pub fn normal_record<R: Rng + ?Sized>(&self, rng: &mut R) -> LogRecord {
        let level = self.normal_level(rng);

        let mut attributes = Map::new();
        attributes.insert("user_id".to_string(), rng.gen_range(1000..=9999u32).into());
        attributes.insert("duration_ms".to_string(), rng.gen_range(10..=500u32).into());
        let status = if level == LogLevel::Error {
            "failed"
        } else {
            "success"
        };
        attributes.insert("status".to_string(), status.into());

        LogRecord {
            level,
            message: format!("Normal operation log - {}", pick(&ACTIVITIES, rng)),
            service: pick(&NORMAL_SERVICES, rng).to_string(),
            timestamp: utc_timestamp(),
            attributes,
        }
    }

    pub fn high_load_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LogRecord> {
        let batch_size = rng.gen_range(HIGH_LOAD_BATCH_SIZE);

        (0..batch_size)
            .map(|_| {
                let mut attributes = Map::new();
                attributes.insert("load_test".to_string(), Value::Bool(true));
                attributes.insert("batch_size".to_string(), batch_size.into());

                LogRecord {
                    level: *pick(&HIGH_LOAD_LEVELS, rng),
                    message: "High load test log".to_string(),
                    service: HIGH_LOAD_SERVICE.to_string(),
                    timestamp: utc_timestamp(),
                    attributes,
                }
            })
            .collect()
    }

    pub fn random_query<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        *pick(&RANDOM_QUERIES, rng)
    }
}

fn pick<'a, T, R: Rng + ?Sized>(values: &'a [T], rng: &mut R) -> &'a T {
    // Only ever called with the non-empty constant tables above.
    values
        .choose(rng)
        .unwrap_or_else(|| unreachable!("sampling from an empty table"))
}

/// Current UTC time, e.g. `2024-05-01T12:00:00.123456Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
