mod common;

use std::net::TcpListener;
use std::sync::Arc;
use std::time::{Duration, Instant};

use click_demo_instruments::Reporter;
use click_demo_runner::prelude::*;
use common::StubApi;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn driver(api: Arc<StubApi>, run_state: RunState) -> LoadDriver<StubApi, StdRng> {
    LoadDriver::new(api, run_state, StdRng::seed_from_u64(1234)).unwrap()
}

fn fast_pacing(query_probability: f64) -> Pacing {
    Pacing {
        normal_delay: Duration::from_millis(20),
        high_load_delay: Duration::from_millis(10),
        slow_query_delay: Duration::from_millis(10),
        query_probability,
    }
}

#[test]
fn normal_load_for_two_seconds() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new());

    let stats = driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_secs(2),
    });

    let calls = api.calls();
    assert!(calls.ingest_batches.len() >= 2, "{:?}", calls.ingest_batches);
    let total_records = calls.ingest_batches.iter().sum::<usize>();
    assert!((20..=100).contains(&total_records), "{total_records}");
    assert_eq!(total_records, stats.records);
    assert_eq!(calls.ingest_batches.len(), stats.iterations);
    assert!(calls.bulk_batches.is_empty());
}

#[test]
fn normal_load_batches_and_queries() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new()).with_pacing(fast_pacing(1.0));

    let stats = driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_millis(300),
    });

    let calls = api.calls();
    assert!(stats.iterations >= 2);
    assert!(calls
        .ingest_batches
        .iter()
        .all(|size| NORMAL_BATCH_SIZE.contains(size)));
    // Every iteration also runs a query when the probability is 1.
    assert_eq!(stats.iterations, calls.queries.len());
    assert!(calls
        .queries
        .iter()
        .all(|sql| RANDOM_QUERIES.contains(&sql.as_str())));
}

#[test]
fn normal_load_without_queries() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new()).with_pacing(fast_pacing(0.0));

    driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_millis(200),
    });

    assert!(api.calls().queries.is_empty());
}

#[test]
fn nan_query_probability_runs_no_queries() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new()).with_pacing(fast_pacing(f64::NAN));

    let stats = driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_millis(100),
    });

    assert!(stats.iterations >= 1);
    assert_eq!(0, stats.queries);
    assert!(api.calls().queries.is_empty());
}

#[test]
fn high_load_batches() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new()).with_pacing(fast_pacing(0.3));

    let stats = driver.run_phase(&Phase::HighLoad {
        duration: Duration::from_millis(200),
    });

    let calls = api.calls();
    assert!(stats.iterations >= 2);
    assert_eq!(stats.iterations, calls.bulk_batches.len());
    assert!(calls
        .bulk_batches
        .iter()
        .all(|size| HIGH_LOAD_BATCH_SIZE.contains(size)));
    assert!(calls.ingest_batches.is_empty());
    assert!(calls.queries.is_empty());
}

#[test]
fn slow_queries_run_a_fixed_count() {
    let api = Arc::new(StubApi::new());
    let mut driver = driver(api.clone(), RunState::new()).with_pacing(fast_pacing(0.3));

    let stats = driver.run_phase(&Phase::SlowQueries { count: 4 });

    let calls = api.calls();
    assert_eq!(4, stats.queries);
    assert_eq!(vec![SLOW_AGGREGATION_QUERY.to_string(); 4], calls.queries);
}

#[test]
fn stop_ends_phase_within_one_iteration() {
    let api = Arc::new(StubApi::new());
    let run_state = RunState::new();
    let mut driver = driver(api.clone(), run_state.clone());

    let stopper = run_state.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(150));
        stopper.stop();
    });

    let started = Instant::now();
    let stats = driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_secs(60),
    });

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(1, stats.iterations);
    handle.join().unwrap();
}

#[test]
fn stopped_run_skips_remaining_phases() {
    let api = Arc::new(StubApi::new());
    let run_state = RunState::new();
    run_state.stop();
    let mut driver = driver(api.clone(), run_state);

    let outcome = driver.run(&LoadPlan::default());

    assert_eq!(DriverOutcome::Interrupted, outcome);
    assert_eq!(0, api.calls().after_precheck());
}

#[test]
fn full_plan_completes() {
    let api = Arc::new(StubApi::new());
    let run_state = RunState::new();
    let mut driver = driver(api.clone(), run_state.clone()).with_pacing(fast_pacing(0.0));

    let plan = LoadPlan::standard(
        Duration::from_millis(100),
        Duration::from_millis(100),
        3,
        Duration::from_millis(100),
    );
    let outcome = driver.run(&plan);

    assert_eq!(DriverOutcome::Completed, outcome);
    // The driver leaves stopping the run to its caller.
    assert!(run_state.is_running());
    let calls = api.calls();
    assert!(calls.ingest_batches.len() >= 2);
    assert!(!calls.bulk_batches.is_empty());
    assert_eq!(3, calls.queries.len());
}

#[test]
fn failed_writes_do_not_stop_the_loop() {
    // Nothing listens on this port so every submission fails to connect.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let run_state = RunState::new();
    let reporter = Arc::new(Reporter::new());
    let client = AnalyticsClient::new(
        &ClientConfig {
            base_url: format!("http://127.0.0.1:{port}/api/v1"),
            ..Default::default()
        },
        reporter.clone(),
    )
    .unwrap();
    let executor = Executor::new(tokio::runtime::Runtime::new().unwrap(), run_state.clone());
    let api = Arc::new(ExecutorApi::new(Arc::new(executor), client));

    let mut driver = LoadDriver::new(api, run_state, StdRng::seed_from_u64(9))
        .unwrap()
        .with_pacing(fast_pacing(1.0));

    let stats = driver.run_phase(&Phase::NormalLoad {
        duration: Duration::from_millis(300),
    });

    assert!(stats.iterations >= 2, "{stats:?}");
    let records = reporter.records();
    assert_eq!(stats.iterations + stats.queries, records.len());
    assert!(records.iter().all(|r| r.is_error()));
}
