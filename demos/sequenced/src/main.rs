use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tracing::info;

use seq_api::{ExecutorDirectory, HttpApi, STATS_PATH, StatsHandler};
use seq_core::{ExecutorConfig, SequencedExecutor, Task};
use seq_observe::{LoggerConfig, logger_init};
use seq_prometheus::MetricsEngine;

mod metrics;
use metrics::{METRICS_PATH, MetricsPage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    let cfg = LoggerConfig {
        executor_level: Some("debug".to_string()),
        worker_spans: true,
        ..Default::default()
    };
    logger_init(&cfg)?;
    info!("logger initialized");

    // 2) Executor
    let config = ExecutorConfig::new("ingest", 16)
        .with_low_watermark(4)
        .with_idle_timeout(Duration::from_secs(5));
    let executor = Arc::new(SequencedExecutor::new(config)?);
    info!(task_limit = executor.task_limit(), "executor ready");

    // 3) Diagnostics
    let engine = MetricsEngine::new("sequenced");
    engine.add_executor(Arc::clone(&executor))?;
    let directory = Arc::new(ExecutorDirectory::new());
    directory.register(&executor)?;

    // 4) Workload on blocking threads: producers block while the queue is full
    let workload = {
        let executor = Arc::clone(&executor);
        tokio::task::spawn_blocking(move || run_workload(&executor))
    };
    let sum = workload.await?;
    info!(sum, task_limit = executor.task_limit(), "workload done");

    // 5) HTTP
    let app = HttpApi::new(Arc::new(StatsHandler::new(directory)))
        .router(STATS_PATH)
        .merge(HttpApi::new(Arc::new(MetricsPage::new(engine))).router(METRICS_PATH));

    let addr = std::env::var("SEQUENCED_LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, stats = STATS_PATH, metrics = METRICS_PATH, "serving diagnostics");
    info!("press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // 6) Drain and stop
    info!("shutting down...");
    executor.shutdown();
    tokio::task::spawn_blocking(move || executor.sync()).await?;
    info!("executor stopped");
    Ok(())
}

/// Four producers, a capacity change, then a second batch from one producer.
fn run_workload(executor: &SequencedExecutor) -> u64 {
    let sum = Arc::new(AtomicU64::new(0));

    std::thread::scope(|scope| {
        for producer in 0..4u64 {
            let sum = &sum;
            scope.spawn(move || {
                for i in 0..250u64 {
                    let sum = Arc::clone(sum);
                    executor.execute(Task::new(move || {
                        sum.fetch_add(producer * 1000 + i, Ordering::Relaxed);
                    }));
                }
            });
        }
    });
    executor.sync();

    executor.set_task_limit(100);
    for i in 0..500u64 {
        let sum = Arc::clone(&sum);
        executor.execute(Task::new(move || {
            sum.fetch_add(i, Ordering::Relaxed);
        }));
    }
    executor.sync();

    sum.load(Ordering::Relaxed)
}
