//! Demo agent driving the counter service end to end.
//!
//! Starts the HTTP service in-process over an in-memory store, registers
//! the `inc` command, runs it a few times with placeholder-bearing
//! parameters, then prints the final expansion table and the collected
//! prometheus metrics.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tally_api::{HttpApi, StoreHandler};
use tally_core::prelude::*;
use tally_exec::{HttpApiClient, register_inc_command};
use tally_model::{INC_COMMAND_NAME, ParamMap, TaskId};
use tally_observe::{LoggerConfig, LoggerLevel, init_logger};
use tally_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
use tally_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Initialize logger
    let cfg = LoggerConfig {
        level: LoggerLevel::new("info")?,
        ..Default::default()
    };
    init_logger(&cfg)?;
    info!("logger initialized");

    // 2) Start the counter service in-process on an ephemeral port
    let handler = Arc::new(StoreHandler::new(Arc::new(MemoryStore::new())));
    let router = HttpApi::new(handler).router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve failed");
    });
    info!(url = %base_url, "counter service ready");

    // 3) Register commands
    let mut registry = CommandRegistry::new();
    register_inc_command(&mut registry);
    info!("registered inc command");

    // 4) Build the task context: client, seeded expansions, prometheus metrics
    let task_id = TaskId::random();
    let client = HttpApiClient::new(&base_url, task_id.clone())
        .with_timeout(Duration::from_secs(5))?;
    let metrics = PrometheusMetrics::new()?;

    let sink = ExpansionSink::default();
    sink.put("suffix", "x");

    let ctx = TaskContext::new(task_id, Arc::new(client))
        .with_expansions(sink)
        .with_metrics(Arc::new(metrics.clone()));
    info!(%ctx, "task context ready");

    // 5) Increment "testkey" twice, then once through a ${suffix} placeholder
    let scenario = [
        ("testkey", "testkey"),
        ("testkey", "testkey"),
        ("testkey_${suffix}", "testkey_${suffix}"),
    ];
    for (key, destination) in scenario {
        let cmd = registry.resolve(INC_COMMAND_NAME, &inc_params(key, destination))?;
        run_command(cmd.as_ref(), &ctx).await?;
    }

    // 6) Final expansion table
    let table = ctx.expansions().snapshot();
    for (name, value) in table.iter() {
        info!(name, value, "expansion");
    }

    // 7) Prometheus text dump
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
    println!("{}", String::from_utf8_lossy(&buffer));

    Ok(())
}

/// Raw configuration map for one `inc` run.
fn inc_params(key: &str, destination: &str) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("key".to_string(), serde_json::Value::String(key.to_string()));
    map.insert(
        "destination".to_string(),
        serde_json::Value::String(destination.to_string()),
    );
    map
}
