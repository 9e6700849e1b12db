//! End-to-end tests for the increment command: a real service on an
//! ephemeral port for the happy paths, a scripted client for the failure
//! paths.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use tally_api::{HttpApi, StoreHandler};
use tally_core::prelude::*;
use tally_exec::{HttpApiClient, IncCommand, register_inc_command};
use tally_model::{INC_COMMAND_NAME, IncParams, ParamMap, TaskId};
use tally_store::MemoryStore;

async fn spawn_service() -> String {
    let handler = Arc::new(StoreHandler::new(Arc::new(MemoryStore::new())));
    let router = HttpApi::new(handler).router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn live_context(base: &str, sink: ExpansionSink) -> TaskContext {
    let client = HttpApiClient::new(base, TaskId::random());
    TaskContext::new(TaskId::random(), Arc::new(client)).with_expansions(sink)
}

fn params_from_json(raw: &str) -> ParamMap {
    serde_json::from_str(raw).unwrap()
}

/// Scripted stand-in for the service, for failure paths. Records how many
/// calls were made.
struct ScriptedClient {
    script: Script,
    calls: AtomicUsize,
}

enum Script {
    Respond(u16, &'static str),
    Unreachable,
    Hang,
}

impl ScriptedClient {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn post_json(&self, _route: &str, _body: &Value) -> Result<ApiResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(status, body) => Ok(ApiResponse::new(*status, body.as_bytes().into())),
            Script::Unreachable => Err(ClientError::Unreachable("connection refused".into())),
            Script::Hang => std::future::pending().await,
        }
    }
}

fn scripted_context(client: Arc<ScriptedClient>, sink: ExpansionSink) -> TaskContext {
    TaskContext::new(TaskId::from("scripted-task"), client).with_expansions(sink)
}

#[tokio::test]
async fn two_increments_and_a_sibling_key_land_in_the_sink() {
    let base = spawn_service().await;
    let sink = ExpansionSink::default();

    let mut registry = CommandRegistry::new();
    register_inc_command(&mut registry);

    let testkey = params_from_json(r#"{"key":"testkey","destination":"testkey"}"#);
    let sibling = params_from_json(r#"{"key":"testkey_x","destination":"testkey_x"}"#);

    for params in [&testkey, &testkey, &sibling] {
        let cmd = registry.resolve(INC_COMMAND_NAME, params).unwrap();
        let ctx = live_context(&base, sink.clone());
        run_command(cmd.as_ref(), &ctx).await.unwrap();
    }

    assert_eq!(sink.get("testkey").as_deref(), Some("2"));
    assert_eq!(sink.get("testkey_x").as_deref(), Some("1"));
}

#[tokio::test]
async fn placeholders_resolve_against_the_sink_before_the_call() {
    let base = spawn_service().await;
    let sink = ExpansionSink::default();
    sink.put("counter", "resolved_key");
    sink.put("slot", "result");

    let cmd = IncCommand::new(IncParams::new("${counter}", "${slot}"));
    let ctx = live_context(&base, sink.clone());

    cmd.execute(&ctx).await.unwrap();

    assert_eq!(sink.get("result").as_deref(), Some("1"));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure_and_publishes_nothing() {
    // Bind and immediately drop a listener so the port is free but closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = ExpansionSink::default();
    let cmd = IncCommand::new(IncParams::new("testkey", "dest"));
    let ctx = live_context(&format!("http://{addr}"), sink.clone());

    let err = cmd.execute(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        CommandError::Transport(ClientError::Unreachable(_))
    ));
    assert!(sink.get("dest").is_none());
}

#[tokio::test]
async fn preset_stop_signal_skips_the_network_call() {
    let client = ScriptedClient::new(Script::Respond(200, r#"{"key":"k","value":1}"#));
    let sink = ExpansionSink::default();

    let token = CancellationToken::new();
    token.cancel();

    let cmd = IncCommand::new(IncParams::new("k", "dest"));
    let ctx = scripted_context(Arc::clone(&client), sink.clone()).with_cancel(token);

    let err = cmd.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, CommandError::Canceled));
    assert_eq!(client.calls(), 0);
    assert!(sink.get("dest").is_none());
}

#[tokio::test]
async fn stop_signal_aborts_an_in_flight_call() {
    let client = ScriptedClient::new(Script::Hang);
    let sink = ExpansionSink::default();
    let token = CancellationToken::new();

    let cmd = IncCommand::new(IncParams::new("k", "dest"));
    let ctx = scripted_context(client, sink.clone()).with_cancel(token.clone());

    let handle = tokio::spawn(async move { cmd.execute(&ctx).await });
    token.cancel();

    let res = handle.await.unwrap();
    assert!(matches!(res, Err(CommandError::Canceled)));
    assert!(sink.get("dest").is_none());
}

#[tokio::test]
async fn non_success_status_carries_the_code_and_body() {
    let client = ScriptedClient::new(Script::Respond(500, r#""storage error: disk gone""#));
    let sink = ExpansionSink::default();

    let cmd = IncCommand::new(IncParams::new("k", "dest"));
    let ctx = scripted_context(client, sink.clone());

    let err = cmd.execute(&ctx).await.unwrap_err();

    match err {
        CommandError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("storage error"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
    assert!(sink.get("dest").is_none());
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_failure() {
    let client = ScriptedClient::new(Script::Respond(200, "[1,2"));
    let sink = ExpansionSink::default();

    let cmd = IncCommand::new(IncParams::new("k", "dest"));
    let ctx = scripted_context(client, sink.clone());

    let err = cmd.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, CommandError::Decode(_)));
    assert!(sink.get("dest").is_none());
}

#[tokio::test]
async fn unresolvable_placeholder_is_a_configuration_error_with_zero_calls() {
    let client = ScriptedClient::new(Script::Respond(200, r#"{"key":"k","value":1}"#));
    let sink = ExpansionSink::default();

    // ${counter} is absent from the sink, so the key resolves to blank.
    let cmd = IncCommand::new(IncParams::new("${counter}", "dest"));
    let ctx = scripted_context(Arc::clone(&client), sink);

    let err = cmd.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, CommandError::Config { .. }));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn published_value_overwrites_an_earlier_one() {
    let base = spawn_service().await;
    let sink = ExpansionSink::default();
    sink.put("dest", "stale");

    let cmd = IncCommand::new(IncParams::new("overwrite", "dest"));
    let ctx = live_context(&base, sink.clone());

    cmd.execute(&ctx).await.unwrap();

    assert_eq!(sink.get("dest").as_deref(), Some("1"));
}
