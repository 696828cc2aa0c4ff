//! End-to-end client operations against a simulated host task.
//!
//! The host reads envelopes from the outbound queue and answers through the
//! inbound pump, the same path a real host runtime would use.

use std::sync::{Arc, Mutex};

use ipc_bridge::bridge::{InboundTaskHandle, spawn_inbound_task};
use ipc_bridge::client::{Candidate, SearchResult};
use ipc_bridge::router::Topic;
use ipc_bridge::{BridgeContext, BridgeError, Envelope, IpcClient, QueueTransmit, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;

struct SimulatedHost {
    client: IpcClient,
    selected: Arc<Mutex<Vec<String>>>,
    inbound: mpsc::UnboundedSender<String>,
    _pump: InboundTaskHandle,
}

fn candidates() -> Vec<Candidate> {
    ["Fire Effect", "Blur", "Fire Trail"]
        .iter()
        .enumerate()
        .map(|(i, label)| Candidate {
            key: i.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn answer(kind: &str, data: Value) -> String {
    ipc_bridge::bridge::encode(kind, &data).unwrap()
}

/// Spawn a host that answers `search`, `reload` and records `select`.
fn spawn_host(reload_reply: Value) -> SimulatedHost {
    let _ = env_logger::builder().is_test(true).try_init();

    let context = Arc::new(BridgeContext::new());
    let (transmit, mut outbound) = QueueTransmit::channel();
    let bridge = context.init(transmit);

    let (inbound, inbound_rx) = mpsc::unbounded_channel();
    let pump = spawn_inbound_task(bridge, inbound_rx);

    let selected = Arc::new(Mutex::new(Vec::new()));
    let host_selected = Arc::clone(&selected);
    let host_inbound = inbound.clone();
    tokio::spawn(async move {
        while let Some(raw) = outbound.recv().await {
            let request = Envelope::decode(&raw).expect("client sends valid envelopes");
            let reply = match request.kind.as_str() {
                "search" => {
                    let query = request.data.as_str().unwrap_or_default().to_lowercase();
                    let matches: Vec<_> = candidates()
                        .into_iter()
                        .filter(|c| c.label.to_lowercase().contains(&query))
                        .collect();
                    Some(answer("search_result", json!({ "candidates": matches })))
                }
                "reload" => Some(answer("reload_result", reload_reply.clone())),
                "select" => {
                    let name = request.data.as_str().unwrap_or_default().to_string();
                    host_selected.lock().unwrap().push(name.clone());
                    Some(answer("selected", json!({ "name": name })))
                }
                _ => None,
            };
            if let Some(reply) = reply
                && host_inbound.send(reply).is_err()
            {
                break;
            }
        }
    });

    SimulatedHost {
        client: IpcClient::new(Router::new(context)),
        selected,
        inbound,
        _pump: pump,
    }
}

#[tokio::test]
async fn search_query_returns_matching_candidates() {
    let host = spawn_host(json!({"completed": true}));

    let result = host.client.search_query("fire").await.unwrap();

    assert_eq!(
        result.candidates.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
        vec!["Fire Effect", "Fire Trail"]
    );
}

#[tokio::test]
async fn concurrent_searches_pair_in_call_order() {
    let host = spawn_host(json!({"completed": true}));

    let (blur, fire) = tokio::join!(
        host.client.search_query("blur"),
        host.client.search_query("fire")
    );

    assert_eq!(blur.unwrap().candidates.len(), 1);
    assert_eq!(fire.unwrap().candidates.len(), 2);
}

#[tokio::test]
async fn reload_list_reports_completed_flag() {
    let host = spawn_host(json!({"completed": true}));
    assert!(host.client.reload_list().await.unwrap());
}

#[tokio::test]
async fn reload_list_defaults_to_false_without_flag() {
    let host = spawn_host(json!({}));
    assert!(!host.client.reload_list().await.unwrap());

    let host = spawn_host(Value::Null);
    assert!(!host.client.reload_list().await.unwrap());
}

#[tokio::test]
async fn reload_list_with_malformed_reply_is_decode_error() {
    let host = spawn_host(json!({"completed": "yes"}));

    match host.client.reload_list().await {
        Err(BridgeError::Decode { kind, .. }) => assert_eq!(kind, "reload_result"),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Selected {
    name: String,
}

struct SelectedTopic;

impl Topic for SelectedTopic {
    const KIND: &'static str = "selected";
    type Payload = Selected;
}

#[tokio::test]
async fn confirm_candidate_is_fire_and_forget_and_pushes_event() {
    let host = spawn_host(json!({"completed": true}));
    let (events_tx, mut events) = mpsc::unbounded_channel();

    host.client
        .router()
        .subscribe_to::<SelectedTopic, _>(move |selected| {
            let _ = events_tx.send(selected);
        })
        .unwrap();

    host.client.confirm_candidate("Blur").unwrap();

    let event = events.recv().await.expect("host pushes a selected event");
    assert_eq!(event, Selected { name: "Blur".into() });
    assert_eq!(*host.selected.lock().unwrap(), vec!["Blur".to_string()]);
}

#[tokio::test]
async fn on_receives_unsolicited_host_events() {
    let host = spawn_host(json!({"completed": true}));
    let (events_tx, mut events) = mpsc::unbounded_channel();

    host.client
        .on("candidates_changed", move |data| {
            let _ = events_tx.send(data.clone());
        })
        .unwrap();

    let pushed = SearchResult {
        candidates: candidates(),
    };
    host.inbound
        .send(answer("candidates_changed", serde_json::to_value(&pushed).unwrap()))
        .unwrap();

    let event = events.recv().await.unwrap();
    let decoded: SearchResult = serde_json::from_value(event).unwrap();
    assert_eq!(decoded, pushed);
}
