//! # Event Stream Handler
//!
//! WebSocket endpoint surfacing the notification fan-out to clients.
//!
//! Every connection implicitly receives the global topic. Apartment topics
//! are joined and left explicitly through JSON commands; dropping the
//! connection leaves everything. Delivery is at-most-once: a subscriber
//! that lags past the channel capacity or reconnects later has missed those
//! events for good.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::events::{Envelope, EventBus, Topic};
use crate::server::AppState;

/// Commands a connected client may send
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientCommand {
    Join { apartment_id: Uuid },
    Leave { apartment_id: Uuid },
}

/// Upgrade to the event stream WebSocket
#[utoipa::path(
    get,
    path = "/api/v1/events",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    responses(
        (status = 101, description = "Switching to the WebSocket event stream"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "events"
)]
pub async fn events_ws(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(_owner): OwnerExtension,
    ws: WebSocketUpgrade,
) -> Response {
    let bus = Arc::clone(&state.events);
    ws.on_upgrade(move |socket| handle_socket(socket, bus))
}

async fn handle_socket(socket: WebSocket, bus: Arc<EventBus>) {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Envelope>(64);

    let mut subscriptions: HashMap<String, JoinHandle<()>> = HashMap::new();

    // Every connection listens on the global topic from the start.
    let global = Topic::Global;
    subscriptions.insert(
        global.key(),
        spawn_forwarder(bus.subscribe(&global), out_tx.clone()),
    );

    loop {
        tokio::select! {
            outbound = out_rx.recv() => {
                let Some(envelope) = outbound else { break };
                let Ok(text) = serde_json::to_string(&envelope) else { continue };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(ClientCommand::Join { apartment_id }) => {
                                let topic = Topic::Apartment(apartment_id);
                                subscriptions.entry(topic.key()).or_insert_with(|| {
                                    tracing::debug!(topic = %topic.key(), "Subscriber joined topic");
                                    spawn_forwarder(bus.subscribe(&topic), out_tx.clone())
                                });
                            }
                            Ok(ClientCommand::Leave { apartment_id }) => {
                                let topic = Topic::Apartment(apartment_id);
                                if let Some(task) = subscriptions.remove(&topic.key()) {
                                    tracing::debug!(topic = %topic.key(), "Subscriber left topic");
                                    task.abort();
                                }
                            }
                            Err(err) => {
                                tracing::debug!(?err, "Ignoring malformed client command");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    // Disconnect implies leaving every topic.
    for (_, task) in subscriptions {
        task.abort();
    }
}

/// Pump one topic subscription into the connection's outbound queue.
fn spawn_forwarder(
    mut rx: broadcast::Receiver<Envelope>,
    tx: mpsc::Sender<Envelope>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(envelope) => {
                    if tx.send(envelope).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Subscriber lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
