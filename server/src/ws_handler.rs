use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use common::protocol::{decode_client_message, encode_server_message};
use common::{ConnectionId, ServerMessage, log};

use crate::connection_tracker::MessageBudget;
use crate::dispatcher::ServerEvent;
use crate::web_server::WebServerState;

pub async fn handle_websocket(socket: WebSocket, state: WebServerState) {
    let connection_id = state.tracker.open();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.outbound_queue);

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match encode_server_message(&message) {
                Ok(text) => text,
                Err(e) => {
                    log!("[{}] {}", connection_id, e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    if state
        .events
        .send(ServerEvent::Connected { connection_id, sender: tx })
        .is_err()
    {
        log!("[{}] Dispatcher is gone, refusing connection", connection_id);
        send_task.abort();
        state.tracker.close();
        return;
    }

    log!(
        "[{}] WebSocket client connected ({} live)",
        connection_id,
        state.tracker.live_connections()
    );

    let mut budget = MessageBudget::new(state.message_budget);

    while let Some(result) = ws_receiver.next().await {
        let text = match result {
            Ok(Message::Text(text)) => Ok(text.as_str().to_owned()),
            Ok(Message::Binary(data)) => String::from_utf8(data.to_vec()),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("[{}] WebSocket error: {}", connection_id, e);
                break;
            }
        };

        if !budget.admit() {
            log!(
                "[{}] Message budget of {} exhausted, closing",
                connection_id, state.message_budget
            );
            break;
        }

        let Ok(text) = text else {
            log!("[{}] Dropping non UTF-8 binary frame", connection_id);
            continue;
        };

        if !forward_text(&state, connection_id, &text) {
            break;
        }
    }

    log!(
        "[{}] WebSocket connection ended after {} message(s)",
        connection_id,
        budget.received()
    );

    // The dispatcher drops its sender on disconnect, which ends the send task
    // and closes the socket.
    let _ = state.events.send(ServerEvent::Disconnected { connection_id });
    state.tracker.close();
    if tokio::time::timeout(std::time::Duration::from_secs(1), send_task)
        .await
        .is_err()
    {
        log!("[{}] Send task did not finish in time", connection_id);
    }
}

/// Decodes one frame and hands it to the dispatcher. Malformed frames are
/// logged and dropped. Returns false once the dispatcher has stopped.
fn forward_text(state: &WebServerState, connection_id: ConnectionId, text: &str) -> bool {
    let message = match decode_client_message(text) {
        Ok(message) => message,
        Err(e) => {
            log!("[{}] {}", connection_id, e);
            return true;
        }
    };

    state
        .events
        .send(ServerEvent::Message { connection_id, message })
        .is_ok()
}
