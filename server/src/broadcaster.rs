use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use common::{ConnectionId, ServerMessage, log};

pub type ClientSender = mpsc::Sender<ServerMessage>;

/// Outbound channels of every live connection. Sending never waits: a full
/// queue drops the message, which the next full-state update supersedes.
#[derive(Default)]
pub struct Broadcaster {
    clients: HashMap<ConnectionId, ClientSender>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("clients", &self.clients.len())
            .finish()
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, connection_id: ConnectionId, sender: ClientSender) {
        self.clients.insert(connection_id, sender);
    }

    pub fn unregister(&mut self, connection_id: &ConnectionId) {
        self.clients.remove(connection_id);
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.clients.contains_key(connection_id)
    }

    pub fn send_to_client(&self, connection_id: &ConnectionId, message: ServerMessage) {
        let Some(sender) = self.clients.get(connection_id) else {
            return;
        };

        match sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log!("[{}] Outbound queue full, dropping message", connection_id);
            }
            Err(TrySendError::Closed(_)) => {
                log!("[{}] Outbound channel closed", connection_id);
            }
        }
    }

    pub fn broadcast_to_clients<'a>(
        &self,
        connection_ids: impl IntoIterator<Item = &'a ConnectionId>,
        message: ServerMessage,
    ) {
        for connection_id in connection_ids {
            self.send_to_client(connection_id, message.clone());
        }
    }
}
