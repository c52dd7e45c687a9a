use tokio::sync::mpsc;

use common::{ClientMessage, ConnectionId, ServerMessage, log};

use crate::broadcaster::ClientSender;
use crate::room_error::RoomError;
use crate::room_manager::RoomManager;

#[derive(Debug)]
pub enum ServerEvent {
    Connected {
        connection_id: ConnectionId,
        sender: ClientSender,
    },
    Message {
        connection_id: ConnectionId,
        message: ClientMessage,
    },
    Disconnected {
        connection_id: ConnectionId,
    },
}

pub type EventSender = mpsc::UnboundedSender<ServerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// The single consumer of connection events. Events are applied one at a
/// time in arrival order, so room state needs no locking.
pub struct Dispatcher {
    room_manager: RoomManager,
}

impl Dispatcher {
    pub fn new(room_manager: RoomManager) -> Self {
        Self { room_manager }
    }

    pub async fn run(mut self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        log!(
            "Dispatcher stopped with {} room(s) still open",
            self.room_manager.room_count()
        );
    }

    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected { connection_id, sender } => {
                self.room_manager.connect(connection_id, sender);
            }
            ServerEvent::Message { connection_id, message } => {
                self.handle_message(connection_id, message);
            }
            ServerEvent::Disconnected { connection_id } => {
                self.room_manager.disconnect(connection_id);
            }
        }
    }

    fn handle_message(&mut self, connection_id: ConnectionId, message: ClientMessage) {
        match message {
            ClientMessage::CreateRoom { room_id, player_name, grid_size } => {
                if let Err(e) =
                    self.room_manager.create_room(connection_id, room_id, player_name, grid_size)
                {
                    self.reply_error(connection_id, e);
                }
            }
            ClientMessage::JoinRoom { room_id, player_name } => {
                if let Err(e) = self.room_manager.join_room(connection_id, room_id, player_name) {
                    self.reply_error(connection_id, e);
                }
            }
            ClientMessage::Move { room_id, cell, player, mark } => {
                self.room_manager
                    .make_move(connection_id, room_id.as_ref(), cell, player, mark);
            }
            ClientMessage::EndGame { room_id } => {
                self.room_manager.end_game(connection_id, room_id.as_ref());
            }
        }
    }

    fn reply_error(&self, connection_id: ConnectionId, error: RoomError) {
        log!("[{}] Request rejected: {}", connection_id, error);
        self.room_manager.send_to(&connection_id, error_reply(error));
    }
}

fn error_reply(error: RoomError) -> ServerMessage {
    match error {
        RoomError::RoomFull(room_id) => ServerMessage::Full { room_id },
        other => ServerMessage::Error {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_manager::RoomSettings;
    use common::{Mark, Player, PlayerName, RoomId};

    fn create_dispatcher() -> Dispatcher {
        Dispatcher::new(RoomManager::new(RoomSettings {
            default_grid_size: 6,
            max_grid_size: 20,
        }))
    }

    fn connect(events: &EventSender, id: u64) -> (ConnectionId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(64);
        let connection_id = ConnectionId::new(id);
        events
            .send(ServerEvent::Connected { connection_id, sender: tx })
            .unwrap();
        (connection_id, rx)
    }

    fn send(events: &EventSender, connection_id: ConnectionId, message: ClientMessage) {
        events
            .send(ServerEvent::Message { connection_id, message })
            .unwrap();
    }

    fn create(room: &str, name: &str) -> ClientMessage {
        ClientMessage::CreateRoom {
            room_id: Some(RoomId::new(room)),
            player_name: PlayerName::new(name),
            grid_size: None,
        }
    }

    fn join(room: &str, name: &str) -> ClientMessage {
        ClientMessage::JoinRoom {
            room_id: RoomId::new(room),
            player_name: PlayerName::new(name),
        }
    }

    fn play(cell: usize, player: Player, mark: Mark) -> ClientMessage {
        ClientMessage::Move {
            room_id: Some(RoomId::new("r1")),
            cell,
            player,
            mark,
        }
    }

    #[test]
    fn test_error_reply_mapping() {
        assert_eq!(
            error_reply(RoomError::RoomFull(RoomId::new("r1"))),
            ServerMessage::Full { room_id: RoomId::new("r1") }
        );
        assert_eq!(
            error_reply(RoomError::RoomAlreadyExists(RoomId::new("r1"))),
            ServerMessage::Error { message: "Room already exists".to_string() }
        );
        assert_eq!(
            error_reply(RoomError::RoomNotFound(RoomId::new("r1"))),
            ServerMessage::Error { message: "Room not found".to_string() }
        );
    }

    #[test]
    fn test_duplicate_create_is_reported_to_sender() {
        let mut dispatcher = create_dispatcher();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(2);
        dispatcher.handle_event(ServerEvent::Connected { connection_id: a, sender: tx_a });
        dispatcher.handle_event(ServerEvent::Connected { connection_id: b, sender: tx_b });

        dispatcher.handle_event(ServerEvent::Message { connection_id: a, message: create("r1", "Ann") });
        dispatcher.handle_event(ServerEvent::Message { connection_id: b, message: create("r1", "Eve") });

        assert!(matches!(rx_a.try_recv().unwrap(), ServerMessage::RoomCreated { .. }));
        assert_eq!(
            rx_b.try_recv().unwrap(),
            ServerMessage::Error { message: "Room already exists".to_string() }
        );
        assert_eq!(dispatcher.room_manager.room_count(), 1);
    }

    #[test]
    fn test_join_missing_and_full_rooms() {
        let mut dispatcher = create_dispatcher();
        let mut receivers = Vec::new();
        for id in 1..=3 {
            let (tx, rx) = mpsc::channel(8);
            dispatcher.handle_event(ServerEvent::Connected {
                connection_id: ConnectionId::new(id),
                sender: tx,
            });
            receivers.push(rx);
        }

        dispatcher.handle_event(ServerEvent::Message {
            connection_id: ConnectionId::new(3),
            message: join("r1", "Cat"),
        });
        assert_eq!(
            receivers[2].try_recv().unwrap(),
            ServerMessage::Error { message: "Room not found".to_string() }
        );

        dispatcher.handle_event(ServerEvent::Message {
            connection_id: ConnectionId::new(1),
            message: create("r1", "Ann"),
        });
        dispatcher.handle_event(ServerEvent::Message {
            connection_id: ConnectionId::new(2),
            message: join("r1", "Bob"),
        });
        dispatcher.handle_event(ServerEvent::Message {
            connection_id: ConnectionId::new(3),
            message: join("r1", "Cat"),
        });

        assert_eq!(
            receivers[2].try_recv().unwrap(),
            ServerMessage::Full { room_id: RoomId::new("r1") }
        );
    }

    #[tokio::test]
    async fn test_event_loop_serializes_a_game() {
        let (events, event_rx) = mpsc::unbounded_channel();
        let loop_task = tokio::spawn(create_dispatcher().run(event_rx));

        let (host, mut host_rx) = connect(&events, 1);
        let (guest, mut guest_rx) = connect(&events, 2);
        send(&events, host, create("r1", "Ann"));
        send(&events, guest, join("r1", "Bob"));
        send(&events, host, play(0, Player::One, Mark::O));
        // Stale duplicate of the previous move: ignored.
        send(&events, host, play(0, Player::One, Mark::O));
        send(&events, guest, play(1, Player::Two, Mark::M));
        send(&events, host, play(2, Player::One, Mark::O));
        send(&events, host, ClientMessage::EndGame { room_id: Some(RoomId::new("r1")) });
        events.send(ServerEvent::Disconnected { connection_id: host }).unwrap();
        events.send(ServerEvent::Disconnected { connection_id: guest }).unwrap();
        drop(events);
        loop_task.await.unwrap();

        let mut host_messages = Vec::new();
        while let Ok(message) = host_rx.try_recv() {
            host_messages.push(message);
        }
        let mut guest_messages = Vec::new();
        while let Ok(message) = guest_rx.try_recv() {
            guest_messages.push(message);
        }

        // roomCreated, init, three updates, reset.
        assert_eq!(host_messages.len(), 6);
        assert!(matches!(host_messages[0], ServerMessage::RoomCreated { .. }));
        assert!(matches!(host_messages[1], ServerMessage::Init { player: Player::One, .. }));

        match &host_messages[4] {
            ServerMessage::Update { game_state, lines, .. } => {
                assert_eq!(game_state.score1, 1);
                assert_eq!(game_state.current_player, Player::One);
                assert_eq!(lines.len(), 1);
            }
            other => panic!("expected update, got {:?}", other),
        }
        match &host_messages[5] {
            ServerMessage::Update { game_state, lines, is_game_over } => {
                assert!(game_state.is_empty_board());
                assert!(lines.is_empty());
                assert!(!is_game_over);
            }
            other => panic!("expected update, got {:?}", other),
        }

        // init, three updates, reset; the host left first so the guest also
        // hears about it.
        assert_eq!(guest_messages.len(), 6);
        assert_eq!(&guest_messages[1..5], &host_messages[2..6]);
        assert!(matches!(guest_messages[5], ServerMessage::OpponentLeft { .. }));
    }
}
