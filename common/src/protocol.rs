//! JSON wire messages. Every frame is a single object whose `type` field
//! names the variant; field names are camelCase.

use serde::{Deserialize, Serialize};

use crate::games::omo::{GameSnapshot, LineView, Mark, Player};
use crate::{PlayerName, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom {
        /// Blank asks the server to pick an id.
        #[serde(default)]
        room_id: Option<RoomId>,
        player_name: PlayerName,
        #[serde(default)]
        grid_size: Option<usize>,
    },
    JoinRoom {
        room_id: RoomId,
        player_name: PlayerName,
    },
    Move {
        #[serde(default)]
        room_id: Option<RoomId>,
        cell: usize,
        player: Player,
        mark: Mark,
    },
    EndGame {
        #[serde(default)]
        room_id: Option<RoomId>,
    },
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::CreateRoom { .. } => "createRoom",
            ClientMessage::JoinRoom { .. } => "joinRoom",
            ClientMessage::Move { .. } => "move",
            ClientMessage::EndGame { .. } => "endGame",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_id: RoomId,
        grid_size: usize,
    },
    Error {
        message: String,
    },
    Full {
        room_id: RoomId,
    },
    Init {
        player: Player,
        room_id: RoomId,
        game_state: GameSnapshot,
        lines: Vec<LineView>,
        /// Name of the player who just joined.
        player_name: PlayerName,
        player1_name: Option<PlayerName>,
        player2_name: Option<PlayerName>,
        grid_size: usize,
    },
    Update {
        game_state: GameSnapshot,
        lines: Vec<LineView>,
        is_game_over: bool,
    },
    OpponentLeft {
        room_id: RoomId,
        player_name: Option<PlayerName>,
    },
}

#[derive(Debug)]
pub enum ProtocolError {
    Malformed(serde_json::Error),
    Encode(serde_json::Error),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Malformed(e) => write!(f, "Malformed client message: {}", e),
            ProtocolError::Encode(e) => write!(f, "Failed to encode server message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Malformed(e) | ProtocolError::Encode(e) => Some(e),
        }
    }
}

pub fn decode_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Malformed)
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}
