pub mod config;
pub mod games;
pub mod id_generator;
pub mod identifiers;
pub mod logger;
pub mod protocol;

pub use games::omo::{
    GameSnapshot, GameState, LineKey, LineView, Mark, OmoEngine, Player, ScoredLine, TurnOutcome,
    generate_lines,
};
pub use identifiers::*;
pub use protocol::{ClientMessage, ProtocolError, ServerMessage};
