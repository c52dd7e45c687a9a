mod engine;
mod game_state;
mod pattern_catalog;
mod snapshot;
mod types;

pub use engine::{OmoEngine, TurnOutcome};
pub use game_state::GameState;
pub use pattern_catalog::{generate_lines, line_count};
pub use snapshot::{GameSnapshot, LineView};
pub use types::{LineKey, Mark, Player, ScoredLine};

pub const DEFAULT_GRID_SIZE: usize = 6;
pub const MIN_GRID_SIZE: usize = 3;
