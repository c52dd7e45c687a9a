use serde::{Deserialize, Serialize};

use super::game_state::GameState;
use super::types::{LineKey, Mark, Player, ScoredLine};

/// Read-only projection of a `GameState` sent to clients. Counted-line sets
/// stay on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// One entry per cell: "" for empty, otherwise the mark symbol.
    pub board: Vec<String>,
    pub current_player: Player,
    pub score1: u32,
    pub score2: u32,
}

impl GameSnapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            board: state
                .board()
                .iter()
                .map(|cell| cell.map(|mark| mark.symbol()).unwrap_or("").to_string())
                .collect(),
            current_player: state.current_player(),
            score1: state.score(Player::One),
            score2: state.score(Player::Two),
        }
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        match self.board.get(index).map(String::as_str) {
            Some("O") => Some(Mark::O),
            Some("M") => Some(Mark::M),
            _ => None,
        }
    }

    pub fn is_empty_board(&self) -> bool {
        self.board.iter().all(String::is_empty)
    }
}

/// A matching line as drawn by clients: `cells` are `[row, col]` pairs from
/// head to tail, `indices` the flat board positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub cells: [[usize; 2]; 3],
    pub indices: LineKey,
    pub player: Player,
}

impl LineView {
    pub fn of(line: &ScoredLine, grid_size: usize) -> Self {
        let coords = |index: usize| [index / grid_size, index % grid_size];
        Self {
            cells: line.key.map(coords),
            indices: line.key,
            player: line.player,
        }
    }

    pub fn all(lines: &[ScoredLine], grid_size: usize) -> Vec<Self> {
        lines.iter().map(|line| Self::of(line, grid_size)).collect()
    }
}
