use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    O,
    M,
}

impl Mark {
    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::O => "O",
            Mark::M => "M",
        }
    }

    pub fn other(&self) -> Mark {
        match self {
            Mark::O => Mark::M,
            Mark::M => Mark::O,
        }
    }
}

/// Seat in a room. Serialized as the bare player number (1 or 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn number(&self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn from_slot(slot: usize) -> Option<Player> {
        match slot {
            0 => Some(Player::One),
            1 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn slot(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(format!("player must be 1 or 2, got {}", other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Head, middle and tail cell indices of a line. Doubles as the canonical key
/// for counted-line membership.
pub type LineKey = [usize; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredLine {
    pub key: LineKey,
    pub player: Player,
}
