use super::game_state::GameState;
use super::pattern_catalog::generate_lines;
use super::types::{LineKey, Mark, Player, ScoredLine};

/// Result of one accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub mover: Player,
    pub lines: Vec<ScoredLine>,
    pub newly_scored: usize,
    pub board_full: bool,
}

/// Scores O-M-O lines for one grid size. The line catalog is computed once
/// and shared by every evaluation.
#[derive(Debug, Clone)]
pub struct OmoEngine {
    grid_size: usize,
    lines: Vec<LineKey>,
}

impl OmoEngine {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            lines: generate_lines(grid_size),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn lines(&self) -> &[LineKey] {
        &self.lines
    }

    pub fn is_omo(board: &[Option<Mark>], [head, middle, tail]: LineKey) -> bool {
        matches!(
            (board.get(head), board.get(middle), board.get(tail)),
            (Some(Some(Mark::O)), Some(Some(Mark::M)), Some(Some(Mark::O)))
        )
    }

    /// Scans the whole board. Lines already counted keep their owner; new
    /// ones go to the current player and are counted exactly once. Returns
    /// every matching line plus how many were scored by this call.
    pub fn evaluate(&self, state: &mut GameState) -> (Vec<ScoredLine>, usize) {
        let mover = state.current_player();
        let mut matching = Vec::new();
        let mut newly_scored = 0;

        for &key in &self.lines {
            if !Self::is_omo(state.board(), key) {
                continue;
            }

            let player = match state.counted_owner(&key) {
                Some(owner) => owner,
                None => {
                    state.award(key, mover);
                    newly_scored += 1;
                    mover
                }
            };
            matching.push(ScoredLine { key, player });
        }

        state.set_all_lines(matching.clone());
        (matching, newly_scored)
    }

    /// Applies an already validated move, scores it and advances the turn.
    pub fn play(&self, state: &mut GameState, cell_index: usize, mark: Mark) -> TurnOutcome {
        let mover = state.current_player();
        state.apply_move(cell_index, mark);
        let (lines, newly_scored) = self.evaluate(state);
        state.advance_turn(newly_scored);

        TurnOutcome {
            mover,
            lines,
            newly_scored,
            board_full: state.is_board_full(),
        }
    }
}
