use std::collections::HashSet;

use super::types::{LineKey, Mark, Player, ScoredLine};

/// Authoritative per-room game record. Only the engine touches scores and
/// counted sets; everything a client sees goes through `GameSnapshot`.
#[derive(Debug, Clone)]
pub struct GameState {
    grid_size: usize,
    board: Vec<Option<Mark>>,
    current_player: Player,
    score1: u32,
    score2: u32,
    counted1: HashSet<LineKey>,
    counted2: HashSet<LineKey>,
    all_lines: Vec<ScoredLine>,
}

impl GameState {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            board: vec![None; grid_size * grid_size],
            current_player: Player::One,
            score1: 0,
            score2: 0,
            counted1: HashSet::new(),
            counted2: HashSet::new(),
            all_lines: Vec::new(),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn board(&self) -> &[Option<Mark>] {
        &self.board
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.board.get(index).copied().flatten()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn score(&self, player: Player) -> u32 {
        match player {
            Player::One => self.score1,
            Player::Two => self.score2,
        }
    }

    pub fn all_lines(&self) -> &[ScoredLine] {
        &self.all_lines
    }

    pub fn is_valid_move(&self, cell_index: usize, player: Player) -> bool {
        matches!(self.board.get(cell_index), Some(None)) && player == self.current_player
    }

    /// Writes `mark` into `cell_index`. Callers validate with `is_valid_move`
    /// first; an out-of-range index is a no-op.
    pub fn apply_move(&mut self, cell_index: usize, mark: Mark) {
        if let Some(cell) = self.board.get_mut(cell_index) {
            *cell = Some(mark);
        }
    }

    pub fn is_board_full(&self) -> bool {
        self.board.iter().all(Option::is_some)
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.is_none().then_some(index))
            .collect()
    }

    pub fn counted_owner(&self, key: &LineKey) -> Option<Player> {
        if self.counted1.contains(key) {
            Some(Player::One)
        } else if self.counted2.contains(key) {
            Some(Player::Two)
        } else {
            None
        }
    }

    pub fn counted_total(&self) -> usize {
        self.counted1.len() + self.counted2.len()
    }

    /// Records `key` for `player` and bumps their score. Returns false when the
    /// line was already awarded to anyone.
    pub(super) fn award(&mut self, key: LineKey, player: Player) -> bool {
        if self.counted_owner(&key).is_some() {
            return false;
        }
        match player {
            Player::One => {
                self.counted1.insert(key);
                self.score1 += 1;
            }
            Player::Two => {
                self.counted2.insert(key);
                self.score2 += 1;
            }
        }
        true
    }

    pub(super) fn set_all_lines(&mut self, lines: Vec<ScoredLine>) {
        self.all_lines = lines;
    }

    /// Scoring keeps the turn; anything else passes it.
    pub fn advance_turn(&mut self, newly_scored: usize) {
        if newly_scored == 0 {
            self.current_player = self.current_player.opponent();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = GameState::new(6);

        assert_eq!(state.board().len(), 36);
        assert!(state.board().iter().all(Option::is_none));
        assert_eq!(state.current_player(), Player::One);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.score(Player::Two), 0);
        assert!(state.all_lines().is_empty());
        assert_eq!(state.counted_total(), 0);
    }

    #[test]
    fn test_valid_move_requires_turn_and_empty_cell() {
        let mut state = GameState::new(3);

        assert!(state.is_valid_move(4, Player::One));
        assert!(!state.is_valid_move(4, Player::Two));

        state.apply_move(4, Mark::M);

        assert!(!state.is_valid_move(4, Player::One));
        assert_eq!(state.cell(4), Some(Mark::M));
    }

    #[test]
    fn test_out_of_range_move_is_invalid() {
        let state = GameState::new(3);

        assert!(!state.is_valid_move(9, Player::One));
        assert!(!state.is_valid_move(usize::MAX, Player::One));
    }

    #[test]
    fn test_apply_move_out_of_range_is_noop() {
        let mut state = GameState::new(3);

        state.apply_move(42, Mark::O);

        assert_eq!(state.empty_cells().len(), 9);
    }

    #[test]
    fn test_board_full_after_all_cells_filled() {
        let mut state = GameState::new(3);
        for index in 0..8 {
            state.apply_move(index, Mark::O);
        }

        assert!(!state.is_board_full());
        assert_eq!(state.empty_cells(), vec![8]);

        state.apply_move(8, Mark::M);

        assert!(state.is_board_full());
        assert!(state.empty_cells().is_empty());
    }

    #[test]
    fn test_advance_turn_flips_only_without_score() {
        let mut state = GameState::new(3);

        state.advance_turn(0);
        assert_eq!(state.current_player(), Player::Two);

        state.advance_turn(2);
        assert_eq!(state.current_player(), Player::Two);

        state.advance_turn(0);
        assert_eq!(state.current_player(), Player::One);
    }

    #[test]
    fn test_award_is_exclusive_between_players() {
        let mut state = GameState::new(3);

        assert!(state.award([0, 1, 2], Player::Two));
        assert!(!state.award([0, 1, 2], Player::One));
        assert!(!state.award([0, 1, 2], Player::Two));

        assert_eq!(state.counted_owner(&[0, 1, 2]), Some(Player::Two));
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.score(Player::Two), 1);
    }
}
