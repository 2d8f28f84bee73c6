//! Match state, primitive actions and reversible moves

use crate::board::{Grid, Hex};
use crate::cell::CellId;
use crate::config::{validate_board, ConfigError};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// One of the two competing sides. Red moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red = 0,
    Blue = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InitialPlacement,
    Normal,
    Over,
}

/// Match result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    RedWins,
    BlueWins,
    Draw,
}

impl GameResult {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::RedWins => Some(Side::Red),
            GameResult::BlueWins => Some(Side::Blue),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

/// A complete move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Initial herd on a free edge cell
    Place { cell: CellId },
    /// Move `amount` sheep from `from` onto the free cell `to`
    Split { from: CellId, to: CellId, amount: u32 },
}

/// Restores the match to where it was before [`Match::apply`].
#[must_use = "an applied action must be undone with Match::undo"]
#[derive(Debug)]
pub struct Undo {
    action: Action,
    side_to_move: Side,
    result: GameResult,
}

impl Undo {
    pub fn action(&self) -> Action {
        self.action
    }
}

/// What a call to [`Match::select`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Placed(CellId),
    Chosen(CellId),
    Targeted(CellId),
    Cleared,
    Ignored,
}

/// Direction of a planned-amount adjustment, seen from the target cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjust {
    More,
    Less,
}

// ============================================================================
// MATCH
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    grid: Grid,
    turn: u32,
    side_to_move: Side,
    chosen: Option<CellId>,
    target: Option<CellId>,
    initial_herd: u32,
    result: GameResult,
}

impl Match {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, Red to place first
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        validate_board(width, height)?;
        let grid = Grid::new(width, height);
        let initial_herd = (grid.len() / 2) as u32;

        Ok(Self {
            grid,
            turn: 1,
            side_to_move: Side::Red,
            chosen: None,
            target: None,
            initial_herd,
            result: GameResult::Ongoing,
        })
    }

    /// Arbitrary position with the given herds already on the board
    pub fn from_position(
        width: u16,
        height: u16,
        turn: u32,
        side_to_move: Side,
        herds: &[(Hex, Side, u32)],
    ) -> Result<Self, ConfigError> {
        let mut game = Self::new(width, height)?;
        for &(hex, side, size) in herds {
            let id = game
                .grid
                .cell_at(hex)
                .ok_or(ConfigError::OffBoard { q: hex.q, r: hex.r })?;
            if size == 0 {
                return Err(ConfigError::EmptyHerd { q: hex.q, r: hex.r });
            }
            game.grid.cell_mut(id).occupy(side, size);
        }
        game.turn = turn.max(1);
        game.side_to_move = side_to_move;
        if !game.is_in_initial_placement()
            && game.is_blocked(side_to_move)
            && !game.is_blocked(side_to_move.opponent())
        {
            game.side_to_move = side_to_move.opponent();
        }
        game.result = game.compute_result();
        Ok(game)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn chosen(&self) -> Option<CellId> {
        self.chosen
    }

    pub fn target(&self) -> Option<CellId> {
        self.target
    }

    pub fn initial_herd(&self) -> u32 {
        self.initial_herd
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    pub fn winner(&self) -> Option<Side> {
        self.result.winner()
    }

    pub fn is_in_initial_placement(&self) -> bool {
        self.turn <= 2
    }

    pub fn phase(&self) -> Phase {
        if self.is_over() {
            Phase::Over
        } else if self.is_in_initial_placement() {
            Phase::InitialPlacement
        } else {
            Phase::Normal
        }
    }

    // ========================================================================
    // DERIVED QUERIES
    // ========================================================================

    /// Free edge cells, where initial herds may be placed
    pub fn initial_cells(&self) -> Vec<CellId> {
        self.grid
            .edge_cells()
            .filter(|&id| self.grid.cell(id).is_free())
            .collect()
    }

    /// Cells of the side to move that have somewhere to go
    pub fn movable_cells(&self) -> Vec<CellId> {
        self.grid
            .occupied_by(self.side_to_move)
            .filter(|&id| self.grid.has_potential_targets(id))
            .collect()
    }

    /// No cell of `side` can move
    pub fn is_blocked(&self, side: Side) -> bool {
        !self
            .grid
            .occupied_by(side)
            .any(|id| self.grid.has_potential_targets(id))
    }

    pub fn occupied_count(&self, side: Side) -> usize {
        self.grid.occupied_by(side).count()
    }

    pub fn herd_total(&self, side: Side) -> u32 {
        self.grid
            .occupied_by(side)
            .map(|id| self.grid.cell(id).herd_size())
            .sum()
    }

    pub fn largest_region(&self, side: Side) -> usize {
        self.grid.largest_region(side)
    }

    pub fn targeted_count(&self) -> usize {
        self.grid.cells().filter(|(_, c)| c.is_targeted()).count()
    }

    /// All actions available to the side to move
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase() {
            Phase::Over => vec![],
            Phase::InitialPlacement => self
                .initial_cells()
                .into_iter()
                .map(|cell| Action::Place { cell })
                .collect(),
            Phase::Normal => {
                let mut actions = Vec::new();
                for from in self.movable_cells() {
                    let herd = self.grid.cell(from).herd_size();
                    for to in self.grid.potential_targets(from) {
                        for amount in 1..herd {
                            actions.push(Action::Split { from, to, amount });
                        }
                    }
                }
                actions
            }
        }
    }

    pub fn is_legal(&self, action: Action) -> bool {
        match (self.phase(), action) {
            (Phase::InitialPlacement, Action::Place { cell }) => {
                cell.0 < self.grid.len()
                    && self.grid.cell(cell).is_free()
                    && self.grid.is_on_edge(cell)
            }
            (Phase::Normal, Action::Split { from, to, amount }) => {
                from.0 < self.grid.len()
                    && self.grid.cell(from).is_occupied_by(self.side_to_move)
                    && amount >= 1
                    && amount < self.grid.cell(from).herd_size()
                    && self.grid.potential_targets(from).contains(&to)
            }
            _ => false,
        }
    }

    // ========================================================================
    // REVERSIBLE MOVES
    // ========================================================================

    /// Apply an action. A move under composition is left as it is, so
    /// `undo` brings back the exact prior state.
    ///
    /// Panics when the action breaks the rules; callers pass actions taken
    /// from [`Match::legal_actions`] or checked with [`Match::is_legal`].
    pub fn apply(&mut self, action: Action) -> Undo {
        assert!(!self.is_over(), "no actions once the match is over");

        let undo = Undo {
            action,
            side_to_move: self.side_to_move,
            result: self.result,
        };
        let mover = self.side_to_move;

        match action {
            Action::Place { cell } => {
                assert!(self.is_in_initial_placement(), "placement after turn 2");
                assert!(self.grid.cell(cell).is_free(), "placement on an occupied cell");
                self.grid.cell_mut(cell).occupy(mover, self.initial_herd);
            }
            Action::Split { from, to, amount } => {
                let herd = self.grid.cell(from).herd().expect("split from a free cell");
                assert_eq!(herd.side, mover, "split from the opponent's herd");
                assert!(
                    amount >= 1 && amount < herd.size,
                    "split of {} from a herd of {}",
                    amount,
                    herd.size
                );
                assert!(self.grid.cell(to).is_free(), "split onto an occupied cell");
                self.grid.cell_mut(from).occupy(mover, herd.size - amount);
                self.grid.cell_mut(to).occupy(mover, amount);
            }
        }

        self.next_turn(mover);
        undo
    }

    /// Restore the match to its state before the matching `apply`
    pub fn undo(&mut self, undo: Undo) {
        match undo.action {
            Action::Place { cell } => {
                assert!(!self.grid.cell(cell).is_free(), "undo of a placement on a free cell");
                self.grid.cell_mut(cell).vacate();
            }
            Action::Split { from, to, amount } => {
                let source = self.grid.cell(from).herd().expect("undo onto a free source");
                assert_eq!(
                    self.grid.cell(to).herd().map(|h| h.size),
                    Some(amount),
                    "undo of a split that is no longer on the board"
                );
                self.grid.cell_mut(from).occupy(source.side, source.size + amount);
                self.grid.cell_mut(to).vacate();
            }
        }

        self.turn -= 1;
        self.side_to_move = undo.side_to_move;
        self.result = undo.result;
    }

    /// Apply a legal action for good. Returns false and changes nothing
    /// when the action is not legal here.
    pub fn play(&mut self, action: Action) -> bool {
        if !self.is_legal(action) {
            return false;
        }
        self.commit(action);
        true
    }

    /// Apply for good; the composition no longer matches the board
    fn commit(&mut self, action: Action) {
        self.clear_selection();
        let _committed = self.apply(action);
    }

    fn next_turn(&mut self, mover: Side) {
        self.turn += 1;
        self.side_to_move = mover.opponent();

        // A blocked opponent passes while the mover can still play
        if !self.is_in_initial_placement()
            && self.is_blocked(mover.opponent())
            && !self.is_blocked(mover)
        {
            self.side_to_move = mover;
        }

        self.result = self.compute_result();
    }

    fn compute_result(&self) -> GameResult {
        if self.is_in_initial_placement()
            || !self.is_blocked(Side::Red)
            || !self.is_blocked(Side::Blue)
        {
            return GameResult::Ongoing;
        }

        let red = (self.occupied_count(Side::Red), self.largest_region(Side::Red));
        let blue = (self.occupied_count(Side::Blue), self.largest_region(Side::Blue));
        match red.cmp(&blue) {
            std::cmp::Ordering::Greater => GameResult::RedWins,
            std::cmp::Ordering::Less => GameResult::BlueWins,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    // ========================================================================
    // MOVE COMPOSITION
    // ========================================================================

    /// Click on a cell, or outside the board with `None`
    pub fn select(&mut self, cell: Option<CellId>) -> SelectOutcome {
        let id = match cell {
            Some(id) if id.0 < self.grid.len() => id,
            _ => {
                self.clear_selection();
                return SelectOutcome::Cleared;
            }
        };

        match self.phase() {
            Phase::Over => SelectOutcome::Ignored,
            Phase::InitialPlacement => {
                if self.is_legal(Action::Place { cell: id }) {
                    self.commit(Action::Place { cell: id });
                    SelectOutcome::Placed(id)
                } else {
                    SelectOutcome::Ignored
                }
            }
            Phase::Normal => {
                if self.grid.cell(id).is_targeted() && self.chosen.is_some() {
                    self.set_target(id);
                    SelectOutcome::Targeted(id)
                } else if self.grid.cell(id).is_occupied_by(self.side_to_move)
                    && self.grid.has_potential_targets(id)
                {
                    self.choose(id);
                    SelectOutcome::Chosen(id)
                } else {
                    SelectOutcome::Ignored
                }
            }
        }
    }

    fn choose(&mut self, id: CellId) {
        self.clear_selection();
        for target in self.grid.potential_targets(id) {
            self.grid.cell_mut(target).set_targeted(true);
        }
        self.chosen = Some(id);
    }

    fn set_target(&mut self, id: CellId) {
        let source = self.chosen.expect("target without a chosen cell");
        if let Some(previous) = self.target.replace(id) {
            self.grid.cell_mut(previous).unstage();
        }
        let herd = self.grid.cell(source).herd_size();
        // One sheep stays behind by default
        self.grid.cell_mut(source).stage(herd - 1);
        self.grid.cell_mut(id).stage(1);
    }

    /// Shift one planned sheep between source and target. Both keep at
    /// least one; returns false when already at the bound.
    pub fn adjust(&mut self, adjust: Adjust) -> bool {
        let (source, target) = match (self.chosen, self.target) {
            (Some(s), Some(t)) => (s, t),
            _ => return false,
        };
        let (giver, taker) = match adjust {
            Adjust::More => (source, target),
            Adjust::Less => (target, source),
        };

        if self.grid.cell(giver).planned_amount() < 2 {
            return false;
        }
        self.grid.cell_mut(giver).subtract_planned();
        self.grid.cell_mut(taker).add_planned();
        true
    }

    /// Commit the staged move. `None` when no move is staged.
    pub fn confirm(&mut self) -> Option<Action> {
        let (from, to) = (self.chosen?, self.target?);
        let remaining = self.grid.cell(from).planned_amount();
        let amount = self.grid.cell(to).planned_amount();
        if remaining == 0 || amount == 0 {
            return None;
        }
        assert_eq!(
            remaining + amount,
            self.grid.cell(from).herd_size(),
            "staged amounts out of step with the herd"
        );

        let action = Action::Split { from, to, amount };
        self.commit(action);
        Some(action)
    }

    /// Drop the move under composition
    pub fn clear_selection(&mut self) {
        self.chosen = None;
        self.target = None;
        for cell in self.grid.cells_mut() {
            cell.set_targeted(false);
            cell.unstage();
        }
    }

    /// Whether a renderer should highlight `id`
    pub fn should_be_focused(&self, id: CellId, is_pointed_at: bool) -> bool {
        let cell = self.grid.cell(id);
        match self.phase() {
            Phase::Over => false,
            Phase::InitialPlacement => {
                is_pointed_at && cell.is_free() && self.grid.is_on_edge(id)
            }
            Phase::Normal => {
                self.chosen == Some(id)
                    || self.target == Some(id)
                    || cell.is_targeted()
                    || (is_pointed_at
                        && cell.is_occupied_by(self.side_to_move)
                        && self.grid.has_potential_targets(id))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
