//! A single pasture on the board

use crate::board::Hex;
use crate::game::Side;
use serde::{Deserialize, Serialize};

/// Index of a cell within its grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub usize);

/// A herd standing on a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herd {
    pub side: Side,
    pub size: u32,
}

/// Amount staged on a cell while a move is being composed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Staged {
    #[default]
    Unstaged,
    Planned(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    hex: Hex,
    herd: Option<Herd>,
    staged: Staged,
    targeted: bool,
}

impl Cell {
    pub fn new(hex: Hex) -> Self {
        Self {
            hex,
            herd: None,
            staged: Staged::Unstaged,
            targeted: false,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn hex(&self) -> Hex {
        self.hex
    }

    pub fn herd(&self) -> Option<Herd> {
        self.herd
    }

    pub fn occupier(&self) -> Option<Side> {
        self.herd.map(|h| h.side)
    }

    /// Herd size, zero when free
    pub fn herd_size(&self) -> u32 {
        self.herd.map_or(0, |h| h.size)
    }

    pub fn staged(&self) -> Staged {
        self.staged
    }

    /// Planned amount, zero when nothing is staged
    pub fn planned_amount(&self) -> u32 {
        match self.staged {
            Staged::Planned(n) => n,
            Staged::Unstaged => 0,
        }
    }

    pub fn is_targeted(&self) -> bool {
        self.targeted
    }

    pub fn is_free(&self) -> bool {
        self.herd.is_none()
    }

    pub fn is_occupied_by(&self, side: Side) -> bool {
        self.occupier() == Some(side)
    }

    /// Both cells are held by the same side
    pub fn is_friendly(&self, other: &Cell) -> bool {
        matches!((self.occupier(), other.occupier()), (Some(a), Some(b)) if a == b)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    pub fn occupy(&mut self, side: Side, size: u32) {
        assert!(size >= 1, "a herd holds at least one sheep");
        self.herd = Some(Herd { side, size });
    }

    /// Remove the herd, keeping any staging marks
    pub(crate) fn vacate(&mut self) {
        self.herd = None;
    }

    pub(crate) fn set_targeted(&mut self, targeted: bool) {
        self.targeted = targeted;
    }

    pub(crate) fn stage(&mut self, amount: u32) {
        self.staged = Staged::Planned(amount);
    }

    pub(crate) fn unstage(&mut self) {
        self.staged = Staged::Unstaged;
    }

    pub(crate) fn add_planned(&mut self) {
        self.staged = Staged::Planned(self.planned_amount() + 1);
    }

    pub(crate) fn subtract_planned(&mut self) {
        let amount = self.planned_amount();
        assert!(amount > 0, "nothing staged to subtract from");
        self.staged = Staged::Planned(amount - 1);
    }
}
