//! Hex board geometry with axial coordinates

use crate::cell::{Cell, CellId};
use crate::game::Side;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i16,
    pub r: i16,
}

impl Hex {
    pub const fn new(q: i16, r: i16) -> Self {
        Self { q, r }
    }

    /// Convert offset coordinates (odd columns shifted half a cell down)
    pub fn from_offset(col: i16, row: i16) -> Self {
        Self::new(col, row - (col - (col & 1)) / 2)
    }

    /// Back to offset coordinates as (col, row)
    pub fn to_offset(self) -> (i16, i16) {
        (self.q, self.r + (self.q - (self.q & 1)) / 2)
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i16 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }

    /// Hex `steps` cells away in direction (0-5)
    pub fn step(&self, direction: usize, steps: i16) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq * steps, self.r + dr * steps)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i16, i16); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// The fixed set of cells a match is played on.
///
/// Cells are stored row by row (`row * width + col`). Positions never change
/// after construction, so neighbour lists are computed once up front.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    index: FxHashMap<Hex, CellId>,
    neighbours: Vec<Vec<CellId>>,
}

impl Grid {
    /// Build an empty `width` x `height` board.
    pub fn new(width: u16, height: u16) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        let mut index = FxHashMap::default();

        for row in 0..height as i16 {
            for col in 0..width as i16 {
                let hex = Hex::from_offset(col, row);
                index.insert(hex, CellId(cells.len()));
                cells.push(Cell::new(hex));
            }
        }

        let neighbours = cells
            .iter()
            .map(|cell| {
                DIRECTIONS
                    .iter()
                    .enumerate()
                    .filter_map(|(dir, _)| index.get(&cell.hex().step(dir, 1)).copied())
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            cells,
            index,
            neighbours,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Panics on an id that does not belong to this grid.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Iterate cells with their ids, in index order
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| (CellId(i), cell))
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.cells.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn cell_at(&self, hex: Hex) -> Option<CellId> {
        self.index.get(&hex).copied()
    }

    pub fn cell_at_offset(&self, col: i16, row: i16) -> Option<CellId> {
        self.cell_at(Hex::from_offset(col, row))
    }

    // ========================================================================
    // NEIGHBOURHOOD
    // ========================================================================

    pub fn neighbours(&self, id: CellId) -> &[CellId] {
        &self.neighbours[id.0]
    }

    pub fn is_neighbour(&self, a: CellId, b: CellId) -> bool {
        self.cell(a).hex().is_adjacent(self.cell(b).hex())
    }

    /// Edge cells have fewer than six neighbours
    pub fn is_on_edge(&self, id: CellId) -> bool {
        self.neighbours(id).len() < 6
    }

    pub fn edge_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.ids().filter(move |&id| self.is_on_edge(id))
    }

    pub fn free_neighbour_count(&self, id: CellId) -> usize {
        self.neighbours(id)
            .iter()
            .filter(|&&n| self.cell(n).is_free())
            .count()
    }

    /// Occupied neighbours held by the same side as `id`
    pub fn friendly_neighbour_count(&self, id: CellId) -> usize {
        let cell = self.cell(id);
        self.neighbours(id)
            .iter()
            .filter(|&&n| cell.is_friendly(self.cell(n)))
            .count()
    }

    pub fn is_surrounded(&self, id: CellId) -> bool {
        self.free_neighbour_count(id) == 0
    }

    // ========================================================================
    // MOVE RANGE
    // ========================================================================

    /// Farthest free cell in a straight line from `id`.
    ///
    /// Walks outward until the next cell is occupied or off the board and
    /// returns the cell before it. `None` when not even one step is possible.
    pub fn ray_cast(&self, id: CellId, direction: usize) -> Option<CellId> {
        let origin = self.cell(id).hex();
        let mut last_free = None;
        let mut steps = 1;

        while let Some(next) = self.cell_at(origin.step(direction, steps)) {
            if !self.cell(next).is_free() {
                break;
            }
            last_free = Some(next);
            steps += 1;
        }

        last_free
    }

    /// Destinations a herd at `id` may split into, one per open direction.
    pub fn potential_targets(&self, id: CellId) -> Vec<CellId> {
        if self.cell(id).herd_size() < 2 || self.is_surrounded(id) {
            return vec![];
        }

        let mut targets = Vec::with_capacity(6);
        for direction in 0..DIRECTIONS.len() {
            if let Some(target) = self.ray_cast(id, direction) {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    pub fn has_potential_targets(&self, id: CellId) -> bool {
        self.cell(id).herd_size() >= 2 && !self.is_surrounded(id)
    }

    // ========================================================================
    // TERRITORY
    // ========================================================================

    pub fn occupied_by(&self, side: Side) -> impl Iterator<Item = CellId> + '_ {
        self.ids()
            .filter(move |&id| self.cell(id).is_occupied_by(side))
    }

    /// Size of the largest connected group of cells held by `side`
    pub fn largest_region(&self, side: Side) -> usize {
        let mut visited = vec![false; self.cells.len()];
        let mut largest = 0;
        let mut stack = Vec::new();

        for start in self.occupied_by(side) {
            if visited[start.0] {
                continue;
            }
            visited[start.0] = true;
            stack.push(start);
            let mut size = 0;

            while let Some(id) = stack.pop() {
                size += 1;
                for &n in self.neighbours(id) {
                    if !visited[n.0] && self.cell(n).is_occupied_by(side) {
                        visited[n.0] = true;
                        stack.push(n);
                    }
                }
            }

            largest = largest.max(size);
        }

        largest
    }
}
