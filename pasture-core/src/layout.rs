//! Screen geometry of flat-topped hexagons

use crate::board::{Grid, Hex};
use crate::cell::CellId;

const SQRT_3: f32 = 1.732_050_8;

/// Pixel layout of a board: hexagon circumradius and the centre of cell (0, 0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub radius: f32,
    pub origin: (f32, f32),
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(50.0, (75.0, 93.3))
    }
}

impl Layout {
    pub fn new(radius: f32, origin: (f32, f32)) -> Self {
        Self { radius, origin }
    }

    /// Distance from the centre to the middle of a side
    pub fn minimal_radius(&self) -> f32 {
        self.radius * SQRT_3 / 2.0
    }

    pub fn centre(&self, hex: Hex) -> (f32, f32) {
        let q = hex.q as f32;
        let r = hex.r as f32;
        (
            self.origin.0 + self.radius * 1.5 * q,
            self.origin.1 + self.radius * SQRT_3 * (r + q / 2.0),
        )
    }

    /// Corners, clockwise from the right-hand one
    pub fn vertices(&self, hex: Hex) -> [(f32, f32); 6] {
        let (x, y) = self.centre(hex);
        let mut corners = [(0.0, 0.0); 6];
        for (i, corner) in corners.iter_mut().enumerate() {
            let angle = (60.0 * i as f32).to_radians();
            *corner = (x + self.radius * angle.cos(), y + self.radius * angle.sin());
        }
        corners
    }

    /// Whether `point` lies within the inscribed circle of the cell
    pub fn contains(&self, hex: Hex, point: (f32, f32)) -> bool {
        let (x, y) = self.centre(hex);
        let (dx, dy) = (point.0 - x, point.1 - y);
        (dx * dx + dy * dy).sqrt() < self.minimal_radius()
    }

    /// Cell under a pointer, if any
    pub fn cell_at_point(&self, grid: &Grid, point: (f32, f32)) -> Option<CellId> {
        grid.cells()
            .find(|(_, cell)| self.contains(cell.hex(), point))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_neighbour_centres_are_two_minimal_radii_apart() {
        let layout = Layout::default();
        let grid = Grid::new(5, 5);
        for (id, cell) in grid.cells() {
            for &n in grid.neighbours(id) {
                let d = distance(layout.centre(cell.hex()), layout.centre(grid.cell(n).hex()));
                assert!((d - 2.0 * layout.minimal_radius()).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_odd_columns_are_lower() {
        let layout = Layout::default();
        let even = layout.centre(Hex::from_offset(0, 0));
        let odd = layout.centre(Hex::from_offset(1, 0));
        assert!((odd.1 - even.1 - layout.minimal_radius()).abs() < 1e-3);
    }

    #[test]
    fn test_hit_test() {
        let layout = Layout::default();
        let grid = Grid::new(4, 4);
        let id = grid.cell_at_offset(2, 3).unwrap();
        let centre = layout.centre(grid.cell(id).hex());
        assert_eq!(layout.cell_at_point(&grid, centre), Some(id));
        assert_eq!(layout.cell_at_point(&grid, (-500.0, -500.0)), None);
    }

    #[test]
    fn test_vertices_on_circumcircle() {
        let layout = Layout::default();
        let hex = Hex::new(2, -1);
        let centre = layout.centre(hex);
        for v in layout.vertices(hex) {
            assert!((distance(v, centre) - layout.radius).abs() < 1e-3);
        }
    }
}
