use crate::{
    geom::{HexPolygon, Point, Rect},
    grid::Tile,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The address of a single hexagon on the board. Both components are
/// unsigned, so every `HexTile` refers to a valid spot on the hex grid (it
/// may still be outside the bounds of a particular board though).
///
/// See the [module-level docs](crate::grid) for a description of the layout.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "hex({}, {})", "self.row", "self.col")]
pub struct HexTile {
    row: u32,
    col: u32,
}

impl HexTile {
    /// Width of a hexagon's bounding rect, in fine units
    pub const WIDTH: f64 = 2.0;
    /// Height of a hexagon's bounding rect, in fine units
    pub const HEIGHT: f64 = 3.0;

    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Create a hex address from signed components. Returns `None` if either
    /// one is negative, since there's nothing on the grid up there.
    pub fn from_signed(row: i32, col: i32) -> Option<Self> {
        let row = u32::try_from(row).ok()?;
        let col = u32::try_from(col).ok()?;
        Some(Self::new(row, col))
    }

    /// Find the hexagon under a position in fine space, if any
    pub fn of_position(position: Point) -> Option<Self> {
        Tile::of_position(position).calc_hex_tile(position)
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    /// Is this hex in an odd row? Odd rows are shifted right by one fine
    /// unit.
    pub fn is_shifted(&self) -> bool {
        self.row % 2 == 1
    }

    /// The rectangle that encloses this hexagon, in fine space
    pub fn bounding_rect(&self) -> Rect {
        let shift_x = if self.is_shifted() { 1.0 } else { 0.0 };
        let left = self.col as f64 * Self::WIDTH + shift_x;
        let top = self.row as f64 * 2.0;
        Rect::new(
            Point::new(left, top),
            Point::new(left + Self::WIDTH, top + Self::HEIGHT),
        )
    }

    /// The hexagon's 6 vertices in fine space. Clockwise on screen, starting
    /// from the upper end of the left side.
    pub fn polygon(&self) -> HexPolygon {
        let upper_left = self.bounding_rect().upper_left;
        HexPolygon::new(
            [
                (0.0, 1.0),
                (1.0, 0.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 3.0),
                (0.0, 2.0),
            ]
            .map(|offset| upper_left + Point::from(offset)),
        )
    }

    /// Center of this hexagon, in fine space
    pub fn center(&self) -> Point {
        let rect = self.bounding_rect();
        rect.upper_left + Point::new(rect.width() / 2.0, rect.height() / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signed() {
        assert_eq!(HexTile::from_signed(0, 0), Some(HexTile::new(0, 0)));
        assert_eq!(HexTile::from_signed(3, 7), Some(HexTile::new(3, 7)));
        assert_eq!(HexTile::from_signed(-1, 0), None);
        assert_eq!(HexTile::from_signed(0, -1), None);
    }

    #[test]
    fn test_bounding_rect() {
        assert_eq!(
            HexTile::new(0, 0).bounding_rect(),
            Rect::new(Point::new(0.0, 0.0), Point::new(2.0, 3.0))
        );
        // Odd rows shift right by one
        assert_eq!(
            HexTile::new(1, 0).bounding_rect(),
            Rect::new(Point::new(1.0, 2.0), Point::new(3.0, 5.0))
        );
        assert_eq!(
            HexTile::new(2, 3).bounding_rect(),
            Rect::new(Point::new(6.0, 4.0), Point::new(8.0, 7.0))
        );
    }

    #[test]
    fn test_polygon() {
        let polygon = HexTile::new(1, 2).polygon();
        assert_eq!(
            polygon.points(),
            &[
                Point::new(5.0, 3.0),
                Point::new(6.0, 2.0),
                Point::new(7.0, 3.0),
                Point::new(7.0, 4.0),
                Point::new(6.0, 5.0),
                Point::new(5.0, 4.0),
            ]
        );
        assert_eq!(polygon.centroid(), HexTile::new(1, 2).center());
    }

    /// Any position strictly inside a hexagon should resolve back to that
    /// hexagon
    #[test]
    fn test_position_round_trip() {
        for row in 0..8 {
            for col in 0..8 {
                let hex = HexTile::new(row, col);
                let polygon = hex.polygon();
                let center = hex.center();

                // Sample the center, plus points pulled slightly in from each
                // vertex and each edge midpoint
                let mut samples = vec![center];
                for edge in polygon.edges() {
                    let midpoint = (edge.p1 + edge.p2).zoom(0.5);
                    for target in [edge.p1, midpoint] {
                        samples.push(center + (target - center).zoom(0.9));
                    }
                }

                for position in samples {
                    assert!(polygon.contains(position));
                    assert_eq!(
                        HexTile::of_position(position),
                        Some(hex),
                        "{} resolved incorrectly",
                        position
                    );
                }
            }
        }
    }
}
