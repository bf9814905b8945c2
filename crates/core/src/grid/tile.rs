use crate::{
    geom::{Line, Point},
    grid::HexTile,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{Display as EnumDisplay, EnumIter};

/// The different ways a fine tile can be crossed by the edges of the hex
/// grid. A tile's kind is a pure function of `(row mod 4, col mod 2)`:
///
/// | row mod 4 | even col      | odd col        |
/// |-----------|---------------|----------------|
/// | 0         | `CrossA`      | `CrossB`       |
/// | 1         | `UniformLeft` | `Plain`        |
/// | 2         | `CrossB`      | `CrossA`       |
/// | 3         | `Plain`       | `UniformRight` |
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, EnumDisplay, Serialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    /// Split by a vertical edge along the tile's left side, in a row where
    /// that edge belongs to an unshifted hex row
    UniformLeft,
    /// Split by a vertical edge along the tile's left side, in a row where
    /// that edge belongs to a shifted hex row
    UniformRight,
    /// Split by the diagonal from the bottom-left corner to the top-right
    /// corner
    CrossA,
    /// Split by the diagonal from the top-left corner to the bottom-right
    /// corner
    CrossB,
    /// Not crossed by any hex edge. The whole tile belongs to one hex.
    Plain,
}

impl TileKind {
    /// Look up the kind for a tile position in the repeating pattern. The
    /// inputs must already be reduced, i.e. `row4` in `[0, 4)`.
    fn classify(row4: i32, odd_col: bool) -> Self {
        match (row4, odd_col) {
            (0, false) | (2, true) => Self::CrossA,
            (0, true) | (2, false) => Self::CrossB,
            (1, false) => Self::UniformLeft,
            (3, true) => Self::UniformRight,
            (1, true) | (3, false) => Self::Plain,
            _ => unreachable!("row4 must be in [0, 4), got {}", row4),
        }
    }
}

/// A single square in the fine grid. See the [module-level docs](crate::grid)
/// for a description of the fine grid.
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[display(fmt = "tile({}, {})", "self.row", "self.col")]
pub struct Tile {
    row: i32,
    col: i32,
}

impl Tile {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Get the tile that contains a position in fine space
    pub fn of_position(position: Point) -> Self {
        Self::new(position.y.floor() as i32, position.x.floor() as i32)
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    /// Position of this tile's row within the repeating 4-row pattern. Always
    /// in `[0, 4)`, even for negative rows.
    fn row4(&self) -> i32 {
        self.row.rem_euclid(4)
    }

    fn odd_col(&self) -> bool {
        self.col.rem_euclid(2) == 1
    }

    /// How the hex grid crosses this tile. Always the same for a given tile.
    pub fn kind(&self) -> TileKind {
        TileKind::classify(self.row4(), self.odd_col())
    }

    pub fn uniform_left(&self) -> bool {
        self.kind() == TileKind::UniformLeft
    }

    pub fn uniform_right(&self) -> bool {
        self.kind() == TileKind::UniformRight
    }

    pub fn cross_a(&self) -> bool {
        self.kind() == TileKind::CrossA
    }

    pub fn cross_b(&self) -> bool {
        self.kind() == TileKind::CrossB
    }

    /// Is this tile in the lower half of the 4-row pattern, i.e. covering an
    /// odd (shifted) hex row?
    pub fn shifted_row(&self) -> bool {
        self.row4() >= 2
    }

    /// Top-left corner of this tile
    pub fn top_left(&self) -> Point {
        Point::new(self.col as f64, self.row as f64)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.col as f64 + 1.0, self.row as f64)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.col as f64, self.row as f64 + 1.0)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.col as f64 + 1.0, self.row as f64 + 1.0)
    }

    /// Find the hexagon that owns the given position. The position should be
    /// inside this tile (i.e. this tile should be
    /// `Tile::of_position(position)`). Returns `None` if the position is off
    /// the top or left edge of the hex grid.
    pub fn calc_hex_tile(&self, position: Point) -> Option<HexTile> {
        let mut row = self.row.div_euclid(2);
        let mut col = self.col.div_euclid(2);
        let row4 = self.row4();

        match self.kind() {
            TileKind::CrossA => {
                let diagonal = Line::new(self.bottom_left(), self.top_right());
                // Above the diagonal is the hex one row up, which is also
                // one column left if we're in an unshifted row
                if diagonal.side(position) == -1 {
                    row -= 1;
                    if row4 == 0 {
                        col -= 1;
                    }
                }
            }
            TileKind::CrossB => {
                let diagonal = Line::new(self.top_left(), self.bottom_right());
                match diagonal.side(position) {
                    -1 => row -= 1,
                    1 if row4 == 2 => col -= 1,
                    _ => {}
                }
            }
            TileKind::UniformLeft | TileKind::UniformRight | TileKind::Plain => {
                // The bottom-left quadrant of a shifted hex row belongs to
                // the hex to the left
                if row4 == 3 && !self.odd_col() {
                    col -= 1;
                }
            }
        }

        HexTile::from_signed(row, col)
    }

    /// Get the hex edge segment that crosses this tile, if any. Uniform
    /// tiles have a vertical edge along their left side, cross tiles have
    /// their diagonal. Plain tiles aren't crossed by any edge.
    pub fn grid_line(&self) -> Option<Line> {
        match self.kind() {
            TileKind::UniformLeft | TileKind::UniformRight => {
                Some(Line::new(self.top_left(), self.bottom_left()))
            }
            TileKind::CrossA => {
                Some(Line::new(self.bottom_left(), self.top_right()))
            }
            TileKind::CrossB => {
                Some(Line::new(self.top_left(), self.bottom_right()))
            }
            TileKind::Plain => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_of_position() {
        assert_eq!(Tile::of_position(Point::new(0.0, 0.0)), Tile::new(0, 0));
        assert_eq!(Tile::of_position(Point::new(3.9, 1.1)), Tile::new(1, 3));
        assert_eq!(
            Tile::of_position(Point::new(-0.5, -1.5)),
            Tile::new(-2, -1)
        );
    }

    /// Positions past the range of `i32` saturate onto the edge tiles
    #[test]
    fn test_far_away_position() {
        let position = Point::new(1e10, 0.5);
        let tile = Tile::of_position(position);
        assert_eq!(tile, Tile::new(0, i32::MAX));
        assert_eq!(
            tile.bottom_right(),
            Point::new(i32::MAX as f64 + 1.0, 1.0)
        );
        tile.calc_hex_tile(position);

        let position = Point::new(1e10, 1e10);
        assert!(Tile::of_position(position).calc_hex_tile(position).is_some());
        let position = Point::new(-1e10, -1e10);
        assert_eq!(Tile::of_position(position).calc_hex_tile(position), None);
    }

    /// Check the full 8-entry classification table
    #[test]
    fn test_kind_table() {
        let expected = [
            ((0, 0), TileKind::CrossA),
            ((0, 1), TileKind::CrossB),
            ((1, 0), TileKind::UniformLeft),
            ((1, 1), TileKind::Plain),
            ((2, 0), TileKind::CrossB),
            ((2, 1), TileKind::CrossA),
            ((3, 0), TileKind::Plain),
            ((3, 1), TileKind::UniformRight),
        ];
        for ((row, col), kind) in expected {
            // The pattern repeats every 4 rows and 2 cols, in both directions
            for (row_shift, col_shift) in [(0, 0), (4, 2), (8, 10), (-4, -2)] {
                let tile = Tile::new(row + row_shift, col + col_shift);
                assert_eq!(tile.kind(), kind, "wrong kind for {}", tile);
            }
        }
    }

    /// Exactly one of the kind flags holds for every tile, or none of them
    /// for plain tiles
    #[test]
    fn test_kind_flags_exclusive() {
        for row in -8..8 {
            for col in -4..4 {
                let tile = Tile::new(row, col);
                let flags = [
                    tile.uniform_left(),
                    tile.uniform_right(),
                    tile.cross_a(),
                    tile.cross_b(),
                ];
                let count = flags.iter().filter(|flag| **flag).count();
                let expected = if tile.kind() == TileKind::Plain { 0 } else { 1 };
                assert_eq!(count, expected, "bad flags for {}", tile);
                assert_eq!(
                    tile.shifted_row(),
                    row.rem_euclid(4) >= 2,
                    "bad shifted_row for {}",
                    tile
                );
            }
        }
        assert_eq!(TileKind::iter().count(), 5);
    }

    #[test]
    fn test_grid_line() {
        assert_eq!(
            Tile::new(1, 0).grid_line(),
            Some(Line::new(Point::new(0.0, 1.0), Point::new(0.0, 2.0)))
        );
        assert_eq!(
            Tile::new(3, 1).grid_line(),
            Some(Line::new(Point::new(1.0, 3.0), Point::new(1.0, 4.0)))
        );
        assert_eq!(
            Tile::new(0, 0).grid_line(),
            Some(Line::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0)))
        );
        assert_eq!(
            Tile::new(0, 1).grid_line(),
            Some(Line::new(Point::new(1.0, 0.0), Point::new(2.0, 1.0)))
        );
        assert_eq!(Tile::new(1, 1).grid_line(), None);
        assert_eq!(Tile::new(3, 0).grid_line(), None);
    }

    #[test]
    fn test_calc_hex_tile_cross_a() {
        // (0, 0) is CrossA in an unshifted row. Above the diagonal is off
        // the grid, below is hex (0, 0)
        let tile = Tile::new(0, 0);
        assert_eq!(tile.calc_hex_tile(Point::new(0.2, 0.2)), None);
        assert_eq!(
            tile.calc_hex_tile(Point::new(0.8, 0.8)),
            Some(HexTile::new(0, 0))
        );

        // (4, 2) is CrossA too, one hex row down and over
        let tile = Tile::new(4, 2);
        assert_eq!(
            tile.calc_hex_tile(Point::new(2.2, 4.2)),
            Some(HexTile::new(1, 0))
        );
        assert_eq!(
            tile.calc_hex_tile(Point::new(2.8, 4.8)),
            Some(HexTile::new(2, 1))
        );

        // (2, 1) is CrossA in a shifted row, column doesn't move
        let tile = Tile::new(2, 1);
        assert_eq!(
            tile.calc_hex_tile(Point::new(1.2, 2.2)),
            Some(HexTile::new(0, 0))
        );
        assert_eq!(
            tile.calc_hex_tile(Point::new(1.8, 2.8)),
            Some(HexTile::new(1, 0))
        );
    }

    #[test]
    fn test_calc_hex_tile_cross_b() {
        // (0, 1): above the diagonal is off the grid
        let tile = Tile::new(0, 1);
        assert_eq!(tile.calc_hex_tile(Point::new(1.8, 0.2)), None);
        assert_eq!(
            tile.calc_hex_tile(Point::new(1.2, 0.8)),
            Some(HexTile::new(0, 0))
        );

        // (2, 2) is CrossB in a shifted row
        let tile = Tile::new(2, 2);
        assert_eq!(
            tile.calc_hex_tile(Point::new(2.8, 2.2)),
            Some(HexTile::new(0, 1))
        );
        assert_eq!(
            tile.calc_hex_tile(Point::new(2.2, 2.8)),
            Some(HexTile::new(1, 0))
        );
    }

    #[test]
    fn test_calc_hex_tile_plain() {
        assert_eq!(
            Tile::new(1, 1).calc_hex_tile(Point::new(1.5, 1.5)),
            Some(HexTile::new(0, 0))
        );
        // Bottom-left quadrant of a shifted row goes to the left
        assert_eq!(
            Tile::new(3, 2).calc_hex_tile(Point::new(2.5, 3.5)),
            Some(HexTile::new(1, 0))
        );
        // ...which is off the grid for the first column
        assert_eq!(Tile::new(3, 0).calc_hex_tile(Point::new(0.5, 3.5)), None);
        assert_eq!(
            Tile::new(3, 1).calc_hex_tile(Point::new(1.5, 3.5)),
            Some(HexTile::new(1, 0))
        );
    }
}
