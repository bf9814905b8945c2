//! This module holds the coordinate systems that map a continuous position
//! on the board to a discrete hex cell.
//!
//! ## Coordinate Systems
//!
//! ### Fine Coordinates
//!
//! The board is laid over a plain square grid at double resolution. Each
//! square in that grid is a [Tile], and one unit of fine space is the width
//! (or height) of one tile. Converting a position into a tile is just a floor
//! on each axis, see [Tile::of_position].
//!
//! ### Hex Coordinates
//!
//! Each hexagon ([HexTile]) is addressed by a `(row, col)` pair. A hexagon is
//! 2 fine units wide and 3 fine units tall, and consecutive hex rows are 2
//! fine units apart, so vertically adjacent rows interlock by one unit. Odd
//! hex rows are shifted right by one fine unit:
//!
//! ```text
//!    col: 0 1 2 3 4 5
//! row 0    /\  /\  /\
//! row 1   |  ||  ||  |
//! row 2   /\/\/\/\/\/\
//! row 3  |  ||  ||  |
//! ```
//!
//! ### Resolving a Position
//!
//! Since hex edges are diagonal, a fine tile can be split between two
//! hexagons. Every tile falls into one of five [TileKind]s based on its
//! position in the repeating 4-row by 2-column pattern of the grid. For
//! diagonal kinds, we figure out which side of the diagonal the position
//! falls on to decide which hexagon owns it. See [Tile::calc_hex_tile].

mod hex;
mod tile;

pub use hex::HexTile;
pub use tile::{Tile, TileKind};
