//! Hexboard is the engine behind a hex map editor. It maps continuous screen
//! positions onto a hexagon grid, holds the state of every cell on a board,
//! and runs a life-like simulation over those cells. Presentation layers
//! (canvas, DOM, etc.) are implemented elsewhere; this crate only produces
//! shapes for them to draw.
//!
//! ```
//! use hexboard::{GameConfig, GameModel, Point, Viewport};
//! use std::time::Duration;
//!
//! let mut game = GameModel::new(GameConfig::default()).unwrap();
//! let viewport = Viewport::default();
//!
//! // The user clicks somewhere on the canvas
//! let hex = viewport.hover(Point::new(130.0, 85.0));
//! game.click(hex);
//!
//! // The host's timer drives the simulation
//! game.start();
//! game.advance(Duration::from_millis(1000));
//! assert_eq!(game.turn(), 2);
//! ```
//!
//! See [GameConfig] for details on how a board can be customized.

mod board;
mod clock;
mod config;
mod connection;
mod game;
mod geom;
pub mod grid;
mod notify;
pub mod persist;
pub mod render;
mod tile_type;
mod util;
mod viewport;

pub use crate::{
    board::{
        BoardChange, BoardModel, CellChange, CellDirection, CellModel,
        CellPaint, CellPos, CellRef,
    },
    clock::{Clock, ClockState},
    config::GameConfig,
    connection::{ConnectionStatus, ReconnectAction, Reconnector},
    game::{next_state, GameChange, GameModel, TileTypeSelection},
    geom::{HexPolygon, Line, Point, Rect},
    grid::{HexTile, Tile, TileKind},
    notify::{SubscriptionId, Subscribers},
    persist::{BoardState, CellKey, CellRecord, LoadReport, SavedGame},
    render::{
        config::RenderConfig, unit::Color3, BoardRenderer, CellFill, CellShape,
        RenderFrame,
    },
    tile_type::{TileImageKey, TileType, TileTypeId, TileTypeRegistry},
    viewport::{DragState, Viewport},
};
