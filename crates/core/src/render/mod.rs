pub mod config;
#[cfg(feature = "svg")]
pub mod svg;
pub mod unit;

use crate::{
    board::{CellPaint, CellRef},
    game::GameModel,
    geom::{HexPolygon, Line, Point},
    grid::{HexTile, Tile},
    render::config::RenderConfig,
    tile_type::TileTypeId,
    viewport::Viewport,
};
use std::ops::Range;
use validator::Validate;

/// How a single cell should be filled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellFill {
    /// A flat CSS color
    Solid(String),
    /// The image for a tile type. Look it up in the game's
    /// [TileTypeRegistry](crate::TileTypeRegistry).
    Terrain(TileTypeId),
}

/// One hex cell, ready to be drawn
#[derive(Clone, Debug, PartialEq)]
pub struct CellShape {
    pub hex: HexTile,
    /// Outline in screen space
    pub polygon: HexPolygon,
    pub fill: CellFill,
}

/// Everything needed to draw one frame of a board, in screen space. This is
/// independent of any particular drawing surface, so a frame can be handed
/// to a canvas, turned into an SVG, etc.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    pub screen_size: Point,
    /// Background color, as a CSS color
    pub background: String,
    /// Visible cells, in row-major order
    pub cells: Vec<CellShape>,
    /// Visible grid edges. Empty if the grid is disabled.
    pub grid_lines: Vec<Line>,
    /// Outline of the hex under the pointer, if any
    pub hover: Option<HexPolygon>,
}

/// A board renderer converts the state of a game into drawable shapes. A
/// renderer is created using a particular [RenderConfig], and from there
/// can be used to render any number of frames.
///
/// Config options cannot be changed after creating a renderer, but renderers
/// are very cheap to create so if you need to change the config, just create
/// a new renderer.
///
/// ## Supported Formats
/// - [RenderFrame] (plain shapes, for any drawing surface)
/// - SVG (with the `svg` feature)
#[derive(Clone, Debug)]
pub struct BoardRenderer {
    render_config: RenderConfig,
}

impl BoardRenderer {
    /// Initialize a new renderer with the given options. Returns an error if
    /// the render config is invalid.
    pub fn new(render_config: RenderConfig) -> anyhow::Result<Self> {
        render_config.validate()?;
        Ok(Self { render_config })
    }

    /// Get a reference to the config that this renderer uses
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Compute how a cell should be filled. Active beats selected, which
    /// beats whatever the cell was painted with.
    pub fn cell_fill(&self, cell: CellRef<'_>) -> CellFill {
        let config = &self.render_config;
        if cell.is_active() {
            CellFill::Solid(config.active_color.to_html())
        } else if cell.is_selected() {
            CellFill::Solid(config.selected_color.to_html())
        } else {
            match cell.paint() {
                Some(CellPaint::Terrain(id)) => CellFill::Terrain(*id),
                Some(CellPaint::Color(color)) => CellFill::Solid(color.clone()),
                None => CellFill::Solid(config.background_color.to_html()),
            }
        }
    }

    /// Build one frame. Only cells and grid edges that overlap the screen
    /// are included. The hover hex is drawn even if it's off the board.
    pub fn frame(
        &self,
        game: &GameModel,
        viewport: &Viewport,
        screen_size: Point,
        hover: Option<HexTile>,
    ) -> RenderFrame {
        let board = game.board();
        let visible = viewport.visible_rect(screen_size);

        let cells = board
            .cells()
            .filter(|cell| cell.hex().bounding_rect().intersects(&visible))
            .map(|cell| CellShape {
                hex: cell.hex(),
                polygon: viewport.polygon_to_screen(cell.hex().polygon()),
                fill: self.cell_fill(cell),
            })
            .collect();

        let grid_lines = if self.render_config.show_grid {
            // The fine grid has one extra row, for the bottom points of the
            // last hex row
            let rows = clamp_range(
                visible.upper_left.y,
                visible.lower_right.y,
                board.rows() * 2 + 1,
            );
            let cols = clamp_range(
                visible.upper_left.x,
                visible.lower_right.x,
                board.cols() * 2,
            );
            rows.flat_map(|row| {
                cols.clone().map(move |col| Tile::new(row, col))
            })
            .filter_map(|tile| tile.grid_line())
            .map(|line| viewport.line_to_screen(line))
            .collect()
        } else {
            Vec::new()
        };

        RenderFrame {
            screen_size,
            background: self.render_config.background_color.to_html(),
            cells,
            grid_lines,
            hover: hover.map(|hex| viewport.polygon_to_screen(hex.polygon())),
        }
    }

    /// Render one frame as an SVG document. Returns the SVG in a string.
    #[cfg(feature = "svg")]
    pub fn render_as_svg(
        &self,
        game: &GameModel,
        viewport: &Viewport,
        screen_size: Point,
    ) -> String {
        let frame = self.frame(game, viewport, screen_size, None);
        svg::frame_to_svg(&frame, self).to_string()
    }
}

/// Range of fine tile indexes that overlap `[low, high]`, clamped to
/// `[0, max)`
fn clamp_range(low: f64, high: f64, max: usize) -> Range<i32> {
    let max = i32::try_from(max).unwrap_or(i32::MAX);
    let start = (low.floor() as i32).clamp(0, max);
    let end = (high.floor() as i32).saturating_add(1).clamp(start, max);
    start..end
}
