use crate::render::unit::Color3;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration specific to visually rendering a board. These options have
/// no bearing on the simulation, only on how the board is presented. If you
/// save a game (JSON or binary), these options will **never** affect that
/// output.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RenderConfig {
    /// Should the hex grid lines be drawn?
    pub show_grid: bool,

    /// Stroke width of grid lines, in pixels
    #[validate(range(min = 0.001, max = 100.0))]
    pub line_width: f64,

    /// Color of grid lines
    pub line_color: Color3,

    /// Fill for cells with nothing going on
    pub background_color: Color3,

    /// Fill for active cells. Takes priority over every other fill.
    pub active_color: Color3,

    /// Fill for selected (but inactive) cells
    pub selected_color: Color3,

    /// Overlay fill for the hex under the pointer
    pub hover_color: Color3,

    /// Opacity of the hover overlay
    #[validate(range(min = 0.0, max = 1.0))]
    pub hover_opacity: f64,

    /// Stand-in fill for terrain-painted cells, for outputs that can't embed
    /// the terrain image (e.g. SVG)
    pub terrain_color: Color3,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            line_width: 1.0,
            line_color: Color3::new_int(255, 255, 255),
            background_color: Color3::new_int(40, 44, 52),
            active_color: Color3::new_int(43, 179, 31),
            selected_color: Color3::new_int(32, 166, 178),
            hover_color: Color3::new_int(0, 128, 0),
            hover_opacity: 0.5,
            terrain_color: Color3::new_int(173, 201, 115),
        }
    }
}
