use crate::{
    geom::{HexPolygon, Line, Point, Rect},
    grid::HexTile,
};
use serde::{Deserialize, Serialize};

/// An in-progress pan gesture
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragState {
    /// Screen position where the drag started
    pub start: Point,
    /// Viewport offset when the drag started
    pub start_offset: Point,
}

/// The transform between fine space and screen space, plus the state needed
/// to handle pointer input (pan and zoom).
///
/// A point in fine space is mapped to the screen by scaling it by the tile
/// size, then by the zoom factor, then translating by the offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width of one fine tile in pixels, before zoom
    pub tile_width: f64,
    /// Height of one fine tile in pixels, before zoom
    pub tile_height: f64,
    /// Uniform zoom factor, applied after the tile scale
    pub zoom: f64,
    /// Screen position of the fine-space origin
    pub offset: Point,
    #[serde(skip)]
    drag: Option<DragState>,
}

impl Viewport {
    /// Zoom factor applied for one wheel step away from the screen
    pub const ZOOM_OUT_FACTOR: f64 = 0.9;
    /// Zoom factor applied for one wheel step towards the screen
    pub const ZOOM_IN_FACTOR: f64 = 1.1;
    /// Wheel zoom never goes past these bounds
    pub const MIN_ZOOM: f64 = 0.05;
    pub const MAX_ZOOM: f64 = 50.0;

    /// Convert a screen position to fine space
    pub fn screen_to_world(&self, point: Point) -> Point {
        (point - self.offset)
            .inverse_zoom(self.zoom)
            .inverse_scale(self.tile_width, self.tile_height)
    }

    /// Convert a fine space position to the screen
    pub fn world_to_screen(&self, point: Point) -> Point {
        point
            .scale(self.tile_width, self.tile_height)
            .zoom(self.zoom)
            + self.offset
    }

    pub fn line_to_screen(&self, line: Line) -> Line {
        line.scale(self.tile_width, self.tile_height)
            .zoom(self.zoom)
            .translate(self.offset)
    }

    pub fn polygon_to_screen(&self, polygon: HexPolygon) -> HexPolygon {
        polygon
            .scale(self.tile_width, self.tile_height)
            .zoom(self.zoom)
            .translate(self.offset)
    }

    /// The hexagon under a screen position, if any. Note that this can
    /// return hexes that are off the board, so the result still needs to be
    /// checked against the board bounds.
    pub fn hover(&self, point: Point) -> Option<HexTile> {
        HexTile::of_position(self.screen_to_world(point))
    }

    /// The area of fine space that's visible on a screen of the given size
    pub fn visible_rect(&self, screen_size: Point) -> Rect {
        Rect::new(
            self.screen_to_world(Point::ORIGIN),
            self.screen_to_world(screen_size),
        )
    }

    /// Handle one wheel event. Scrolling down (positive delta) zooms out,
    /// anything else zooms in. The fine position under `anchor` stays put.
    /// Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_at(&mut self, anchor: Point, wheel_delta_y: f64) {
        let factor = if wheel_delta_y > 0.0 {
            Self::ZOOM_OUT_FACTOR
        } else {
            Self::ZOOM_IN_FACTOR
        };
        let anchor_world = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        // Shift the view so the anchored position lands back under the
        // pointer
        let moved = self.world_to_screen(anchor_world);
        self.offset -= moved - anchor;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Start a pan gesture at the given screen position
    pub fn begin_drag(&mut self, point: Point) {
        self.drag = Some(DragState {
            start: point,
            start_offset: self.offset,
        });
    }

    /// Move an in-progress pan gesture. Returns `false` (and does nothing)
    /// if there is no drag in progress.
    pub fn drag_to(&mut self, point: Point) -> bool {
        match self.drag {
            Some(drag) => {
                self.offset = drag.start_offset + (point - drag.start);
                true
            }
            None => false,
        }
    }

    /// End a pan gesture, e.g. when the pointer is released or leaves the
    /// surface. The offset stays wherever the drag left it.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            tile_width: 20.0,
            tile_height: 10.0,
            zoom: 2.0,
            offset: Point::ORIGIN,
            drag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_approx_eq!(actual.x, expected.x, 1e-9);
        assert_approx_eq!(actual.y, expected.y, 1e-9);
    }

    #[test]
    fn test_transforms() {
        let viewport = Viewport {
            offset: Point::new(10.0, -4.0),
            ..Default::default()
        };
        // One fine unit is 40x20 pixels at the default zoom
        assert_point_eq(
            viewport.world_to_screen(Point::new(1.0, 1.0)),
            Point::new(50.0, 16.0),
        );
        let world = Point::new(3.25, 7.5);
        assert_point_eq(
            viewport.screen_to_world(viewport.world_to_screen(world)),
            world,
        );
    }

    #[test]
    fn test_hover() {
        let viewport = Viewport::default();
        let center = HexTile::new(2, 3).center();
        assert_eq!(
            viewport.hover(viewport.world_to_screen(center)),
            Some(HexTile::new(2, 3))
        );
        // Up and left of the origin there's nothing
        assert_eq!(viewport.hover(Point::new(-50.0, -50.0)), None);
    }

    #[test]
    fn test_zoom_anchored() {
        let mut viewport = Viewport {
            offset: Point::new(30.0, 15.0),
            ..Default::default()
        };
        let anchor = Point::new(123.0, 77.0);
        let before = viewport.screen_to_world(anchor);

        viewport.zoom_at(anchor, 1.0);
        assert_approx_eq!(viewport.zoom, 1.8);
        assert_point_eq(viewport.screen_to_world(anchor), before);

        viewport.zoom_at(anchor, -1.0);
        viewport.zoom_at(anchor, 0.0);
        assert_approx_eq!(viewport.zoom, 1.8 * 1.1 * 1.1);
        assert_point_eq(viewport.screen_to_world(anchor), before);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut viewport = Viewport::default();
        let anchor = Point::new(400.0, 300.0);
        let before = viewport.screen_to_world(anchor);
        for _ in 0..250 {
            viewport.zoom_at(anchor, 1.0);
        }
        assert_approx_eq!(viewport.zoom, Viewport::MIN_ZOOM);
        assert_point_eq(viewport.screen_to_world(anchor), before);
        // Resolving a pointer position way out here must not blow up
        viewport.hover(Point::new(1000.0, 10.0));

        for _ in 0..250 {
            viewport.zoom_at(anchor, -1.0);
        }
        assert_approx_eq!(viewport.zoom, Viewport::MAX_ZOOM);
        assert_point_eq(viewport.screen_to_world(anchor), before);
    }

    #[test]
    fn test_hover_far_away() {
        let mut viewport = Viewport::default();
        viewport.offset = Point::new(-1e12, -1e12);
        assert!(viewport.hover(Point::new(10.0, 10.0)).is_some());
        viewport.offset = Point::new(1e12, 1e12);
        assert_eq!(viewport.hover(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_drag() {
        let mut viewport = Viewport::default();
        assert!(!viewport.drag_to(Point::new(5.0, 5.0)));
        assert_eq!(viewport.offset, Point::ORIGIN);

        viewport.begin_drag(Point::new(100.0, 100.0));
        assert!(viewport.drag_to(Point::new(110.0, 95.0)));
        assert_eq!(viewport.offset, Point::new(10.0, -5.0));
        // Offsets are relative to the drag start, not the last move
        assert!(viewport.drag_to(Point::new(120.0, 100.0)));
        assert_eq!(viewport.offset, Point::new(20.0, 0.0));

        viewport.end_drag();
        assert!(!viewport.is_dragging());
        assert!(!viewport.drag_to(Point::new(0.0, 0.0)));
        assert_eq!(viewport.offset, Point::new(20.0, 0.0));
    }
}
