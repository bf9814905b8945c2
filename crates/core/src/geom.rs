//! Basic 2D geometry used throughout the board. Every type here is an
//! immutable value; all transformations return a new value.
//!
//! Values can live in one of two spaces:
//!
//! - **Fine space**, where one unit is one fine tile (see [crate::grid])
//! - **Screen space**, where one unit is one pixel. See
//!   [Viewport](crate::Viewport) for the transform between the two.

use derive_more::{Add, AddAssign, Display, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// A 2D point (or vector, depending on context).
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale each axis independently
    pub fn scale(self, x_scale: f64, y_scale: f64) -> Self {
        Self::new(self.x * x_scale, self.y * y_scale)
    }

    /// Undo a [Self::scale] with the same factors
    pub fn inverse_scale(self, x_scale: f64, y_scale: f64) -> Self {
        self.scale(1.0 / x_scale, 1.0 / y_scale)
    }

    /// Scale both axes by the same factor
    pub fn zoom(self, zoom_factor: f64) -> Self {
        self.scale(zoom_factor, zoom_factor)
    }

    /// Undo a [Self::zoom] with the same factor
    pub fn inverse_zoom(self, zoom_factor: f64) -> Self {
        self.scale(1.0 / zoom_factor, 1.0 / zoom_factor)
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

/// A line segment between two points.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "{} -> {}", "self.p1", "self.p2")]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Which side of this line the point falls on, looking from `p1` towards
    /// `p2`. This is the sign of the cross product between the direction
    /// vector and the vector from `p1` to the point:
    ///
    /// - `-1` if the point is on the left-hand side when walking from `p1` to
    ///   `p2` on screen (y grows downward)
    /// - `0` if the point is exactly on the (infinite) line
    /// - `1` for the other side
    pub fn side(&self, point: Point) -> i8 {
        let cross = (self.p2 - self.p1).cross(point - self.p1);
        if cross > 0.0 {
            1
        } else if cross < 0.0 {
            -1
        } else {
            0
        }
    }

    pub fn scale(self, x_scale: f64, y_scale: f64) -> Self {
        Self::new(
            self.p1.scale(x_scale, y_scale),
            self.p2.scale(x_scale, y_scale),
        )
    }

    pub fn zoom(self, zoom_factor: f64) -> Self {
        self.scale(zoom_factor, zoom_factor)
    }

    pub fn translate(self, translation: Point) -> Self {
        Self::new(self.p1 + translation, self.p2 + translation)
    }
}

/// An axis-aligned rectangle, defined by its upper-left and lower-right
/// corners. In both fine and screen space, y grows downward.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "[{}, {}]", "self.upper_left", "self.lower_right")]
pub struct Rect {
    pub upper_left: Point,
    pub lower_right: Point,
}

impl Rect {
    pub const fn new(upper_left: Point, lower_right: Point) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    pub fn width(&self) -> f64 {
        self.lower_right.x - self.upper_left.x
    }

    pub fn height(&self) -> f64 {
        self.lower_right.y - self.upper_left.y
    }

    /// Is the point inside this rect? Edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        (self.upper_left.x..=self.lower_right.x).contains(&point.x)
            && (self.upper_left.y..=self.lower_right.y).contains(&point.y)
    }

    /// Do the two rects overlap? Rects that only share an edge don't count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.upper_left.x < other.lower_right.x
            && other.upper_left.x < self.lower_right.x
            && self.upper_left.y < other.lower_right.y
            && other.upper_left.y < self.lower_right.y
    }

    pub fn scale(self, x_scale: f64, y_scale: f64) -> Self {
        Self::new(
            self.upper_left.scale(x_scale, y_scale),
            self.lower_right.scale(x_scale, y_scale),
        )
    }

    pub fn translate(self, translation: Point) -> Self {
        Self::new(self.upper_left + translation, self.lower_right + translation)
    }
}

/// A convex hexagon, stored as its 6 vertices in a consistent winding order.
/// See [HexTile::polygon](crate::HexTile::polygon) for the order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexPolygon {
    points: [Point; 6],
}

impl HexPolygon {
    pub const fn new(points: [Point; 6]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point; 6] {
        &self.points
    }

    /// Each edge of the polygon, in winding order. The last edge closes the
    /// loop back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
            .map(|(p1, p2)| Line::new(*p1, *p2))
    }

    /// Average of all the vertices. For our hexagons this is also the center
    /// of the bounding rect.
    pub fn centroid(&self) -> Point {
        let sum = self
            .points
            .iter()
            .fold(Point::ORIGIN, |acc, point| acc + *point);
        sum.inverse_zoom(self.points.len() as f64)
    }

    /// Is the point strictly inside the polygon? Points on an edge are
    /// considered outside. Relies on the polygon being convex.
    pub fn contains(&self, point: Point) -> bool {
        let mut sides = self.edges().map(|edge| edge.side(point));
        match sides.next() {
            Some(first) if first != 0 => sides.all(|side| side == first),
            _ => false,
        }
    }

    pub fn scale(self, x_scale: f64, y_scale: f64) -> Self {
        Self::new(self.points.map(|p| p.scale(x_scale, y_scale)))
    }

    pub fn zoom(self, zoom_factor: f64) -> Self {
        self.scale(zoom_factor, zoom_factor)
    }

    pub fn translate(self, translation: Point) -> Self {
        Self::new(self.points.map(|p| p + translation))
    }
}
