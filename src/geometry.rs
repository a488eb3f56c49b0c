//! Block geometry - outer extents and their road-inset content area

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when `other` lies entirely inside `self` (edges may touch)
    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the open interiors of the two rectangles intersect
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A city block: outer extent, recursion level and the road inset around it.
///
/// Roads run along the outer edges, so half of the road width eats into the
/// block on every side. What remains is the inner rectangle buildings go in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub bounds: Bounds,
    pub level: u32,
    pub road_width: f64,
}

impl Block {
    pub fn new(x: f64, y: f64, width: f64, height: f64, level: u32, road_width: f64) -> Self {
        Self {
            bounds: Bounds::new(x, y, width, height),
            level,
            road_width,
        }
    }

    pub fn x(&self) -> f64 {
        self.bounds.x
    }

    pub fn y(&self) -> f64 {
        self.bounds.y
    }

    pub fn width(&self) -> f64 {
        self.bounds.width
    }

    pub fn height(&self) -> f64 {
        self.bounds.height
    }

    pub fn inset(&self) -> f64 {
        self.road_width / 2.0
    }

    pub fn top_left(&self) -> (f64, f64) {
        (self.bounds.x + self.inset(), self.bounds.y + self.inset())
    }

    pub fn top_right(&self) -> (f64, f64) {
        (self.top_left().0 + self.inner_width(), self.top_left().1)
    }

    pub fn bottom_right(&self) -> (f64, f64) {
        let (left, top) = self.top_left();
        (left + self.inner_width(), top + self.inner_height())
    }

    pub fn bottom_left(&self) -> (f64, f64) {
        (self.top_left().0, self.top_left().1 + self.inner_height())
    }

    /// Clamped to zero for blocks thinner than a road
    pub fn inner_width(&self) -> f64 {
        (self.bounds.width - self.road_width).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.bounds.height - self.road_width).max(0.0)
    }

    pub fn inner(&self) -> Bounds {
        let (x, y) = self.top_left();
        Bounds::new(x, y, self.inner_width(), self.inner_height())
    }

    /// Outer corner points, clockwise from the top-left
    pub fn outer_corners(&self) -> [(f64, f64); 4] {
        let b = &self.bounds;
        [
            (b.x, b.y),
            (b.right(), b.y),
            (b.right(), b.bottom()),
            (b.x, b.bottom()),
        ]
    }
}
