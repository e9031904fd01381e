//! Screen geometry consumed by the zone classifier.
//!
//! The engine never measures anything itself: an embedder reports rendered
//! bounding boxes through `GeometryProvider`, and tests hand in synthetic
//! rectangles via `StaticGeometry`.

use fb_core::id::ComponentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pointer position in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero or negative extent on either axis (or NaN).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.width && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Nearest point on (or inside) the rect.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(self.x).min(self.x + self.width.max(0.0)),
            p.y.max(self.y).min(self.y + self.height.max(0.0)),
        )
    }
}

/// Source of rendered bounding boxes, keyed by component id.
pub trait GeometryProvider {
    /// Rendered box of `id`, or `None` if it is not on screen.
    /// `ComponentId::root()` names the canvas itself.
    fn rect_of(&self, id: ComponentId) -> Option<Rect>;
}

/// Map-backed geometry for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    rects: HashMap<ComponentId, Rect>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ComponentId, rect: Rect) -> &mut Self {
        self.rects.insert(id, rect);
        self
    }

    #[must_use]
    pub fn with(mut self, id: &str, rect: Rect) -> Self {
        self.rects.insert(ComponentId::intern(id), rect);
        self
    }

    pub fn remove(&mut self, id: ComponentId) -> Option<Rect> {
        self.rects.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl GeometryProvider for StaticGeometry {
    fn rect_of(&self, id: ComponentId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }
}
