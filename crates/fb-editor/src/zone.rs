//! Zone classifier: where inside a target's box is the pointer?
//!
//! Runs on every pointer-move, so everything here is `Copy` in, `Copy` out
//! with no allocation.

use crate::geometry::{Point, Rect};
use fb_core::model::ContainerKind;
use serde::{Deserialize, Serialize};

/// Default band depth on each axis, as a fraction of the target's size.
pub const DEFAULT_BAND: f32 = 0.25;

/// Semantic region of the pointer relative to a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl Zone {
    pub fn is_vertical(self) -> bool {
        matches!(self, Zone::Top | Zone::Bottom)
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Zone::Left | Zone::Right)
    }
}

/// Edge band depths, as fractions (`0.0 ..= 0.5`) of the target's height
/// (`vertical`) and width (`horizontal`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_BAND,
            vertical: DEFAULT_BAND,
        }
    }
}

/// How overlapping bands (pointer near a corner) are settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneStrategy {
    /// Top/bottom bands always win over left/right.
    #[default]
    EdgeBands,
    /// Inside the bands, the axis with the larger normalized offset from
    /// the center wins. Ties go to the vertical axis.
    DominantAxis,
}

/// Classify with the default `EdgeBands` strategy.
pub fn classify(pointer: Point, rect: Rect, thresholds: Thresholds) -> Zone {
    classify_with(pointer, rect, thresholds, ZoneStrategy::EdgeBands)
}

pub fn classify_with(
    pointer: Point,
    rect: Rect,
    thresholds: Thresholds,
    strategy: ZoneStrategy,
) -> Zone {
    if rect.is_degenerate() {
        return Zone::Center;
    }
    let p = rect.clamp(pointer);

    // Normalized position inside the rect, 0.0 ..= 1.0 on both axes
    let nx = (p.x - rect.x) / rect.width;
    let ny = (p.y - rect.y) / rect.height;

    let vertical = if ny < thresholds.vertical {
        Some(Zone::Top)
    } else if ny > 1.0 - thresholds.vertical {
        Some(Zone::Bottom)
    } else {
        None
    };
    let horizontal = if nx < thresholds.horizontal {
        Some(Zone::Left)
    } else if nx > 1.0 - thresholds.horizontal {
        Some(Zone::Right)
    } else {
        None
    };

    match (vertical, horizontal, strategy) {
        (Some(v), Some(h), ZoneStrategy::DominantAxis) => {
            if (nx - 0.5).abs() > (ny - 0.5).abs() { h } else { v }
        }
        (Some(v), _, _) => v,
        (None, Some(h), _) => h,
        (None, None, _) => Zone::Center,
    }
}

// ─── Gap scanning ───────────────────────────────────────────────────────

/// Main axis along which a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn of(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Row => Axis::Horizontal,
            ContainerKind::Column => Axis::Vertical,
        }
    }

    fn coord(self, p: Point) -> f32 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }
}

/// Gap index (`0 ..= siblings.len()`) the pointer falls into: the number of
/// siblings whose midpoint along `axis` lies before the pointer. Siblings
/// are expected in layout order.
pub fn insertion_index(pointer: Point, siblings: &[Rect], axis: Axis) -> usize {
    let at = axis.coord(pointer);
    siblings
        .iter()
        .position(|r| at < axis.coord(r.center()))
        .unwrap_or(siblings.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Rect = Rect::new(100.0, 100.0, 200.0, 100.0);

    fn at(x: f32, y: f32) -> Zone {
        classify(Point::new(x, y), BOX, Thresholds::default())
    }

    #[test]
    fn edge_bands() {
        assert_eq!(at(200.0, 105.0), Zone::Top);
        assert_eq!(at(200.0, 195.0), Zone::Bottom);
        assert_eq!(at(110.0, 150.0), Zone::Left);
        assert_eq!(at(290.0, 150.0), Zone::Right);
        assert_eq!(at(200.0, 150.0), Zone::Center);
    }

    #[test]
    fn vertical_wins_in_corners() {
        assert_eq!(at(101.0, 101.0), Zone::Top);
        assert_eq!(at(299.0, 199.0), Zone::Bottom);
    }

    #[test]
    fn dominant_axis_settles_corners_by_offset() {
        let dominant = |x, y| {
            classify_with(
                Point::new(x, y),
                BOX,
                Thresholds::default(),
                ZoneStrategy::DominantAxis,
            )
        };
        // nx = 0.01, ny = 0.2: horizontal offset from center is larger
        assert_eq!(dominant(102.0, 120.0), Zone::Left);
        // nx = 0.2, ny = 0.01: vertical is larger
        assert_eq!(dominant(140.0, 101.0), Zone::Top);
        // Outside the corners both strategies agree
        assert_eq!(dominant(200.0, 105.0), Zone::Top);
        assert_eq!(dominant(200.0, 150.0), Zone::Center);
    }

    #[test]
    fn degenerate_rect_is_center() {
        let flat = Rect::new(0.0, 0.0, 100.0, 0.0);
        assert_eq!(
            classify(Point::new(0.0, 0.0), flat, Thresholds::default()),
            Zone::Center
        );
    }

    #[test]
    fn outside_pointer_is_clamped() {
        assert_eq!(at(200.0, 50.0), Zone::Top);
        assert_eq!(at(400.0, 150.0), Zone::Right);
    }

    #[test]
    fn zero_thresholds_always_center() {
        let none = Thresholds {
            horizontal: 0.0,
            vertical: 0.0,
        };
        assert_eq!(classify(Point::new(150.0, 101.0), BOX, none), Zone::Center);
    }

    #[test]
    fn gap_scanning_uses_midpoints() {
        let column = [
            Rect::new(0.0, 0.0, 100.0, 20.0),
            Rect::new(0.0, 20.0, 100.0, 20.0),
            Rect::new(0.0, 40.0, 100.0, 20.0),
        ];
        let idx = |y| insertion_index(Point::new(50.0, y), &column, Axis::Vertical);
        assert_eq!(idx(5.0), 0);
        assert_eq!(idx(15.0), 1);
        assert_eq!(idx(45.0), 2);
        assert_eq!(idx(59.0), 3);
        assert_eq!(insertion_index(Point::new(0.0, 0.0), &[], Axis::Horizontal), 0);
    }

    #[test]
    fn axis_follows_container_kind() {
        assert_eq!(Axis::of(ContainerKind::Row), Axis::Horizontal);
        assert_eq!(Axis::of(ContainerKind::Column), Axis::Vertical);
    }
}
