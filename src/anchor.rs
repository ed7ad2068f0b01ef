//! Anchor positioning.
//!
//! An [`Anchor`] names a reference position inside an outer rectangle (the
//! usable screen area).  [`position_for`] computes the top-left point that
//! puts a window at that anchor.
//!
//! `Top`, `Bottom`, `Left` and `Right` each constrain a single axis and keep
//! the window's current coordinate on the other one.  The four corners are
//! built from those single-axis results, one axis at a time, and then pushed
//! inward by `margin`.  `Center` and the plain edges ignore `margin`.

use crate::geometry::{Point, Rect};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named reference position within a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Anchor {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Every anchor, in declaration order.
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Center => write!(f, "center"),
            Anchor::Top => write!(f, "top"),
            Anchor::Bottom => write!(f, "bottom"),
            Anchor::Left => write!(f, "left"),
            Anchor::Right => write!(f, "right"),
            Anchor::TopLeft => write!(f, "top-left"),
            Anchor::TopRight => write!(f, "top-right"),
            Anchor::BottomLeft => write!(f, "bottom-left"),
            Anchor::BottomRight => write!(f, "bottom-right"),
        }
    }
}

/// An anchor name that does not match any [`Anchor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid anchor: {0:?}")]
pub struct AnchorParseError(String);

impl FromStr for Anchor {
    type Err = AnchorParseError;

    /// Case-insensitive; `-`, `_` and whitespace are ignored, so `"top-left"`,
    /// `"TopLeft"` and `"top_left"` are the same anchor.  `"central"` is
    /// accepted for [`Anchor::Center`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(|c| c.to_lowercase())
            .collect();
        match normalized.as_str() {
            "center" | "centre" | "central" => Ok(Anchor::Center),
            "top" => Ok(Anchor::Top),
            "bottom" => Ok(Anchor::Bottom),
            "left" => Ok(Anchor::Left),
            "right" => Ok(Anchor::Right),
            "topleft" => Ok(Anchor::TopLeft),
            "topright" => Ok(Anchor::TopRight),
            "bottomleft" => Ok(Anchor::BottomLeft),
            "bottomright" => Ok(Anchor::BottomRight),
            _ => Err(AnchorParseError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Top-left point that places `inner` at `anchor` within `outer`.
///
/// `inner` is the window's current frame: single-axis anchors keep its
/// coordinate on the unconstrained axis.  `margin` insets the four corners
/// toward the interior and has no effect on the other anchors.
///
/// No rounding happens here; callers round when they apply the point.
pub fn position_for(anchor: Anchor, outer: Rect, inner: Rect, margin: f64) -> Point {
    match anchor {
        Anchor::Center => Point::new(
            outer.x + (outer.width - inner.width) / 2.0,
            outer.y + (outer.height - inner.height) / 2.0,
        ),
        Anchor::Top => Point::new(inner.x, top_y(outer)),
        Anchor::Bottom => Point::new(inner.x, bottom_y(outer, inner)),
        Anchor::Left => Point::new(left_x(outer), inner.y),
        Anchor::Right => Point::new(right_x(outer, inner), inner.y),
        Anchor::TopLeft => Point::new(left_x(outer) + margin, top_y(outer) + margin),
        Anchor::TopRight => Point::new(right_x(outer, inner) - margin, top_y(outer) + margin),
        Anchor::BottomLeft => Point::new(left_x(outer) + margin, bottom_y(outer, inner) - margin),
        Anchor::BottomRight => {
            Point::new(right_x(outer, inner) - margin, bottom_y(outer, inner) - margin)
        }
    }
}

//  Single-axis edges

fn top_y(outer: Rect) -> f64 {
    outer.y
}

fn bottom_y(outer: Rect, inner: Rect) -> f64 {
    outer.bottom() - inner.height
}

fn left_x(outer: Rect) -> f64 {
    outer.x
}

fn right_x(outer: Rect, inner: Rect) -> f64 {
    outer.right() - inner.width
}

//  Tests
