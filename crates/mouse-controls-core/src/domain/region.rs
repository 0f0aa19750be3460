//! Bounding region and clamp geometry.
//!
//! The user configures a [`BoundingRegion`]: two closed integer intervals,
//! one per screen axis. The governor never clamps against that rectangle
//! directly. It clamps against the [`ClampRegion`], which is the bounding
//! region shrunk inward by the buffer margin on every side:
//!
//! ```text
//!   x.min            x.min+margin          x.max-margin            x.max
//!     |-------------------|=======================|---------------------|
//!                         ^ cursor is held inside ^
//! ```
//!
//! Both bounds are inclusive. A cursor sitting exactly on a clamp bound is
//! already inside and is left alone.
//!
//! A margin that eats the whole interval (`min + margin > max - margin`)
//! would produce an empty clamp interval. [`ClampRegion::new`] rejects that
//! case instead of producing a rectangle with `min > max`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for region construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// An interval was given with its bounds reversed.
    #[error("interval [{min}, {max}] is reversed: min must not exceed max")]
    ReversedInterval { min: i32, max: i32 },

    /// The buffer margin leaves no room on the given axis.
    #[error(
        "buffer margin {margin} is too large for the {axis} interval [{min}, {max}]: \
         it must be at most half the interval length"
    )]
    MarginTooLarge {
        axis: Axis,
        margin: u32,
        min: i32,
        max: i32,
    },
}

/// Screen axis, used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// A closed integer interval `[min, max]`.
///
/// Serialised as a two-element array (`[0, 1920]`), which is how the
/// interval appears in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Interval {
    min: i32,
    max: i32,
}

impl Interval {
    /// Creates an interval.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::ReversedInterval`] when `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, RegionError> {
        if min > max {
            return Err(RegionError::ReversedInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// The interval `[0, len]`, e.g. the width of a monitor at the origin.
    pub const fn from_origin(len: u16) -> Self {
        Self {
            min: 0,
            max: len as i32,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns `true` if `value` lies inside the interval (bounds included).
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Restricts `value` to the interval, replacing it with the nearest
    /// bound when it falls outside.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Shrinks the interval by `margin` at both ends.
    fn inset(&self, margin: u32, axis: Axis) -> Result<Self, RegionError> {
        // i64 keeps `min + margin` and `max - margin` from overflowing near
        // the ends of the i32 range.
        let lo = i64::from(self.min) + i64::from(margin);
        let hi = i64::from(self.max) - i64::from(margin);
        if lo > hi {
            return Err(RegionError::MarginTooLarge {
                axis,
                margin,
                min: self.min,
                max: self.max,
            });
        }
        // lo and hi are inside [min, max] here, so they fit in i32.
        Ok(Self {
            min: lo as i32,
            max: hi as i32,
        })
    }
}

impl TryFrom<(i32, i32)> for Interval {
    type Error = RegionError;

    fn try_from((min, max): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<Interval> for (i32, i32) {
    fn from(interval: Interval) -> Self {
        (interval.min, interval.max)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// The rectangle the user allows the cursor to occupy, before the margin is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRegion {
    /// Horizontal extent in screen pixels.
    pub x: Interval,
    /// Vertical extent in screen pixels.
    pub y: Interval,
}

impl BoundingRegion {
    pub fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for BoundingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={}", self.x, self.y)
    }
}

/// The effective rectangle the governor clamps the cursor into.
///
/// Always non-empty on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampRegion {
    x: Interval,
    y: Interval,
}

impl ClampRegion {
    /// Derives the clamp region by shrinking `bounds` by `margin` on every
    /// side.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MarginTooLarge`] if the margin would leave an
    /// empty interval on either axis.
    pub fn new(bounds: BoundingRegion, margin: u32) -> Result<Self, RegionError> {
        Ok(Self {
            x: bounds.x.inset(margin, Axis::X)?,
            y: bounds.y.inset(margin, Axis::Y)?,
        })
    }

    pub fn x(&self) -> Interval {
        self.x
    }

    pub fn y(&self) -> Interval {
        self.y
    }

    /// Returns `true` if the position is inside the clamp region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }

    /// Clamps a cursor position into the region. Each axis is clamped
    /// independently.
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (self.x.clamp(x), self.y.clamp(y))
    }
}

impl fmt::Display for ClampRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={}", self.x, self.y)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
