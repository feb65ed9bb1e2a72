//! Axis-aligned rectangle geometry with inclusive edges.
//!
//! `Rect` is the clipping workhorse of the blit engine: every draw call clips
//! its destination against the target bounds before any pixel is touched.
//! Edges are inclusive, so a rect spanning a single pixel has
//! `left == right` and `width() == 1`.

/// An integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with inclusive edges.
///
/// Invariant: `left <= right` and `top <= bottom` for every non-empty rect.
/// The single degenerate value is [`Rect::EMPTY`] (area 0), produced by
/// [`Rect::clip_to`] when the rectangles do not overlap -- off-screen draws
/// are expected and frequent, so the empty result is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The canonical zero-area rectangle.
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    /// Construct from four inclusive edges, normalizing inverted input so
    /// that `left <= right` and `top <= bottom`.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Construct from an origin and a size. A zero dimension yields
    /// [`Rect::EMPTY`], as does an origin so far out that an edge would
    /// leave `i32` range -- such a rect cannot intersect anything
    /// addressable anyway.
    pub fn from_size(left: i32, top: i32, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::EMPTY;
        }
        let right = left as i64 + width as i64 - 1;
        let bottom = top as i64 + height as i64 - 1;
        if right > i32::MAX as i64 || bottom > i32::MAX as i64 {
            return Self::EMPTY;
        }
        Self {
            left,
            top,
            right: right as i32,
            bottom: bottom as i32,
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left + 1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top + 1).max(0) as u32
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// True iff `other` lies fully inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// True iff the closed rectangles overlap on both axes.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Clip `self` to the intersection with `other`, clamping each edge
    /// independently. Non-overlapping input collapses to [`Rect::EMPTY`].
    pub fn clip_to(&mut self, other: &Rect) {
        if !self.intersects(other) {
            *self = Self::EMPTY;
            return;
        }
        self.left = self.left.max(other.left);
        self.top = self.top.max(other.top);
        self.right = self.right.min(other.right);
        self.bottom = self.bottom.min(other.bottom);
    }

    /// Shift the rectangle by a delta on each axis.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        if self.is_empty() {
            return;
        }
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }
}
