//! Geometry primitives
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// The largest width or height that can be expressed in the X11 protocol
pub const MAX_SIZE: u32 = 0xFFFF;

/// An x,y coordinate pair relative to the root window.
///
/// Coordinates are signed: a window being dragged may briefly sit above or to the left of
/// the screen before it is clamped back into place.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: i32,
    /// An absolute y coordinate relative to the root window
    pub y: i32,
}

impl Point {
    /// Create a new Point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from(raw: (i32, i32)) -> Self {
        let (x, y) = raw;

        Self { x, y }
    }
}

impl From<(i16, i16)> for Point {
    fn from(raw: (i16, i16)) -> Self {
        let (x, y) = raw;

        Self {
            x: x as i32,
            y: y as i32,
        }
    }
}

/// The difference between two points as a `(dx, dy)` pair.
///
/// ```
/// # use kbgwm::pure::geometry::Point;
/// let delta = Point::new(30, 5) - Point::new(10, 20);
///
/// assert_eq!(delta, (20, -15));
/// ```
impl Sub for Point {
    type Output = (i32, i32);

    fn sub(self, rhs: Point) -> Self::Output {
        (self.x - rhs.x, self.y - rhs.y)
    }
}

/// An X window / screen position: top left corner + extent
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Rect {
    /// The x-coordinate of the top left corner of this rect
    pub x: i32,
    /// The y-coordinate of the top left corner of this rect
    pub y: i32,
    /// The width of this rect
    pub w: u32,
    /// The height of this rect
    pub h: u32,
}

impl Rect {
    /// Create a new Rect.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The top left corner of this Rect
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Update the dimensions of this [Rect] by specified deltas.
    ///
    /// Minimum dimensions are clamped at 1x1
    ///
    /// ```
    /// # use kbgwm::pure::geometry::Rect;
    /// let mut r = Rect::new(0, 0, 100, 200);
    ///
    /// r.resize(20, -30);
    /// assert_eq!(r, Rect::new(0, 0, 120, 170));
    ///
    /// r.resize(-500, 0);
    /// assert_eq!(r, Rect::new(0, 0, 1, 170));
    /// ```
    pub fn resize(&mut self, dw: i32, dh: i32) {
        self.w = (self.w as i64 + dw as i64).clamp(1, u32::MAX as i64) as u32;
        self.h = (self.h as i64 + dh as i64).clamp(1, u32::MAX as i64) as u32;
    }

    /// Update the position of this [Rect] by specified deltas.
    ///
    /// Unlike [Rect::resize] no clamping is applied: the result may lie partly
    /// or completely off screen.
    ///
    /// ```
    /// # use kbgwm::pure::geometry::Rect;
    /// let mut r = Rect::new(0, 0, 100, 200);
    ///
    /// r.reposition(20, 30);
    /// assert_eq!(r, Rect::new(20, 30, 100, 200));
    ///
    /// r.reposition(-40, -20);
    /// assert_eq!(r, Rect::new(-20, 10, 100, 200));
    /// ```
    pub fn reposition(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

/// Size constraints requested by a client through its `WM_NORMAL_HINTS` property.
///
/// Unset bounds default to `0` for the minimums and [MAX_SIZE] for the maximums.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct SizeHints {
    /// The minimum width the client will accept
    pub min_w: u32,
    /// The minimum height the client will accept
    pub min_h: u32,
    /// The maximum width the client will accept
    pub max_w: u32,
    /// The maximum height the client will accept
    pub max_h: u32,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            min_w: 0,
            min_h: 0,
            max_w: MAX_SIZE,
            max_h: MAX_SIZE,
        }
    }
}

impl SizeHints {
    /// Set the minimum dimensions
    pub fn with_min(mut self, w: u32, h: u32) -> Self {
        self.min_w = w;
        self.min_h = h;
        self
    }

    /// Set the maximum dimensions
    pub fn with_max(mut self, w: u32, h: u32) -> Self {
        self.max_w = w;
        self.max_h = h;
        self
    }
}
