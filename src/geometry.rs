//! Integer geometry shared by the host widget tree and the layout engine

use std::fmt;

/// Axis of a line or of a custom reference line.
///
/// A `Horizontal` line runs left to right and therefore pins a y-coordinate;
/// a `Vertical` line pins an x-coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A 2D point in widget coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixels.
///
/// `right()` and `bottom()` are exclusive: a rect at x=10 with width 100 has
/// its right edge at 110.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, anchored at the origin
    pub fn local(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn center_x(&self) -> i32 {
        self.x.saturating_add(self.width / 2)
    }

    pub fn center_y(&self) -> i32 {
        self.y.saturating_add(self.height / 2)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Translate so the left edge sits at `left`; width is preserved
    pub fn move_left(&mut self, left: i32) {
        self.x = left;
    }

    /// Move only the left boundary; the right edge stays put
    pub fn set_left(&mut self, left: i32) {
        let right = self.right();
        self.x = left;
        self.width = right.saturating_sub(left);
    }

    pub fn move_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_top(&mut self, top: i32) {
        let bottom = self.bottom();
        self.y = top;
        self.height = bottom.saturating_sub(top);
    }

    pub fn move_right(&mut self, right: i32) {
        self.x = right.saturating_sub(self.width);
    }

    pub fn set_right(&mut self, right: i32) {
        self.width = right.saturating_sub(self.x);
    }

    pub fn move_bottom(&mut self, bottom: i32) {
        self.y = bottom.saturating_sub(self.height);
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.height = bottom.saturating_sub(self.y);
    }

    /// Re-center horizontally without touching the size or y
    pub fn move_center_x(&mut self, x: i32) {
        self.x = x.saturating_sub(self.width / 2);
    }

    /// Re-center vertically without touching the size or x
    pub fn move_center_y(&mut self, y: i32) {
        self.y = y.saturating_sub(self.height / 2);
    }

    /// Shift by the given offset
    pub fn translated(&self, by: Point) -> Rect {
        Rect::new(
            self.x.saturating_add(by.x),
            self.y.saturating_add(by.y),
            self.width,
            self.height,
        )
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={} y={} w={} h={}",
            self.x, self.y, self.width, self.height
        )
    }
}
