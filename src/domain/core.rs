//! Core geometry types
//!
//! Pure canvas geometry in client pixels. Nothing here knows about Win32
//! or tiny-skia; the UI layer converts at its edges.

/// Rectangle in canvas pixel coordinates
///
/// The origin is the canvas top-left corner. Width and height are never
/// negative for rectangles produced by the layout code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a `w` x `h` rectangle centered inside `outer`
    pub fn centered_in(outer: &Rect, w: i32, h: i32) -> Self {
        Self::new(outer.x + (outer.w - w) / 2, outer.y + (outer.h - h) / 2, w, h)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center point as floats, used as the pivot for transforms
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    /// Returns true if this rectangle contains the given point
    ///
    /// Left and top edges are inclusive, right and bottom exclusive.
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the offset of this rectangle shifted by (dx, dy)
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}
