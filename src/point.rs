use core::fmt::Debug;

/// A position in viewport pixels. `y` grows downwards.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move by `(dx, dy)`, then clamp into `[0, w) x [0, h)`.
    pub fn moved_within(&self, dx: i32, dy: i32, w: usize, h: usize) -> Self {
        let max_x = w.saturating_sub(1) as i32;
        let max_y = h.saturating_sub(1) as i32;

        Point {
            x: self.x.saturating_add(dx).clamp(0, max_x),
            y: self.y.saturating_add(dy).clamp(0, max_y),
        }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
