use core::fmt::Debug;

use crate::WorldOffset;

/// Absolute coordinate of a cell. `y` grows northwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: WorldOffset,
    pub y: WorldOffset,
}

impl Point {
    pub const fn new(x: WorldOffset, y: WorldOffset) -> Self {
        Point { x, y }
    }

    /// Translate the current `Point` by `(dx, dy)`.
    pub const fn offset(&self, dx: WorldOffset, dy: WorldOffset) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(WorldOffset, WorldOffset)> for Point {
    fn from((x, y): (WorldOffset, WorldOffset)) -> Self {
        Point { x, y }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
