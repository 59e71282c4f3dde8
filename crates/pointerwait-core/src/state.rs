use crate::types::Point;
use std::cell::Cell;

/// Last known pointer position.
///
/// One instance is owned by each [`PointerInput`](crate::PointerInput) and
/// shared by `Rc` with whatever needs the current position. Written only by
/// the move listener, read synchronously.
#[derive(Debug, Default)]
pub struct InputState {
    position: Cell<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_position(&self, position: Point) {
        self.position.set(position);
    }

    pub fn pointer_position(&self) -> Point {
        self.position.get()
    }

    pub fn pointer_x(&self) -> i32 {
        self.position.get().x
    }

    pub fn pointer_y(&self) -> i32 {
        self.position.get().y
    }
}
