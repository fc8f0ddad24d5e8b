//! Header drag tracking

use crate::types::{Point, PointerKind, WindowId};

/// An in-progress header drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub window_id: WindowId,
    /// Pointer position relative to the window origin at grab time
    pub grab_offset: Point,
    /// Device that started the drag
    pub kind: PointerKind,
}

impl DragSession {
    pub fn new(window_id: WindowId, pointer: Point, window_origin: Point, kind: PointerKind) -> Self {
        Self {
            window_id,
            grab_offset: pointer - window_origin,
            kind,
        }
    }

    /// Unclamped window origin for the current pointer position
    pub fn origin_for(&self, pointer: Point) -> Point {
        pointer - self.grab_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_follows_pointer_delta() {
        let drag = DragSession::new(WindowId(1), Point::new(150.0, 120.0), Point::new(100.0, 100.0), PointerKind::Mouse);
        assert_eq!(drag.grab_offset, Point::new(50.0, 20.0));
        assert_eq!(drag.origin_for(Point::new(250.0, 140.0)), Point::new(200.0, 120.0));
    }
}
