//! State of the one gesture an emulator may be tracking

use super::host::Touch;

/// An in-flight touch drag; dropping it is the reset
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<N> {
    /// Element the gesture started on
    pub source: N,
    pub start: Touch,
    /// Touch point relative to the source's top-left corner
    pub offset_x: f64,
    pub offset_y: f64,
    /// Drop zone currently under the finger
    pub drop_zone: Option<N>,
    /// Visual clone following the finger
    pub ghost: Option<N>,
    /// Most recent touch point seen for this gesture
    pub last_touch: Touch,
}

impl<N> DragSession<N> {
    pub const fn new(source: N, start: Touch, offset_x: f64, offset_y: f64) -> Self {
        Self {
            source,
            start,
            offset_x,
            offset_y,
            drop_zone: None,
            ghost: None,
            last_touch: start,
        }
    }

    /// Where the ghost's top-left corner goes for a given touch point
    pub fn ghost_origin(&self, touch: Touch) -> (f64, f64) {
        (touch.client_x - self.offset_x, touch.client_y - self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_origin_applies_offset() {
        let session = DragSession::new(1_usize, Touch::new(40.0, 25.0), 15.0, 5.0);
        assert_eq!(session.ghost_origin(Touch::new(100.0, 80.0)), (85.0, 75.0));
        assert_eq!(session.last_touch, session.start);
        assert!(session.drop_zone.is_none() && session.ghost.is_none());
    }
}
