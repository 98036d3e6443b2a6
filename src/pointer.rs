// Last known pointer position over the surface. Mouse and touch moves both
// land here; after a quiet period the pointer is parked far off-surface so no
// particle counts as near it.

use vecmath::Vector2;

#[derive(Clone, Debug)]
pub struct PointerTracker {
    pos: Vector2<f64>,
    absent: Vector2<f64>,
    idle_ms: f64,
    // Timestamp of the last move that has not yet timed out
    last_move_ms: Option<f64>,
}

impl PointerTracker {
    pub fn new(absent: Vector2<f64>, idle_ms: f64) -> Self {
        PointerTracker {
            pos: absent,
            absent,
            idle_ms,
            last_move_ms: None,
        }
    }

    /// Position relative to the surface origin, stamped with the host clock.
    pub fn move_to(&mut self, pos: Vector2<f64>, now_ms: f64) {
        self.pos = pos;
        self.last_move_ms = Some(now_ms);
    }

    /// Parks the pointer once it has been idle for the timeout. Returns true on
    /// the call that parks it.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        match self.last_move_ms {
            Some(at) if now_ms - at >= self.idle_ms => {
                self.pos = self.absent;
                self.last_move_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        self.pos
    }

    pub fn is_present(&self) -> bool {
        self.last_move_ms.is_some()
    }
}
