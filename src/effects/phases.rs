//! Timed stages without callbacks. A track remembers when it started and which
//! stage is next; each frame it is polled against the monotonic clock and hands
//! back every stage whose offset has elapsed. A cancelled track yields nothing,
//! so a stage scheduled for a session that has since ended cannot fire.

/// Shatter stages: crack flash, shard burst, dust.
pub const SHATTER_STAGES_MS: &[f64] = &[0.0, 50.0, 100.0];

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTrack {
    start_ms: f64,
    offsets: &'static [f64],
    next: usize,
    live: bool,
}

impl PhaseTrack {
    /// `offsets` must be sorted ascending.
    pub fn new(start_ms: f64, offsets: &'static [f64]) -> Self {
        Self {
            start_ms,
            offsets,
            next: 0,
            live: true,
        }
    }

    pub fn cancel(&mut self) {
        self.live = false;
    }

    pub fn is_finished(&self) -> bool {
        !self.live || self.next >= self.offsets.len()
    }

    /// Next due stage index, if any. Call until `None` to catch up after a long frame.
    pub fn poll(&mut self, now: f64) -> Option<usize> {
        if !self.live {
            return None;
        }
        let offset = *self.offsets.get(self.next)?;
        if now - self.start_ms >= offset {
            self.next += 1;
            Some(self.next - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_fire_in_order_once() {
        let mut t = PhaseTrack::new(1_000.0, SHATTER_STAGES_MS);
        assert_eq!(t.poll(1_000.0), Some(0));
        assert_eq!(t.poll(1_000.0), None);
        assert_eq!(t.poll(1_049.0), None);
        assert_eq!(t.poll(1_050.0), Some(1));
        assert_eq!(t.poll(1_200.0), Some(2));
        assert_eq!(t.poll(1_300.0), None);
        assert!(t.is_finished());
    }

    #[test]
    fn long_frame_catches_up() {
        let mut t = PhaseTrack::new(0.0, SHATTER_STAGES_MS);
        let mut due = Vec::new();
        while let Some(s) = t.poll(500.0) {
            due.push(s);
        }
        assert_eq!(due, vec![0, 1, 2]);
    }

    #[test]
    fn cancelled_track_is_inert() {
        let mut t = PhaseTrack::new(0.0, SHATTER_STAGES_MS);
        assert_eq!(t.poll(0.0), Some(0));
        t.cancel();
        assert_eq!(t.poll(60.0), None);
        assert_eq!(t.poll(120.0), None);
        assert!(t.is_finished());
    }
}
