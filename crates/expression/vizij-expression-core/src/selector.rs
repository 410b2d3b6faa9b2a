//! Host-side emotion selection with auto-reset to neutral.
//!
//! Hosts that let a user click an emotion usually want it to fade back after
//! a few seconds. This keeps that timer frame-driven next to the engine
//! instead of in a detached wall-clock callback.

use crate::catalog::{normalize_label, NEUTRAL};

#[derive(Clone, Debug)]
pub struct EmotionSelector {
    current: String,
    reset_after: f32,
    /// Seconds left before falling back to neutral; `None` when not armed.
    remaining: Option<f32>,
}

impl EmotionSelector {
    pub fn new(reset_after: f32) -> Self {
        Self {
            current: NEUTRAL.to_string(),
            reset_after,
            remaining: None,
        }
    }

    /// Select an emotion. Anything but neutral (re)arms the reset timer.
    pub fn select(&mut self, label: &str) {
        self.current = normalize_label(label);
        self.remaining = if self.current == NEUTRAL {
            None
        } else {
            Some(self.reset_after)
        };
    }

    /// Count down and return the label to feed the engine this frame.
    pub fn advance(&mut self, dt: f32) -> &str {
        if let Some(left) = self.remaining.as_mut() {
            *left -= dt.max(0.0);
            if *left <= 0.0 {
                log::debug!("emotion '{}' auto-reset to neutral", self.current);
                self.current = NEUTRAL.to_string();
                self.remaining = None;
            }
        }
        &self.current
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resets_after_timeout() {
        let mut sel = EmotionSelector::new(3.0);
        sel.select("Happy");
        assert_eq!(sel.advance(1.0), "happy");
        assert_eq!(sel.advance(1.5), "happy");
        assert_eq!(sel.advance(0.6), NEUTRAL);
        assert_eq!(sel.remaining(), None);
    }

    #[test]
    fn reselect_rearms_timer() {
        let mut sel = EmotionSelector::new(3.0);
        sel.select("happy");
        sel.advance(2.5);
        sel.select("sad");
        assert_eq!(sel.advance(2.5), "sad");
        assert_eq!(sel.advance(0.6), NEUTRAL);
    }

    #[test]
    fn neutral_is_not_armed() {
        let mut sel = EmotionSelector::new(3.0);
        sel.select("neutral");
        assert_eq!(sel.remaining(), None);
        assert_eq!(sel.advance(10.0), NEUTRAL);
    }
}
