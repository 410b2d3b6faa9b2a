//! Autonomous blinking.
//!
//! `Watching` accumulates time until a randomized threshold, then the eyes
//! close for a fixed window. The threshold is drawn once per interval from
//! the injected RNG so tests can seed it.

use rand::Rng;

use crate::config::BlinkConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BlinkPhase {
    /// `since` counts from the start of the previous blink.
    Watching { since: f32, next_at: f32 },
    Blinking { remaining: f32 },
}

/// Edge produced by [`BlinkScheduler::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlinkEdge {
    Closed,
    Opened,
}

#[derive(Debug)]
pub struct BlinkScheduler<R> {
    cfg: BlinkConfig,
    rng: R,
    phase: BlinkPhase,
    /// Time since the last blink started; keeps running while the eyes are shut.
    since: f32,
}

impl<R: Rng> BlinkScheduler<R> {
    pub fn new(cfg: BlinkConfig, mut rng: R) -> Self {
        let next_at = sample_interval(&cfg, &mut rng);
        Self {
            cfg,
            rng,
            phase: BlinkPhase::Watching { since: 0.0, next_at },
            since: 0.0,
        }
    }

    /// Advance by `dt` seconds. At most one edge is reported per call; a frame
    /// long enough to cover a whole blink still reports `Closed` and reopens on
    /// the following call.
    pub fn advance(&mut self, dt: f32) -> Option<BlinkEdge> {
        self.since += dt;
        match self.phase {
            BlinkPhase::Watching { next_at, .. } => {
                if self.since > next_at {
                    self.since = 0.0;
                    self.phase = BlinkPhase::Blinking {
                        remaining: self.cfg.duration,
                    };
                    return Some(BlinkEdge::Closed);
                }
                self.phase = BlinkPhase::Watching {
                    since: self.since,
                    next_at,
                };
                None
            }
            BlinkPhase::Blinking { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = BlinkPhase::Blinking { remaining };
                    return None;
                }
                let next_at = sample_interval(&self.cfg, &mut self.rng);
                self.phase = BlinkPhase::Watching {
                    since: self.since,
                    next_at,
                };
                Some(BlinkEdge::Opened)
            }
        }
    }
}

impl<R> BlinkScheduler<R> {
    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.phase, BlinkPhase::Blinking { .. })
    }

    pub fn time_since_last_blink(&self) -> f32 {
        self.since
    }
}

fn sample_interval<R: Rng>(cfg: &BlinkConfig, rng: &mut R) -> f32 {
    cfg.min_interval + rng.gen::<f32>() * cfg.interval_jitter
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scheduler(seed: u64) -> BlinkScheduler<StdRng> {
        BlinkScheduler::new(BlinkConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn first_blink_lands_between_two_and_five_seconds() {
        for seed in 0..16 {
            let mut blink = scheduler(seed);
            let mut t = 0.0;
            let dt = 1.0 / 60.0;
            loop {
                t += dt;
                if blink.advance(dt) == Some(BlinkEdge::Closed) {
                    break;
                }
                assert!(t < 5.1, "seed {seed} never blinked");
            }
            assert!(t > 2.0, "seed {seed} blinked early at {t}");
        }
    }

    #[test]
    fn blink_holds_for_duration() {
        let mut blink = BlinkScheduler::new(
            BlinkConfig {
                min_interval: 1.0,
                interval_jitter: 0.0,
                duration: 0.15,
            },
            StdRng::seed_from_u64(7),
        );
        assert_eq!(blink.advance(0.5), None);
        assert!(!blink.is_blinking());
        assert_eq!(blink.advance(0.6), Some(BlinkEdge::Closed));
        assert!(blink.is_blinking());
        assert_eq!(blink.advance(0.1), None);
        assert!(blink.is_blinking());
        assert_eq!(blink.advance(0.1), Some(BlinkEdge::Opened));
        assert!(!blink.is_blinking());
        assert!(blink.time_since_last_blink() > 0.19);
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let mut blink = scheduler(3);
        blink.advance(0.5);
        let before = blink.phase();
        assert_eq!(blink.advance(0.0), None);
        assert_eq!(blink.phase(), before);
    }
}
