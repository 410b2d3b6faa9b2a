//! Transition scheduler: one in-flight blend from the previous emotion to the
//! requested one.
//!
//! When a transition begins it snapshots the live weights from the blend
//! store as its baseline; every frame then places each channel at
//! `lerp(baseline, target, eased(progress))`. A new request mid-blend takes a
//! fresh snapshot, so it continues from wherever the weights actually are
//! instead of snapping back to the old target, and a zero-length frame
//! reproduces the previous frame exactly.

use serde::{Deserialize, Serialize};

use crate::blend::BlendStore;
use crate::catalog::{EmotionSpec, NEUTRAL};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `1 - (1 - p)^3`: fast start, decelerating finish.
#[inline]
pub fn ease_out_cubic(p: f32) -> f32 {
    let inv = 1.0 - p;
    1.0 - inv * inv * inv
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    EaseOutCubic,
    Linear,
}

impl Easing {
    #[inline]
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::EaseOutCubic => ease_out_cubic(p),
            Easing::Linear => p,
        }
    }
}

/// Observable phase of the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionPhase<'a> {
    Idle(&'a str),
    Transitioning {
        from: &'a str,
        to: &'a str,
        progress: f32,
    },
}

/// The single active transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub elapsed: f32,
    pub duration: f32,
    pub easing: Easing,
    /// Target spec, looked up once when the transition begins.
    pub target: EmotionSpec,
    /// Live weights at the moment the transition began.
    pub baseline: BlendStore,
}

impl Transition {
    /// Settled at neutral, nothing to blend.
    pub fn settled(duration: f32, easing: Easing, neutral: EmotionSpec) -> Self {
        Self {
            from: NEUTRAL.to_string(),
            to: NEUTRAL.to_string(),
            elapsed: duration,
            duration,
            easing,
            target: neutral,
            baseline: BlendStore::new(),
        }
    }

    /// Replace the in-flight transition. Progress restarts at 0 and `live`
    /// becomes the new baseline; the weights themselves are untouched.
    pub fn begin(&mut self, from: &str, target: EmotionSpec, live: &BlendStore) {
        self.from = from.to_string();
        self.to = target.label.clone();
        self.target = target;
        self.baseline = live.clone();
        self.elapsed = 0.0;
    }

    /// `progress = min(1, progress + dt / duration)`.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Weight for `channel` at the current progress, or `None` when the
    /// channel is inactive and started at rest.
    pub fn channel_weight(&self, channel: &str, active: bool) -> Option<f32> {
        blend_channel(
            self.baseline.get(channel),
            active,
            self.target.intensity,
            self.eased(),
        )
    }

    pub fn phase(&self) -> TransitionPhase<'_> {
        if self.is_complete() {
            TransitionPhase::Idle(&self.to)
        } else {
            TransitionPhase::Transitioning {
                from: &self.from,
                to: &self.to,
                progress: self.progress(),
            }
        }
    }
}

/// Weight for one channel given its baseline, or `None` when there is nothing
/// to write (inactive channel that started at rest).
#[inline]
pub fn blend_channel(start: f32, active: bool, intensity: f32, eased: f32) -> Option<f32> {
    if active {
        Some(lerp_f32(start, intensity, eased))
    } else if start > 0.0 {
        Some(lerp_f32(start, 0.0, eased))
    } else {
        None
    }
}
