//! Idle head and eye sway as a pure function of the engine clock.

use crate::config::{IdleConfig, Oscillator};

/// Local X/Y euler rotation (radians) for the head and for both eyes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IdlePose {
    pub head: [f32; 2],
    pub eyes: [f32; 2],
}

impl Oscillator {
    // Phase is computed in f64 so long sessions keep sub-frame resolution.
    #[inline]
    fn sin(&self, t: f64) -> f32 {
        (t * f64::from(self.frequency)).sin() as f32 * self.amplitude
    }

    #[inline]
    fn cos(&self, t: f64) -> f32 {
        (t * f64::from(self.frequency)).cos() as f32 * self.amplitude
    }
}

#[derive(Clone, Debug, Default)]
pub struct IdleMotion {
    cfg: IdleConfig,
}

impl IdleMotion {
    pub fn new(cfg: IdleConfig) -> Self {
        Self { cfg }
    }

    pub fn enabled(&self) -> bool {
        self.cfg.enabled
    }

    /// Pose at absolute time `t`. Not accumulated, so there is no drift to correct.
    pub fn pose_at(&self, t: f64) -> IdlePose {
        IdlePose {
            head: [self.cfg.head_pitch.sin(t), self.cfg.head_yaw.cos(t)],
            eyes: [self.cfg.eye_pitch.cos(t), self.cfg.eye_yaw.sin(t)],
        }
    }
}
