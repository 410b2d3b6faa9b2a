//! Core configuration for vizij-expression-core.

use serde::{Deserialize, Serialize};

use crate::error::ExpressionError;
use crate::transition::Easing;

/// Timing and shaping knobs for the expression engine.
/// Defaults reproduce the tuned viewer behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds for a full blend between two expressions.
    pub transition_duration: f32,
    pub easing: Easing,
    /// Intensity used for labels the catalog does not know.
    pub default_intensity: f32,
    /// Zero every bound weight array before composing a frame.
    pub clear_weights_each_frame: bool,
    pub blink: BlinkConfig,
    pub idle: IdleConfig,
    /// Seconds before a host-selected emotion falls back to neutral.
    pub auto_reset_after: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transition_duration: 0.8,
            easing: Easing::EaseOutCubic,
            default_intensity: 0.2,
            clear_weights_each_frame: true,
            blink: BlinkConfig::default(),
            idle: IdleConfig::default(),
            auto_reset_after: 3.0,
        }
    }
}

/// Blink cadence: the next blink fires after `min_interval + U[0,1) * interval_jitter`
/// seconds and keeps the eyes closed for `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub min_interval: f32,
    pub interval_jitter: f32,
    pub duration: f32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            min_interval: 2.0,
            interval_jitter: 3.0,
            duration: 0.15,
        }
    }
}

/// One sinusoidal rotation axis: `amplitude * wave(frequency * t)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub frequency: f32,
    pub amplitude: f32,
}

/// Idle head/eye sway. The head pitches on a sine and yaws on a cosine; the
/// eyes pitch on a cosine and yaw on a sine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub enabled: bool,
    pub head_pitch: Oscillator,
    pub head_yaw: Oscillator,
    pub eye_pitch: Oscillator,
    pub eye_yaw: Oscillator,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            head_pitch: Oscillator {
                frequency: 0.5,
                amplitude: 0.1,
            },
            head_yaw: Oscillator {
                frequency: 0.3,
                amplitude: 0.05,
            },
            eye_pitch: Oscillator {
                frequency: 0.6,
                amplitude: 0.1,
            },
            eye_yaw: Oscillator {
                frequency: 0.8,
                amplitude: 0.2,
            },
        }
    }
}

impl Config {
    /// Reject settings the frame loop cannot run with (non-positive durations,
    /// intensities outside (0,1], negative blink timings).
    pub fn validate(&self) -> Result<(), ExpressionError> {
        if !(self.transition_duration.is_finite() && self.transition_duration > 0.0) {
            return Err(ExpressionError::InvalidConfig {
                field: "transition_duration",
                value: self.transition_duration,
            });
        }
        if !(self.default_intensity > 0.0 && self.default_intensity <= 1.0) {
            return Err(ExpressionError::InvalidConfig {
                field: "default_intensity",
                value: self.default_intensity,
            });
        }
        let blink = [
            ("blink.min_interval", self.blink.min_interval),
            ("blink.interval_jitter", self.blink.interval_jitter),
            ("blink.duration", self.blink.duration),
        ];
        for (field, value) in blink {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ExpressionError::InvalidConfig { field, value });
            }
        }
        if !(self.auto_reset_after.is_finite() && self.auto_reset_after >= 0.0) {
            return Err(ExpressionError::InvalidConfig {
                field: "auto_reset_after",
                value: self.auto_reset_after,
            });
        }
        Ok(())
    }
}
