//! Output contracts from the expression engine.
//!
//! Weights and bone rotations are written straight into the rig; outputs only
//! carry the discrete events of a frame for hosts that want to react to them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ExpressionEvent {
    /// Emitted on the first update after a rig load.
    RigLoaded { morph_targets: Vec<String> },
    TransitionStarted { from: String, to: String },
    TransitionCompleted { label: String },
    BlinkStarted,
    BlinkEnded,
}

/// Outputs returned by `ExpressionEngine::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<ExpressionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: ExpressionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
