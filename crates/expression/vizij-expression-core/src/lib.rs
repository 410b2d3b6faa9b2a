//! Vizij Expression Core (engine-agnostic)
//!
//! Per-frame facial expression blending for rigged characters: an emotion
//! label is turned into morph-target weights that ease in from whatever is
//! live, while autonomous blinking and idle head/eye sway run alongside.
//! Adapters describe their scene once as [`RigNode`]s and implement
//! [`RigWriter`]; [`ExpressionEngine::update`] does the rest every frame.

pub mod blend;
pub mod blink;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame_api;
pub mod idle;
pub mod matching;
pub mod outputs;
pub mod rig;
pub mod scene;
pub mod selector;
pub mod transition;

// Re-exports for consumers (adapters)
pub use blend::BlendStore;
pub use blink::{BlinkPhase, BlinkScheduler};
pub use catalog::{Emotion, EmotionCatalog, EmotionSpec, NEUTRAL};
pub use config::{BlinkConfig, Config, IdleConfig};
pub use engine::ExpressionEngine;
pub use error::ExpressionError;
pub use frame_api::{AvatarEvent, MessageError};
pub use idle::{IdleMotion, IdlePose};
pub use outputs::{ExpressionEvent, Outputs};
pub use rig::{MorphDictionary, MorphMesh, NodeKind, RigIndex, RigNode, RigWriter};
pub use scene::Scene;
pub use selector::EmotionSelector;
pub use transition::{Easing, Transition, TransitionPhase};
