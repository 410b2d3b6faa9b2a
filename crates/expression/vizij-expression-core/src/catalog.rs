//! Emotion catalog: which morph-target fragments each emotion drives and how hard.
//!
//! Peak intensities sit well below 1.0 for most emotions; full-strength
//! ARKit-style blend shapes read as uncanny on stylised avatars. `wink` is
//! the exception since it is a binary-feeling action.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ExpressionError;

/// Label of the rest expression. Its fragment set is empty.
pub const NEUTRAL: &str = "neutral";

/// Fallback intensity for labels the catalog does not know.
pub const DEFAULT_INTENSITY: f32 = 0.2;

/// Target description for one emotion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionSpec {
    pub label: String,
    /// Ordered morph-target name fragments this emotion activates.
    #[serde(default)]
    pub fragments: Vec<String>,
    /// Peak weight for activated channels.
    pub intensity: f32,
}

impl EmotionSpec {
    pub fn new(label: &str, fragments: &[&str], intensity: f32) -> Self {
        Self {
            label: label.to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            intensity,
        }
    }

    /// Spec that activates nothing, used for `neutral` and unknown labels.
    pub fn empty(label: &str, intensity: f32) -> Self {
        Self {
            label: label.to_string(),
            fragments: Vec::new(),
            intensity,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Built-in emotion labels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Disgusted,
    Fearful,
    Contempt,
    Joy,
    Excited,
    Confused,
    Tired,
    Love,
    Wink,
    Laugh,
    Smirk,
    Thinking,
    Cool,
    Shy,
    Crazy,
}

impl Emotion {
    pub const ALL: [Emotion; 20] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Disgusted,
        Emotion::Fearful,
        Emotion::Contempt,
        Emotion::Joy,
        Emotion::Excited,
        Emotion::Confused,
        Emotion::Tired,
        Emotion::Love,
        Emotion::Wink,
        Emotion::Laugh,
        Emotion::Smirk,
        Emotion::Thinking,
        Emotion::Cool,
        Emotion::Shy,
        Emotion::Crazy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Neutral => NEUTRAL,
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Disgusted => "disgusted",
            Emotion::Fearful => "fearful",
            Emotion::Contempt => "contempt",
            Emotion::Joy => "joy",
            Emotion::Excited => "excited",
            Emotion::Confused => "confused",
            Emotion::Tired => "tired",
            Emotion::Love => "love",
            Emotion::Wink => "wink",
            Emotion::Laugh => "laugh",
            Emotion::Smirk => "smirk",
            Emotion::Thinking => "thinking",
            Emotion::Cool => "cool",
            Emotion::Shy => "shy",
            Emotion::Crazy => "crazy",
        }
    }

    fn builtin_spec(self) -> EmotionSpec {
        let (fragments, intensity): (&[&str], f32) = match self {
            Emotion::Neutral => (&[], DEFAULT_INTENSITY),
            Emotion::Happy => (
                &[
                    "mouthSmile",
                    "mouthSmileLeft",
                    "mouthSmileRight",
                    "cheekSquintLeft",
                    "cheekSquintRight",
                ],
                0.15,
            ),
            Emotion::Sad => (
                &[
                    "mouthFrownLeft",
                    "mouthFrownRight",
                    "browDownLeft",
                    "browDownRight",
                ],
                0.2,
            ),
            Emotion::Angry => (
                &[
                    "browDownLeft",
                    "browDownRight",
                    "mouthPressLeft",
                    "mouthPressRight",
                    "noseSneerLeft",
                    "noseSneerRight",
                ],
                0.25,
            ),
            Emotion::Surprised => (
                &["browInnerUp", "eyeWideLeft", "eyeWideRight", "jawOpen"],
                0.3,
            ),
            Emotion::Disgusted => (
                &[
                    "noseSneerLeft",
                    "noseSneerRight",
                    "mouthUpperUpLeft",
                    "mouthUpperUpRight",
                ],
                0.2,
            ),
            Emotion::Fearful => (
                &[
                    "browInnerUp",
                    "eyeWideLeft",
                    "eyeWideRight",
                    "mouthStretchLeft",
                    "mouthStretchRight",
                ],
                0.25,
            ),
            Emotion::Contempt => (&["mouthSmileLeft", "noseSneerLeft"], 0.2),
            Emotion::Joy => (
                &[
                    "mouthSmile",
                    "cheekSquintLeft",
                    "cheekSquintRight",
                    "eyeSquintLeft",
                    "eyeSquintRight",
                ],
                0.18,
            ),
            Emotion::Excited => (
                &["browInnerUp", "mouthSmile", "eyeWideLeft", "eyeWideRight"],
                0.28,
            ),
            Emotion::Confused => (
                &["browDownLeft", "browDownRight", "mouthLeft", "mouthRight"],
                0.15,
            ),
            Emotion::Tired => (
                &[
                    "eyeSquintLeft",
                    "eyeSquintRight",
                    "mouthFrownLeft",
                    "mouthFrownRight",
                ],
                0.15,
            ),
            Emotion::Love => (&["mouthKiss", "eyeSquintLeft", "eyeSquintRight"], 0.2),
            Emotion::Wink => (&["eyeBlinkLeft"], 0.8),
            Emotion::Laugh => (
                &["mouthSmile", "jawOpen", "cheekSquintLeft", "cheekSquintRight"],
                0.22,
            ),
            Emotion::Smirk => (&["mouthSmileLeft", "mouthDimpleLeft"], 0.25),
            Emotion::Thinking => (&["mouthPucker", "browDownLeft", "browDownRight"], 0.18),
            Emotion::Cool => (&["eyeSquintLeft", "eyeSquintRight", "mouthSmile"], 0.2),
            Emotion::Shy => (
                &[
                    "eyeSquintLeft",
                    "eyeSquintRight",
                    "mouthSmileLeft",
                    "mouthSmileRight",
                ],
                0.12,
            ),
            Emotion::Crazy => (
                &["eyeWideLeft", "eyeWideRight", "mouthSmile", "tongueOut"],
                0.35,
            ),
        };
        EmotionSpec::new(self.label(), fragments, intensity)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion '{0}'")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_label(s);
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.label() == key)
            .ok_or(UnknownEmotion(s.to_string()))
    }
}

/// Labels are compared trimmed and ASCII-lowercased.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

/// Label → spec table. The single source of truth for fragments and intensities.
#[derive(Clone, Debug)]
pub struct EmotionCatalog {
    specs: IndexMap<String, EmotionSpec>,
    default_intensity: f32,
}

impl Default for EmotionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmotionCatalog {
    /// Catalog with no entries; every lookup resolves to a neutral-like spec.
    pub fn empty(default_intensity: f32) -> Self {
        Self {
            specs: IndexMap::new(),
            default_intensity,
        }
    }

    /// The hand-tuned built-in table.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty(DEFAULT_INTENSITY);
        for emotion in Emotion::ALL {
            let spec = emotion.builtin_spec();
            catalog.specs.insert(spec.label.clone(), spec);
        }
        catalog
    }

    /// Parse a JSON array of specs (`[{ "label", "fragments", "intensity" }]`) into
    /// a fresh catalog. Labels are normalized; intensities must lie in (0, 1].
    pub fn from_json(json: &str) -> Result<Self, ExpressionError> {
        let specs: Vec<EmotionSpec> = serde_json::from_str(json)?;
        let mut catalog = Self::empty(DEFAULT_INTENSITY);
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, mut spec: EmotionSpec) -> Result<(), ExpressionError> {
        spec.label = normalize_label(&spec.label);
        if !(spec.intensity > 0.0 && spec.intensity <= 1.0) {
            log::warn!(
                "rejecting emotion '{}' with intensity {}",
                spec.label,
                spec.intensity
            );
            return Err(ExpressionError::InvalidIntensity {
                label: spec.label,
                value: spec.intensity,
            });
        }
        self.specs.insert(spec.label.clone(), spec);
        Ok(())
    }

    pub fn with_default_intensity(mut self, intensity: f32) -> Self {
        self.default_intensity = intensity;
        self
    }

    pub fn default_intensity(&self) -> f32 {
        self.default_intensity
    }

    /// Resolve a label. Unknown labels get an empty fragment set and the
    /// default intensity, which the transition treats exactly like neutral.
    pub fn lookup(&self, label: &str) -> EmotionSpec {
        let key = normalize_label(label);
        match self.specs.get(&key) {
            Some(spec) => spec.clone(),
            None => EmotionSpec::empty(&key, self.default_intensity),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.specs.contains_key(&normalize_label(label))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
