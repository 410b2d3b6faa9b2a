use bevy::prelude::*;
use vizij_expression::{EmotionSelector, ExpressionEngine};

/// Root of a rigged character. The index system walks its descendants for
/// bones and morph meshes; `emotion` is the label fed to the engine each frame.
#[derive(Component, Debug, Clone)]
pub struct ExpressionRoot {
    pub emotion: String,
}

impl Default for ExpressionRoot {
    fn default() -> Self {
        Self {
            emotion: vizij_expression::NEUTRAL.to_string(),
        }
    }
}

/// Marks an entity as a bone for head/eye lookup. Joints referenced by a
/// `SkinnedMesh` under the root count as bones without it.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RigBone;

/// Optional morph-target names for a `MorphWeights` entity. When absent the
/// names come from the mesh asset.
#[derive(Component, Debug, Clone)]
pub struct MorphTargetNames(pub Vec<String>);

/// Per-root engine, inserted once the rig has been indexed.
#[derive(Component, Debug)]
pub struct ExpressionDriver(pub ExpressionEngine<Entity>);

/// Optional: pick emotions through a selector that falls back to neutral.
/// While present, `ExpressionRoot::emotion` mirrors the selector.
#[derive(Component, Debug, Clone)]
pub struct AutoReset(pub EmotionSelector);

/// Root whose rig references a mesh asset that is still loading.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RigPending;
