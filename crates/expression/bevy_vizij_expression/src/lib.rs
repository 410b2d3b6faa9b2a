//! Bevy adapter for vizij-expression-core.
//!
//! Tag a character's root entity with [`ExpressionRoot`]; the plugin indexes
//! its bones and morph meshes, attaches an [`ExpressionDriver`] and then
//! blends the requested emotion, blinks and idles every `Update`.

use bevy::prelude::*;
use vizij_expression::ExpressionEvent;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{
    AutoReset, ExpressionDriver, ExpressionRoot, MorphTargetNames, RigBone, RigPending,
};
pub use resources::ExpressionSettings;

/// Engine event tagged with the root entity that produced it.
#[derive(Event, Debug, Clone)]
pub struct ExpressionFrameEvent {
    pub root: Entity,
    pub event: ExpressionEvent,
}

pub struct VizijExpressionPlugin;

impl Plugin for VizijExpressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ExpressionSettings>()
            .add_event::<ExpressionFrameEvent>()
            .add_systems(
                Update,
                (
                    systems::index_rigs_system,
                    systems::drive_expressions_system,
                )
                    .chain(),
            );
    }
}
