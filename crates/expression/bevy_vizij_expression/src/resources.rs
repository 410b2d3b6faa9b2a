use bevy::prelude::*;
use vizij_expression::Config;

/// Engine configuration used for every newly indexed root.
/// Insert before adding the plugin to override the defaults.
#[derive(Resource, Debug, Clone, Default)]
pub struct ExpressionSettings(pub Config);
