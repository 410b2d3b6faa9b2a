use std::collections::HashSet;

use bevy::ecs::query::Has;
use bevy::prelude::*;
use bevy::render::mesh::morph::MorphWeights;
use bevy::render::mesh::skinning::SkinnedMesh;
use vizij_expression::{
    ExpressionEngine, MorphDictionary, NodeKind, RigIndex, RigNode, RigWriter,
};

use crate::components::{
    AutoReset, ExpressionDriver, ExpressionRoot, MorphTargetNames, RigBone, RigPending,
};
use crate::resources::ExpressionSettings;
use crate::ExpressionFrameEvent;

/// Where a mesh's morph-target names stand.
enum MorphNames {
    Resolved(MorphDictionary),
    /// No names available; the mesh is skipped.
    Missing,
    /// Mesh asset not loaded yet; retry next frame.
    Loading,
}

fn dictionary(names: &[String]) -> MorphDictionary {
    names
        .iter()
        .enumerate()
        .map(|(slot, name)| (name.clone(), slot))
        .collect()
}

fn resolve_morph_names(
    weights: &MorphWeights,
    hint: Option<&MorphTargetNames>,
    meshes: Option<&Assets<Mesh>>,
) -> MorphNames {
    if let Some(hint) = hint {
        return MorphNames::Resolved(dictionary(&hint.0));
    }
    let (Some(handle), Some(meshes)) = (weights.first_mesh(), meshes) else {
        return MorphNames::Missing;
    };
    match meshes.get(handle) {
        Some(mesh) => match mesh.morph_target_names() {
            Some(names) => MorphNames::Resolved(dictionary(names)),
            None => MorphNames::Missing,
        },
        None => MorphNames::Loading,
    }
}

fn new_engine(settings: &ExpressionSettings) -> ExpressionEngine<Entity> {
    ExpressionEngine::try_new(settings.0.clone()).unwrap_or_else(|err| {
        warn!("invalid expression settings ({err}); falling back to defaults");
        ExpressionEngine::new(Default::default())
    })
}

/// Depth-first list of `root` and all its descendants.
fn walk(e: Entity, children: &Query<&Children>, out: &mut Vec<Entity>) {
    out.push(e);
    if let Ok(cs) = children.get(e) {
        for &c in cs.iter() {
            walk(c, children, out);
        }
    }
}

/// Indexes new roots (and re-indexes existing ones when bones or morph meshes
/// appear underneath, e.g. a glTF scene that finished spawning). Engine state
/// survives a re-index.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn index_rigs_system(
    mut commands: Commands,
    settings: Res<ExpressionSettings>,
    mut roots: Query<(Entity, Option<&mut ExpressionDriver>, Has<RigPending>), With<ExpressionRoot>>,
    fresh: Query<(), Or<(Added<MorphWeights>, Added<RigBone>, Added<SkinnedMesh>)>>,
    children: Query<&Children>,
    nodes: Query<(
        Option<&Name>,
        Has<RigBone>,
        Option<&MorphWeights>,
        Option<&MorphTargetNames>,
    )>,
    skins: Query<&SkinnedMesh>,
    meshes: Option<Res<Assets<Mesh>>>,
) {
    let rescan = !fresh.is_empty();
    for (root, driver, pending) in roots.iter_mut() {
        if driver.is_some() && !pending && !rescan {
            continue;
        }

        let mut subtree = Vec::new();
        walk(root, &children, &mut subtree);
        let joints: HashSet<Entity> = subtree
            .iter()
            .filter_map(|&e| skins.get(e).ok())
            .flat_map(|skin| skin.joints.iter().copied())
            .collect();

        let mut rig_nodes = Vec::with_capacity(subtree.len());
        let mut loading = false;
        for &e in &subtree {
            let Ok((name, marked, weights, hint)) = nodes.get(e) else {
                continue;
            };
            let kind = match weights {
                Some(weights) => match resolve_morph_names(weights, hint, meshes.as_deref()) {
                    MorphNames::Resolved(dict) => NodeKind::Mesh {
                        morph_targets: Some(dict),
                    },
                    MorphNames::Missing => NodeKind::Mesh {
                        morph_targets: None,
                    },
                    MorphNames::Loading => {
                        loading = true;
                        break;
                    }
                },
                None if marked || joints.contains(&e) => NodeKind::Bone,
                None => NodeKind::Other,
            };
            rig_nodes.push(RigNode {
                handle: e,
                name: name.map(|n| n.as_str().to_string()).unwrap_or_default(),
                kind,
            });
        }

        if loading {
            if !pending {
                debug!("expression rig {root:?} waiting on mesh assets");
                commands.entity(root).insert(RigPending);
            }
            continue;
        }
        if pending {
            commands.entity(root).remove::<RigPending>();
        }

        let rig = RigIndex::build(rig_nodes);
        match driver {
            Some(mut driver) => driver.0.load_rig(rig),
            None => {
                let mut engine = new_engine(&settings);
                engine.load_rig(rig);
                commands.entity(root).insert(ExpressionDriver(engine));
            }
        }
    }
}

/// Writes engine output straight into `Transform` and `MorphWeights`.
struct EcsRig<'a, 'tw, 'ts, 'mw, 'ms> {
    transforms: &'a mut Query<'tw, 'ts, &'static mut Transform>,
    weights: &'a mut Query<'mw, 'ms, &'static mut MorphWeights>,
}

impl RigWriter for EcsRig<'_, '_, '_, '_, '_> {
    type Handle = Entity;

    fn set_bone_rotation(&mut self, bone: &Entity, x: f32, y: f32) {
        if let Ok(mut tf) = self.transforms.get_mut(*bone) {
            // keep the authored roll
            let (_, _, z) = tf.rotation.to_euler(EulerRot::XYZ);
            tf.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        }
    }

    fn morph_weights_mut(&mut self, mesh: &Entity) -> Option<&mut [f32]> {
        self.weights
            .get_mut(*mesh)
            .ok()
            .map(|w| w.into_inner().weights_mut())
    }
}

/// Per-frame drive: one engine update per indexed root, events forwarded.
pub fn drive_expressions_system(
    time: Res<Time>,
    mut roots: Query<(
        Entity,
        &mut ExpressionRoot,
        &mut ExpressionDriver,
        Option<&mut AutoReset>,
    )>,
    mut transforms: Query<&'static mut Transform>,
    mut weights: Query<&'static mut MorphWeights>,
    mut events: EventWriter<ExpressionFrameEvent>,
) {
    let dt = time.delta_seconds();
    let mut rig = EcsRig {
        transforms: &mut transforms,
        weights: &mut weights,
    };
    for (root, mut expr, mut driver, reset) in roots.iter_mut() {
        if let Some(mut reset) = reset {
            let label = reset.0.advance(dt);
            if expr.emotion != label {
                expr.emotion = label.to_string();
            }
        }
        let out = driver.0.update(dt, &expr.emotion, &mut rig);
        for event in &out.events {
            events.send(ExpressionFrameEvent {
                root,
                event: event.clone(),
            });
        }
    }
}
