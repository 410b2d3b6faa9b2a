//! Minimal in-memory rig for headless hosts, tests and benchmarks.

use crate::rig::{MorphDictionary, NodeKind, RigIndex, RigNode, RigWriter};

#[derive(Clone, Debug)]
pub enum SceneNodeKind {
    Bone {
        /// Local euler rotation (x, y, z) in radians.
        rotation: [f32; 3],
    },
    Mesh {
        dictionary: Option<MorphDictionary>,
        weights: Vec<f32>,
    },
    Group,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub kind: SceneNodeKind,
}

/// Flat node list; handles are node indices.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    /// Seconds the host mixer has been advanced.
    pub mixer_time: f32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, kind: SceneNodeKind) -> usize {
        self.nodes.push(SceneNode {
            name: name.to_string(),
            kind,
        });
        self.nodes.len() - 1
    }

    pub fn add_bone(&mut self, name: &str) -> usize {
        self.push(name, SceneNodeKind::Bone { rotation: [0.0; 3] })
    }

    /// Mesh whose morph dictionary maps `targets[i]` to slot `i`.
    pub fn add_mesh(&mut self, name: &str, targets: &[&str]) -> usize {
        let dictionary: MorphDictionary = targets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        self.push(
            name,
            SceneNodeKind::Mesh {
                dictionary: Some(dictionary),
                weights: vec![0.0; targets.len()],
            },
        )
    }

    pub fn add_group(&mut self, name: &str) -> usize {
        self.push(name, SceneNodeKind::Group)
    }

    /// Describe the scene for [`RigIndex::build`].
    pub fn rig_nodes(&self) -> impl Iterator<Item = RigNode<usize>> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| RigNode {
            handle: i,
            name: node.name.clone(),
            kind: match &node.kind {
                SceneNodeKind::Bone { .. } => NodeKind::Bone,
                SceneNodeKind::Mesh { dictionary, .. } => NodeKind::Mesh {
                    morph_targets: dictionary.clone(),
                },
                SceneNodeKind::Group => NodeKind::Other,
            },
        })
    }

    pub fn index(&self) -> RigIndex<usize> {
        RigIndex::build(self.rig_nodes())
    }

    pub fn weights(&self, mesh: usize) -> Option<&[f32]> {
        match self.nodes.get(mesh).map(|n| &n.kind) {
            Some(SceneNodeKind::Mesh { weights, .. }) => Some(weights.as_slice()),
            _ => None,
        }
    }

    /// Live weight of a named target on one mesh.
    pub fn weight(&self, mesh: usize, target: &str) -> Option<f32> {
        match self.nodes.get(mesh).map(|n| &n.kind) {
            Some(SceneNodeKind::Mesh {
                dictionary: Some(dictionary),
                weights,
            }) => dictionary
                .get(target)
                .and_then(|&slot| weights.get(slot).copied()),
            _ => None,
        }
    }

    pub fn bone_rotation(&self, bone: usize) -> Option<[f32; 3]> {
        match self.nodes.get(bone).map(|n| &n.kind) {
            Some(SceneNodeKind::Bone { rotation }) => Some(*rotation),
            _ => None,
        }
    }
}

impl RigWriter for Scene {
    type Handle = usize;

    fn set_bone_rotation(&mut self, bone: &usize, x: f32, y: f32) {
        if let Some(SceneNode {
            kind: SceneNodeKind::Bone { rotation },
            ..
        }) = self.nodes.get_mut(*bone)
        {
            rotation[0] = x;
            rotation[1] = y;
        }
    }

    fn morph_weights_mut(&mut self, mesh: &usize) -> Option<&mut [f32]> {
        match self.nodes.get_mut(*mesh) {
            Some(SceneNode {
                kind: SceneNodeKind::Mesh { weights, .. },
                ..
            }) => Some(weights.as_mut_slice()),
            _ => None,
        }
    }

    fn advance_animations(&mut self, dt: f32) {
        self.mixer_time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_touches_only_matching_kinds() {
        let mut scene = Scene::new();
        let head = scene.add_bone("Head");
        let mesh = scene.add_mesh("Face", &["jawOpen"]);
        let group = scene.add_group("Armature");

        scene.set_bone_rotation(&head, 0.1, 0.2);
        scene.set_bone_rotation(&mesh, 0.5, 0.5);
        assert_eq!(scene.bone_rotation(head), Some([0.1, 0.2, 0.0]));
        assert!(scene.morph_weights_mut(&group).is_none());
        assert!(scene.morph_weights_mut(&99).is_none());

        scene.morph_weights_mut(&mesh).unwrap()[0] = 0.4;
        assert_eq!(scene.weight(mesh, "jawOpen"), Some(0.4));
        assert_eq!(scene.weight(mesh, "mouthSmile"), None);
    }

    #[test]
    fn index_sees_scene_layout() {
        let mut scene = Scene::new();
        scene.add_group("Armature");
        let head = scene.add_bone("Head");
        scene.add_mesh("Face", &["mouthSmile"]);
        let index = scene.index();
        assert_eq!(index.head, Some(head));
        assert_eq!(index.morph_target_names(), vec!["mouthSmile"]);
    }
}
