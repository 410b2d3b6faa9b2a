//! Rig index and the adapter seam used to write into a host scene.
//!
//! Adapters (Bevy, the in-memory [`Scene`](crate::scene::Scene), a web host)
//! describe their scene once as a flat list of [`RigNode`]s. The index keeps
//! only opaque handles; all mutation goes back through [`RigWriter`].

use indexmap::{IndexMap, IndexSet};

use crate::matching::{eye_side, is_head_bone, EyeSide};

/// Morph-target dictionary of one mesh: target name → weight-array index.
pub type MorphDictionary = IndexMap<String, usize>;

/// What a scene node is, as far as the expression engine cares.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Bone,
    Mesh {
        morph_targets: Option<MorphDictionary>,
    },
    Other,
}

/// One node of the host scene graph.
#[derive(Clone, Debug)]
pub struct RigNode<H> {
    pub handle: H,
    pub name: String,
    pub kind: NodeKind,
}

impl<H> RigNode<H> {
    pub fn bone(handle: H, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            kind: NodeKind::Bone,
        }
    }

    pub fn mesh(handle: H, name: impl Into<String>, morph_targets: Option<MorphDictionary>) -> Self {
        Self {
            handle,
            name: name.into(),
            kind: NodeKind::Mesh { morph_targets },
        }
    }
}

/// A mesh that exposes morph targets.
#[derive(Clone, Debug)]
pub struct MorphMesh<H> {
    pub handle: H,
    pub name: String,
    pub dictionary: MorphDictionary,
}

/// Flat lookup built once per rig load.
#[derive(Clone, Debug)]
pub struct RigIndex<H> {
    pub head: Option<H>,
    pub left_eye: Option<H>,
    pub right_eye: Option<H>,
    pub meshes: Vec<MorphMesh<H>>,
}

impl<H> Default for RigIndex<H> {
    fn default() -> Self {
        Self {
            head: None,
            left_eye: None,
            right_eye: None,
            meshes: Vec::new(),
        }
    }
}

impl<H: Clone> RigIndex<H> {
    /// Single pass over the scene. Later matches replace earlier ones, so in a
    /// depth-first walk `Head` wins over its parent `Neck`. Meshes without a
    /// morph dictionary are ignored.
    pub fn build<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = RigNode<H>>,
    {
        let mut index = RigIndex::default();
        for node in nodes {
            match node.kind {
                NodeKind::Bone => {
                    if is_head_bone(&node.name) {
                        index.head = Some(node.handle.clone());
                    }
                    match eye_side(&node.name) {
                        Some(EyeSide::Left) => index.left_eye = Some(node.handle),
                        Some(EyeSide::Right) => index.right_eye = Some(node.handle),
                        None => {}
                    }
                }
                NodeKind::Mesh {
                    morph_targets: Some(dictionary),
                } => index.meshes.push(MorphMesh {
                    handle: node.handle,
                    name: node.name,
                    dictionary,
                }),
                NodeKind::Mesh {
                    morph_targets: None,
                }
                | NodeKind::Other => {}
            }
        }
        log::debug!(
            "rig indexed: head={} eyes={} morph meshes={}",
            index.head.is_some(),
            index.eyes().is_some(),
            index.meshes.len()
        );
        index
    }
}

impl<H> RigIndex<H> {
    /// Both eye bones, or nothing. Eyes are only animated as a pair.
    pub fn eyes(&self) -> Option<(&H, &H)> {
        match (&self.left_eye, &self.right_eye) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// Union of every morph-target name across meshes, de-duplicated, in
    /// discovery order. Meant for diagnostic listings.
    pub fn morph_target_names(&self) -> Vec<String> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for mesh in &self.meshes {
            names.extend(mesh.dictionary.keys().map(String::as_str));
        }
        names.into_iter().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
            && self.left_eye.is_none()
            && self.right_eye.is_none()
            && self.meshes.is_empty()
    }
}

/// Write access to the host scene. Implemented by adapters.
pub trait RigWriter {
    type Handle;

    /// Overwrite the local X/Y euler rotation of a bone, leaving Z alone.
    fn set_bone_rotation(&mut self, bone: &Self::Handle, x: f32, y: f32);

    /// Live morph weight array of a mesh, if it still exists.
    fn morph_weights_mut(&mut self, mesh: &Self::Handle) -> Option<&mut [f32]>;

    /// Step any skeletal animation mixer the host runs alongside expressions.
    fn advance_animations(&mut self, _dt: f32) {}
}
