//! Blend state store: the last expression weight written per channel name.
//!
//! Keyed by name rather than (mesh, index) so symmetric meshes sharing a
//! target name share one value, and so values survive a rig reload.

use std::collections::HashMap;

/// Clamp into [0, 1]; non-finite input collapses to 0.
#[inline]
pub fn sanitize_weight(w: f32) -> f32 {
    if w.is_finite() {
        w.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct BlendStore {
    weights: HashMap<String, f32>,
}

impl BlendStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written weight, 0 for channels never written.
    pub fn get(&self, name: &str) -> f32 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    /// Store a weight (clamped) and return what was stored.
    pub fn set(&mut self, name: &str, weight: f32) -> f32 {
        let w = sanitize_weight(weight);
        match self.weights.get_mut(name) {
            Some(slot) => *slot = w,
            None => {
                self.weights.insert(name.to_string(), w);
            }
        }
        w
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn clear(&mut self) {
        self.weights.clear();
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_channel_reads_zero() {
        let store = BlendStore::new();
        assert_eq!(store.get("mouthSmile"), 0.0);
    }

    #[test]
    fn set_clamps() {
        let mut store = BlendStore::new();
        assert_eq!(store.set("a", 1.7), 1.0);
        assert_eq!(store.set("b", -0.2), 0.0);
        assert_eq!(store.set("c", f32::NAN), 0.0);
        assert_eq!(store.set("a", 0.3), 0.3);
        assert_eq!(store.get("a"), 0.3);
        assert_eq!(store.len(), 3);
    }
}
