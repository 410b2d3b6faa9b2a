//! Engine: owns the rig index and all per-frame animation state.
//!
//! `update` runs a fixed order every frame:
//! mixer → idle motion → blink timer → emotion change → expression blend → blink override.
//! Blink writes come last so they win on shared channels.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::blend::BlendStore;
use crate::blink::{BlinkEdge, BlinkPhase, BlinkScheduler};
use crate::catalog::{normalize_label, EmotionCatalog, NEUTRAL};
use crate::config::Config;
use crate::error::ExpressionError;
use crate::idle::IdleMotion;
use crate::matching::{is_blink_channel, lowercase_all, matches_any_lower};
use crate::outputs::{ExpressionEvent, Outputs};
use crate::rig::{RigIndex, RigWriter};
use crate::transition::{Transition, TransitionPhase};

#[derive(Clone, Debug, Default)]
struct ChannelInfo {
    /// ASCII-lowercased name, computed once per rig load.
    lower: String,
    blink: bool,
    /// Matches a fragment of the current transition target.
    active: bool,
}

/// Unique channel names of the loaded rig plus, per mesh, which weight slot
/// each name feeds. Built in `load_rig`, never rebuilt per frame.
#[derive(Clone, Debug, Default)]
struct ChannelTable {
    channels: IndexMap<String, ChannelInfo>,
    /// `mesh_slots[mesh] = [(weight slot, channel index)]`
    mesh_slots: Vec<Vec<(usize, usize)>>,
}

impl ChannelTable {
    fn build<H>(rig: &RigIndex<H>) -> Self {
        let mut table = ChannelTable::default();
        for mesh in &rig.meshes {
            let mut slots = Vec::with_capacity(mesh.dictionary.len());
            for (name, &slot) in &mesh.dictionary {
                let entry = table.channels.entry(name.clone());
                let idx = entry.index();
                entry.or_insert_with(|| ChannelInfo {
                    lower: name.to_ascii_lowercase(),
                    blink: is_blink_channel(name),
                    active: false,
                });
                slots.push((slot, idx));
            }
            table.mesh_slots.push(slots);
        }
        table
    }

    fn activate<S: AsRef<str>>(&mut self, fragments: &[S]) {
        let fragments = lowercase_all(fragments);
        for info in self.channels.values_mut() {
            info.active = matches_any_lower(&info.lower, &fragments);
        }
    }
}

/// Per-frame expression engine bound to one rig.
#[derive(Debug)]
pub struct ExpressionEngine<H, R = StdRng> {
    cfg: Config,
    catalog: EmotionCatalog,

    rig: RigIndex<H>,
    channels: ChannelTable,

    store: BlendStore,
    transition: Transition,
    blink: BlinkScheduler<R>,
    idle: IdleMotion,

    clock: f64,
    observed: String,
    rig_loaded: bool,

    // Per-frame scratch: value computed for each channel this frame.
    frame_values: Vec<Option<f32>>,
    outputs: Outputs,
}

impl<H> ExpressionEngine<H, StdRng> {
    /// Engine with an entropy-seeded RNG for blink timing.
    pub fn new(cfg: Config) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) but rejects invalid configuration.
    pub fn try_new(cfg: Config) -> Result<Self, ExpressionError> {
        cfg.validate()?;
        Ok(Self::new(cfg))
    }
}

impl<H, R: Rng> ExpressionEngine<H, R> {
    /// Engine with an injected RNG (seed it for deterministic blinking).
    pub fn with_rng(cfg: Config, rng: R) -> Self {
        let catalog = EmotionCatalog::builtin().with_default_intensity(cfg.default_intensity);
        let transition = Transition::settled(
            cfg.transition_duration,
            cfg.easing,
            catalog.lookup(NEUTRAL),
        );
        Self {
            blink: BlinkScheduler::new(cfg.blink, rng),
            idle: IdleMotion::new(cfg.idle),
            catalog,
            rig: RigIndex::default(),
            channels: ChannelTable::default(),
            store: BlendStore::new(),
            transition,
            clock: 0.0,
            observed: NEUTRAL.to_string(),
            rig_loaded: false,
            frame_values: Vec::new(),
            outputs: Outputs::default(),
            cfg,
        }
    }

    /// Swap the emotion catalog. Takes effect on the next emotion change.
    pub fn with_catalog(mut self, catalog: EmotionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Install a freshly indexed rig. Blend state is kept by channel name, so a
    /// reloaded avatar resumes from the same expression.
    pub fn load_rig(&mut self, rig: RigIndex<H>) {
        self.channels = ChannelTable::build(&rig);
        self.channels.activate(&self.transition.target.fragments);
        self.frame_values = vec![None; self.channels.channels.len()];
        self.rig = rig;
        self.rig_loaded = true;
        log::debug!(
            "expression rig loaded: {} channels over {} meshes",
            self.channels.channels.len(),
            self.rig.meshes.len()
        );
    }

    /// Advance one rendered frame and write into `rig`.
    pub fn update<W>(&mut self, dt: f32, emotion: &str, rig: &mut W) -> &Outputs
    where
        W: RigWriter<Handle = H>,
    {
        self.outputs.clear();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.rig_loaded {
            self.rig_loaded = false;
            self.outputs.push_event(ExpressionEvent::RigLoaded {
                morph_targets: self.rig.morph_target_names(),
            });
        }

        // 1) external mixer
        rig.advance_animations(dt);

        // 2) idle motion
        self.clock += f64::from(dt);
        self.apply_idle(rig);

        // 3) blink timer
        match self.blink.advance(dt) {
            Some(BlinkEdge::Closed) => {
                log::trace!("blink closed at t={:.3}", self.clock);
                self.outputs.push_event(ExpressionEvent::BlinkStarted);
            }
            Some(BlinkEdge::Opened) => {
                log::trace!("blink opened at t={:.3}", self.clock);
                self.outputs.push_event(ExpressionEvent::BlinkEnded);
            }
            None => {}
        }

        // 4) emotion change
        let label = normalize_label(emotion);
        if label != self.observed {
            self.begin_transition(label);
        }

        // 5) expression blend
        let was_complete = self.transition.is_complete();
        self.transition.advance(dt);
        if !was_complete && self.transition.is_complete() {
            self.outputs.push_event(ExpressionEvent::TransitionCompleted {
                label: self.transition.to.clone(),
            });
        }
        self.apply_expression(rig);

        // 6) blink override
        self.apply_blink(rig);

        &self.outputs
    }

    fn begin_transition(&mut self, label: String) {
        let spec = self.catalog.lookup(&label);
        log::debug!(
            "expression transition {} -> {} ({} fragments, intensity {})",
            self.observed,
            label,
            spec.fragments.len(),
            spec.intensity
        );
        self.channels.activate(&spec.fragments);
        self.transition.begin(&self.observed, spec, &self.store);
        self.outputs.push_event(ExpressionEvent::TransitionStarted {
            from: std::mem::replace(&mut self.observed, label.clone()),
            to: label,
        });
    }

    fn apply_idle<W: RigWriter<Handle = H>>(&self, rig: &mut W) {
        if !self.idle.enabled() {
            return;
        }
        let pose = self.idle.pose_at(self.clock);
        if let Some(head) = &self.rig.head {
            rig.set_bone_rotation(head, pose.head[0], pose.head[1]);
        }
        if let Some((left, right)) = self.rig.eyes() {
            rig.set_bone_rotation(left, pose.eyes[0], pose.eyes[1]);
            rig.set_bone_rotation(right, pose.eyes[0], pose.eyes[1]);
        }
    }

    fn apply_expression<W: RigWriter<Handle = H>>(&mut self, rig: &mut W) {
        // Each unique name is blended once, then fanned out to every mesh slot.
        for (value, (name, info)) in self
            .frame_values
            .iter_mut()
            .zip(self.channels.channels.iter())
        {
            *value = self
                .transition
                .channel_weight(name, info.active)
                .map(|w| self.store.set(name, w));
        }

        for (mesh, slots) in self.rig.meshes.iter().zip(&self.channels.mesh_slots) {
            let Some(weights) = rig.morph_weights_mut(&mesh.handle) else {
                log::trace!("morph mesh '{}' no longer available", mesh.name);
                continue;
            };
            if self.cfg.clear_weights_each_frame {
                weights.fill(0.0);
            }
            for &(slot, ch) in slots {
                if let (Some(v), Some(w)) = (self.frame_values[ch], weights.get_mut(slot)) {
                    *w = v;
                }
            }
        }
    }

    /// Blink channels follow the blink timer alone: 1 while closed, 0 while
    /// open, whatever the expression wrote this frame.
    fn apply_blink<W: RigWriter<Handle = H>>(&self, rig: &mut W) {
        let value = if self.blink.is_blinking() { 1.0 } else { 0.0 };
        let channels = &self.channels.channels;
        for (mesh, slots) in self.rig.meshes.iter().zip(&self.channels.mesh_slots) {
            let Some(weights) = rig.morph_weights_mut(&mesh.handle) else {
                continue;
            };
            for &(slot, ch) in slots {
                let is_blink = channels
                    .get_index(ch)
                    .map(|(_, info)| info.blink)
                    .unwrap_or(false);
                if !is_blink {
                    continue;
                }
                if let Some(w) = weights.get_mut(slot) {
                    *w = value;
                }
            }
        }
    }
}

impl<H, R> ExpressionEngine<H, R> {
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn catalog(&self) -> &EmotionCatalog {
        &self.catalog
    }

    pub fn rig(&self) -> &RigIndex<H> {
        &self.rig
    }

    /// Last expression weight written for a channel name (blink excluded).
    pub fn weight(&self, channel: &str) -> f32 {
        self.store.get(channel)
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn phase(&self) -> TransitionPhase<'_> {
        self.transition.phase()
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.blink.phase()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_blinking()
    }

    /// Seconds of accumulated frame time; drives idle motion.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Most recently observed emotion label (normalized).
    pub fn current_label(&self) -> &str {
        &self.observed
    }

    /// Union of morph-target names on the loaded rig.
    pub fn morph_target_names(&self) -> Vec<String> {
        self.rig.morph_target_names()
    }

    /// Channels the blink scheduler overrides, in discovery order.
    pub fn blink_channels(&self) -> impl Iterator<Item = &str> {
        self.channels
            .channels
            .iter()
            .filter(|(_, info)| info.blink)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::{MorphDictionary, RigNode};
    use crate::scene::Scene;

    fn dict(names: &[&str]) -> MorphDictionary {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), i))
            .collect()
    }

    #[test]
    fn channel_table_dedupes_names_across_meshes() {
        let rig = RigIndex::build(vec![
            RigNode::mesh(0usize, "Head", Some(dict(&["mouthSmile", "eyeBlinkLeft"]))),
            RigNode::mesh(1usize, "Beard", Some(dict(&["jawOpen", "mouthSmile"]))),
        ]);
        let table = ChannelTable::build(&rig);
        assert_eq!(table.channels.len(), 3);
        assert_eq!(table.mesh_slots[0], vec![(0, 0), (1, 1)]);
        assert_eq!(table.mesh_slots[1], vec![(0, 2), (1, 0)]);
        assert!(table.channels["eyeBlinkLeft"].blink);
    }

    #[test]
    fn activation_ignores_case_of_rig_names() {
        let rig = RigIndex::build(vec![RigNode::mesh(
            0usize,
            "Face",
            Some(dict(&["MOUTHSMILE_L", "BrowDownLeft", "mouth"])),
        )]);
        let mut table = ChannelTable::build(&rig);
        assert_eq!(table.channels["MOUTHSMILE_L"].lower, "mouthsmile_l");

        table.activate(&["mouthSmile", "cheekSquintLeft"]);
        assert!(table.channels["MOUTHSMILE_L"].active);
        assert!(!table.channels["BrowDownLeft"].active);
        // short names match any fragment containing them
        assert!(table.channels["mouth"].active);

        table.activate::<&str>(&[]);
        assert!(table.channels.values().all(|info| !info.active));
    }

    #[test]
    fn clock_keeps_frame_resolution_after_a_day() {
        let mut scene = Scene::new();
        scene.add_bone("Head");
        let mut engine: ExpressionEngine<usize, StdRng> =
            ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
        engine.load_rig(scene.index());
        engine.clock = 86_400.0;

        engine.update(1.0 / 60.0, NEUTRAL, &mut scene);
        let step = engine.clock() - 86_400.0;
        assert!((step - 1.0 / 60.0).abs() < 1e-6, "step {step}");
    }

    #[test]
    fn first_update_reports_rig_load_once() {
        let mut scene = Scene::new();
        scene.add_mesh("Head", &["mouthSmile", "browDownLeft"]);
        let mut engine: ExpressionEngine<usize, StdRng> =
            ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
        engine.load_rig(scene.index());

        let out = engine.update(0.0, NEUTRAL, &mut scene);
        assert_eq!(
            out.events,
            vec![ExpressionEvent::RigLoaded {
                morph_targets: vec!["mouthSmile".into(), "browDownLeft".into()],
            }]
        );
        assert!(engine.update(0.0, NEUTRAL, &mut scene).is_empty());
    }

    #[test]
    fn label_change_emits_transition_events() {
        let mut scene = Scene::new();
        scene.add_mesh("Head", &["mouthSmile"]);
        let mut engine = ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
        engine.load_rig(scene.index());
        engine.update(0.0, NEUTRAL, &mut scene);

        let out = engine.update(0.1, "Happy", &mut scene);
        assert!(out.events.contains(&ExpressionEvent::TransitionStarted {
            from: "neutral".into(),
            to: "happy".into(),
        }));
        assert_eq!(engine.current_label(), "happy");

        let out = engine.update(1.0, "happy", &mut scene);
        assert!(out.events.contains(&ExpressionEvent::TransitionCompleted {
            label: "happy".into(),
        }));
    }

    #[test]
    fn invalid_delta_is_ignored() {
        let mut scene = Scene::new();
        scene.add_mesh("Head", &["mouthSmile"]);
        let mut engine = ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
        engine.load_rig(scene.index());
        engine.update(f32::NAN, "happy", &mut scene);
        engine.update(-1.0, "happy", &mut scene);
        assert_eq!(engine.clock(), 0.0);
        assert_eq!(engine.weight("mouthSmile"), 0.0);
    }

    #[test]
    fn try_new_rejects_bad_config() {
        let cfg = Config {
            transition_duration: -1.0,
            ..Config::default()
        };
        assert!(ExpressionEngine::<usize>::try_new(cfg).is_err());
    }
}
