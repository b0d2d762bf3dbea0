use crate::animator;
use crate::camera3d::Camera3D;
use crate::content::{ContentStore, PanelContent};
use crate::interaction::{OverlayCommand, Session};
use crate::island::{IslandConfig, IslandRegistry};
use crate::picking;
use crate::secret::{KeyToken, OneShotGate, SequenceDetector};
use anyhow::{anyhow, bail, Result};
use glam::Vec2;
use rand::Rng;

/// Owns the interactive scene state and exposes the single-threaded
/// per-frame step. The windowed app and the tests drive the exact same
/// entry points; time is always injected, never read ambiently.
#[derive(Debug)]
pub struct World {
    registry: IslandRegistry,
    content: ContentStore,
    session: Session,
    detector: SequenceDetector,
    gate: OneShotGate,
    aurora: bool,
}

impl World {
    /// Builds the fixed island population and validates every island
    /// id against the content store up front, so a content miss later
    /// is an internal-consistency fault rather than a user-visible one.
    pub fn new(configs: Vec<IslandConfig>, content: ContentStore, rng: &mut impl Rng) -> Result<Self> {
        let registry = IslandRegistry::create(configs, rng)?;
        if registry.is_empty() {
            bail!("World needs at least one island");
        }
        for island in registry.iter() {
            if !content.contains(&island.id) {
                bail!("Island '{}' has no content panel", island.id);
            }
        }
        Ok(Self {
            registry,
            content,
            session: Session::new(),
            detector: SequenceDetector::konami(),
            gate: OneShotGate::new(),
            aurora: false,
        })
    }

    pub fn registry(&self) -> &IslandRegistry {
        &self.registry
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hidden mode flag, latched once by the secret sequence.
    pub fn aurora(&self) -> bool {
        self.aurora
    }

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.session.set_pointer(ndc);
    }

    /// One indivisible frame step: hit-test at the latest pointer
    /// position, hover pass, then animate at the injected elapsed time.
    pub fn frame(&mut self, elapsed_seconds: f32, camera: &Camera3D, aspect: f32) {
        let hit = picking::hit_test(self.session.pointer_ndc(), camera, aspect, &self.registry);
        self.session.update_hover(hit, &mut self.registry);
        let spin = if self.aurora { animator::AURORA_SPIN_BOOST } else { 1.0 };
        animator::advance(&mut self.registry, elapsed_seconds, spin);
    }

    /// Click at the current pointer position. Returns the panel to show
    /// when an overlay opens; `None` when the click missed or was
    /// swallowed by an already-open overlay.
    pub fn click(&mut self, camera: &Camera3D, aspect: f32) -> Result<Option<&PanelContent>> {
        let hit = picking::hit_test(self.session.pointer_ndc(), camera, aspect, &self.registry);
        match self.session.click(hit, &mut self.registry) {
            Some(OverlayCommand::Show(handle)) => {
                let island = self
                    .registry
                    .by_hit_handle(handle)
                    .ok_or_else(|| anyhow!("Hit handle {handle:?} resolves to no island"))?;
                let panel = self.content.get(&island.id).ok_or_else(|| {
                    anyhow!("Island '{}' lost its content panel mid-session", island.id)
                })?;
                Ok(Some(panel))
            }
            _ => Ok(None),
        }
    }

    /// Explicit dismiss from the overlay collaborator. True when an
    /// overlay was actually open.
    pub fn close_overlay(&mut self) -> bool {
        self.session.close(&mut self.registry).is_some()
    }

    /// Routes one key token through the secret-sequence detector.
    /// Returns true only on the single admission of the one-shot gate;
    /// later completions keep matching but no longer fire.
    pub fn key(&mut self, token: KeyToken) -> bool {
        let completed = self.detector.feed(token);
        if self.gate.admit(completed) {
            self.aurora = true;
            eprintln!("[secret] sequence complete, aurora mode on");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::default_archipelago;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn islands_without_panels_are_rejected_at_construction() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut configs = default_archipelago();
        configs.push(crate::island::IslandConfig::new("atlantis", Vec3::ZERO, 1.0, [1.0; 3]));
        let err = World::new(configs, ContentStore::default(), &mut rng).unwrap_err();
        assert!(err.to_string().contains("no content panel"));
    }

    #[test]
    fn aurora_latches_exactly_once() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut world =
            World::new(default_archipelago(), ContentStore::default(), &mut rng).expect("world");
        use crate::secret::KeyToken::*;
        let tokens = [Up, Up, Down, Down, Left, Right, Left, Right, Char('b'), Char('a')];
        let mut fired = 0;
        for _ in 0..2 {
            for token in tokens {
                if world.key(token) {
                    fired += 1;
                }
            }
        }
        assert_eq!(fired, 1);
        assert!(world.aurora());
    }
}
