use crate::island::{HitHandle, IslandRegistry, OverlayState};
use crate::picking::{clamp_ndc, Hit};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Hovering(HitHandle),
    OverlayOpen(HitHandle),
}

/// Command for the overlay UI collaborator; the engine never draws the
/// panel itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Show(HitHandle),
    Hide,
}

/// Explicit interaction session state: the last pointer position and
/// the hover/overlay phase. Passed a fresh hit-test result every frame
/// rather than reading any ambient state, so the machine is fully
/// exercisable without a window.
#[derive(Debug, Clone)]
pub struct Session {
    pointer_ndc: Vec2,
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self { pointer_ndc: Vec2::ZERO, phase: SessionPhase::Idle }
    }

    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }

    /// Overwrites the last-known pointer position, clamped to [-1, 1].
    /// No history is kept.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer_ndc = clamp_ndc(ndc);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn hovered(&self) -> Option<HitHandle> {
        match self.phase {
            SessionPhase::Hovering(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn open_overlay(&self) -> Option<HitHandle> {
        match self.phase {
            SessionPhase::OverlayOpen(handle) => Some(handle),
            _ => None,
        }
    }

    /// Per-frame hover pass. Recomputes every island's hover flag from
    /// scratch (idempotent, not an edge-triggered diff): hover is never
    /// sticky and clears the same frame the pointer leaves all islands.
    /// Fully suppressed while an overlay is open.
    pub fn update_hover(&mut self, hit: Option<Hit>, registry: &mut IslandRegistry) {
        if matches!(self.phase, SessionPhase::OverlayOpen(_)) {
            for island in registry.iter_mut() {
                island.hovered = false;
            }
            return;
        }
        self.phase = match hit {
            Some(hit) => SessionPhase::Hovering(hit.handle),
            None => SessionPhase::Idle,
        };
        let hovered = self.hovered();
        for (index, island) in registry.iter_mut().enumerate() {
            island.hovered = hovered == Some(HitHandle(index));
        }
    }

    /// Click at the current pointer position. Swallowed entirely while
    /// any overlay is open; otherwise opens the hit island's overlay
    /// and suspends hover until close.
    pub fn click(&mut self, hit: Option<Hit>, registry: &mut IslandRegistry) -> Option<OverlayCommand> {
        if matches!(self.phase, SessionPhase::OverlayOpen(_)) {
            return None;
        }
        let hit = hit?;
        self.phase = SessionPhase::OverlayOpen(hit.handle);
        for island in registry.iter_mut() {
            island.hovered = false;
            island.overlay = OverlayState::Closed;
        }
        if let Some(island) = registry.by_hit_handle_mut(hit.handle) {
            island.overlay = OverlayState::Open;
        }
        Some(OverlayCommand::Show(hit.handle))
    }

    /// Explicit dismiss routed back from the overlay collaborator.
    /// The only way an overlay closes; there are no timeouts.
    pub fn close(&mut self, registry: &mut IslandRegistry) -> Option<OverlayCommand> {
        let SessionPhase::OverlayOpen(handle) = self.phase else {
            return None;
        };
        if let Some(island) = registry.by_hit_handle_mut(handle) {
            island.overlay = OverlayState::Closed;
        }
        self.phase = SessionPhase::Idle;
        Some(OverlayCommand::Hide)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::{default_archipelago, IslandRegistry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (Session, IslandRegistry) {
        let mut rng = StdRng::seed_from_u64(4);
        let registry = IslandRegistry::create(default_archipelago(), &mut rng).expect("registry");
        (Session::new(), registry)
    }

    fn hit(registry: &IslandRegistry, id: &str) -> Option<Hit> {
        registry.handle_of(id).map(|handle| Hit { handle, distance: 10.0 })
    }

    #[test]
    fn hover_follows_the_hit_and_clears_the_same_frame() {
        let (mut session, mut registry) = fixture();
        let about = hit(&registry, "about");
        session.update_hover(about, &mut registry);
        assert_eq!(session.hovered(), registry.handle_of("about"));
        assert!(registry.by_hit_handle(registry.handle_of("about").unwrap()).unwrap().hovered);

        session.update_hover(None, &mut registry);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(registry.iter().all(|i| !i.hovered));
    }

    #[test]
    fn hover_and_open_overlay_are_mutually_exclusive() {
        let (mut session, mut registry) = fixture();
        let projects = hit(&registry, "projects");
        session.update_hover(projects, &mut registry);
        assert_eq!(session.click(projects, &mut registry), Some(OverlayCommand::Show(projects.unwrap().handle)));
        assert!(session.hovered().is_none());
        assert!(session.open_overlay().is_some());
        for island in registry.iter() {
            let expected =
                if island.id == "projects" { OverlayState::Open } else { OverlayState::Closed };
            assert_eq!(island.overlay, expected);
        }

        // Hover stays suppressed while the overlay is open, even with a
        // live hit under the pointer.
        session.update_hover(hit(&registry, "about"), &mut registry);
        assert!(session.hovered().is_none());
        assert!(registry.iter().all(|i| !i.hovered));
    }

    #[test]
    fn click_while_open_is_swallowed() {
        let (mut session, mut registry) = fixture();
        session.click(hit(&registry, "about"), &mut registry);
        let open = session.open_overlay();
        assert_eq!(session.click(hit(&registry, "projects"), &mut registry), None);
        assert_eq!(session.open_overlay(), open, "open overlay unchanged by the second click");
    }

    #[test]
    fn close_then_reopen_switches_islands() {
        let (mut session, mut registry) = fixture();
        session.click(hit(&registry, "about"), &mut registry);
        assert_eq!(session.close(&mut registry), Some(OverlayCommand::Hide));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(registry.iter().all(|i| i.overlay == OverlayState::Closed));
        session.click(hit(&registry, "projects"), &mut registry);
        assert_eq!(session.open_overlay(), registry.handle_of("projects"));
    }

    #[test]
    fn close_without_an_open_overlay_is_a_no_op() {
        let (mut session, mut registry) = fixture();
        assert_eq!(session.close(&mut registry), None);
    }

    #[test]
    fn pointer_is_clamped_into_ndc_range() {
        let mut session = Session::new();
        session.set_pointer(Vec2::new(3.5, -9.0));
        assert_eq!(session.pointer_ndc(), Vec2::new(1.0, -1.0));
    }
}
