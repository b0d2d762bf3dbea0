use anyhow::{bail, Result};
use glam::{Mat4, Quat, Vec3};
use rand::Rng;

/// Opaque index the hit-tester hands back; one-to-one with an island
/// for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitHandle(pub(crate) usize);

impl HitHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct IslandConfig {
    pub id: String,
    pub position: Vec3,
    pub radius: f32,
    pub color: [f32; 3],
}

impl IslandConfig {
    pub fn new(id: impl Into<String>, position: Vec3, radius: f32, color: [f32; 3]) -> Self {
        Self { id: id.into(), position, radius, color }
    }
}

/// Per-island motion constants, drawn once at construction. Each field
/// is sampled from the documented range so no two islands animate in
/// lockstep, while a seeded RNG reproduces the exact same set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// rad/s around the island's own Y axis.
    pub spin_rate: f32,
    /// World units of vertical bob.
    pub bob_amplitude: f32,
    /// rad/s of the bob oscillation.
    pub bob_speed: f32,
    /// Phase offset so islands bob out of step.
    pub bob_phase: f32,
    /// rad/s of the particle motes circling the island.
    pub mote_orbit_rate: f32,
}

impl MotionParams {
    pub const SPIN_RATE: (f32, f32) = (0.15, 0.45);
    pub const BOB_AMPLITUDE: (f32, f32) = (0.6, 1.6);
    pub const BOB_SPEED: (f32, f32) = (0.4, 0.9);
    pub const MOTE_ORBIT_RATE: (f32, f32) = (0.5, 1.4);

    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            spin_rate: rng.gen_range(Self::SPIN_RATE.0..Self::SPIN_RATE.1),
            bob_amplitude: rng.gen_range(Self::BOB_AMPLITUDE.0..Self::BOB_AMPLITUDE.1),
            bob_speed: rng.gen_range(Self::BOB_SPEED.0..Self::BOB_SPEED.1),
            bob_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            mote_orbit_rate: rng.gen_range(Self::MOTE_ORBIT_RATE.0..Self::MOTE_ORBIT_RATE.1),
        }
    }
}

/// Derived pose, recomputed every frame by the animator. Never
/// persisted; the base position stays authoritative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open,
}

#[derive(Debug, Clone)]
pub struct Island {
    pub id: String,
    pub base_position: Vec3,
    pub hit_radius: f32,
    pub color: [f32; 3],
    pub motion: MotionParams,
    pub transform: IslandTransform,
    pub hovered: bool,
    pub overlay: OverlayState,
}

impl Island {
    /// Center and radius of the hit-test sphere at the island's
    /// current pose.
    pub fn hit_sphere(&self) -> (Vec3, f32) {
        (self.transform.position, self.hit_radius * self.transform.scale)
    }

    /// Model matrix for rendering: the unit sphere scaled out to the
    /// island's radius at its current pose.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.hit_radius * self.transform.scale),
            self.transform.rotation,
            self.transform.position,
        )
    }
}

/// Owns the interactive islands. Population is fixed at `create`; the
/// ordered list never grows or shrinks mid-session.
#[derive(Debug)]
pub struct IslandRegistry {
    islands: Vec<Island>,
}

impl IslandRegistry {
    pub fn create(configs: Vec<IslandConfig>, rng: &mut impl Rng) -> Result<Self> {
        let mut islands: Vec<Island> = Vec::with_capacity(configs.len());
        for config in configs {
            if islands.iter().any(|i| i.id == config.id) {
                bail!("Duplicate island id '{}'", config.id);
            }
            let motion = MotionParams::sample(rng);
            islands.push(Island {
                transform: IslandTransform {
                    position: config.position,
                    rotation: Quat::IDENTITY,
                    scale: 1.0,
                },
                id: config.id,
                base_position: config.position,
                hit_radius: config.radius,
                color: config.color,
                motion,
                hovered: false,
                overlay: OverlayState::Closed,
            });
        }
        Ok(Self { islands })
    }

    pub fn len(&self) -> usize {
        self.islands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Island> {
        self.islands.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Island> {
        self.islands.iter_mut()
    }

    pub fn handles(&self) -> impl Iterator<Item = HitHandle> {
        (0..self.islands.len()).map(HitHandle)
    }

    pub fn by_hit_handle(&self, handle: HitHandle) -> Option<&Island> {
        self.islands.get(handle.0)
    }

    pub fn by_hit_handle_mut(&mut self, handle: HitHandle) -> Option<&mut Island> {
        self.islands.get_mut(handle.0)
    }

    pub fn handle_of(&self, id: &str) -> Option<HitHandle> {
        self.islands.iter().position(|i| i.id == id).map(HitHandle)
    }
}

/// The stock four-island layout, spread around the camera target.
pub fn default_archipelago() -> Vec<IslandConfig> {
    vec![
        IslandConfig::new("about", Vec3::new(30.0, 24.0, 10.0), 6.0, [0.55, 0.62, 0.76]),
        IslandConfig::new("projects", Vec3::new(-20.0, 14.0, 40.0), 6.5, [0.42, 0.68, 0.58]),
        IslandConfig::new("experience", Vec3::new(8.0, 22.0, -32.0), 5.5, [0.72, 0.56, 0.44]),
        IslandConfig::new("playground", Vec3::new(-14.0, 27.0, -16.0), 5.0, [0.64, 0.48, 0.72]),
    ]
}
