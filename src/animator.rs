use crate::island::{Island, IslandRegistry};
use crate::wrap_angle;
use glam::{Quat, Vec3};

/// Scale applied to a hovered island; reverted the frame hover ends.
pub const HOVER_SCALE: f32 = 1.15;

/// Spin multiplier while the hidden aurora mode is active.
pub const AURORA_SPIN_BOOST: f32 = 1.6;

/// Orbit radius of the particle motes, relative to the hit radius.
const MOTE_ORBIT_FACTOR: f32 = 1.8;
const MOTE_WOBBLE: f32 = 0.35;

/// Recomputes every island's pose for the given elapsed time.
/// `spin_multiplier` is 1.0 in the normal mode and
/// [`AURORA_SPIN_BOOST`] while the hidden mode is active.
///
/// Pure in (elapsed, motion params, hover flag, multiplier): replaying
/// the same elapsed sequence against the same registry yields identical
/// transforms. Precondition: `elapsed_seconds` is monotonic
/// non-decreasing across calls; motion under a decreasing clock is
/// undefined but never panics.
pub fn advance(registry: &mut IslandRegistry, elapsed_seconds: f32, spin_multiplier: f32) {
    for island in registry.iter_mut() {
        island.transform.rotation = Quat::from_rotation_y(wrap_angle(
            island.motion.spin_rate * spin_multiplier * elapsed_seconds,
        ));
        let bob = island.motion.bob_amplitude
            * (elapsed_seconds * island.motion.bob_speed + island.motion.bob_phase).sin();
        island.transform.position = Vec3::new(
            island.base_position.x,
            island.base_position.y + bob,
            island.base_position.z,
        );
        island.transform.scale = if island.hovered { HOVER_SCALE } else { 1.0 };
    }
}

/// World positions of the motes circling one island at the given time.
/// Motes are spaced evenly around the orbit and share the island's
/// per-entity orbit rate.
pub fn mote_positions(island: &Island, elapsed_seconds: f32, count: u32) -> Vec<Vec3> {
    let center = island.transform.position;
    let orbit_radius = island.hit_radius * MOTE_ORBIT_FACTOR;
    (0..count)
        .map(|k| {
            let phase = std::f32::consts::TAU * k as f32 / count.max(1) as f32;
            let angle = island.motion.mote_orbit_rate * elapsed_seconds + phase;
            center
                + Vec3::new(
                    orbit_radius * angle.cos(),
                    MOTE_WOBBLE * island.hit_radius * (angle * 2.0 + island.motion.bob_phase).sin(),
                    orbit_radius * angle.sin(),
                )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::{default_archipelago, IslandRegistry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry(seed: u64) -> IslandRegistry {
        let mut rng = StdRng::seed_from_u64(seed);
        IslandRegistry::create(default_archipelago(), &mut rng).expect("registry")
    }

    #[test]
    fn replay_produces_identical_transforms() {
        let mut a = registry(7);
        let mut b = registry(7);
        for t in [0.0, 0.016, 1.5, 42.0, 300.25] {
            advance(&mut a, t, 1.0);
            advance(&mut b, t, 1.0);
            for (ia, ib) in a.iter().zip(b.iter()) {
                assert_eq!(ia.transform, ib.transform, "island '{}' diverged at t={t}", ia.id);
            }
        }
    }

    #[test]
    fn bob_stays_within_amplitude_of_base() {
        let mut reg = registry(3);
        let mut t = 0.0;
        while t < 30.0 {
            advance(&mut reg, t, 1.0);
            for island in reg.iter() {
                let offset = (island.transform.position.y - island.base_position.y).abs();
                assert!(offset <= island.motion.bob_amplitude + 1e-4);
                assert_eq!(island.transform.position.x, island.base_position.x);
                assert_eq!(island.transform.position.z, island.base_position.z);
            }
            t += 0.37;
        }
    }

    #[test]
    fn hover_scale_is_applied_and_reverted_per_frame() {
        let mut reg = registry(1);
        let handle = reg.handle_of("projects").expect("handle");
        reg.by_hit_handle_mut(handle).expect("island").hovered = true;
        advance(&mut reg, 2.0, 1.0);
        for island in reg.iter() {
            let expected = if island.id == "projects" { HOVER_SCALE } else { 1.0 };
            assert_eq!(island.transform.scale, expected);
        }
        reg.by_hit_handle_mut(handle).expect("island").hovered = false;
        advance(&mut reg, 2.1, 1.0);
        assert!(reg.iter().all(|i| i.transform.scale == 1.0));
    }

    #[test]
    fn spin_multiplier_scales_the_spin_angle() {
        let mut boosted = registry(9);
        let mut normal = registry(9);
        advance(&mut boosted, 4.0, AURORA_SPIN_BOOST);
        advance(&mut normal, 4.0, 1.0);
        for (b, n) in boosted.iter().zip(normal.iter()) {
            let expected = Quat::from_rotation_y(wrap_angle(
                b.motion.spin_rate * AURORA_SPIN_BOOST * 4.0,
            ));
            assert!(b.transform.rotation.abs_diff_eq(expected, 1e-5));
            // Bob and position are untouched by the boost.
            assert_eq!(b.transform.position, n.transform.position);
        }
    }

    #[test]
    fn motes_orbit_at_fixed_radius() {
        let mut reg = registry(13);
        advance(&mut reg, 5.0, 1.0);
        let island = reg.iter().next().expect("island");
        let motes = mote_positions(island, 5.0, 6);
        assert_eq!(motes.len(), 6);
        let orbit_radius = island.hit_radius * MOTE_ORBIT_FACTOR;
        for mote in motes {
            let planar = glam::Vec2::new(
                mote.x - island.transform.position.x,
                mote.z - island.transform.position.z,
            );
            assert!((planar.length() - orbit_radius).abs() < 1e-3);
        }
    }
}
