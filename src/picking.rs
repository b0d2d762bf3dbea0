use crate::camera3d::Camera3D;
use crate::island::{HitHandle, IslandRegistry};
use glam::{Vec2, Vec3};

/// A positive intersection along the pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub handle: HitHandle,
    pub distance: f32,
}

/// Pointer coordinates can legitimately leave the viewport mid-drag;
/// clamp instead of failing.
pub fn clamp_ndc(ndc: Vec2) -> Vec2 {
    ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Smallest positive ray parameter at which the ray meets the sphere,
/// or `None` on a miss. A ray starting inside the sphere reports the
/// exit point.
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t_near = -b - sqrt_d;
    if t_near > 0.0 {
        return Some(t_near);
    }
    let t_far = -b + sqrt_d;
    (t_far > 0.0).then_some(t_far)
}

/// Casts a ray from the camera through the normalized pointer
/// coordinate and returns the nearest intersected island. Stateless:
/// re-derived entirely from (pointer, camera, island poses), so a
/// camera orbited between calls never sees stale results.
pub fn hit_test(
    pointer_ndc: Vec2,
    camera: &Camera3D,
    aspect: f32,
    registry: &IslandRegistry,
) -> Option<Hit> {
    let (origin, direction) = camera.ndc_ray(clamp_ndc(pointer_ndc), aspect)?;
    let mut nearest: Option<Hit> = None;
    for (handle, island) in registry.handles().zip(registry.iter()) {
        let (center, radius) = island.hit_sphere();
        if let Some(distance) = ray_sphere(origin, direction, center, radius) {
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(Hit { handle, distance });
            }
        }
    }
    nearest
}
