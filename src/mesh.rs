use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Unit UV sphere centered at the origin. Islands and their motes are
/// all instances of this one mesh, scaled per instance.
pub fn uv_sphere(stacks: u32, slices: u32) -> SphereMesh {
    let stacks = stacks.max(3);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=slices {
            let theta = std::f32::consts::TAU * j as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let p = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            vertices.push(Vertex { position: p, normal: p });
        }
    }
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    let ring = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = (i * ring + j) as u16;
            let b = (i * ring + j + 1) as u16;
            let c = ((i + 1) * ring + j) as u16;
            let d = ((i + 1) * ring + j + 1) as u16;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_the_unit_sphere() {
        let mesh = uv_sphere(16, 24);
        assert_eq!(mesh.vertices.len(), 17 * 25);
        assert_eq!(mesh.indices.len(), (16 * 24 * 6) as usize);
        for v in &mesh.vertices {
            let len = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = uv_sphere(8, 12);
        let count = mesh.vertices.len() as u16;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }
}
