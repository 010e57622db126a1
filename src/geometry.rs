//! Procedural primitive shapes.

use std::f32::consts::PI;

/// Geometry data before it is packed into a [`Mesh`](crate::model::Mesh).
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise winding
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Upper bound on either segment count; keeps indices within `u32`.
pub const MAX_SPHERE_SEGMENTS: u32 = 1024;

/// Unit UV sphere centered at the origin. Segment counts are clamped to
/// at least 3 around and 2 from pole to pole, and to at most
/// [`MAX_SPHERE_SEGMENTS`] each.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::default();

    let long_segs = longitude_segments.clamp(3, MAX_SPHERE_SEGMENTS);
    let lat_segs = latitude_segments.clamp(2, MAX_SPHERE_SEGMENTS);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let position = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.positions.push(position);
            data.normals.push(position);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}
