use glam::Vec3;

use crate::scene_graph::Transform;

/// Plane a body orbits in, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPlane {
    XZ,
    YZ,
}

#[derive(Debug, Clone, Copy)]
pub struct Orbit {
    pub radius: f32,
    /// Radians per second; negative orbits run clockwise
    pub speed: f32,
    pub angle: f32,
    pub plane: OrbitPlane,
    pub scale: f32,
    /// Fixed rotation applied in the body's own frame
    pub tilt: f32,
    pub tilt_axis: Vec3,
}

impl Orbit {
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.angle.sin_cos();
        let (a, b) = (self.radius * cos, self.radius * sin);
        match self.plane {
            OrbitPlane::XZ => Vec3::new(a, 0.0, b),
            OrbitPlane::YZ => Vec3::new(0.0, a, b),
        }
    }
}

/// Per-body animation parameters applied to a node's local transform.
#[derive(Debug, Clone, Copy)]
pub enum Animation {
    /// Keeps rotating on top of the existing local transform.
    Spin { speed: f32, axis: Vec3 },
    /// Rebuilds the local transform every frame from the orbit state.
    Orbit(Orbit),
    /// Rebuilds the local transform at a fixed offset.
    Anchored {
        scale: f32,
        translation: Vec3,
        tilt: f32,
        tilt_axis: Vec3,
    },
}

impl Animation {
    pub fn advance(&mut self, transform: &mut Transform, dt: f32) {
        match self {
            Animation::Spin { speed, axis } => {
                transform.rotate(*speed * dt, axis.x, axis.y, axis.z);
            }
            Animation::Orbit(orbit) => {
                orbit.angle += orbit.speed * dt;
                let position = orbit.position();
                rebuild(transform, orbit.scale, position, orbit.tilt, orbit.tilt_axis);
            }
            Animation::Anchored {
                scale,
                translation,
                tilt,
                tilt_axis,
            } => rebuild(transform, *scale, *translation, *tilt, *tilt_axis),
        }
    }
}

fn rebuild(transform: &mut Transform, scale: f32, translation: Vec3, tilt: f32, axis: Vec3) {
    transform.load_identity();
    transform.scale(scale, scale, scale);
    transform.translate(translation.x, translation.y, translation.z);
    transform.rotate(tilt, axis.x, axis.y, axis.z);
}
