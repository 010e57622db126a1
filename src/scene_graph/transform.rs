use glam::{Mat4, Vec3};

/// An affine transform built up by successive right-multiplications.
///
/// Points are treated as column vectors, so after
/// `load_identity(); scale(..); translate(..); rotate(..)` a point is rotated
/// first, then translated, then scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        matrix: Mat4::IDENTITY,
    };

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn load_identity(&mut self) {
        self.matrix = Mat4::IDENTITY;
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.matrix *= Mat4::from_translation(Vec3::new(x, y, z));
    }

    /// Rotates by `angle` radians around the given axis. The axis does not
    /// need to be normalized; a zero-length axis leaves the transform as is.
    pub fn rotate(&mut self, angle: f32, axis_x: f32, axis_y: f32, axis_z: f32) {
        let axis = Vec3::new(axis_x, axis_y, axis_z).normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }

        self.matrix *= Mat4::from_axis_angle(axis, angle);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.matrix *= Mat4::from_scale(Vec3::new(x, y, z));
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
