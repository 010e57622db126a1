use glam::{Mat4, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub view_direction: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            view_direction: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.view_direction, self.up)
    }

    pub fn set_eye_position(&mut self, x: f32, y: f32, z: f32) {
        self.eye = Vec3::new(x, y, z);
    }

    pub fn move_forward(&mut self, speed: f32) {
        self.eye += self.view_direction.normalize_or_zero() * speed;
    }

    pub fn move_backward(&mut self, speed: f32) {
        self.move_forward(-speed);
    }

    pub fn move_left(&mut self, speed: f32) {
        self.move_right(-speed);
    }

    pub fn move_right(&mut self, speed: f32) {
        let right = self.view_direction.cross(self.up).normalize_or_zero();
        self.eye += right * speed;
    }

    pub fn move_up(&mut self, speed: f32) {
        self.eye += self.up.normalize_or_zero() * speed;
    }

    pub fn move_down(&mut self, speed: f32) {
        self.move_up(-speed);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}
