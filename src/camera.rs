// Fixed perspective camera looking down -z at the rain plane.
// Only the aspect ratio changes after creation (on resize).

extern crate nalgebra_glm as glm;
use glm::TMat4;

pub struct Camera {
    fov_y_deg: f32,
    near: f32,
    far: f32,
    eye: [f32; 3],
    aspect: f32,
    view_projection: TMat4<f32>,
}

impl Camera {
    pub const FOV_Y_DEG: f32 = 75.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;
    pub const DISTANCE: f32 = 100.0;

    pub fn new(aspect: f64) -> Camera {
        let mut camera = Camera {
            fov_y_deg: Camera::FOV_Y_DEG,
            near: Camera::NEAR,
            far: Camera::FAR,
            eye: [0.0, 0.0, Camera::DISTANCE],
            aspect: 1.0,
            view_projection: TMat4::identity(),
        };
        camera.set_aspect(aspect);
        camera
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect as f32
        } else {
            1.0
        };
        self.view_projection = self.compute_view_projection();
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_projection(&self) -> &TMat4<f32> {
        &self.view_projection
    }

    // Half the height of the world band visible at z = 0
    pub fn visible_half_height(&self) -> f32 {
        self.eye[2] * (self.fov_y_deg.to_radians() / 2.0).tan()
    }

    fn compute_view_projection(&self) -> TMat4<f32> {
        let projection = glm::perspective(
            self.aspect,
            self.fov_y_deg.to_radians(),
            self.near,
            self.far,
        );
        let view = glm::look_at(
            &glm::vec3(self.eye[0], self.eye[1], self.eye[2]),
            &glm::vec3(0.0, 0.0, 0.0),
            &glm::vec3(0.0, 1.0, 0.0),
        );
        projection * view
    }
}
