use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, Rad, Vector3};

/// Snapshot of where the camera is and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub aspect: f32,
}

/// Perspective camera shared by every render target.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,
    fov: Rad<f32>,
    near: f32,
    far: f32,
    aspect: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(fov: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            fov: fov.into(),
            near,
            far,
            aspect,
            projection: Matrix4::from_scale(1.0),
        };
        camera.update_projection();
        camera
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio and recomputes the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = cgmath::perspective(self.fov, self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position,
            target: self.target,
            aspect: self.aspect,
        }
    }
}
