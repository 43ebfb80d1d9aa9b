use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::camera::Camera;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlsConfig {
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of orbit per full drag across the target's height.
    pub rotate_speed: f32,
    pub zoom_step: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            min_distance: 1.0,
            max_distance: 20.0,
            rotate_speed: std::f32::consts::TAU,
            zoom_step: 0.05,
        }
    }
}

/// Orbit camera control bound to one render target.
///
/// Drag and wheel input accumulate into pending deltas that [`update`]
/// drains a damped fraction at a time.
///
/// [`update`]: OrbitControls::update
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    config: ControlsConfig,
    theta_delta: f32,
    phi_delta: f32,
    zoom_scale: f32,
    drag_from: Option<(f64, f64)>,
}

impl OrbitControls {
    const MIN_POLAR: f32 = 1e-4;

    pub fn new(config: ControlsConfig) -> Self {
        Self {
            target: Point3::origin(),
            config,
            theta_delta: 0.0,
            phi_delta: 0.0,
            zoom_scale: 1.0,
            drag_from: None,
        }
    }

    /// New control for another render target, orbiting the same point.
    pub fn bound_like(other: &OrbitControls) -> Self {
        let mut controls = Self::new(other.config);
        controls.target = other.target;
        controls
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag_from = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Turns a drag over a `width`×`height` target into orbit deltas.
    pub fn pointer_move(&mut self, x: f64, y: f64, width: u32, height: u32) {
        let Some((px, py)) = self.drag_from else {
            return;
        };
        if height == 0 || width == 0 {
            return;
        }
        let h = height as f32;
        self.theta_delta -= ((x - px) as f32) / h * self.config.rotate_speed;
        self.phi_delta -= ((y - py) as f32) / h * self.config.rotate_speed;
        self.drag_from = Some((x, y));
    }

    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y != 0.0 {
            let mult = 1.0 + if delta_y > 0.0 { 1.0 } else { -1.0 } * self.config.zoom_step;
            self.zoom_scale *= mult;
        }
    }

    /// Drops pending motion so the next update leaves the camera alone.
    pub fn stop(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.zoom_scale = 1.0;
        self.drag_from = None;
    }

    /// Moves `camera` around the target by the damped pending motion and
    /// points it at the target.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let mut radius = offset.magnitude();
        if radius > 0.0 {
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            let damping = self.config.damping_factor;
            theta += self.theta_delta * damping;
            phi += self.phi_delta * damping;
            phi = phi.clamp(Self::MIN_POLAR, std::f32::consts::PI - Self::MIN_POLAR);
            radius *= 1.0 + (self.zoom_scale - 1.0) * damping;
            radius = radius.clamp(self.config.min_distance, self.config.max_distance);

            let sin_phi = phi.sin();
            let moved = Vector3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
            if self.is_moving() {
                camera.position = self.target + moved;
            } else {
                camera.position = self.target + offset.normalize() * radius;
            }

            self.theta_delta *= 1.0 - damping;
            self.phi_delta *= 1.0 - damping;
            self.zoom_scale = 1.0 + (self.zoom_scale - 1.0) * (1.0 - damping);
            if !self.is_moving() {
                self.stop_residual();
            }
        }
        camera.look_at(self.target);
    }

    fn is_moving(&self) -> bool {
        const EPS: f32 = 1e-6;
        self.theta_delta.abs() > EPS || self.phi_delta.abs() > EPS || (self.zoom_scale - 1.0).abs() > EPS
    }

    fn stop_residual(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.zoom_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    fn camera_at(z: f32) -> Camera {
        let mut camera = Camera::new(Deg(50.0), 1.0, 0.1, 1000.0);
        camera.position = Point3::new(0.0, 0.0, z);
        camera
    }

    #[test]
    fn idle_update_keeps_position() {
        let mut controls = OrbitControls::new(ControlsConfig::default());
        let mut camera = camera_at(6.0);
        controls.update(&mut camera);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 6.0));
        assert_eq!(camera.target(), Point3::origin());
    }

    #[test]
    fn distance_is_clamped() {
        let mut controls = OrbitControls::new(ControlsConfig::default());
        let mut camera = camera_at(50.0);
        controls.update(&mut camera);
        assert!((camera.position.z - 20.0).abs() < 1e-5);
    }

    #[test]
    fn drag_orbits_and_damps_out() {
        let mut controls = OrbitControls::new(ControlsConfig::default());
        let mut camera = camera_at(6.0);
        controls.pointer_down(0.0, 0.0);
        controls.pointer_move(100.0, 0.0, 400, 400);
        controls.pointer_up();

        controls.update(&mut camera);
        assert!(camera.position.x.abs() > 1e-3);
        let radius = (camera.position - Point3::origin()).magnitude();
        assert!((radius - 6.0).abs() < 1e-4);

        for _ in 0..2000 {
            controls.update(&mut camera);
        }
        assert!(!controls.is_moving());
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut controls = OrbitControls::new(ControlsConfig::default());
        controls.pointer_move(100.0, 50.0, 400, 400);
        assert!(!controls.is_moving());
    }

    #[test]
    fn wheel_zooms_out() {
        let mut controls = OrbitControls::new(ControlsConfig::default());
        let mut camera = camera_at(6.0);
        controls.wheel(120.0);
        controls.update(&mut camera);
        assert!(camera.position.z > 6.0);
    }

    #[test]
    fn bound_like_copies_target() {
        let mut primary = OrbitControls::new(ControlsConfig::default());
        primary.target = Point3::new(1.0, 2.0, 3.0);
        let session = OrbitControls::bound_like(&primary);
        assert_eq!(session.target, primary.target);
    }
}
