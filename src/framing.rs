use cgmath::{EuclideanSpace, Point3};

use crate::bounds;
use crate::camera::{Camera, CameraState};
use crate::controls::OrbitControls;
use crate::scene::Model;

/// Camera distance used when there is nothing to frame.
pub const DEFAULT_DISTANCE: f32 = 5.0;

/// Places `camera` on the +Z axis at twice the model's largest extent,
/// looking at the origin, and re-targets `controls` there.
pub fn frame(
    model: Option<&Model>,
    camera: &mut Camera,
    controls: &mut OrbitControls,
    default_distance: f32,
) -> CameraState {
    let distance = model
        .map(|model| bounds::compute(model).max_len() * 2.0)
        .filter(|d| *d > 0.0 && d.is_finite())
        .unwrap_or(default_distance);

    let origin = Point3::origin();
    camera.position = Point3::new(0.0, 0.0, distance);
    camera.look_at(origin);

    controls.stop();
    controls.target = origin;
    controls.update(camera);

    camera.state()
}
