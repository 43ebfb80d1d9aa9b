use crate::camera::Camera;
use crate::surface::RenderSurface;

/// Delay between a fullscreen transition and re-measuring the panel.
pub const SETTLE_DELAY_MS: u32 = 100;

/// Applies a new panel size to the camera and the render target.
///
/// Returns `false` without touching anything when either dimension is
/// zero.
pub fn on_resize<S: RenderSurface + ?Sized>(
    camera: &mut Camera,
    target: &mut S,
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    camera.set_aspect(width as f32 / height as f32);
    target.resize(width, height);
    true
}

/// Converts a measured CSS size into whole device pixels, clamped to what
/// the renderer accepts.
pub fn physical_size(css_width: f64, css_height: f64, pixel_ratio: f64, max_side: u32) -> (u32, u32) {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    };
    let side = |css: f64| {
        if css.is_finite() && css > 0.0 {
            ((css * ratio).round() as u32).min(max_side)
        } else {
            0
        }
    };
    (side(css_width), side(css_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSurface;
    use cgmath::Deg;

    #[test]
    fn resize_updates_aspect_and_target() {
        let mut camera = Camera::new(Deg(50.0), 1.0, 0.1, 1000.0);
        let mut target = MockSurface::new(100, 100);
        assert!(on_resize(&mut camera, &mut target, 800, 400));
        assert_eq!(camera.aspect(), 2.0);
        assert_eq!(target.size(), (800, 400));
    }

    #[test]
    fn zero_dimension_is_a_no_op() {
        let mut camera = Camera::new(Deg(50.0), 1.25, 0.1, 1000.0);
        let mut target = MockSurface::new(500, 400);
        let projection = camera.projection_matrix();

        assert!(!on_resize(&mut camera, &mut target, 0, 300));
        assert!(!on_resize(&mut camera, &mut target, 300, 0));
        assert_eq!(camera.aspect(), 1.25);
        assert_eq!(camera.projection_matrix(), projection);
        assert_eq!(target.size(), (500, 400));
        assert_eq!(target.resizes, 0);
    }

    #[test]
    fn physical_size_scales_and_clamps() {
        assert_eq!(physical_size(400.0, 300.0, 2.0, 8192), (800, 600));
        assert_eq!(physical_size(5000.0, 10.0, 2.0, 8192), (8192, 20));
        assert_eq!(physical_size(0.0, 300.0, 1.0, 8192), (0, 300));
        assert_eq!(physical_size(100.0, 100.0, f64::NAN, 8192), (100, 100));
    }
}
