use crate::camera::Camera;
use crate::scene::Model;

/// Everything a render target needs to draw one frame.
pub struct FrameInput<'a> {
    pub model: Option<&'a Model>,
    /// Bumped whenever the current model is replaced.
    pub revision: u64,
    pub camera: &'a Camera,
}

/// A surface frames are drawn into: the page canvas, a fullscreen panel
/// canvas, or a test double.
pub trait RenderSurface {
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn draw(&mut self, frame: &FrameInput<'_>) -> anyhow::Result<()>;

    /// Detaches the surface from the page. Called once when a fullscreen
    /// session owning it ends.
    fn release(&mut self) {}

    fn aspect(&self) -> Option<f32> {
        let (w, h) = self.size();
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }
}
