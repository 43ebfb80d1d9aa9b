use web_sys::HtmlCanvasElement;

use super::panel::PanelOverlay;
use crate::render::render::Renderer;
use crate::render::SceneRenderer;
use crate::surface::{FrameInput, RenderSurface};

/// A page canvas. Frames are dropped until its GPU renderer is attached,
/// since creating one is asynchronous.
pub struct WebTarget {
    canvas: HtmlCanvasElement,
    width: u32,
    height: u32,
    scene: Option<SceneRenderer>,
    overlay: Option<PanelOverlay>,
}

impl WebTarget {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let width = canvas.width();
        let height = canvas.height();
        Self {
            canvas,
            width,
            height,
            scene: None,
            overlay: None,
        }
    }

    /// A panel canvas; the overlay is removed when the target is released.
    pub fn with_overlay(canvas: HtmlCanvasElement, overlay: PanelOverlay) -> Self {
        let mut target = Self::new(canvas);
        target.overlay = Some(overlay);
        target
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn attach(&mut self, mut render: Renderer) {
        render.resize(self.width, self.height);
        self.scene = Some(SceneRenderer::new(render));
    }

    pub fn is_attached(&self) -> bool {
        self.scene.is_some()
    }
}

impl RenderSurface for WebTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if let Some(scene) = self.scene.as_mut() {
            scene.resize(width, height);
        }
    }

    fn draw(&mut self, frame: &FrameInput<'_>) -> anyhow::Result<()> {
        match self.scene.as_mut() {
            Some(scene) => scene.render(frame),
            None => Ok(()),
        }
    }

    fn release(&mut self) {
        self.scene = None;
        self.overlay = None;
    }
}
