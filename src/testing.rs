//! Render target double for unit tests (no GPU or DOM required).

use crate::surface::{FrameInput, RenderSurface};

#[derive(Debug, Default)]
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub resizes: usize,
    pub draws: usize,
    pub last_revision: Option<u64>,
    pub released: bool,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl RenderSurface for MockSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
    }

    fn draw(&mut self, frame: &FrameInput<'_>) -> anyhow::Result<()> {
        self.draws += 1;
        self.last_revision = Some(frame.revision);
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}
