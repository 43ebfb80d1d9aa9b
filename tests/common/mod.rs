//! Shared doubles for the integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use turntable::scene::{Mesh, Model, Node};
use turntable::surface::{FrameInput, RenderSurface};

/// What happened to a [`MockSurface`], readable after the surface itself
/// was moved into the viewer.
#[derive(Debug, Default)]
pub struct Probe {
    pub draws: usize,
    pub resizes: usize,
    pub released: bool,
    pub last_revision: Option<u64>,
    pub fail_draws: bool,
}

pub struct MockSurface {
    width: u32,
    height: u32,
    pub probe: Rc<RefCell<Probe>>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> (Self, Rc<RefCell<Probe>>) {
        let probe = Rc::new(RefCell::new(Probe::default()));
        (
            Self {
                width,
                height,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl RenderSurface for MockSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.probe.borrow_mut().resizes += 1;
    }

    fn draw(&mut self, frame: &FrameInput<'_>) -> anyhow::Result<()> {
        let mut probe = self.probe.borrow_mut();
        probe.draws += 1;
        probe.last_revision = Some(frame.revision);
        if probe.fail_draws {
            anyhow::bail!("surface lost");
        }
        Ok(())
    }

    fn release(&mut self) {
        self.probe.borrow_mut().released = true;
    }
}

/// A single triangle whose bounding box is min (-2,-1,-4), max (4,3,2).
pub fn reference_model() -> Model {
    let mesh = Mesh::from_positions(
        vec![[-2.0, -1.0, -4.0], [4.0, 3.0, 2.0], [4.0, -1.0, 2.0]],
        vec![0, 1, 2],
    );
    Model::new(vec![Node::with_mesh(0)], vec![mesh])
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
