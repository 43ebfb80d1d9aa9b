/// Which render target a frame loop draws through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOwner {
    Primary,
    Session,
}

/// Proof that a scheduled frame step belongs to the running loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
    pub owner: FrameOwner,
}

/// Hands out frame tickets. Starting a loop invalidates every ticket issued
/// before, so a superseded loop stops at its next step instead of drawing
/// alongside the new one.
#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    current: Option<FrameTicket>,
}

impl FrameLoop {
    pub fn start(&mut self, owner: FrameOwner) -> FrameTicket {
        self.generation += 1;
        let ticket = FrameTicket {
            generation: self.generation,
            owner,
        };
        self.current = Some(ticket);
        ticket
    }

    pub fn stop(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    pub fn is_current(&self, ticket: FrameTicket) -> bool {
        self.current == Some(ticket)
    }

    pub fn owner(&self) -> Option<FrameOwner> {
        self.current.map(|t| t.owner)
    }
}

/// Turntable rotation per frame, about one turn every ~52 s at 60 fps.
pub const ROTATION_STEP: f32 = 0.002;
