use cgmath::Deg;
use leptos::logging::{error, log, warn};

use crate::camera::{Camera, CameraState};
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::error::ViewerError;
use crate::fit::{self, FittedModel};
use crate::framing;
use crate::fullscreen::{ExitReason, FullscreenManager, NativeFullscreen, PointerTarget};
use crate::loader::{LoadSequencer, LoadTicket};
use crate::render_loop::{FrameLoop, FrameOwner, FrameTicket};
use crate::scene::Model;
use crate::surface::{FrameInput, RenderSurface};
use crate::viewport;

/// Result of handing a finished load to the viewer.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The model replaced the previous one and the camera was reframed.
    Replaced(FittedModel),
    /// A newer load was started meanwhile; the result was dropped.
    Stale,
    /// The load failed; the current model stays on screen.
    Failed(ViewerError),
}

/// All viewer state, owned in one place and handed to each component by
/// reference.
pub struct Viewer<S> {
    config: ViewerConfig,
    camera: Camera,
    controls: OrbitControls,
    primary: S,
    panel: FullscreenManager<S>,
    native: NativeFullscreen,
    model: Option<Model>,
    revision: u64,
    loads: LoadSequencer,
    frames: FrameLoop,
}

impl<S: RenderSurface> Viewer<S> {
    pub fn new(config: ViewerConfig, primary: S) -> Self {
        let aspect = primary.aspect().unwrap_or(1.0);
        let mut camera = Camera::new(Deg(config.fov_degrees), aspect, config.near, config.far);
        let mut controls = OrbitControls::new(config.controls);
        framing::frame(None, &mut camera, &mut controls, config.default_distance);
        Self {
            config,
            camera,
            controls,
            primary,
            panel: FullscreenManager::default(),
            native: NativeFullscreen::default(),
            model: None,
            revision: 0,
            loads: LoadSequencer::default(),
            frames: FrameLoop::default(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut S {
        &mut self.primary
    }

    pub fn native(&self) -> &NativeFullscreen {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut NativeFullscreen {
        &mut self.native
    }

    pub fn is_panel_active(&self) -> bool {
        self.panel.is_active()
    }

    /// Target of the open panel session, if it is still session `id`.
    pub fn panel_target_mut(&mut self, id: u64) -> Option<&mut S> {
        self.panel
            .session_mut()
            .filter(|session| session.id == id)
            .map(|session| &mut session.target)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Takes the result of load `ticket`: a successful latest load replaces,
    /// fits and frames the model; anything else leaves the scene as is.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Model, ViewerError>) -> LoadOutcome {
        if !self.loads.is_latest(ticket) {
            warn!("discarding result of superseded load {ticket:?}");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(mut model) => {
                let fitted = fit::fit(&mut model, self.config.target_size);
                self.model = Some(model);
                self.revision += 1;
                self.reset_view();
                log!("model loaded, scaled by {}", fitted.scale);
                LoadOutcome::Replaced(fitted)
            }
            Err(err) => {
                error!("Error loading model: {err}");
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Frames the current model (or the default view) through whichever
    /// camera control is active.
    pub fn reset_view(&mut self) -> CameraState {
        let controls = match self.panel.session_mut() {
            Some(session) => &mut session.controls,
            None => &mut self.controls,
        };
        framing::frame(
            self.model.as_ref(),
            &mut self.camera,
            controls,
            self.config.default_distance,
        )
    }

    /// Applies a measured panel size. While a fullscreen panel is open the
    /// camera stays bound to the panel's fixed resolution and only the
    /// primary target follows the page.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.panel.is_active() {
            if width == 0 || height == 0 {
                return false;
            }
            self.primary.resize(width, height);
            return true;
        }
        viewport::on_resize(&mut self.camera, &mut self.primary, width, height)
    }

    pub fn start_primary_loop(&mut self) -> FrameTicket {
        self.frames.start(FrameOwner::Primary)
    }

    pub fn is_frame_current(&self, ticket: FrameTicket) -> bool {
        self.frames.is_current(ticket)
    }

    /// Opens a fullscreen panel on `target` and hands the frame loop to it.
    pub fn enter_panel(&mut self, target: S) -> Result<(u64, FrameTicket), ViewerError> {
        let id = self.panel.enter(target, &mut self.camera, &self.controls)?;
        Ok((id, self.frames.start(FrameOwner::Session)))
    }

    /// Closes the panel and hands the frame loop back to the primary target.
    pub fn exit_panel(&mut self, reason: ExitReason) -> Option<FrameTicket> {
        let aspect = self.primary.aspect();
        self.panel
            .exit(reason, &mut self.camera, aspect)
            .then(|| self.frames.start(FrameOwner::Primary))
    }

    pub fn on_escape(&mut self) -> Option<FrameTicket> {
        let aspect = self.primary.aspect();
        self.panel
            .on_escape(&mut self.camera, aspect)
            .then(|| self.frames.start(FrameOwner::Primary))
    }

    pub fn on_panel_pointer(&mut self, hit: PointerTarget) -> Option<FrameTicket> {
        let aspect = self.primary.aspect();
        self.panel
            .on_pointer(hit, &mut self.camera, aspect)
            .then(|| self.frames.start(FrameOwner::Primary))
    }

    /// One turn of the render loop: spin the model, let the active control
    /// move the camera, draw. Returns false when `ticket` was superseded,
    /// in which case nothing happens and the loop must not reschedule.
    pub fn step(&mut self, ticket: FrameTicket) -> bool {
        if !self.frames.is_current(ticket) {
            return false;
        }
        if let Some(model) = self.model.as_mut() {
            model.spin(self.config.rotation_step);
        }

        let drawn = match (ticket.owner, self.panel.session_mut()) {
            (FrameOwner::Session, Some(session)) => {
                session.controls.update(&mut self.camera);
                session.target.draw(&FrameInput {
                    model: self.model.as_ref(),
                    revision: self.revision,
                    camera: &self.camera,
                })
            }
            (FrameOwner::Primary, _) => {
                self.controls.update(&mut self.camera);
                self.primary.draw(&FrameInput {
                    model: self.model.as_ref(),
                    revision: self.revision,
                    camera: &self.camera,
                })
            }
            (FrameOwner::Session, None) => {
                self.frames.stop();
                return false;
            }
        };
        if let Err(err) = drawn {
            warn!("failed to render frame: {err:?}");
        }
        true
    }

    /// Pointer and wheel input go to the control of the frame owner.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.active_controls().pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let (width, height) = match self.panel.session() {
            Some(session) => session.target.size(),
            None => self.primary.size(),
        };
        self.active_controls().pointer_move(x, y, width, height);
    }

    pub fn pointer_up(&mut self) {
        self.active_controls().pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.active_controls().wheel(delta_y);
    }

    fn active_controls(&mut self) -> &mut OrbitControls {
        match self.panel.session_mut() {
            Some(session) => &mut session.controls,
            None => &mut self.controls,
        }
    }
}
