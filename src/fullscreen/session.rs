use leptos::logging::log;

use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::error::ViewerError;
use crate::surface::RenderSurface;

/// Where a pointer action on an open panel landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Backdrop,
    Content,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    Toggle,
    Escape,
    Backdrop,
}

/// A fullscreen panel: its own render target and camera control, standing
/// in for the primary pair while alive.
pub struct FullscreenSession<S> {
    pub id: u64,
    pub target: S,
    pub controls: OrbitControls,
    escape_armed: bool,
}

/// Panel fullscreen state machine (`Inactive` when no session is held).
pub struct FullscreenManager<S> {
    session: Option<FullscreenSession<S>>,
    next_id: u64,
}

impl<S> Default for FullscreenManager<S> {
    fn default() -> Self {
        Self {
            session: None,
            next_id: 0,
        }
    }
}

impl<S: RenderSurface> FullscreenManager<S> {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&FullscreenSession<S>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut FullscreenSession<S>> {
        self.session.as_mut()
    }

    /// Opens a session on `target`, orbiting the same point as `primary`,
    /// and binds the camera aspect to the new target.
    pub fn enter(
        &mut self,
        target: S,
        camera: &mut Camera,
        primary: &OrbitControls,
    ) -> Result<u64, ViewerError> {
        if self.session.is_some() {
            return Err(ViewerError::Fullscreen("a fullscreen session is already open".into()));
        }
        let aspect = target
            .aspect()
            .ok_or_else(|| ViewerError::Fullscreen("fullscreen target has no area".into()))?;
        camera.set_aspect(aspect);

        self.next_id += 1;
        let id = self.next_id;
        self.session = Some(FullscreenSession {
            id,
            target,
            controls: OrbitControls::bound_like(primary),
            escape_armed: true,
        });
        log!("fullscreen session {id} opened");
        Ok(id)
    }

    /// Closes the session, releasing its target and handing the camera
    /// back to the primary target. Returns false when nothing was open.
    pub fn exit(&mut self, reason: ExitReason, camera: &mut Camera, primary_aspect: Option<f32>) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.target.release();
        if let Some(aspect) = primary_aspect {
            camera.set_aspect(aspect);
        }
        log!("fullscreen session {} closed ({reason:?})", session.id);
        true
    }

    /// Escape closes the session once; later presses find nothing armed.
    pub fn on_escape(&mut self, camera: &mut Camera, primary_aspect: Option<f32>) -> bool {
        match self.session.as_mut() {
            Some(session) if session.escape_armed => {
                session.escape_armed = false;
                self.exit(ExitReason::Escape, camera, primary_aspect)
            }
            _ => false,
        }
    }

    /// Only clicks on the backdrop, not the panel content, close the session.
    pub fn on_pointer(&mut self, hit: PointerTarget, camera: &mut Camera, primary_aspect: Option<f32>) -> bool {
        match hit {
            PointerTarget::Backdrop => self.exit(ExitReason::Backdrop, camera, primary_aspect),
            PointerTarget::Content => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlsConfig;
    use crate::testing::MockSurface;
    use cgmath::{Deg, Point3};

    fn setup() -> (FullscreenManager<MockSurface>, Camera, OrbitControls) {
        let mut primary = OrbitControls::new(ControlsConfig::default());
        primary.target = Point3::new(0.5, 0.0, 0.0);
        (
            FullscreenManager::default(),
            Camera::new(Deg(50.0), 16.0 / 9.0, 0.1, 1000.0),
            primary,
        )
    }

    #[test]
    fn enter_binds_camera_to_session_target() {
        let (mut manager, mut camera, primary) = setup();
        manager
            .enter(MockSurface::new(1080, 1920), &mut camera, &primary)
            .unwrap();
        assert!(manager.is_active());
        assert_eq!(camera.aspect(), 1080.0 / 1920.0);
        assert_eq!(manager.session().unwrap().controls.target, primary.target);
    }

    #[test]
    fn enter_then_exit_restores_aspect() {
        let (mut manager, mut camera, primary) = setup();
        let before = camera.aspect();
        manager
            .enter(MockSurface::new(1080, 1920), &mut camera, &primary)
            .unwrap();
        assert!(manager.exit(ExitReason::Toggle, &mut camera, Some(16.0 / 9.0)));
        assert_eq!(camera.aspect(), before);
        assert!(!manager.is_active());
    }

    #[test]
    fn second_enter_is_refused() {
        let (mut manager, mut camera, primary) = setup();
        manager
            .enter(MockSurface::new(1080, 1920), &mut camera, &primary)
            .unwrap();
        let err = manager.enter(MockSurface::new(10, 10), &mut camera, &primary);
        assert!(matches!(err, Err(ViewerError::Fullscreen(_))));
        assert_eq!(camera.aspect(), 1080.0 / 1920.0);
    }

    #[test]
    fn zero_sized_target_is_refused() {
        let (mut manager, mut camera, primary) = setup();
        assert!(manager.enter(MockSurface::new(0, 100), &mut camera, &primary).is_err());
        assert!(!manager.is_active());
    }

    #[test]
    fn escape_exits_exactly_once() {
        let (mut manager, mut camera, primary) = setup();
        manager
            .enter(MockSurface::new(1080, 1920), &mut camera, &primary)
            .unwrap();
        let exits = (0..5)
            .filter(|_| manager.on_escape(&mut camera, Some(1.0)))
            .count();
        assert_eq!(exits, 1);
        assert!(!manager.is_active());
    }

    #[test]
    fn content_clicks_keep_session_open() {
        let (mut manager, mut camera, primary) = setup();
        manager
            .enter(MockSurface::new(1080, 1920), &mut camera, &primary)
            .unwrap();
        assert!(!manager.on_pointer(PointerTarget::Content, &mut camera, Some(1.0)));
        assert!(manager.is_active());
        assert!(manager.on_pointer(PointerTarget::Backdrop, &mut camera, Some(1.0)));
        assert!(!manager.is_active());
    }

    #[test]
    fn exit_without_session_does_nothing() {
        let (mut manager, mut camera, _) = setup();
        let aspect = camera.aspect();
        assert!(!manager.exit(ExitReason::Toggle, &mut camera, Some(3.0)));
        assert_eq!(camera.aspect(), aspect);
    }
}
