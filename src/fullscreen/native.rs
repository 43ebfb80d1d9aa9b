use leptos::logging::{error, log};

use crate::error::ViewerError;

/// Direction of a native fullscreen request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeRequest {
    Enter,
    Exit,
}

/// Button state for the platform fullscreen API.
///
/// The platform owns the real state: this only mirrors it for the label and
/// is reconciled from every (vendor-prefixed) change notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NativeFullscreen {
    active: bool,
}

impl NativeFullscreen {
    pub const ENTER_LABEL: &'static str = "Fullscreen";
    pub const EXIT_LABEL: &'static str = "Exit Fullscreen";

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn label(&self) -> &'static str {
        if self.active {
            Self::EXIT_LABEL
        } else {
            Self::ENTER_LABEL
        }
    }

    /// What a toggle should ask for, given whether the document currently
    /// has a fullscreen element.
    pub fn next_request(&self, platform_fullscreen: bool) -> NativeRequest {
        if platform_fullscreen {
            NativeRequest::Exit
        } else {
            NativeRequest::Enter
        }
    }

    pub fn request_resolved(&mut self, request: NativeRequest) {
        self.active = request == NativeRequest::Enter;
    }

    /// A denied request is only logged; the label keeps its value.
    pub fn request_failed(&self, request: NativeRequest, err: &ViewerError) {
        error!("fullscreen {request:?} request failed: {err}");
    }

    /// Reconciles with a change notification. Returns true when the label
    /// changed.
    pub fn on_change(&mut self, platform_fullscreen: bool) -> bool {
        let changed = self.active != platform_fullscreen;
        if changed {
            log!("fullscreen changed outside the toggle: {platform_fullscreen}");
        }
        self.active = platform_fullscreen;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_resolved_requests() {
        let mut native = NativeFullscreen::default();
        assert_eq!(native.label(), "Fullscreen");

        let request = native.next_request(false);
        assert_eq!(request, NativeRequest::Enter);
        native.request_resolved(request);
        assert_eq!(native.label(), "Exit Fullscreen");

        let request = native.next_request(true);
        assert_eq!(request, NativeRequest::Exit);
        native.request_resolved(request);
        assert_eq!(native.label(), "Fullscreen");
    }

    #[test]
    fn failed_request_keeps_label() {
        let native = NativeFullscreen::default();
        let err = ViewerError::Fullscreen("denied".into());
        native.request_failed(NativeRequest::Enter, &err);
        assert!(!native.is_active());
        assert_eq!(native.label(), NativeFullscreen::ENTER_LABEL);
    }

    #[test]
    fn change_notifications_reconcile() {
        let mut native = NativeFullscreen::default();
        native.request_resolved(NativeRequest::Enter);

        // The user left fullscreen through the browser (Esc, gesture).
        assert!(native.on_change(false));
        assert_eq!(native.label(), NativeFullscreen::ENTER_LABEL);

        // The standard and prefixed events both arrive for one transition.
        assert!(native.on_change(true));
        assert!(!native.on_change(true));
        assert_eq!(native.label(), NativeFullscreen::EXIT_LABEL);
    }
}
