pub mod native;
pub mod session;

pub use native::{NativeFullscreen, NativeRequest};
pub use session::{ExitReason, FullscreenManager, FullscreenSession, PointerTarget};
