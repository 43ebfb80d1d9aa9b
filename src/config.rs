use leptos::logging::warn;

use crate::controls::ControlsConfig;
use crate::error::ViewerError;
use crate::fit::TARGET_SIZE;
use crate::framing::DEFAULT_DISTANCE;
use crate::render_loop::ROTATION_STEP;
use crate::viewport::SETTLE_DELAY_MS;

pub const DEFAULT_MODEL_PATH: &str = "foo.glb";

/// How the fullscreen button behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FullscreenStrategy {
    /// Platform fullscreen on the page container.
    Native,
    /// An overlay panel with its own canvas at a fixed resolution.
    Panel { width: u32, height: u32 },
}

impl FullscreenStrategy {
    /// Portrait kiosk resolution.
    pub const PANEL: FullscreenStrategy = FullscreenStrategy::Panel {
        width: 1080,
        height: 1920,
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub model_path: String,
    pub target_size: f32,
    pub default_distance: f32,
    pub rotation_step: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub controls: ControlsConfig,
    pub fullscreen: FullscreenStrategy,
    pub settle_delay_ms: u32,
    pub counters: bool,
    pub activity_feed: bool,
    pub auto_update: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_owned(),
            target_size: TARGET_SIZE,
            default_distance: DEFAULT_DISTANCE,
            rotation_step: ROTATION_STEP,
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            controls: ControlsConfig::default(),
            fullscreen: FullscreenStrategy::Native,
            settle_delay_ms: SETTLE_DELAY_MS,
            counters: false,
            activity_feed: false,
            auto_update: false,
        }
    }
}

impl ViewerConfig {
    /// Defaults overridden by a page query string such as
    /// `?model=duck.glb&fullscreen=panel&panel=720x1280&counters=1`.
    /// Unknown keys are ignored, bad values are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if let Err(err) = config.apply(key, value) {
                warn!("{err}, keeping default");
            }
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ViewerError> {
        let invalid = || ViewerError::Config {
            key: key.to_owned(),
            value: value.to_owned(),
        };
        match key {
            "model" if !value.is_empty() => self.model_path = value.to_owned(),
            "model" => return Err(invalid()),
            "fullscreen" => {
                self.fullscreen = match value {
                    "native" => FullscreenStrategy::Native,
                    "panel" => match self.fullscreen {
                        panel @ FullscreenStrategy::Panel { .. } => panel,
                        FullscreenStrategy::Native => FullscreenStrategy::PANEL,
                    },
                    _ => return Err(invalid()),
                }
            }
            "panel" => {
                let (width, height) = parse_resolution(value).ok_or_else(invalid)?;
                self.fullscreen = FullscreenStrategy::Panel { width, height };
            }
            "counters" => self.counters = parse_flag(value).ok_or_else(invalid)?,
            "feed" => self.activity_feed = parse_flag(value).ok_or_else(invalid)?,
            "auto" => self.auto_update = parse_flag(value).ok_or_else(invalid)?,
            _ => {}
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(|c| c == 'x' || c == 'X')?;
    let w: u32 = w.parse().ok()?;
    let h: u32 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        let config = ViewerConfig::from_query("");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.model_path, "foo.glb");
        assert_eq!(config.target_size, 3.0);
        assert_eq!(config.fullscreen, FullscreenStrategy::Native);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ViewerConfig::from_query("?model=duck.glb&fullscreen=panel&counters&feed=1");
        assert_eq!(config.model_path, "duck.glb");
        assert_eq!(config.fullscreen, FullscreenStrategy::PANEL);
        assert!(config.counters);
        assert!(config.activity_feed);
        assert!(!config.auto_update);
    }

    #[test]
    fn panel_resolution_survives_strategy_flag() {
        let config = ViewerConfig::from_query("panel=720x1280&fullscreen=panel");
        assert_eq!(
            config.fullscreen,
            FullscreenStrategy::Panel {
                width: 720,
                height: 1280
            }
        );
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = ViewerConfig::from_query("fullscreen=sideways&panel=0x10&counters=maybe&model=");
        assert_eq!(config, ViewerConfig::default());
    }
}
