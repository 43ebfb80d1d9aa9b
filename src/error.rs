/// Every failure the viewer reports. None of them is fatal: each degrades
/// to "no visual change" plus a logged message.
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to decode model: {0}")]
    Decode(String),

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("fullscreen request failed: {0}")]
    Fullscreen(String),

    #[error("render surface error: {0}")]
    Surface(String),

    #[error("invalid setting {key}={value}")]
    Config { key: String, value: String },
}

impl ViewerError {
    pub fn fetch<T: ToString>(path: &str, reason: T) -> Self {
        ViewerError::Fetch {
            path: path.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn decode<T: ToString>(msg: T) -> Self {
        ViewerError::Decode(msg.to_string())
    }

    /// Load failures leave the current model in place.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ViewerError::Fetch { .. } | ViewerError::Decode(_) | ViewerError::Gltf(_)
        )
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
