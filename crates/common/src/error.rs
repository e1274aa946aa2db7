/// Errors from rig configuration and queries.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("ring radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("elevation must be finite, got {0}")]
    InvalidElevation(f32),
    #[error("camera index {index} out of range for {count} cameras")]
    CameraIndexOutOfRange { index: usize, count: usize },
}
