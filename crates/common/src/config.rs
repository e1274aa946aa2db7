use std::path::Path;

use crate::error::RigError;
use crate::types::RigConfig;

/// Command-line values that take precedence over file and default values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub camera_count: Option<usize>,
    pub radius: Option<f32>,
    pub elevation_deg: Option<f32>,
}

impl ConfigOverrides {
    /// Apply every set override on top of `base`.
    pub fn apply(&self, base: RigConfig) -> RigConfig {
        RigConfig {
            camera_count: self.camera_count.unwrap_or(base.camera_count),
            radius: self.radius.unwrap_or(base.radius),
            elevation_deg: self.elevation_deg.unwrap_or(base.elevation_deg),
        }
    }
}

impl RigConfig {
    /// Parse a YAML rig description.
    pub fn from_yaml_str(s: &str) -> Result<Self, RigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse a JSON rig description.
    pub fn from_json_str(s: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a rig description from disk. The format is picked from the file
    /// extension: `.yaml`/`.yml` or `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let data = match ext.as_str() {
            "yaml" | "yml" | "json" => std::fs::read_to_string(path)?,
            _ => return Err(RigError::UnsupportedFormat(path.display().to_string())),
        };
        if ext == "json" {
            Self::from_json_str(&data)
        } else {
            Self::from_yaml_str(&data)
        }
    }

    /// Resolve the effective configuration: defaults, then the optional file,
    /// then the overrides. The result is validated.
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, RigError> {
        let base = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        let config = overrides.apply(base);
        config.validate()?;
        Ok(config)
    }
}
