use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classification::zone_thresholds::ZoneThresholds;
use crate::detection::domain::hand_landmarks::HandLandmark;

/// Landmarks averaged into the hand's representative point by default.
/// Wrist plus middle fingertip stays put when the fingers curl.
pub const DEFAULT_ANCHOR: [HandLandmark; 2] = [HandLandmark::Wrist, HandLandmark::MiddleFingerTip];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid classifier config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("hand anchor must name at least one landmark")]
    EmptyAnchor,
}

/// Tunable classifier parameters.
///
/// JSON form, both keys optional:
/// `{"boundaries": [0.2, 0.4, 0.6, 0.9], "anchor": ["wrist", "middle_finger_tip"]}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub boundaries: ZoneThresholds,
    pub anchor: Vec<HandLandmark>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            boundaries: ZoneThresholds::default(),
            anchor: DEFAULT_ANCHOR.to_vec(),
        }
    }
}

impl ClassifierConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.anchor.is_empty() {
            return Err(ConfigError::EmptyAnchor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = ClassifierConfig::from_json("{}").unwrap();
        assert_eq!(config, ClassifierConfig::default());
        assert_eq!(config.anchor, DEFAULT_ANCHOR.to_vec());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config =
            ClassifierConfig::from_json(r#"{"boundaries": [0.15, 0.35, 0.55, 0.85]}"#).unwrap();
        assert_eq!(config.boundaries.boundaries(), &[0.15, 0.35, 0.55, 0.85]);
        assert_eq!(config.anchor, DEFAULT_ANCHOR.to_vec());
    }

    #[test]
    fn test_custom_anchor() {
        let config = ClassifierConfig::from_json(r#"{"anchor": ["middle_finger_mcp"]}"#).unwrap();
        assert_eq!(config.anchor, vec![HandLandmark::MiddleFingerMcp]);
    }

    #[test]
    fn test_empty_anchor_rejected() {
        let result = ClassifierConfig::from_json(r#"{"anchor": []}"#);
        assert!(matches!(result, Err(ConfigError::EmptyAnchor)));
    }

    #[test]
    fn test_bad_boundaries_rejected() {
        let result = ClassifierConfig::from_json(r#"{"boundaries": [0.9, 0.6, 0.4, 0.2]}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ClassifierConfig::from_json(r#"{"thresholds": [0.2, 0.4, 0.6, 0.9]}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("classifier.json");
        fs::write(&path, r#"{"anchor": ["wrist"]}"#).unwrap();
        let config = ClassifierConfig::load(&path).unwrap();
        assert_eq!(config.anchor, vec![HandLandmark::Wrist]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClassifierConfig::load(Path::new("/nonexistent/classifier.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
