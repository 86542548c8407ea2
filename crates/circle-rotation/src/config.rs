//! Configuration file support for circle-rotation
//!
//! Iteration budgets for the translation-number estimator and the
//! semiconjugacy synthesizer can be loaded from TOML.
//!
//! # Example Config File
//!
//! ```toml
//! # circle-rotation.toml
//!
//! [estimator]
//! # Optional cap on the dyadic level f^(2^n)(0) / 2^n (default: unset)
//! max_level = 24
//!
//! # Detect periodic orbits for exact rational answers (default: true)
//! detect_periodic = true
//!
//! # Longest period searched for directly (default: 32)
//! max_period = 64
//!
//! [synthesis]
//! # Longest word in the generators to enumerate (default: 64)
//! max_radius = 128
//!
//! # Stop after this many radii leave the conjugator unchanged (default: 2)
//! patience = 3
//!
//! # Longest periodic orbit used to build a step conjugator (default: 32)
//! max_period = 32
//!
//! # Translation numbers are compared to within 2^-comparison_level (default: 12)
//! comparison_level = 16
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Failed to access config file {}: {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),

    /// File is not valid TOML for this schema
    #[error("Failed to parse config file {}: {}", .0.display(), .1)]
    ParseError(PathBuf, #[source] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Root document. Accepts either a `[circle-rotation]` section or the
/// settings directly at the top level.
#[derive(Debug, Deserialize, Default)]
struct RootConfig {
    #[serde(rename = "circle-rotation")]
    section: Option<RotationConfig>,

    #[serde(flatten)]
    direct: RotationConfig,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RotationConfig {
    /// Translation-number estimator settings
    pub estimator: EstimatorConfig,

    /// Semiconjugacy synthesizer settings
    pub synthesis: SynthesisConfig,
}

/// Translation-number estimator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Optional cap on the dyadic level `n` (the orbit is walked for `2^n`
    /// steps). Unset, every positive tolerance is accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_level: Option<u32>,

    /// Search for periodic points to give exact rational answers
    pub detect_periodic: bool,

    /// Longest period searched for directly before walking the orbit of 0
    pub max_period: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_level: None,
            detect_periodic: true,
            max_period: 32,
        }
    }
}

/// Semiconjugacy synthesizer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Longest word in the generators to enumerate
    pub max_radius: usize,

    /// Consecutive radii without change before the supremum is accepted
    pub patience: usize,

    /// Longest periodic orbit used to build a step conjugator
    pub max_period: u64,

    /// Generators' translation numbers are compared to within `2^-comparison_level`
    pub comparison_level: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_radius: 64,
            patience: 2,
            max_period: 32,
            comparison_level: 12,
        }
    }
}

impl RotationConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Self::parse(&contents, path)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Path::new("<memory>"))
    }

    /// Save config to a TOML file (sectioned format)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(&SectionOnly { section: self })?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(path.as_ref().to_path_buf(), e))
    }

    /// Reject budgets that make every call fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synthesis.comparison_level == 0 {
            return Err(ConfigError::InvalidValue(
                "synthesis.comparison_level must be at least 1".to_string(),
            ));
        }
        if self.synthesis.patience == 0 {
            return Err(ConfigError::InvalidValue("synthesis.patience must be at least 1".to_string()));
        }
        Ok(())
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let root: RootConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;

        // Prefer sectioned format, fall back to direct format
        let config = root.section.unwrap_or(root.direct);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct SectionOnly<'a> {
    #[serde(rename = "circle-rotation")]
    section: &'a RotationConfig,
}
