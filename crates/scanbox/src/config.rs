//! Process-wide physical configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Physical constants shared by nearly every builder, all in millimeters.
///
/// Builders take this by reference instead of reading globals, so a test
/// fixture with thinner walls can coexist with the production values.
/// Changing a constant here propagates deterministically through all
/// dependent geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclosureConfig {
    /// Nominal wall thickness. 2 mm per the print service's PLA guideline.
    /// Builders that deviate (horizontal screw boss, insert gussets) say so
    /// locally instead of overriding this.
    pub wall_thick: f64,
    /// Wall height of the bottom shell's base section.
    pub wall_height: f64,
    /// Height of the lid features above the top plate.
    pub top_height: f64,
    /// Corner screw inset from the shell edges: insert hole radius plus two
    /// wall thicknesses.
    pub screw_fix_offset: f64,
    /// Outer length of the shell.
    pub length: f64,
    /// Outer width of the shell.
    pub width: f64,
    /// Beam height above the floor: prism offset plus polygon axis height
    /// plus the margin that keeps the laser base printable.
    pub laser_height: f64,
    /// Extent of the light gap; shared by the top shell, the mirror mount
    /// and the bottom shell.
    pub light_hole: f64,
    /// Tie-wrap slot width (150 x 2.5 mm tie).
    pub tie_width: f64,
    /// Cable-fastener height.
    pub tie_height: f64,
    /// Angular resolution of every structural bore. A designed constant
    /// balancing smoothness against render cost, not derived.
    pub segments: u32,
    /// How far a through-cavity extends past each face it pierces, so the
    /// meshed result stays manifold.
    pub bore_overcut: f64,
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            wall_thick: 2.0,
            wall_height: 40.0,
            top_height: 7.0,
            screw_fix_offset: 8.5,
            length: 170.0,
            width: 108.0,
            laser_height: 12.5 + 7.2 + 5.0,
            light_hole: 10.0,
            tie_width: 4.0,
            tie_height: 10.0,
            segments: 30,
            bore_overcut: 0.1,
        }
    }
}

impl EnclosureConfig {
    /// Parse a configuration from TOML text. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = EnclosureConfig::default();
        assert_eq!(cfg.wall_thick, 2.0);
        assert_eq!(cfg.length, 170.0);
        assert_eq!(cfg.laser_height, 24.7);
        assert_eq!(cfg.segments, 30);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EnclosureConfig::from_toml_str("wall_thick = 1.5\nsegments = 60\n").unwrap();
        assert_eq!(cfg.wall_thick, 1.5);
        assert_eq!(cfg.segments, 60);
        assert_eq!(cfg.width, 108.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = EnclosureConfig::from_toml_str("wall_thick = \"thin\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
