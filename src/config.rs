//! Engine configuration, usually read from a TOML file
//!
//! ```toml
//! viewport_size = 120
//! density_bins = 50
//!
//! [helix]
//! turns = 3.0
//!
//! [colors]
//! a = "#00ff00"
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorMap;
use crate::error::{ConfigError, EditvizError, FileError};
use crate::helix::HelixParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Nucleotides per page in the 2D diff view
    #[serde(default = "default_viewport_size")]
    pub viewport_size: usize,
    #[serde(default = "default_density_bins")]
    pub density_bins: usize,
    /// Radius in bp around the locus center covered by the density histogram
    #[serde(default = "default_density_window")]
    pub density_window: u64,
    /// Progress added per animation frame
    #[serde(default = "default_animation_increment")]
    pub animation_increment: f64,
    /// Suggestions beyond this many are not given a tab
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default)]
    pub helix: HelixParams,
    #[serde(default)]
    pub colors: ColorMap,
}

fn default_viewport_size() -> usize {
    100
}

fn default_density_bins() -> usize {
    100
}

fn default_density_window() -> u64 {
    5000
}

fn default_animation_increment() -> f64 {
    0.01
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_size: default_viewport_size(),
            density_bins: default_density_bins(),
            density_window: default_density_window(),
            animation_increment: default_animation_increment(),
            max_suggestions: default_max_suggestions(),
            helix: HelixParams::default(),
            colors: ColorMap::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EditvizError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| FileError::toml(None::<&Path>, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EditvizError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FileError::io(Some(path), e))?;
        let config: EngineConfig =
            toml::from_str(&content).map_err(|e| FileError::toml(Some(path), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_size == 0 {
            return Err(ConfigError::new("viewport_size", "must be greater than 0"));
        }
        if !(self.animation_increment > 0.0 && self.animation_increment < 1.0) {
            return Err(ConfigError::new(
                "animation_increment",
                format!("{} is not in (0, 1)", self.animation_increment),
            ));
        }
        let helix = &self.helix;
        for (field, value) in &[
            ("helix.turns", helix.turns),
            ("helix.radius", helix.radius),
            ("helix.height", helix.height),
            ("helix.perturbation_magnitude", helix.perturbation_magnitude),
        ] {
            if !value.is_finite() || *value < 0.0 {
                return Err(ConfigError::new(
                    *field,
                    format!("{} is not a finite, non-negative number", value),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.colors.edit_emphasis) {
            return Err(ConfigError::new(
                "colors.edit_emphasis",
                format!("{} is not in [0, 1]", self.colors.edit_emphasis),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.viewport_size, 100);
        assert_eq!(config.density_bins, 100);
        assert_eq!(config.density_window, 5000);
        assert_eq!(config.max_suggestions, 5);
    }

    #[test]
    fn test_partial_tables() {
        let config = EngineConfig::from_toml_str(
            r##"
            viewport_size = 60

            [helix]
            turns = 3.5

            [colors]
            a = "#000000"
            "##,
        )
        .unwrap();
        assert_eq!(config.viewport_size, 60);
        assert_eq!(config.helix.turns, 3.5);
        assert_eq!(config.helix.radius, HelixParams::default().radius);
        assert_eq!(config.colors.a, Rgb::new(0, 0, 0));
        assert_eq!(config.colors.t, ColorMap::default().t);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        match EngineConfig::from_toml_str("viewport_size = 0") {
            Err(EditvizError::ConfigError(e)) => assert_eq!(e.field(), "viewport_size"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(EngineConfig::from_toml_str("animation_increment = 1.0").is_err());
        assert!(EngineConfig::from_toml_str("[helix]\nradius = -1.0").is_err());
        assert!(EngineConfig::from_toml_str("[colors]\nc = \"blue\"").is_err());
        assert!(EngineConfig::from_toml_str("viewport_size = \"wide\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "density_bins = 20\ndensity_window = 1000").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.density_bins, 20);
        assert_eq!(config.density_window, 1000);

        match EngineConfig::load("/nonexistent/editviz.toml") {
            Err(EditvizError::FileError(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
