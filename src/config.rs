//! TOML configuration for the beam renderer.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```toml
//! pad = 30.0
//! max_vertices = 6000
//!
//! [style]
//! core_thickness = 0.002
//! beam_thickness = 0.002
//! glow_thickness = 0.01
//!
//! [timings]
//! grow = 0.2
//! linger = 0.5
//! fade = 0.3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{RenderStyle, QUAD_VERTICES};

/// Vertex capacity used when a configuration does not name one: 1820 beams
/// per draw call.
pub const DEFAULT_MAX_VERTICES: usize = 10920;

/// Renderer settings loadable from TOML.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Thicknesses, timings and pad applied at each `begin()`.
    #[serde(flatten)]
    pub render: RenderStyle,
    /// Vertex buffer size handed to the GPU device.
    pub max_vertices: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            render: RenderStyle::default(),
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

impl BeamConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// As [`from_toml_str`](Self::from_toml_str), plus [`ConfigError::Io`]
    /// if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check the values the shader and batcher rely on.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timings = &self.render.timings;
        for (field, value) in [
            ("timings.grow", timings.grow),
            ("timings.linger", timings.linger),
            ("timings.fade", timings.fade),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number of seconds",
                });
            }
        }

        let style = &self.render.style;
        for (field, value) in [
            ("style.core_thickness", style.core_thickness),
            ("style.beam_thickness", style.beam_thickness),
            ("style.glow_thickness", style.glow_thickness),
            ("pad", self.render.pad),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }

        if self.max_vertices < QUAD_VERTICES {
            return Err(ConfigError::Invalid {
                field: "max_vertices",
                reason: "must hold at least one beam (6 vertices)",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_whole_beams() {
        assert_eq!(DEFAULT_MAX_VERTICES % QUAD_VERTICES, 0);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(BeamConfig::from_toml_str("").unwrap(), BeamConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = BeamConfig::from_toml_str(
            r"
            pad = 30.0

            [style]
            glow_thickness = 0.01
            ",
        )
        .unwrap();
        assert!((config.render.pad - 30.0).abs() < f32::EPSILON);
        assert!((config.render.style.glow_thickness - 0.01).abs() < f32::EPSILON);
        assert!((config.render.style.core_thickness - 0.003).abs() < f32::EPSILON);
        assert!((config.render.timings.linger - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_vertices, DEFAULT_MAX_VERTICES);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = BeamConfig::from_toml_str("[timings]\nfade = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timings.fade",
                ..
            }
        ));
    }

    #[test]
    fn negative_pad_is_rejected() {
        let err = BeamConfig::from_toml_str("pad = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pad", .. }));
    }

    #[test]
    fn tiny_capacity_is_rejected() {
        let err = BeamConfig::from_toml_str("max_vertices = 5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_vertices",
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = BeamConfig::from_toml_str("pad = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BeamConfig::load("/nonexistent/beams.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
