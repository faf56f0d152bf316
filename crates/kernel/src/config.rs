use crate::easing::Easing;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating an [`AnimationConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable constants of the animation loop.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fraction of the remaining distance covered per tick by scale and
    /// orientation damping.
    pub blend: f32,
    /// Per-tick progress increment for camera flight and scene transition.
    pub progress_step: f32,
    /// Radians of rotation per pixel of drag.
    pub drag_sensitivity: f32,
    /// Radians the object spins about Y each tick while the camera flies in.
    pub flight_spin: f32,
    pub original_scale: f32,
    /// Hover growth as a percentage of `original_scale`.
    pub hover_scale_percent: f32,
    /// Depth (0 near, 1 far) at which the pointer is unprojected for the
    /// pointer-follow direction.
    pub pointer_depth: f32,
    /// Flight end point relative to the object position.
    pub flight_offset: Vec3,
    pub rotation_step_degrees: f32,
    pub rotation_duration_ms: u64,
    pub rotation_easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend: 0.1,
            progress_step: 0.02,
            drag_sensitivity: 0.005,
            flight_spin: 0.1,
            original_scale: 1.0,
            hover_scale_percent: 25.0,
            pointer_depth: 0.5,
            flight_offset: Vec3::new(0.0, 0.0, 2.0),
            rotation_step_degrees: 90.0,
            rotation_duration_ms: 500,
            rotation_easing: Easing::Linear,
        }
    }
}

impl AnimationConfig {
    pub fn hover_scale(&self) -> f32 {
        self.original_scale + self.original_scale * self.hover_scale_percent / 100.0
    }

    pub fn rotation_duration(&self) -> Duration {
        Duration::from_millis(self.rotation_duration_ms)
    }

    pub fn rotation_step(&self) -> f32 {
        self.rotation_step_degrees.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.blend > 0.0 && self.blend <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "blend must be in (0, 1], got {}",
                self.blend
            )));
        }
        if !(self.progress_step > 0.0 && self.progress_step.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "progress_step must be positive, got {}",
                self.progress_step
            )));
        }
        if !(self.original_scale > 0.0 && self.original_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "original_scale must be positive, got {}",
                self.original_scale
            )));
        }
        if !(0.0..=1.0).contains(&self.pointer_depth) {
            return Err(ConfigError::Invalid(format!(
                "pointer_depth must be in [0, 1], got {}",
                self.pointer_depth
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&data)?;
        tracing::info!(path = %path.as_ref().display(), "animation config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let c = AnimationConfig::default();
        c.validate().unwrap();
        assert_eq!(c.hover_scale(), 1.25);
        assert_eq!(c.rotation_duration(), Duration::from_millis(500));
        assert!((c.rotation_step() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = AnimationConfig::from_json_str(r#"{ "blend": 0.2, "rotation_easing": "quad_in_out" }"#)
            .unwrap();
        assert_eq!(c.blend, 0.2);
        assert_eq!(c.rotation_easing, Easing::QuadInOut);
        assert_eq!(c.progress_step, 0.02);
        assert_eq!(c.flight_offset, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn rejects_zero_step() {
        let err = AnimationConfig::from_json_str(r#"{ "progress_step": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_blend_out_of_range() {
        assert!(AnimationConfig::from_json_str(r#"{ "blend": 1.5 }"#).is_err());
        assert!(AnimationConfig::from_json_str(r#"{ "blend": -0.1 }"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = AnimationConfig::from_json_str("{ blend: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "drag_sensitivity": 0.01 }}"#).unwrap();
        let c = AnimationConfig::load(tmp.path()).unwrap();
        assert_eq!(c.drag_sensitivity, 0.01);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AnimationConfig::load("/nonexistent/prism/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
