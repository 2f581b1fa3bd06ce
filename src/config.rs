use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rotation used for a segment whose endpoints coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRotation {
    #[default]
    Identity,
    /// Reuse the rotation of the preceding segment in the same pass (identity for the first).
    Previous,
}

impl DegenerateRotation {
    pub fn label(self) -> &'static str {
        match self {
            DegenerateRotation::Identity => "Identity",
            DegenerateRotation::Previous => "Previous segment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    #[serde(default = "TrailConfig::default_width")]
    pub width: f32,
    #[serde(default = "TrailConfig::default_aspect_ratio_parameter")]
    pub aspect_ratio_parameter: String,
    #[serde(default)]
    pub degenerate_rotation: DegenerateRotation,
}

#[derive(Debug, Clone, Default)]
pub struct TrailConfigOverrides {
    pub width: Option<f32>,
    pub aspect_ratio_parameter: Option<String>,
}

impl TrailConfig {
    pub const DEFAULT_ASPECT_RATIO_PARAMETER: &'static str = "_AspectRatio";

    const fn default_width() -> f32 {
        0.3
    }

    fn default_aspect_ratio_parameter() -> String {
        Self::DEFAULT_ASPECT_RATIO_PARAMETER.to_string()
    }

    pub fn with_width(width: f32) -> Self {
        Self { width, ..Self::default() }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read trail config file {}", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse trail config file {}", path.display()))?;
        cfg.validate().with_context(|| format!("Invalid trail config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Trail config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("Failed to parse trail config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        Self::validate_width(self.width)?;
        if self.aspect_ratio_parameter.trim().is_empty() {
            bail!("Trail aspect ratio parameter name must not be empty");
        }
        Ok(())
    }

    /// Widths feed the aspect ratio as a divisor, so anything but a finite positive value is rejected.
    pub fn validate_width(width: f32) -> Result<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(anyhow!("Trail width must be a finite value greater than zero (got {width})"));
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &TrailConfigOverrides) {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(name) = overrides.aspect_ratio_parameter.as_ref() {
            self.aspect_ratio_parameter = name.clone();
        }
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            aspect_ratio_parameter: Self::default_aspect_ratio_parameter(),
            degenerate_rotation: DegenerateRotation::default(),
        }
    }
}

impl TrailConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.aspect_ratio_parameter.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.aspect_ratio_parameter.is_some() {
            fields.push("aspect_ratio_parameter");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_authored_trail() {
        let cfg = TrailConfig::default();
        assert!((cfg.width - 0.3).abs() < f32::EPSILON);
        assert_eq!(cfg.aspect_ratio_parameter, "_AspectRatio");
        assert_eq!(cfg.degenerate_rotation, DegenerateRotation::Identity);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = TrailConfig::from_json_str(r#"{ "degenerate_rotation": "previous" }"#).unwrap();
        assert_eq!(cfg.degenerate_rotation, DegenerateRotation::Previous);
        assert_eq!(cfg.aspect_ratio_parameter, TrailConfig::DEFAULT_ASPECT_RATIO_PARAMETER);
        assert!((cfg.width - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn non_positive_or_non_finite_widths_are_rejected() {
        for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(TrailConfig::validate_width(width).is_err(), "width {width} should be rejected");
        }
        assert!(TrailConfig::from_json_str(r#"{ "width": 0.0 }"#).is_err());
    }

    #[test]
    fn blank_parameter_name_is_rejected() {
        let cfg = TrailConfig { aspect_ratio_parameter: "  ".to_string(), ..TrailConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn overrides_report_applied_fields() {
        let overrides = TrailConfigOverrides { width: Some(1.5), aspect_ratio_parameter: None };
        assert!(!overrides.is_empty());
        assert_eq!(overrides.applied_fields(), vec!["width"]);

        let mut cfg = TrailConfig::default();
        cfg.apply_overrides(&overrides);
        assert!((cfg.width - 1.5).abs() < f32::EPSILON);
        assert_eq!(cfg.aspect_ratio_parameter, "_AspectRatio");
        assert!(TrailConfigOverrides::default().is_empty());
    }
}
