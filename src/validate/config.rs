//! Validator tolerances.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Distance tolerances used by [`validate`](super::validate).
///
/// Defaults match the producer obligations of the ground-truth format:
/// 5 cm coincidence/deviation, 5 m maximum point spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Successor endpoint coincidence tolerance, in metres.
    pub epsilon: f64,
    /// Largest allowed distance between consecutive points, in metres.
    pub max_spacing: f64,
    /// Largest estimated gap between a segment and the curve it samples,
    /// in metres. Exceeding it flags the segment for review.
    pub max_chord_deviation: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            max_spacing: 5.0,
            max_chord_deviation: 0.05,
        }
    }
}

impl ValidationConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_spacing(mut self, max_spacing: f64) -> Self {
        self.max_spacing = max_spacing;
        self
    }

    pub fn with_max_chord_deviation(mut self, max_chord_deviation: f64) -> Self {
        self.max_chord_deviation = max_chord_deviation;
        self
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Reject negative or non-finite tolerances.
    pub fn check(&self) -> Result<()> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("max_spacing", self.max_spacing),
            ("max_chord_deviation", self.max_chord_deviation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be a finite value >= 0, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ValidationConfig::from_json_str(r#"{"epsilon": 0.1}"#).unwrap();
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.max_spacing, 5.0);
        assert_eq!(config.max_chord_deviation, 0.05);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let err = ValidationConfig::from_json_str(r#"{"max_spacing": -1.0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(ValidationConfig::default().with_epsilon(f64::NAN).check().is_err());
    }
}
