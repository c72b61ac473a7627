//! Configuration - overflow handling and training parameters
//!
//! Configs are plain serializable values. The default policy keeps the
//! silent-truncation behaviour of the arithmetic; the other policies make
//! overflow visible.
//!
//! ```json
//! { "learning_rate": 0.5, "overflow": "Saturate" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GatenetError, Result};
use crate::fixed::FixedPoint;

/// What fixed-point arithmetic does when a result leaves [-16, 15.875]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Keep the low eight bits (two's-complement wrap)
    #[default]
    Wrap,
    /// Clamp to the nearest bound
    Saturate,
    /// Fail with `GatenetError::Overflow`
    Error,
}

/// Single-step training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Gradient descent step size; must be a positive multiple of 0.125
    pub learning_rate: f64,
    /// Overflow handling for every arithmetic step of the pass
    pub overflow: OverflowPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            overflow: OverflowPolicy::Wrap,
        }
    }
}

impl TrainingConfig {
    /// Fail on any overflow
    pub fn strict() -> Self {
        Self {
            overflow: OverflowPolicy::Error,
            ..Self::default()
        }
    }

    /// Clamp overflowing results
    pub fn saturating() -> Self {
        Self {
            overflow: OverflowPolicy::Saturate,
            ..Self::default()
        }
    }

    /// Builder-style learning rate override
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Learning rate as a fixed-point value
    pub fn learning_rate(&self) -> Result<FixedPoint> {
        let rate = FixedPoint::from_decimal(self.learning_rate).map_err(|e| {
            GatenetError::Config(format!("learning_rate {}: {}", self.learning_rate, e))
        })?;
        if !rate.is_positive() {
            return Err(GatenetError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(rate)
    }

    /// Check every field
    pub fn validate(&self) -> Result<()> {
        self.learning_rate().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.overflow, OverflowPolicy::Wrap);
        assert!(config.validate().is_ok());

        assert_eq!(TrainingConfig::strict().overflow, OverflowPolicy::Error);
        assert_eq!(TrainingConfig::saturating().overflow, OverflowPolicy::Saturate);
    }

    #[test]
    fn test_invalid_learning_rate() {
        assert!(matches!(
            TrainingConfig::default().with_learning_rate(0.3).validate(),
            Err(GatenetError::Config(_))
        ));
        assert!(TrainingConfig::default().with_learning_rate(0.0).validate().is_err());
        assert!(TrainingConfig::default().with_learning_rate(-0.5).validate().is_err());
        assert!(TrainingConfig::default().with_learning_rate(0.125).validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = TrainingConfig::saturating().with_learning_rate(0.25);
        let json = serde_json::to_string(&config).unwrap();
        let restored: TrainingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);

        // Missing fields fall back to defaults
        let partial: TrainingConfig = serde_json::from_str(r#"{"overflow":"Error"}"#).unwrap();
        assert_eq!(partial.learning_rate, 0.5);
        assert_eq!(partial.overflow, OverflowPolicy::Error);
    }
}
