// ABOUTME: Engine configuration with typed defaults and hard validation
// ABOUTME: Out-of-range values are refused at load, never silently clamped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Liftlog Project

//! Configuration consumed by the engine.
//!
//! Loaded by the surrounding application (out of core scope) and validated
//! here before any pass runs.

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Tunable parameters for one recomputation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trailing window (in sessions) for movement trend classification
    pub trend_window_size: usize,

    /// Sliding window (in days) for session frequency counting
    pub frequency_window_days: i64,

    /// Ordered date format preference; earlier formats win on ambiguity
    pub date_format_preference: Vec<String>,

    /// Minimum regression slope magnitude for a trend to count as
    /// improving or declining rather than plateau
    pub trend_slope_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_window_size: 5,
            frequency_window_days: 7,
            date_format_preference: vec![
                "%Y-%m-%d".into(),
                "%m/%d/%Y".into(),
                "%d/%m/%Y".into(),
            ],
            trend_slope_tolerance: 0.01,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationOutOfRange`] when any field is out
    /// of its documented range. Values are never clamped: clamping would mask
    /// a caller mistake.
    pub fn validate(&self) -> EngineResult<()> {
        if self.trend_window_size < 2 {
            return Err(EngineError::ConfigurationOutOfRange(format!(
                "trend_window_size must be >= 2, got {}",
                self.trend_window_size
            )));
        }
        if self.frequency_window_days < 1 {
            return Err(EngineError::ConfigurationOutOfRange(format!(
                "frequency_window_days must be >= 1, got {}",
                self.frequency_window_days
            )));
        }
        if self.date_format_preference.is_empty() {
            return Err(EngineError::ConfigurationOutOfRange(
                "date_format_preference must list at least one format".into(),
            ));
        }
        if self
            .date_format_preference
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return Err(EngineError::ConfigurationOutOfRange(
                "date_format_preference entries must be non-empty".into(),
            ));
        }
        if !self.trend_slope_tolerance.is_finite() || self.trend_slope_tolerance < 0.0 {
            return Err(EngineError::ConfigurationOutOfRange(format!(
                "trend_slope_tolerance must be finite and >= 0, got {}",
                self.trend_slope_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn trend_window_below_two_is_refused() {
        let config = EngineConfig {
            trend_window_size: 1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::ConfigurationOutOfRange(_))
        ));
    }

    #[test]
    fn zero_frequency_window_is_refused() {
        let config = EngineConfig {
            frequency_window_days: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_format_list_is_refused() {
        let config = EngineConfig {
            date_format_preference: vec![],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_tolerance_is_refused() {
        let config = EngineConfig {
            trend_slope_tolerance: -0.5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
