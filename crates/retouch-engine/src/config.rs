//! Engine configuration.
//!
//! ```rust
//! use std::time::Duration;
//! use retouch_engine::EngineConfig;
//!
//! let config = EngineConfig::default().with_render_interval(Duration::from_millis(120));
//! assert_eq!(config.render_interval_ms, 120);
//!
//! let parsed = EngineConfig::from_json(r#"{ "edge_mode": "skip" }"#).unwrap();
//! assert_eq!(parsed.render_interval_ms, 300);
//! ```

use crate::{EngineError, EngineResult};
use retouch_ops::EdgeMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default minimum interval between renders.
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 300;

/// Default snap-to-center window, as a fraction of a scalar range's span.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.02;

/// Upper bound for the snap window. Half the span would snap every value.
pub const MAX_SNAP_THRESHOLD: f32 = 0.5;

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum milliseconds between two render passes.
    pub render_interval_ms: u64,
    /// Snap-to-center window as a fraction of the range span.
    pub snap_threshold: f32,
    /// Boundary handling for filter effects.
    ///
    /// `skip` drops out-of-bounds taps without renormalizing, the classic
    /// canvas-editor look with darkened borders; `clamp` keeps flat regions
    /// flat up to the edge.
    pub edge_mode: EdgeMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            edge_mode: EdgeMode::Clamp,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] on malformed JSON, [`EngineError::InvalidValue`]
    /// if a field is out of range.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.snap_threshold.is_finite()
            || !(0.0..=MAX_SNAP_THRESHOLD).contains(&self.snap_threshold)
        {
            return Err(EngineError::InvalidValue(format!(
                "snap_threshold {} outside [0, {}]",
                self.snap_threshold, MAX_SNAP_THRESHOLD
            )));
        }
        Ok(())
    }

    /// Render interval as a [`Duration`].
    #[inline]
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    /// Sets the render interval.
    pub fn with_render_interval(mut self, interval: Duration) -> Self {
        self.render_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the snap-to-center window.
    pub fn with_snap_threshold(mut self, threshold: f32) -> Self {
        self.snap_threshold = threshold;
        self
    }

    /// Sets filter boundary handling.
    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }
}
