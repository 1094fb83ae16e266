//! Construction options for a stat query.
//!
//! Options are validated once, at `Stat::build` time; a constructed stat
//! never re-checks them.

use crate::error::StatError;
use serde::{Deserialize, Serialize};

/// Level used when the caller does not pick one.
pub const DEFAULT_LEVEL: u32 = 30;

/// Options controlling how a stat is computed.
///
/// All fields are plain data; the builder-style setters exist for call-site
/// readability and simply overwrite the corresponding field.
///
/// # Examples
///
/// ```rust
/// use catstat::StatOptions;
///
/// let options = StatOptions::new().at_level(45).without_critical();
/// assert_eq!(options.level, 45);
/// assert!(options.dps_no_critical);
/// assert!(!options.sum_no_wave);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatOptions {
    /// Unit level the figures are computed at. Levels above the unit's
    /// `max_level` are clamped, level 0 is rejected.
    pub level: u32,

    /// Exclude every triggered-family occurrence (wave, surge, explosion)
    /// from `damage_sum` / `dps_sum`. The occurrences still appear in
    /// `attacks()`.
    pub sum_no_wave: bool,

    /// Disable critical-strike and savage-blow weighting, collapsing
    /// expected damage and dps to their unweighted values.
    pub dps_no_critical: bool,

    /// Drop ability entries sourced from the talent overlay before any
    /// expansion runs, as if the unit had no talents unlocked.
    pub exclude_talents: bool,
}

impl StatOptions {
    /// Create options with the default level and all flags off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level.
    pub fn at_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Exclude triggered-family occurrences from the aggregate sums.
    pub fn without_wave_sum(mut self) -> Self {
        self.sum_no_wave = true;
        self
    }

    /// Disable critical/savage weighting.
    pub fn without_critical(mut self) -> Self {
        self.dps_no_critical = true;
        self
    }

    /// Drop the talent overlay.
    pub fn without_talents(mut self) -> Self {
        self.exclude_talents = true;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StatError> {
        if self.level == 0 {
            return Err(StatError::InvalidOption {
                reason: format!("level must be at least 1, got {}", self.level),
            });
        }
        Ok(())
    }
}

impl Default for StatOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            sum_no_wave: false,
            dps_no_critical: false,
            exclude_talents: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = StatOptions::default();
        assert_eq!(options.level, DEFAULT_LEVEL);
        assert!(!options.sum_no_wave);
        assert!(!options.dps_no_critical);
        assert!(!options.exclude_talents);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_setters_compose() {
        let options = StatOptions::new()
            .at_level(50)
            .without_wave_sum()
            .without_talents();
        assert_eq!(options.level, 50);
        assert!(options.sum_no_wave);
        assert!(options.exclude_talents);
        assert!(!options.dps_no_critical);
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = StatOptions::new().at_level(0).validate().unwrap_err();
        assert!(err.to_string().contains("level"));
    }
}
