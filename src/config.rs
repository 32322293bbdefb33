//! Sampling configuration and its validation step (the safety gate).
//!
//! A [`SamplingConfig`] is built once from CLI input, with `0` meaning "unset"
//! for the two stopping fields, and is immutable afterwards. Validation turns
//! it into a [`ValidatedConfig`] whose [`StopCondition`] makes the
//! count-xor-duration invariant unrepresentable, or rejects it with a
//! [`ConfigError`] before any hardware resource is touched.

use std::time::Duration;

use crate::error::ConfigError;
use crate::gpio::BoardGeneration;

/// Vendor-documented stable polling rate on non-overclocked hardware, in Hz.
///
/// Sampling at or above this frequency needs an overclocked board; the
/// request is refused unless the user explicitly acknowledges that.
pub const OVERCLOCK_THRESHOLD_HZ: u32 = 13_000_000;

/// Highest pin covered by level register 0.
pub const MAX_PIN: u32 = 31;

/// Raw sampling configuration, as it arrives from the CLI.
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    /// GPIO pin to sample. 0 = unset.
    pub pin: u32,
    /// Target sampling frequency in Hz. 0 = unset.
    pub frequency_hz: u32,
    /// Number of samples to take. 0 = unset.
    pub sample_size: u32,
    /// Wall-clock sampling duration in seconds. 0 = unset.
    pub sample_secs: u32,
    /// Board generation, for base address resolution.
    pub generation: BoardGeneration,
    /// User opt-in for frequencies at or above [`OVERCLOCK_THRESHOLD_HZ`].
    pub overclock_acknowledged: bool,
    /// Output name; samples land in `<name>.csv`.
    pub output_name: String,
}

/// When a sampling run stops. Exactly one policy survives validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Stop after exactly this many samples.
    Count(usize),
    /// Stop once this much wall-clock time has elapsed.
    Duration(Duration),
}

/// A configuration that passed the safety gate.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// GPIO pin to sample (1-31).
    pub pin: u32,
    /// Target sampling frequency in Hz.
    pub frequency_hz: u32,
    /// Stopping policy for the run.
    pub stop: StopCondition,
    /// Board generation, for base address resolution.
    pub generation: BoardGeneration,
    /// Output name; samples land in `<name>.csv`.
    pub output_name: String,
}

impl SamplingConfig {
    /// Validate the configuration.
    ///
    /// Rejects incomplete input, pins outside level register 0, ambiguous
    /// stopping policies (both count and duration set), and unacknowledged
    /// frequencies at or above the overclock threshold. On success the
    /// configuration passes through unchanged apart from folding the stopping
    /// fields into a [`StopCondition`].
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.output_name.is_empty() {
            return Err(ConfigError::Incomplete("output name"));
        }
        if self.frequency_hz == 0 {
            return Err(ConfigError::Incomplete("sampling frequency"));
        }
        if self.pin == 0 {
            return Err(ConfigError::Incomplete("pin number"));
        }
        if self.pin > MAX_PIN {
            return Err(ConfigError::UnsupportedPin(self.pin));
        }

        let stop = match (self.sample_size, self.sample_secs) {
            (0, 0) => return Err(ConfigError::Incomplete("stopping policy (sample count or duration)")),
            (count, 0) => StopCondition::Count(count as usize),
            (0, secs) => StopCondition::Duration(Duration::from_secs(u64::from(secs))),
            (_, _) => return Err(ConfigError::AmbiguousStoppingPolicy),
        };

        if self.frequency_hz >= OVERCLOCK_THRESHOLD_HZ && !self.overclock_acknowledged {
            return Err(ConfigError::OverclockRequired(self.frequency_hz));
        }

        Ok(ValidatedConfig {
            pin: self.pin,
            frequency_hz: self.frequency_hz,
            stop,
            generation: self.generation,
            output_name: self.output_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SamplingConfig {
        SamplingConfig {
            pin: 5,
            frequency_hz: 1_000,
            sample_size: 10,
            sample_secs: 0,
            generation: BoardGeneration::Pi4,
            overclock_acknowledged: false,
            output_name: "t".into(),
        }
    }

    #[test]
    fn valid_count_config_passes() {
        let validated = base_config().validate().unwrap();
        assert_eq!(validated.stop, StopCondition::Count(10));
        assert_eq!(validated.pin, 5);
        assert_eq!(validated.frequency_hz, 1_000);
    }

    #[test]
    fn duration_folds_into_stop_condition() {
        let mut config = base_config();
        config.sample_size = 0;
        config.sample_secs = 3;
        let validated = config.validate().unwrap();
        assert_eq!(validated.stop, StopCondition::Duration(Duration::from_secs(3)));
    }

    #[test]
    fn missing_stopping_policy_is_incomplete() {
        let mut config = base_config();
        config.sample_size = 0;
        config.sample_secs = 0;
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Incomplete("stopping policy (sample count or duration)")
        );
    }

    #[test]
    fn both_stopping_policies_are_ambiguous() {
        let mut config = base_config();
        config.sample_secs = 2;
        assert_eq!(config.validate().unwrap_err(), ConfigError::AmbiguousStoppingPolicy);
    }

    #[test]
    fn missing_name_frequency_and_pin_are_incomplete() {
        let mut config = base_config();
        config.output_name = String::new();
        assert_eq!(config.validate().unwrap_err(), ConfigError::Incomplete("output name"));

        let mut config = base_config();
        config.frequency_hz = 0;
        assert_eq!(config.validate().unwrap_err(), ConfigError::Incomplete("sampling frequency"));

        let mut config = base_config();
        config.pin = 0;
        assert_eq!(config.validate().unwrap_err(), ConfigError::Incomplete("pin number"));
    }

    #[test]
    fn pins_beyond_level_register_0_are_rejected() {
        let mut config = base_config();
        config.pin = 32;
        assert_eq!(config.validate().unwrap_err(), ConfigError::UnsupportedPin(32));
    }

    #[test]
    fn overclock_threshold_requires_acknowledgment() {
        let mut config = base_config();
        config.frequency_hz = OVERCLOCK_THRESHOLD_HZ;
        assert_eq!(
            config.clone().validate().unwrap_err(),
            ConfigError::OverclockRequired(OVERCLOCK_THRESHOLD_HZ)
        );

        config.overclock_acknowledged = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn just_below_the_threshold_needs_no_acknowledgment() {
        let mut config = base_config();
        config.frequency_hz = OVERCLOCK_THRESHOLD_HZ - 1;
        assert!(config.validate().is_ok());
    }
}
