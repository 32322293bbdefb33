//! Custom error types for the sampler.
//!
//! Two error enums cover the two phases of a run:
//!
//! - [`ConfigError`]: semantic problems in the requested configuration, all
//!   surfaced by validation before any hardware resource is acquired.
//! - [`SamplerError`]: everything the run itself can fail with — missing
//!   privilege, a failed peripheral mapping, or I/O on the output file.
//!
//! With `#[from]` conversions, `SamplerError` can be created seamlessly from
//! the underlying error types, so the `?` operator works throughout.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type SampleResult<T> = std::result::Result<T, SamplerError>;

/// Rejections produced by configuration validation.
///
/// All of these are reported before the GPIO peripheral is touched; no
/// partial output is produced.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("incomplete configuration: missing {0}")]
    Incomplete(&'static str),

    #[error("both a sample count and a sampling duration were given; choose one stopping policy")]
    AmbiguousStoppingPolicy,

    #[error("pin {0} is not supported: only pins 1-31 are covered by level register 0")]
    UnsupportedPin(u32),

    #[error(
        "{0} Hz is at or above the 13 MHz ceiling for non-overclocked boards; \
         pass -a to acknowledge that the board is overclocked"
    )]
    OverclockRequired(u32),
}

/// Top-level error type for a sampling run.
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("mapping the GPIO peripheral requires root privileges")]
    Permission,

    #[error("failed to map the GPIO peripheral: {0}")]
    Mapping(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write sample file: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_sampler_error() {
        let err: SamplerError = ConfigError::AmbiguousStoppingPolicy.into();
        match err {
            SamplerError::Config(ConfigError::AmbiguousStoppingPolicy) => {}
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn overclock_message_names_the_frequency() {
        let msg = ConfigError::OverclockRequired(13_000_000).to_string();
        assert!(msg.contains("13000000 Hz"));
    }
}
