#![forbid(unsafe_code)]

//! Timing configuration for the boot sequence.
//!
//! The defaults reproduce the reference pacing. None of the constants are
//! load-bearing for correctness: the controller keeps its ordering
//! guarantees (monotonic stage, single completion) for any valid config.

use std::fmt;
use std::time::Duration;

use crate::audio::ToneSpec;
use crate::sequence::Stage;

/// Smallest default progress increment per tick.
pub const DEFAULT_MIN_INCREMENT: f64 = 0.5;
/// Upper (exclusive) bound of the default progress increment per tick.
pub const DEFAULT_MAX_INCREMENT: f64 = 3.5;

/// Typewriter cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    /// Time per revealed character.
    pub speed: Duration,
    /// Time before the first character's cadence starts.
    pub start_delay: Duration,
}

impl RevealConfig {
    /// Create a cadence with no start delay.
    pub const fn new(speed: Duration) -> Self {
        Self {
            speed,
            start_delay: Duration::ZERO,
        }
    }

    /// Set the start delay (builder).
    #[must_use]
    pub const fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }
}

/// Offsets and rates driving [`SequenceController`](crate::SequenceController).
///
/// Stage offsets and `scan_begin_at` are absolute, measured from mount.
/// Warning and content delays are measured from the tick that completes the
/// scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceConfig {
    pub header_at: Duration,
    pub scanner_at: Duration,
    pub scan_stage_at: Duration,
    pub info_at: Duration,
    pub scan_begin_at: Duration,
    /// Period of the repeating scan tick.
    pub tick_period: Duration,
    pub min_increment: f64,
    pub max_increment: f64,
    pub warning_delay: Duration,
    pub content_delay: Duration,
    /// Cadence of the "analyzing" status line while scanning.
    pub status_reveal: RevealConfig,
    /// Tone requested when the connection is established.
    pub tone: ToneSpec,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            header_at: Duration::from_millis(500),
            scanner_at: Duration::from_millis(1500),
            scan_stage_at: Duration::from_millis(2000),
            info_at: Duration::from_millis(2500),
            scan_begin_at: Duration::from_millis(3000),
            tick_period: Duration::from_millis(50),
            min_increment: DEFAULT_MIN_INCREMENT,
            max_increment: DEFAULT_MAX_INCREMENT,
            warning_delay: Duration::from_millis(500),
            content_delay: Duration::from_millis(1500),
            status_reveal: RevealConfig::new(Duration::from_millis(30)),
            tone: ToneSpec::CONNECTION_BEEP,
        }
    }
}

impl SequenceConfig {
    /// The four stage reveals as `(offset from mount, stage)`.
    pub fn stage_schedule(&self) -> [(Duration, Stage); 4] {
        [
            (self.header_at, Stage::HeaderShown),
            (self.scanner_at, Stage::ScannerShown),
            (self.scan_stage_at, Stage::ScanStarted),
            (self.info_at, Stage::InfoShown),
        ]
    }

    /// Check the invariants the controller relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the increment range is empty, non-finite or
    /// non-positive (the scan would never finish), or the tick period is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_increment, self.max_increment);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= min) {
            return Err(ConfigError::InvalidIncrement { min, max });
        }
        if self.tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        Ok(())
    }

    /// Return a copy with every duration divided by `speed`.
    ///
    /// `speed = 2.0` plays the whole timeline twice as fast. Tone duration is
    /// left alone; it is a property of the cue, not of the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSpeed`] unless `speed` is finite and
    /// positive and every scaled duration is representable.
    pub fn with_speed(&self, speed: f64) -> Result<Self, ConfigError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        let scale = |d: Duration| {
            let nanos = (d.as_nanos() as f64 / speed).round();
            if nanos < u64::MAX as f64 {
                Ok(Duration::from_nanos(nanos as u64))
            } else {
                Err(ConfigError::InvalidSpeed(speed))
            }
        };
        Ok(Self {
            header_at: scale(self.header_at)?,
            scanner_at: scale(self.scanner_at)?,
            scan_stage_at: scale(self.scan_stage_at)?,
            info_at: scale(self.info_at)?,
            scan_begin_at: scale(self.scan_begin_at)?,
            tick_period: scale(self.tick_period)?,
            warning_delay: scale(self.warning_delay)?,
            content_delay: scale(self.content_delay)?,
            status_reveal: RevealConfig {
                speed: scale(self.status_reveal.speed)?,
                start_delay: scale(self.status_reveal.start_delay)?,
            },
            ..*self
        })
    }
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Speed multiplier is not a positive finite number.
    InvalidSpeed(f64),
    /// Increment range cannot drive the scan to completion.
    InvalidIncrement { min: f64, max: f64 },
    /// The scan tick period is zero.
    ZeroTickPeriod,
    /// A named setting (flag or environment variable) failed to parse.
    InvalidValue { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpeed(speed) => {
                write!(f, "speed must be a positive finite number (got {speed})")
            }
            Self::InvalidIncrement { min, max } => write!(
                f,
                "increment range must satisfy 0 < min <= max (got {min}..{max})"
            ),
            Self::ZeroTickPeriod => write!(f, "scan tick period must be non-zero"),
            Self::InvalidValue { name, value } => write!(f, "invalid {name} value: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}
