#![forbid(unsafe_code)]

//! Optional audio cue capability.
//!
//! The controller asks for one short tone when the connection is
//! established. The capability is optional: a controller without one simply
//! skips the cue, and a capability that fails reports a [`ToneError`] that
//! the controller logs and discards.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sine,
}

/// A short tone request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Linear gain in `[0, 1]`.
    pub gain: f32,
    pub waveform: Waveform,
}

impl ToneSpec {
    /// The connection-established beep: 800Hz square wave, 100ms, low gain.
    pub const CONNECTION_BEEP: Self = Self {
        frequency_hz: 800.0,
        duration: Duration::from_millis(100),
        gain: 0.1,
        waveform: Waveform::Square,
    };
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self::CONNECTION_BEEP
    }
}

/// Why a tone could not be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToneError {
    /// The host has no usable audio output.
    Unavailable,
    /// Writing to the output failed.
    Output(String),
}

impl fmt::Display for ToneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "audio output not available"),
            Self::Output(msg) => write!(f, "audio output failed: {msg}"),
        }
    }
}

impl std::error::Error for ToneError {}

impl From<io::Error> for ToneError {
    fn from(err: io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Host audio facility.
pub trait AudioCue {
    /// Start playing `tone` and return without waiting for it to finish.
    fn play_tone(&mut self, tone: &ToneSpec) -> Result<(), ToneError>;
}

/// Terminal bell (`BEL`, 0x07) as the audio facility.
///
/// Terminals do not expose oscillator control, so the tone parameters are
/// advisory; the terminal decides pitch and length (or flashes instead).
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    writer: W,
}

impl TerminalBell<io::Stdout> {
    /// Bell on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    /// Bell writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AudioCue for TerminalBell<W> {
    fn play_tone(&mut self, tone: &ToneSpec) -> Result<(), ToneError> {
        if tone.gain <= 0.0 {
            return Ok(());
        }
        self.writer.write_all(b"\x07")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bell_writes_bel_byte() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play_tone(&ToneSpec::CONNECTION_BEEP).unwrap();
        assert_eq!(bell.into_inner(), b"\x07");
    }

    #[test]
    fn muted_tone_writes_nothing() {
        let mut bell = TerminalBell::new(Vec::new());
        let muted = ToneSpec {
            gain: 0.0,
            ..ToneSpec::CONNECTION_BEEP
        };
        bell.play_tone(&muted).unwrap();
        assert!(bell.into_inner().is_empty());
    }

    #[test]
    fn write_failure_maps_to_output_error() {
        let mut bell = TerminalBell::new(BrokenPipe);
        let err = bell.play_tone(&ToneSpec::default()).unwrap_err();
        assert!(matches!(err, ToneError::Output(_)));
    }

    #[test]
    fn connection_beep_parameters() {
        let tone = ToneSpec::CONNECTION_BEEP;
        assert_eq!(tone.frequency_hz, 800.0);
        assert_eq!(tone.duration, Duration::from_millis(100));
        assert_eq!(tone.waveform, Waveform::Square);
        assert!(tone.gain > 0.0 && tone.gain <= 0.2);
    }
}
