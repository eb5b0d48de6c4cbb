#![forbid(unsafe_code)]

//! termboot Runtime
//!
//! The boot/scan sequencing engine behind the terminal boot screen.
//!
//! # Key Components
//!
//! - [`SequenceController`] - Owns the stage timeline, scan simulation, and follow-on reveals
//! - [`ProgressSimulator`] - Randomized progress policy with an injected [`RandomSource`]
//! - [`TypewriterReveal`] - Independent character-by-character reveal
//! - [`AudioCue`] - Optional, best-effort tone capability
//! - [`BootScreen`] - Host model wiring the controller to the status typewriter
//! - [`BootRunner`] - Deterministic driver advancing a [`BootScreen`] to host-supplied instants
//!
//! # How it fits in the system
//! Components schedule through `termboot_core::scheduler`, so they never
//! block and never read a clock. `termboot-widgets` renders the
//! [`BootView`] this crate projects.

pub mod audio;
pub mod config;
pub mod progress;
pub mod runner;
pub mod screen;
pub mod sequence;
pub mod typewriter;

pub use audio::{AudioCue, TerminalBell, ToneError, ToneSpec, Waveform};
pub use config::{ConfigError, RevealConfig, SequenceConfig};
pub use progress::{FixedSequence, ProgressSimulator, RandomSource, SCAN_COMPLETE, SeededRandom};
pub use runner::{BootRunner, TimedEvent};
pub use screen::{
    BootEvent, BootScreen, BootTimer, BootView, STATUS_ANALYZING, STATUS_AWAITING,
    STATUS_COMPLETE, StatusLine,
};
pub use sequence::{
    ConnectionState, ScanPhase, SequenceController, SequenceEvent, SequenceTimer, Stage, ViewModel,
};
pub use typewriter::{RevealEvent, RevealTimer, TypewriterReveal};
