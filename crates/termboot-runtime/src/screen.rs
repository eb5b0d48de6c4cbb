#![forbid(unsafe_code)]

//! The boot screen model: sequence controller plus the scan status line.
//!
//! [`BootScreen`] is what a host mounts. It routes each fired [`BootTimer`]
//! to its owner and wires the one cross-component rule: the "analyzing"
//! status typewriter runs exactly while the scan is running.

use termboot_core::scheduler::Scheduler;

use crate::config::{ConfigError, SequenceConfig};
use crate::progress::{ProgressSimulator, SCAN_COMPLETE};
use crate::sequence::{SequenceController, SequenceEvent, SequenceTimer, ViewModel};
use crate::typewriter::{RevealEvent, RevealTimer, TypewriterReveal};

/// Status text while the scan runs.
pub const STATUS_ANALYZING: &str = "ANALYZING BIOMETRIC SIGNATURE...";
/// Status text once the scan has finished.
pub const STATUS_COMPLETE: &str = "SCAN COMPLETE - ACCESS GRANTED";
/// Status text before the scan starts.
pub const STATUS_AWAITING: &str = "AWAITING SCAN INITIATION";

/// Every timer payload the boot screen schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootTimer {
    Sequence(SequenceTimer),
    Status(RevealTimer),
}

impl From<SequenceTimer> for BootTimer {
    fn from(timer: SequenceTimer) -> Self {
        Self::Sequence(timer)
    }
}

impl From<RevealTimer> for BootTimer {
    fn from(timer: RevealTimer) -> Self {
        Self::Status(timer)
    }
}

/// Something observable happened on the boot screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootEvent {
    Sequence(SequenceEvent),
    /// The status typewriter finished revealing its text.
    StatusTyped,
}

/// Text under the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine<'a> {
    Awaiting,
    /// Typewriter reveal in progress (`typing` = cursor still shown).
    Analyzing { revealed: &'a str, typing: bool },
    Complete,
}

impl<'a> StatusLine<'a> {
    /// Text to display, without cursor.
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Awaiting => STATUS_AWAITING,
            Self::Analyzing { revealed, .. } => revealed,
            Self::Complete => STATUS_COMPLETE,
        }
    }
}

/// Everything presentation needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootView<'a> {
    pub sequence: ViewModel,
    pub status: StatusLine<'a>,
}

/// Host-facing boot screen model.
#[derive(Debug)]
pub struct BootScreen {
    controller: SequenceController,
    status: TypewriterReveal,
}

impl BootScreen {
    /// Build a screen from configuration and a progress policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: SequenceConfig, simulator: ProgressSimulator) -> Result<Self, ConfigError> {
        let controller = SequenceController::new(config, simulator)?;
        Ok(Self::from_controller(controller))
    }

    /// Wrap an already-built controller.
    pub fn from_controller(controller: SequenceController) -> Self {
        Self {
            status: TypewriterReveal::new(controller.config().status_reveal),
            controller,
        }
    }

    /// The sequence controller.
    pub fn controller(&self) -> &SequenceController {
        &self.controller
    }

    /// Mutable access, e.g. to attach audio before mounting.
    pub fn controller_mut(&mut self) -> &mut SequenceController {
        &mut self.controller
    }

    /// The status typewriter.
    pub fn status(&self) -> &TypewriterReveal {
        &self.status
    }

    /// Start the boot timeline.
    pub fn mount<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<BootTimer> + ?Sized,
    {
        self.controller.mount(scheduler);
    }

    /// Tear down every timer chain.
    pub fn unmount<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<BootTimer> + ?Sized,
    {
        self.status.cancel(scheduler);
        self.controller.unmount(scheduler);
    }

    /// Route a fired timer to its owner.
    pub fn handle<S>(&mut self, timer: BootTimer, scheduler: &mut S) -> Vec<BootEvent>
    where
        S: Scheduler<BootTimer> + ?Sized,
    {
        match timer {
            BootTimer::Sequence(timer) => {
                let events = self.controller.on_timer(timer, scheduler);
                for event in &events {
                    self.follow_sequence(*event, scheduler);
                }
                events.into_iter().map(BootEvent::Sequence).collect()
            }
            BootTimer::Status(timer) => match self.status.on_timer(timer, scheduler) {
                Some(RevealEvent::Completed) => vec![BootEvent::StatusTyped],
                _ => Vec::new(),
            },
        }
    }

    fn follow_sequence<S>(&mut self, event: SequenceEvent, scheduler: &mut S)
    where
        S: Scheduler<BootTimer> + ?Sized,
    {
        match event {
            SequenceEvent::ScanStarted => self.status.set_text(STATUS_ANALYZING, scheduler),
            SequenceEvent::ScanCompleted => self.status.cancel(scheduler),
            _ => {}
        }
    }

    /// Project the current state for presentation.
    pub fn view(&self) -> BootView<'_> {
        let sequence = self.controller.view();
        let status = if sequence.scanning {
            StatusLine::Analyzing {
                revealed: self.status.revealed_text(),
                typing: !self.status.is_complete(),
            }
        } else if sequence.scan_progress >= SCAN_COMPLETE {
            StatusLine::Complete
        } else {
            StatusLine::Awaiting
        };
        BootView { sequence, status }
    }
}
