#![forbid(unsafe_code)]

//! The boot/scan sequencing engine.
//!
//! [`SequenceController`] owns every piece of temporal state on the boot
//! screen: the reveal stage, the simulated scan, the connection flag and the
//! two follow-on reveals. It schedules its own timers through a
//! [`Scheduler`] and reacts when the host hands a fired [`SequenceTimer`]
//! back to [`SequenceController::on_timer`].
//!
//! # Timeline (default config)
//!
//! | offset | effect |
//! |--------|--------|
//! | mount + 500ms | stage → `HeaderShown` |
//! | mount + 1500ms | stage → `ScannerShown` |
//! | mount + 2000ms | stage → `ScanStarted` |
//! | mount + 2500ms | stage → `InfoShown` |
//! | mount + 3000ms | phase → `Scanning`, 50ms tick loop starts |
//! | completing tick | phase → `Complete`, connection → `Established`, tone |
//! | completing tick + 500ms | warning visible |
//! | completing tick + 1500ms | content visible |
//!
//! # Invariants
//!
//! 1. `stage` never decreases.
//! 2. Progress only changes while scanning, never decreases, never exceeds 100.
//! 3. `Complete`, `Established`, the tone, the warning and the content each
//!    happen at most once per controller.
//! 4. After [`unmount`](SequenceController::unmount) no delivery changes state.
//!
//! Invariant 4 holds twice over: unmount cancels every outstanding timer, and
//! every payload carries a generation that unmount invalidates.

use termboot_core::generation::{Generation, GenerationCounter};
use termboot_core::scheduler::{Scheduler, TimerGroup, TimerId};

use crate::audio::AudioCue;
use crate::config::{ConfigError, SequenceConfig};
use crate::progress::{ProgressSimulator, SCAN_COMPLETE};

/// Discrete step of the reveal timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    Idle,
    HeaderShown,
    ScannerShown,
    ScanStarted,
    InfoShown,
}

impl Stage {
    /// All stages in timeline order.
    pub const ALL: [Stage; 5] = [
        Stage::Idle,
        Stage::HeaderShown,
        Stage::ScannerShown,
        Stage::ScanStarted,
        Stage::InfoShown,
    ];

    /// Stable name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::HeaderShown => "header",
            Self::ScannerShown => "scanner",
            Self::ScanStarted => "scan",
            Self::InfoShown => "info",
        }
    }
}

/// Progress simulation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPhase {
    #[default]
    NotStarted,
    Scanning,
    Complete,
}

/// Whether the (cosmetic) connection has been established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Pending,
    Established,
}

/// Read-only projection handed to presentation each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewModel {
    pub stage: Stage,
    /// Scan progress in `[0, 100]`.
    pub scan_progress: f64,
    pub scanning: bool,
    pub connection: ConnectionState,
    pub warning_visible: bool,
    pub content_visible: bool,
}

impl ViewModel {
    /// Whether content gated on `stage` may be rendered.
    #[inline]
    pub fn shows(&self, stage: Stage) -> bool {
        self.stage >= stage
    }

    /// Whether the connection banner is up.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Established
    }
}

/// Timer payload scheduled by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTimer {
    generation: Generation,
    kind: TimerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Stage(Stage),
    BeginScan,
    ScanTick,
    ShowWarning,
    ShowContent,
}

impl SequenceTimer {
    /// Whether this payload belongs to the repeating scan loop.
    pub fn is_scan_tick(&self) -> bool {
        self.kind == TimerKind::ScanTick
    }
}

/// A state transition reported by [`SequenceController::on_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    StageChanged(Stage),
    ScanStarted,
    ScanCompleted,
    ConnectionEstablished,
    WarningShown,
    ContentShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Fresh,
    Mounted,
    Unmounted,
}

/// Owner of the boot timeline and the scan simulation.
pub struct SequenceController {
    config: SequenceConfig,
    simulator: ProgressSimulator,
    audio: Option<Box<dyn AudioCue>>,
    lifecycle: Lifecycle,

    stage: Stage,
    progress: f64,
    phase: ScanPhase,
    connection: ConnectionState,
    warning_visible: bool,
    content_visible: bool,
    /// The scan-begin timer fired before the scan stage was reached.
    scan_requested: bool,

    /// Stamps boot and follow-on timers; advanced on mount and unmount.
    lifetime: GenerationCounter,
    /// Stamps scan ticks; advanced whenever the loop starts or stops.
    scan_generation: GenerationCounter,
    boot_timers: TimerGroup,
    follow_up_timers: TimerGroup,
    scan_timer: Option<TimerId>,
}

impl std::fmt::Debug for SequenceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceController")
            .field("lifecycle", &self.lifecycle)
            .field("stage", &self.stage)
            .field("progress", &self.progress)
            .field("phase", &self.phase)
            .field("connection", &self.connection)
            .field("warning_visible", &self.warning_visible)
            .field("content_visible", &self.content_visible)
            .field("audio", &self.audio.is_some())
            .finish_non_exhaustive()
    }
}

impl SequenceController {
    /// Create an unmounted controller.
    ///
    /// The simulator takes its increment range from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`SequenceConfig::validate`].
    pub fn new(config: SequenceConfig, simulator: ProgressSimulator) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulator = simulator.with_range(config.min_increment, config.max_increment);
        Ok(Self {
            config,
            simulator,
            audio: None,
            lifecycle: Lifecycle::Fresh,
            stage: Stage::Idle,
            progress: 0.0,
            phase: ScanPhase::NotStarted,
            connection: ConnectionState::Pending,
            warning_visible: false,
            content_visible: false,
            scan_requested: false,
            lifetime: GenerationCounter::new(),
            scan_generation: GenerationCounter::new(),
            boot_timers: TimerGroup::new(),
            follow_up_timers: TimerGroup::new(),
            scan_timer: None,
        })
    }

    /// Attach the audio capability used for the connection tone (builder).
    #[must_use]
    pub fn with_audio(mut self, cue: impl AudioCue + 'static) -> Self {
        self.audio = Some(Box::new(cue));
        self
    }

    /// Replace (or remove) the audio capability.
    pub fn set_audio(&mut self, cue: Option<Box<dyn AudioCue>>) {
        self.audio = cue;
    }

    /// Configuration in use.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Whether the controller is mounted and reacting to timers.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Schedule the boot timeline.
    ///
    /// A controller mounts once; later calls are ignored.
    pub fn mount<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if self.lifecycle != Lifecycle::Fresh {
            tracing::debug!(lifecycle = ?self.lifecycle, "ignoring repeated mount");
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        let generation = self.lifetime.advance();

        for (offset, stage) in self.config.stage_schedule() {
            let id = scheduler.schedule_once(
                offset,
                SequenceTimer {
                    generation,
                    kind: TimerKind::Stage(stage),
                }
                .into(),
            );
            self.boot_timers.track(id);
        }
        let id = scheduler.schedule_once(
            self.config.scan_begin_at,
            SequenceTimer {
                generation,
                kind: TimerKind::BeginScan,
            }
            .into(),
        );
        self.boot_timers.track(id);

        tracing::debug!(
            generation = generation.get(),
            at_ms = scheduler.now().as_millis() as u64,
            "boot sequence mounted"
        );
    }

    /// Cancel every outstanding timer and stop reacting to deliveries.
    pub fn unmount<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        let boot = self.boot_timers.cancel_all(scheduler);
        let follow_up = self.follow_up_timers.cancel_all(scheduler);
        self.stop_scan_loop(scheduler);
        self.lifetime.advance();
        self.lifecycle = Lifecycle::Unmounted;
        tracing::debug!(
            cancelled_boot = boot,
            cancelled_follow_up = follow_up,
            "boot sequence unmounted"
        );
    }

    /// Handle a delivery of one of this controller's timers.
    ///
    /// Returns the transitions it caused, in order. Stale or duplicate
    /// deliveries return nothing.
    pub fn on_timer<S, P>(&mut self, timer: SequenceTimer, scheduler: &mut S) -> Vec<SequenceEvent>
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        let mut events = Vec::new();
        if !self.accepts(&timer) {
            tracing::trace!(timer = ?timer, "ignoring stale sequence timer");
            return events;
        }

        match timer.kind {
            TimerKind::Stage(stage) => self.advance_stage(stage, scheduler, &mut events),
            TimerKind::BeginScan => {
                if self.stage >= Stage::ScanStarted {
                    self.begin_scan(scheduler, &mut events);
                } else {
                    self.scan_requested = true;
                }
            }
            TimerKind::ScanTick => self.scan_tick(scheduler, &mut events),
            TimerKind::ShowWarning => {
                if !self.warning_visible {
                    self.warning_visible = true;
                    events.push(SequenceEvent::WarningShown);
                }
            }
            TimerKind::ShowContent => {
                if !self.content_visible {
                    self.content_visible = true;
                    events.push(SequenceEvent::ContentShown);
                }
            }
        }
        events
    }

    /// Run one scan tick immediately, as if the loop timer had fired.
    ///
    /// A no-op unless the controller is mounted and scanning.
    pub fn tick_now<S, P>(&mut self, scheduler: &mut S) -> Vec<SequenceEvent>
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        let mut events = Vec::new();
        if self.is_mounted() {
            self.scan_tick(scheduler, &mut events);
        }
        events
    }

    fn accepts(&self, timer: &SequenceTimer) -> bool {
        if self.lifecycle != Lifecycle::Mounted {
            return false;
        }
        match timer.kind {
            TimerKind::ScanTick => self.scan_generation.is_current(timer.generation),
            _ => self.lifetime.is_current(timer.generation),
        }
    }

    fn advance_stage<S, P>(&mut self, stage: Stage, scheduler: &mut S, events: &mut Vec<SequenceEvent>)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if stage <= self.stage {
            return;
        }
        self.stage = stage;
        tracing::debug!(stage = stage.name(), "stage advanced");
        events.push(SequenceEvent::StageChanged(stage));

        if self.scan_requested && self.stage >= Stage::ScanStarted {
            self.scan_requested = false;
            self.begin_scan(scheduler, events);
        }
    }

    fn begin_scan<S, P>(&mut self, scheduler: &mut S, events: &mut Vec<SequenceEvent>)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if self.phase != ScanPhase::NotStarted {
            return;
        }
        self.phase = ScanPhase::Scanning;
        self.start_scan_loop(scheduler);
        events.push(SequenceEvent::ScanStarted);
    }

    fn start_scan_loop<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        self.stop_scan_loop(scheduler);
        let generation = self.scan_generation.current();
        let id = scheduler.schedule_repeating(
            self.config.tick_period,
            SequenceTimer {
                generation,
                kind: TimerKind::ScanTick,
            }
            .into(),
        );
        self.scan_timer = Some(id);
        tracing::debug!(
            generation = generation.get(),
            period_ms = self.config.tick_period.as_millis() as u64,
            "scan loop started"
        );
    }

    fn stop_scan_loop<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if let Some(id) = self.scan_timer.take() {
            scheduler.cancel(id);
        }
        self.scan_generation.advance();
    }

    fn scan_tick<S, P>(&mut self, scheduler: &mut S, events: &mut Vec<SequenceEvent>)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        if self.phase != ScanPhase::Scanning {
            return;
        }
        if ProgressSimulator::is_complete(self.progress) {
            self.complete_scan(scheduler, events);
            return;
        }
        let next = self.simulator.next(self.progress).min(SCAN_COMPLETE);
        self.progress = next.max(self.progress);
        tracing::trace!(progress = self.progress, "scan tick");
    }

    fn complete_scan<S, P>(&mut self, scheduler: &mut S, events: &mut Vec<SequenceEvent>)
    where
        S: Scheduler<P> + ?Sized,
        P: From<SequenceTimer>,
    {
        self.stop_scan_loop(scheduler);
        self.phase = ScanPhase::Complete;
        self.progress = SCAN_COMPLETE;
        events.push(SequenceEvent::ScanCompleted);

        if self.connection == ConnectionState::Established {
            return;
        }
        self.connection = ConnectionState::Established;
        events.push(SequenceEvent::ConnectionEstablished);
        tracing::debug!(
            at_ms = scheduler.now().as_millis() as u64,
            "connection established"
        );

        let generation = self.lifetime.current();
        let warning = scheduler.schedule_once(
            self.config.warning_delay,
            SequenceTimer {
                generation,
                kind: TimerKind::ShowWarning,
            }
            .into(),
        );
        let content = scheduler.schedule_once(
            self.config.content_delay,
            SequenceTimer {
                generation,
                kind: TimerKind::ShowContent,
            }
            .into(),
        );
        self.follow_up_timers.track(warning);
        self.follow_up_timers.track(content);

        self.play_connection_tone();
    }

    fn play_connection_tone(&mut self) {
        let tone = self.config.tone;
        let Some(cue) = self.audio.as_mut() else {
            return;
        };
        if let Err(err) = cue.play_tone(&tone) {
            tracing::debug!(error = %err, "connection tone unavailable");
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Raw scan progress (always within `[0, 100]`).
    pub fn scan_progress(&self) -> f64 {
        self.progress
    }

    /// Current scan phase.
    pub fn scan_phase(&self) -> ScanPhase {
        self.phase
    }

    /// Current connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Project the current state for presentation.
    pub fn view(&self) -> ViewModel {
        ViewModel {
            stage: self.stage,
            scan_progress: self.progress.clamp(0.0, SCAN_COMPLETE),
            scanning: self.phase == ScanPhase::Scanning,
            connection: self.connection,
            warning_visible: self.warning_visible,
            content_visible: self.content_visible,
        }
    }
}
