#![forbid(unsafe_code)]

//! Diagnostic event tests.
//!
//! The runtime logs lifecycle transitions with `tracing`. These tests attach
//! a capturing layer and check that the transitions a host would grep for
//! are reported exactly when they happen, and that a failing tone is only
//! ever logged.
//!
//!   cargo test -p termboot-runtime --test tracing_tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use termboot_runtime::{
    AudioCue, BootRunner, BootScreen, FixedSequence, ProgressSimulator, SequenceConfig,
    SequenceController, ToneError, ToneSpec,
};

use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event: level, message, and remaining fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct CaptureHandle {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

/// Visitor that splits out the message field.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn with_captured_events<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { events }
}

fn fast_runner() -> BootRunner {
    BootRunner::new(
        BootScreen::new(
            SequenceConfig::default(),
            ProgressSimulator::new(FixedSequence::constant(1.0)),
        )
        .unwrap(),
    )
}

struct BrokenSpeaker;

impl AudioCue for BrokenSpeaker {
    fn play_tone(&mut self, _tone: &ToneSpec) -> Result<(), ToneError> {
        Err(ToneError::Unavailable)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn stage_transitions_are_logged_in_order() {
    let handle = with_captured_events(|| {
        let mut runner = fast_runner();
        runner.mount();
        runner.advance_to(Duration::from_millis(2_500));
    });

    let stages: Vec<String> = handle
        .with_message("stage advanced")
        .iter()
        .filter_map(|e| e.field("stage").map(str::to_owned))
        .collect();
    assert_eq!(stages, ["header", "scanner", "scan", "info"]);
}

#[test]
fn connection_is_logged_once_at_debug() {
    let handle = with_captured_events(|| {
        let mut runner = fast_runner();
        runner.mount();
        runner.advance_to(Duration::from_secs(30));
    });

    let established = handle.with_message("connection established");
    assert_eq!(established.len(), 1);
    assert_eq!(established[0].level, tracing::Level::DEBUG);
    // Just under 3.5 per tick reaches 100 on tick 29; completion is tick 30.
    assert_eq!(established[0].field("at_ms"), Some("4500"));
}

#[test]
fn tone_failure_is_logged_not_raised() {
    let handle = with_captured_events(|| {
        let controller = SequenceController::new(
            SequenceConfig::default(),
            ProgressSimulator::new(FixedSequence::constant(1.0)),
        )
        .unwrap()
        .with_audio(BrokenSpeaker);
        let mut runner = BootRunner::new(BootScreen::from_controller(controller));
        runner.mount();
        runner.advance_to(Duration::from_secs(30));
        assert!(runner.view().sequence.content_visible);
    });

    let failures = handle.with_message("connection tone unavailable");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].field("error"), Some("audio output not available"));
}

#[test]
fn unmount_reports_cancelled_timers() {
    let handle = with_captured_events(|| {
        let mut runner = fast_runner();
        runner.mount();
        runner.advance_to(Duration::from_millis(1_000));
        runner.unmount();
    });

    let unmounted = handle.with_message("boot sequence unmounted");
    assert_eq!(unmounted.len(), 1);
    // Header fired; scanner, scan stage, info, and scan begin were pending.
    assert_eq!(unmounted[0].field("cancelled_boot"), Some("4"));
    assert_eq!(unmounted[0].field("cancelled_follow_up"), Some("0"));
}

#[test]
fn no_events_without_subscriber() {
    // No subscriber installed: logging must be inert.
    let mut runner = fast_runner();
    runner.mount();
    runner.advance_to(Duration::from_secs(30));
    assert!(runner.view().sequence.is_connected());
}
