#![forbid(unsafe_code)]

//! Real-time host: drives a [`BootRunner`] from the wall clock and paints it.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use termboot_core::terminal_session::{SessionOptions, TerminalSession};
use termboot_runtime::{
    BootEvent, BootRunner, BootScreen, ConfigError, ProgressSimulator, SeededRandom,
    SequenceEvent, TerminalBell,
};
use termboot_widgets::{BootScreenView, Buffer, TerminalInfo, Widget};

use crate::cli::Opts;
use crate::paint::Painter;

/// Input poll interval; bounds the frame rate at roughly 30 fps.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The boot screen host model.
pub struct App {
    runner: BootRunner,
    info: TerminalInfo,
    scanner_seed: u32,
    warning_shown_at: Option<Duration>,
    exit_after: Option<Duration>,
}

impl App {
    /// Build the app from parsed options. Nothing runs until [`tick`](Self::tick).
    pub fn new(opts: &Opts) -> Result<Self, ConfigError> {
        let config = opts.sequence_config()?;
        let seed = opts.seed.unwrap_or_else(rand::random);
        let mut screen = BootScreen::new(config, ProgressSimulator::new(SeededRandom::new(seed)))?;
        if opts.beep {
            screen
                .controller_mut()
                .set_audio(Some(Box::new(TerminalBell::stdout())));
        }
        let mut runner = BootRunner::new(screen);
        runner.mount();
        tracing::info!(seed, speed = opts.speed, beep = opts.beep, "boot screen started");

        Ok(Self {
            runner,
            info: TerminalInfo::default(),
            scanner_seed: (seed ^ (seed >> 32)) as u32,
            warning_shown_at: None,
            exit_after: (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms)),
        })
    }

    /// Advance the boot sequence to `now` (time since start).
    pub fn tick(&mut self, now: Duration) {
        self.runner.advance_to(now);
        for event in self.runner.take_events() {
            if event.event == BootEvent::Sequence(SequenceEvent::WarningShown) {
                self.warning_shown_at = Some(event.at);
            }
        }
    }

    /// Whether the auto-exit deadline has passed.
    pub fn should_exit(&self, now: Duration) -> bool {
        self.exit_after.is_some_and(|limit| now >= limit)
    }

    /// Render the current state into a `width` x `height` buffer.
    pub fn frame(&self, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::new(width, height);
        BootScreenView::new(self.runner.view(), &self.info)
            .scanner_seed(self.scanner_seed)
            .elapsed(self.runner.now())
            .warning_shown_at(self.warning_shown_at)
            .render(buf.area(), &mut buf);
        buf
    }

    /// Stop the sequence and cancel its timers.
    pub fn shutdown(&mut self) {
        self.runner.unmount();
    }

    pub fn runner(&self) -> &BootRunner {
        &self.runner
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Run the app in the terminal until the user quits or auto-exit fires.
pub fn run(mut app: App) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        hide_cursor: true,
    })?;
    let mut stdout = io::stdout();
    let mut painter = Painter::new();
    let start = Instant::now();

    loop {
        let now = start.elapsed();
        app.tick(now);
        if app.should_exit(now) {
            tracing::info!("auto-exit deadline reached");
            break;
        }

        let (width, height) = session.size()?;
        painter.paint(&mut stdout, &app.frame(width, height))?;

        if session.poll_event(FRAME_INTERVAL)? {
            match session.read_event()? {
                Event::Key(key) if is_quit(&key) => break,
                Event::Resize(..) => painter.invalidate(),
                _ => {}
            }
        }
    }

    app.shutdown();
    stdout.flush()?;
    drop(session);
    Ok(())
}
