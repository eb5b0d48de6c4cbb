#![forbid(unsafe_code)]

//! The composed boot screen.
//!
//! [`BootScreenView`] stacks the leaves top to bottom and mounts each one
//! only once the view model allows it: header from `HeaderShown`, scanner
//! from `ScannerShown`, progress and status from `ScanStarted`, info panels
//! from `InfoShown`, banner/warning/content on their flags. Sections that do
//! not fit in the area are clipped at the bottom.

use std::time::Duration;

use termboot_runtime::{BootView, Stage};

use crate::buffer::{Buffer, Tone};
use crate::geometry::Rect;
use crate::info::{ContentPanels, Footer, InfoPanels, TerminalInfo};
use crate::panel::TerminalBox;
use crate::progress::ProgressBar;
use crate::scanner::{self, Scanner};
use crate::typewriter::TypewriterText;
use crate::warning::WarningBanner;
use crate::{Widget, display_width, draw_centered};

pub const TITLE: &str = "SCP FOUNDATION";
pub const MOTTO: &str = "SECURE. CONTAIN. PROTECT.";
pub const CONNECTION_BANNER: &str = "> CONNECTION SUCCESSFULLY ESTABLISHED <";
pub const SCAN_LABEL: &str = "BIOMETRIC SCAN";

/// Widest the page grows before it is centered.
pub const MAX_PAGE_WIDTH: u16 = 140;
/// Widest the progress section grows.
pub const MAX_PROGRESS_WIDTH: u16 = 48;

const SECTION_GAP: u16 = 1;

/// Boxed title and motto.
#[derive(Debug, Clone, Copy, Default)]
pub struct Header;

impl Header {
    pub const HEIGHT: u16 = 4;

    fn width() -> u16 {
        (display_width(TITLE).max(display_width(MOTTO)) + 8) as u16
    }
}

impl Widget for Header {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.centered(Self::width(), Self::HEIGHT);
        TerminalBox::new().render(area, buf);
        let inner = area.inner(1);
        draw_centered(buf, inner.row(0), TITLE, Tone::Bright);
        draw_centered(buf, inner.row(1), MOTTO, Tone::Subtle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Banner,
    Scanner,
    Progress,
    Warning,
    Info,
    Content,
    Footer,
}

/// Full-page view of the boot screen for one frame.
#[derive(Debug, Clone, Copy)]
pub struct BootScreenView<'a> {
    view: BootView<'a>,
    info: &'a TerminalInfo,
    scanner_seed: u32,
    elapsed: Duration,
    warning_shown_at: Option<Duration>,
}

impl<'a> BootScreenView<'a> {
    pub fn new(view: BootView<'a>, info: &'a TerminalInfo) -> Self {
        Self {
            view,
            info,
            scanner_seed: 1,
            elapsed: Duration::ZERO,
            warning_shown_at: None,
        }
    }

    /// Seed for the scanner's data points; keep it fixed for one mount.
    #[must_use]
    pub fn scanner_seed(mut self, seed: u32) -> Self {
        self.scanner_seed = seed;
        self
    }

    /// Time since mount; drives cosmetic animation only.
    #[must_use]
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// When the warning became visible, for its flash phase.
    #[must_use]
    pub fn warning_shown_at(mut self, at: Option<Duration>) -> Self {
        self.warning_shown_at = at;
        self
    }

    fn sections(&self) -> Vec<Section> {
        let vm = &self.view.sequence;
        let mut out = Vec::with_capacity(8);
        if vm.shows(Stage::HeaderShown) {
            out.push(Section::Header);
        }
        if vm.is_connected() {
            out.push(Section::Banner);
        }
        if vm.shows(Stage::ScannerShown) {
            out.push(Section::Scanner);
        }
        if vm.shows(Stage::ScanStarted) {
            out.push(Section::Progress);
        }
        if vm.warning_visible {
            out.push(Section::Warning);
        }
        if vm.shows(Stage::InfoShown) {
            out.push(Section::Info);
        }
        if vm.content_visible {
            out.push(Section::Content);
            out.push(Section::Footer);
        }
        out
    }

    fn progress_bar(&self) -> ProgressBar<'static> {
        ProgressBar::new()
            .label(SCAN_LABEL)
            .percent(self.view.sequence.scan_progress)
    }

    fn section_height(&self, section: Section, width: u16) -> u16 {
        match section {
            Section::Header => Header::HEIGHT,
            Section::Banner => 1,
            Section::Scanner => scanner::PREFERRED_HEIGHT,
            Section::Progress => self.progress_bar().height() + 1,
            Section::Warning => WarningBanner::HEIGHT,
            Section::Info => InfoPanels::height(width),
            Section::Content => ContentPanels::height(width),
            Section::Footer => Footer::HEIGHT,
        }
    }

    fn page_width(width: u16) -> u16 {
        width.min(MAX_PAGE_WIDTH)
    }

    /// Rows needed to show every mounted section at `width` columns.
    pub fn required_height(&self, width: u16) -> u16 {
        let width = Self::page_width(width);
        let sections = self.sections();
        let gaps = (sections.len() as u16).saturating_sub(1) * SECTION_GAP;
        sections
            .iter()
            .map(|s| self.section_height(*s, width))
            .sum::<u16>()
            + gaps
    }

    fn render_section(&self, section: Section, area: Rect, buf: &mut Buffer) {
        let vm = &self.view.sequence;
        match section {
            Section::Header => Header.render(area, buf),
            Section::Banner => draw_centered(buf, area, CONNECTION_BANNER, Tone::Bright),
            Section::Scanner => {
                let area = area.centered(scanner::PREFERRED_WIDTH, scanner::PREFERRED_HEIGHT);
                Scanner::new(self.scanner_seed)
                    .scanning(vm.scanning)
                    .elapsed(self.elapsed)
                    .render(area, buf);
            }
            Section::Progress => {
                let bar = self.progress_bar();
                let area = area.centered(MAX_PROGRESS_WIDTH, area.height);
                let (bar_area, status_area) = area.split_top(bar.height());
                bar.render(bar_area, buf);
                TypewriterText::from(self.view.status)
                    .centered(true)
                    .render(status_area, buf);
            }
            Section::Warning => {
                let since = self
                    .warning_shown_at
                    .map_or(Duration::ZERO, |at| self.elapsed.saturating_sub(at));
                WarningBanner::default().since_shown(since).render(area, buf);
            }
            Section::Info => InfoPanels::new(self.info).render(area, buf),
            Section::Content => ContentPanels.render(area, buf),
            Section::Footer => Footer::new(self.info).elapsed(self.elapsed).render(area, buf),
        }
    }
}

impl Widget for BootScreenView<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "BootScreenView",
            stage = self.view.sequence.stage.name(),
            w = area.width,
            h = area.height
        )
        .entered();

        let mut rest = area.centered(Self::page_width(area.width), area.height);
        for section in self.sections() {
            if rest.is_empty() {
                break;
            }
            let (block, after) = rest.split_top(self.section_height(section, rest.width));
            self.render_section(section, block, buf);
            rest = after.split_top(SECTION_GAP).1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termboot_runtime::{ConnectionState, StatusLine, ViewModel};
    use time::macros::datetime;

    fn info() -> TerminalInfo {
        TerminalInfo::at(datetime!(2024-01-01 00:00:00 UTC))
    }

    fn vm(stage: Stage) -> ViewModel {
        ViewModel {
            stage,
            scan_progress: 0.0,
            scanning: false,
            connection: ConnectionState::Pending,
            warning_visible: false,
            content_visible: false,
        }
    }

    fn render(sequence: ViewModel, status: StatusLine<'_>) -> Buffer {
        let info = info();
        let view = BootView { sequence, status };
        let screen = BootScreenView::new(view, &info);
        let mut buf = Buffer::new(130, screen.required_height(130).max(1));
        screen.render(buf.area(), &mut buf);
        buf
    }

    #[test]
    fn idle_renders_nothing() {
        let buf = render(vm(Stage::Idle), StatusLine::Awaiting);
        assert!(buf.to_lines().iter().all(String::is_empty));
    }

    #[test]
    fn each_stage_mounts_its_section() {
        let header = render(vm(Stage::HeaderShown), StatusLine::Awaiting);
        assert!(header.contains_text(TITLE));
        assert!(!header.contains_text(scanner::STATUS_STANDBY));

        let scanner_up = render(vm(Stage::ScannerShown), StatusLine::Awaiting);
        assert!(scanner_up.contains_text(scanner::STATUS_STANDBY));
        assert!(!scanner_up.contains_text(SCAN_LABEL));

        let scan = render(vm(Stage::ScanStarted), StatusLine::Awaiting);
        assert!(scan.contains_text(SCAN_LABEL));
        assert!(scan.contains_text(termboot_runtime::STATUS_AWAITING));
        assert!(!scan.contains_text("> TERMINAL ID"));

        let info_up = render(vm(Stage::InfoShown), StatusLine::Awaiting);
        assert!(info_up.contains_text("> TERMINAL ID"));
        assert!(!info_up.contains_text(CONNECTION_BANNER));
    }

    #[test]
    fn scanning_shows_typewriter_and_progress() {
        let mut sequence = vm(Stage::InfoShown);
        sequence.scanning = true;
        sequence.scan_progress = 37.4;
        let buf = render(
            sequence,
            StatusLine::Analyzing {
                revealed: "ANALYZ",
                typing: true,
            },
        );
        assert!(buf.contains_text("ANALYZ█"));
        assert!(buf.contains_text("37%"));
        assert!(buf.contains_text(scanner::STATUS_SCANNING));
    }

    #[test]
    fn connection_follow_ons_appear_with_flags() {
        let mut sequence = vm(Stage::InfoShown);
        sequence.scan_progress = 100.0;
        sequence.connection = ConnectionState::Established;
        let connected = render(sequence, StatusLine::Complete);
        assert!(connected.contains_text(CONNECTION_BANNER));
        assert!(connected.contains_text("100%"));
        assert!(!connected.contains_text("UNAUTHORIZED ACCESS"));

        sequence.warning_visible = true;
        let warned = render(sequence, StatusLine::Complete);
        assert!(warned.contains_text("⚠ UNAUTHORIZED ACCESS WILL BE PROSECUTED ⚠"));
        assert!(!warned.contains_text("1. PERSONALAKTE"));

        sequence.content_visible = true;
        let full = render(sequence, StatusLine::Complete);
        assert!(full.contains_text("1. PERSONALAKTE"));
        assert!(full.contains_text("EINGABE ERWARTET"));
    }

    #[test]
    fn banner_sits_between_header_and_scanner() {
        let mut sequence = vm(Stage::InfoShown);
        sequence.connection = ConnectionState::Established;
        let buf = render(sequence, StatusLine::Complete);
        let title = buf.find_row(TITLE).unwrap_or(u16::MAX);
        let banner = buf.find_row(CONNECTION_BANNER).unwrap_or(u16::MAX);
        let standby = buf.find_row(scanner::STATUS_STANDBY).unwrap_or(0);
        assert!(title < banner && banner < standby);
    }

    #[test]
    fn small_area_is_clipped_not_overflowed() {
        let info = info();
        let mut sequence = vm(Stage::InfoShown);
        sequence.content_visible = true;
        let view = BootView {
            sequence,
            status: StatusLine::Complete,
        };
        let mut buf = Buffer::new(40, 10);
        BootScreenView::new(view, &info).render(buf.area(), &mut buf);
        assert!(buf.contains_text(TITLE));
        assert!(!buf.contains_text("EINGABE ERWARTET"));
    }
}
