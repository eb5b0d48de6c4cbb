#![forbid(unsafe_code)]

//! Static informational panels: terminal info, content sections, footer.

use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::buffer::{Buffer, Cell, Tone};
use crate::geometry::Rect;
use crate::panel::{BoxVariant, TerminalBox};
use crate::typewriter::TypewriterText;
use crate::{Widget, draw_centered};

/// Identity of the terminal shown in the info panels and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInfo {
    pub terminal_id: String,
    pub clearance_level: String,
    pub location: String,
    pub operator: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub timestamp: String,
}

impl TerminalInfo {
    /// Default identity stamped with `at`.
    pub fn at(at: OffsetDateTime) -> Self {
        Self {
            terminal_id: "SCP-TERM-7734-ALPHA".to_owned(),
            clearance_level: "LEVEL 4 - TOP SECRET".to_owned(),
            location: "SITE-19 / SECTOR-7G".to_owned(),
            operator: "[REDACTED]".to_owned(),
            timestamp: format_timestamp(at),
        }
    }
}

impl Default for TerminalInfo {
    /// Default identity stamped with the current wall clock.
    fn default() -> Self {
        Self::at(OffsetDateTime::now_utc())
    }
}

/// Format as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Years outside `0..=9999` cannot be expressed and yield an empty string.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map(|s| s.replacen('T', " ", 1).chars().take(19).collect())
        .unwrap_or_default()
}

fn info_columns(width: u16) -> u16 {
    match width {
        100.. => 4,
        48.. => 2,
        _ => 1,
    }
}

fn content_columns(width: u16) -> u16 {
    match width {
        120.. => 3,
        60.. => 2,
        _ => 1,
    }
}

fn grid_height(count: usize, columns: u16, row_height: u16, gap: u16) -> u16 {
    let rows = count.div_ceil(columns.max(1) as usize) as u16;
    rows * row_height + rows.saturating_sub(1) * gap
}

const GAP: u16 = 1;

/// The four terminal info boxes.
#[derive(Debug, Clone, Copy)]
pub struct InfoPanels<'a> {
    info: &'a TerminalInfo,
}

impl<'a> InfoPanels<'a> {
    const BOX_HEIGHT: u16 = 4;

    pub fn new(info: &'a TerminalInfo) -> Self {
        Self { info }
    }

    fn boxes(&self) -> [TerminalBox<'a>; 4] {
        let info = self.info;
        [
            TerminalBox::new()
                .title("TERMINAL ID")
                .line(&info.terminal_id),
            TerminalBox::new()
                .title("CLEARANCE LEVEL")
                .line_toned(&info.clearance_level, Tone::Bright),
            TerminalBox::new().title("LOCATION").line(&info.location),
            TerminalBox::new().title("TIMESTAMP").line(&info.timestamp),
        ]
    }

    /// Rows needed at `width`.
    pub fn height(width: u16) -> u16 {
        grid_height(4, info_columns(width), Self::BOX_HEIGHT, GAP)
    }
}

impl Widget for InfoPanels<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let cells = area.grid(4, info_columns(area.width), Self::BOX_HEIGHT, GAP);
        for (panel, cell) in self.boxes().iter().zip(cells) {
            panel.render(cell.intersection(&area), buf);
        }
    }
}

struct Section {
    title: &'static str,
    variant: BoxVariant,
    lines: &'static [(&'static str, Tone)],
}

static SECTIONS: [Section; 6] = [
    Section {
        title: "1. PERSONALAKTE",
        variant: BoxVariant::Default,
        lines: &[
            ("> NAME: [DATEN GESCHWÄRZT]", Tone::Primary),
            ("> RANG: FORSCHUNGSLEITER", Tone::Primary),
            ("> ABTEILUNG: EINDÄMMUNG", Tone::Primary),
            ("> STATUS: AKTIV", Tone::Primary),
            ("", Tone::Primary),
            ("LETZTE AKTIVITÄT: VOR 2 STUNDEN", Tone::Muted),
        ],
    },
    Section {
        title: "2. AKTUELLER STATUS",
        variant: BoxVariant::Default,
        lines: &[
            ("> ANLAGE: OPERATIV", Tone::Bright),
            ("> EINDÄMMUNG: 98.7% STABIL", Tone::Primary),
            ("> SICHERHEITSLEVEL: ERHÖHT", Tone::Primary),
            ("> PERSONAL VOR ORT: 247", Tone::Primary),
            ("", Tone::Primary),
            ("⚠ 2 ANOMALIEN UNTER BEOBACHTUNG", Tone::Danger),
        ],
    },
    Section {
        title: "3. SYSTEMHINWEISE",
        variant: BoxVariant::Default,
        lines: &[
            ("> PROTOKOLL KETER-7 AKTIV", Tone::Primary),
            ("> BACKUP-SYSTEME: ONLINE", Tone::Primary),
            ("> NÄCHSTE WARTUNG: 72:00:00", Tone::Primary),
            ("> NOTFALLPLAN: BEREIT", Tone::Primary),
            ("", Tone::Primary),
            ("ALLE SYSTEME NOMINAL", Tone::Muted),
        ],
    },
    Section {
        title: "4. LETZTE ZUGRIFFE",
        variant: BoxVariant::Default,
        lines: &[
            ("> 08:34 - DR. ████████", Tone::Primary),
            ("> 09:12 - AGENT MÜLLER", Tone::Primary),
            ("> 11:45 - [ZUGRIFF VERWEIGERT]", Tone::Primary),
            ("> 14:22 - O5-██", Tone::Primary),
        ],
    },
    Section {
        title: "5. AKTIVE WARNUNGEN",
        variant: BoxVariant::Warning,
        lines: &[
            ("> SCP-███: AKTIVITÄT ERHÖHT", Tone::Danger),
            ("> SEKTOR 4: QUARANTÄNE", Tone::Danger),
            ("> SCP-999: STABIL", Tone::Muted),
            ("> SCP-173: EINGEDÄMMT", Tone::Muted),
        ],
    },
    Section {
        title: "6. SCHNELLZUGRIFF",
        variant: BoxVariant::Default,
        lines: &[
            ("> [F1] DATENBANK", Tone::Primary),
            ("> [F2] KOMMUNIKATION", Tone::Primary),
            ("> [F3] SICHERHEIT", Tone::Primary),
            ("> [F4] NOTFALL", Tone::Primary),
        ],
    },
];

/// The six content sections shown once the content is revealed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPanels;

impl ContentPanels {
    /// Every section box is as tall as the tallest one.
    fn box_height() -> u16 {
        SECTIONS
            .iter()
            .map(|s| 3 + s.lines.len() as u16)
            .max()
            .unwrap_or(0)
    }

    /// Rows needed at `width`.
    pub fn height(width: u16) -> u16 {
        grid_height(SECTIONS.len(), content_columns(width), Self::box_height(), GAP)
    }

    /// Section titles in display order.
    pub fn titles() -> impl Iterator<Item = &'static str> {
        SECTIONS.iter().map(|s| s.title)
    }
}

impl Widget for ContentPanels {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "ContentPanels",
            w = area.width,
            h = area.height
        )
        .entered();

        let cells = area.grid(
            SECTIONS.len(),
            content_columns(area.width),
            Self::box_height(),
            GAP,
        );
        for (section, cell) in SECTIONS.iter().zip(cells) {
            let panel = section.lines.iter().fold(
                TerminalBox::new().title(section.title).variant(section.variant),
                |panel, (text, tone)| panel.line_toned(text, *tone),
            );
            panel.render(cell.intersection(&area), buf);
        }
    }
}

/// Classification footer with a blinking input prompt.
#[derive(Debug, Clone, Copy)]
pub struct Footer<'a> {
    info: &'a TerminalInfo,
    elapsed: Duration,
}

impl<'a> Footer<'a> {
    /// Rule plus three text rows.
    pub const HEIGHT: u16 = 4;
    /// Prompt cursor on/off time.
    pub const BLINK_HALF_PERIOD: Duration = Duration::from_millis(500);

    pub fn new(info: &'a TerminalInfo) -> Self {
        Self {
            info,
            elapsed: Duration::ZERO,
        }
    }

    /// Animation clock for the prompt cursor.
    #[must_use]
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    fn cursor_visible(&self) -> bool {
        (self.elapsed.as_millis() / Self::BLINK_HALF_PERIOD.as_millis()) % 2 == 0
    }

    pub fn site_line(&self) -> String {
        format!(
            "SCP FOUNDATION | SITE-19 | SEKTOR 7G | TERMINAL {}",
            self.info.terminal_id
        )
    }
}

impl Widget for Footer<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        for x in area.x..area.right() {
            buf.set(x, area.y, Cell::new('─', Tone::Subtle));
        }
        draw_centered(
            buf,
            area.row(1),
            "> KLASSIFIZIERT - NUR FÜR AUTORISIERTES PERSONAL <",
            Tone::Subtle,
        );
        draw_centered(buf, area.row(2), &self.site_line(), Tone::Muted);
        TypewriterText::new("EINGABE ERWARTET")
            .typing(self.cursor_visible())
            .tone(Tone::Muted)
            .centered(true)
            .render(area.row(3), buf);
    }
}
