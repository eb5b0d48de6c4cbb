#![forbid(unsafe_code)]

//! Flashing warning banner.

use std::time::Duration;

use crate::buffer::{Buffer, Tone};
use crate::geometry::Rect;
use crate::panel::{BoxVariant, TerminalBox};
use crate::{Widget, draw_centered};

/// Message of the boot screen's warning banner.
pub const WARNING_MESSAGE: &str = "UNAUTHORIZED ACCESS WILL BE PROSECUTED";

/// Time the banner spends in each of its bright and dim phases.
pub const FLASH_HALF_PERIOD: Duration = Duration::from_millis(500);

/// A red, bordered banner `⚠ MESSAGE ⚠` that alternates bright and dim.
#[derive(Debug, Clone, Copy)]
pub struct WarningBanner<'a> {
    message: &'a str,
    since_shown: Duration,
}

impl<'a> WarningBanner<'a> {
    /// Rows the banner occupies: border, message, border.
    pub const HEIGHT: u16 = 3;

    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            since_shown: Duration::ZERO,
        }
    }

    /// Time since the banner appeared; drives the flash phase.
    #[must_use]
    pub fn since_shown(mut self, since_shown: Duration) -> Self {
        self.since_shown = since_shown;
        self
    }

    /// Bright during the first half-period, then alternating.
    pub fn is_bright(&self) -> bool {
        (self.since_shown.as_millis() / FLASH_HALF_PERIOD.as_millis()) % 2 == 0
    }

    pub fn text(&self) -> String {
        format!("⚠ {} ⚠", self.message)
    }
}

impl Default for WarningBanner<'_> {
    fn default() -> Self {
        Self::new(WARNING_MESSAGE)
    }
}

impl Widget for WarningBanner<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let tone = if self.is_bright() {
            Tone::Danger
        } else {
            Tone::DangerDim
        };
        let frame = TerminalBox::new().variant(BoxVariant::Warning);
        frame.render(area, buf);
        buf.set_tone_area(area, tone);

        let inner = area.inner(1);
        draw_centered(buf, inner.row(0), &self.text(), tone);
    }
}
