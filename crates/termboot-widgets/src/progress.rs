#![forbid(unsafe_code)]

//! Progress bar widget: label and rounded percentage above a fill bar.

use crate::buffer::{Buffer, Cell, Tone};
use crate::geometry::Rect;
use crate::{Widget, display_width, draw_text_span};

const FILLED: char = '█';
const EMPTY: char = '░';

/// A labelled horizontal progress bar.
#[derive(Debug, Clone, Default)]
pub struct ProgressBar<'a> {
    percent: f64,
    label: Option<&'a str>,
    hide_percentage: bool,
}

impl<'a> ProgressBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set progress in percent (clamped to `0.0..=100.0`).
    #[must_use]
    pub fn percent(mut self, percent: f64) -> Self {
        self.percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        self
    }

    /// Set the label shown at the left of the header line.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Show or hide the percentage readout.
    #[must_use]
    pub fn show_percentage(mut self, show: bool) -> Self {
        self.hide_percentage = !show;
        self
    }

    /// The percentage readout, e.g. `"43%"`.
    pub fn percentage_text(&self) -> String {
        format!("{}%", self.percent.round() as u32)
    }

    fn has_header(&self) -> bool {
        self.label.is_some() || !self.hide_percentage
    }

    /// Rows needed: an optional header line plus the bar.
    pub fn height(&self) -> u16 {
        1 + u16::from(self.has_header())
    }

    /// Number of filled cells for a bar `width` cells wide.
    pub fn filled_width(&self, width: u16) -> u16 {
        if self.percent >= 100.0 {
            width
        } else {
            (width as f64 * self.percent / 100.0).floor() as u16
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "ProgressBar",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        let mut bar = area;
        if self.has_header() {
            let (header, rest) = area.split_top(1);
            if let Some(label) = self.label {
                draw_text_span(buf, header.x, header.y, label, Tone::Subtle, header.right());
            }
            if !self.hide_percentage {
                let pct = self.percentage_text();
                let w = display_width(&pct) as u16;
                let x = header.right().saturating_sub(w).max(header.x);
                draw_text_span(buf, x, header.y, &pct, Tone::Bright, header.right());
            }
            bar = rest;
        }
        if bar.is_empty() {
            return;
        }

        let filled = self.filled_width(bar.width);
        for x in bar.x..bar.right() {
            let cell = if x - bar.x < filled {
                Cell::new(FILLED, Tone::Bright)
            } else {
                Cell::new(EMPTY, Tone::Muted)
            };
            buf.set(x, bar.y, cell);
        }
    }
}
