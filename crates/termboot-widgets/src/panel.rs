#![forbid(unsafe_code)]

//! Terminal box: a bordered panel with an optional `> TITLE` header line.

use crate::buffer::{Buffer, Cell, Tone};
use crate::geometry::Rect;
use crate::{Widget, draw_text_span};

/// Border treatment of a [`TerminalBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxVariant {
    #[default]
    Default,
    /// Red border and title.
    Warning,
}

impl BoxVariant {
    fn border_tone(self) -> Tone {
        match self {
            Self::Default => Tone::Primary,
            Self::Warning => Tone::Danger,
        }
    }

    fn title_tone(self) -> Tone {
        match self {
            Self::Default => Tone::Bright,
            Self::Warning => Tone::Danger,
        }
    }
}

/// A bordered panel of text lines.
#[derive(Debug, Clone, Default)]
pub struct TerminalBox<'a> {
    title: Option<&'a str>,
    variant: BoxVariant,
    lines: Vec<(&'a str, Tone)>,
}

impl<'a> TerminalBox<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header title (rendered as `> TITLE`).
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: BoxVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Append a body line in the primary tone.
    #[must_use]
    pub fn line(self, text: &'a str) -> Self {
        self.line_toned(text, Tone::Primary)
    }

    /// Append a body line in a specific tone.
    #[must_use]
    pub fn line_toned(mut self, text: &'a str, tone: Tone) -> Self {
        self.lines.push((text, tone));
        self
    }

    /// Rows needed to show every line.
    pub fn height(&self) -> u16 {
        let title = u16::from(self.title.is_some());
        2 + title + self.lines.len() as u16
    }

    fn render_border(&self, area: Rect, buf: &mut Buffer) {
        let tone = self.variant.border_tone();
        let (left, right) = (area.x, area.right() - 1);
        let (top, bottom) = (area.y, area.bottom() - 1);
        for x in left + 1..right {
            buf.set(x, top, Cell::new('─', tone));
            buf.set(x, bottom, Cell::new('─', tone));
        }
        for y in top + 1..bottom {
            buf.set(left, y, Cell::new('│', tone));
            buf.set(right, y, Cell::new('│', tone));
        }
        buf.set(left, top, Cell::new('┌', tone));
        buf.set(right, top, Cell::new('┐', tone));
        buf.set(left, bottom, Cell::new('└', tone));
        buf.set(right, bottom, Cell::new('┘', tone));
    }
}

impl Widget for TerminalBox<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TerminalBox",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.width < 2 || area.height < 2 {
            return;
        }
        self.render_border(area, buf);

        // One column of padding inside the border.
        let inner = area.inner(1);
        let text_x = inner.x.saturating_add(1);
        let max_x = inner.right().saturating_sub(1);
        let mut y = inner.y;

        if let Some(title) = self.title {
            if y < inner.bottom() {
                let tone = self.variant.title_tone();
                let x = draw_text_span(buf, text_x, y, "> ", tone, max_x);
                draw_text_span(buf, x, y, title, tone, max_x);
                y += 1;
            }
        }
        for (text, tone) in &self.lines {
            if y >= inner.bottom() {
                break;
            }
            draw_text_span(buf, text_x, y, text, *tone, max_x);
            y += 1;
        }
    }
}
