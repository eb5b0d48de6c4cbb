#![forbid(unsafe_code)]

//! Typewriter text: a revealed prefix followed by a block cursor while typing.

use termboot_runtime::StatusLine;

use crate::buffer::{Buffer, Tone};
use crate::geometry::Rect;
use crate::{Widget, display_width, draw_text_span};

/// Cursor shown after the revealed prefix while the reveal is incomplete.
pub const CURSOR: &str = "█";

/// One line of (possibly partially revealed) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterText<'a> {
    revealed: &'a str,
    typing: bool,
    tone: Tone,
    centered: bool,
}

impl<'a> TypewriterText<'a> {
    /// Fully revealed text, no cursor.
    pub fn new(revealed: &'a str) -> Self {
        Self {
            revealed,
            typing: false,
            tone: Tone::Subtle,
            centered: false,
        }
    }

    /// Show the cursor after the revealed prefix.
    #[must_use]
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    #[must_use]
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    #[must_use]
    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// Width in cells including the cursor.
    pub fn width(&self) -> usize {
        display_width(self.revealed) + if self.typing { display_width(CURSOR) } else { 0 }
    }
}

impl<'a> From<StatusLine<'a>> for TypewriterText<'a> {
    fn from(status: StatusLine<'a>) -> Self {
        match status {
            StatusLine::Analyzing { revealed, typing } => Self::new(revealed).typing(typing),
            other => Self::new(other.text()),
        }
    }
}

impl Widget for TypewriterText<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let x = if self.centered {
            let w = (self.width().min(area.width as usize)) as u16;
            area.x + (area.width - w) / 2
        } else {
            area.x
        };
        let x = draw_text_span(buf, x, area.y, self.revealed, self.tone, area.right());
        if self.typing {
            draw_text_span(buf, x, area.y, CURSOR, Tone::Bright, area.right());
        }
    }
}
