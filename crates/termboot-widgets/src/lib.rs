#![forbid(unsafe_code)]

//! Presentation leaves for the terminal boot screen.
//!
//! Every widget is a pure function of its inputs: it renders a
//! [`termboot_runtime::BootView`] (or a piece of one) into a [`Buffer`] and
//! holds no timers. Animation that is purely cosmetic (scanner sweep, warning
//! flash) is derived from an `elapsed` duration supplied by the host.

pub mod buffer;
pub mod geometry;
pub mod info;
pub mod panel;
pub mod progress;
pub mod scanner;
pub mod screen;
pub mod typewriter;
pub mod warning;

pub use buffer::{Buffer, Cell, Tone};
pub use geometry::Rect;
pub use info::{ContentPanels, Footer, InfoPanels, TerminalInfo};
pub use panel::{BoxVariant, TerminalBox};
pub use progress::ProgressBar;
pub use scanner::{ScanDot, Scanner};
pub use screen::{BootScreenView, Header};
pub use typewriter::TypewriterText;
pub use warning::WarningBanner;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A renderable component.
pub trait Widget {
    /// Render into `buf`, staying inside `area`.
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// Display width of `text` in terminal cells.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Draw a text span at `(x, y)`, stopping at `max_x` (exclusive).
///
/// Returns the x position after the last drawn symbol.
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    tone: Tone,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x.saturating_add(w as u16) > max_x {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let cell = Cell::new(c, tone);
            if w > 1 {
                buf.set_wide(x, y, cell);
            } else {
                buf.set(x, y, cell);
            }
        }
        x = x.saturating_add(w as u16);
    }
    x
}

/// Draw `content` centered on the first row of `area`.
pub(crate) fn draw_centered(buf: &mut Buffer, area: Rect, content: &str, tone: Tone) {
    if area.is_empty() {
        return;
    }
    let width = display_width(content).min(area.width as usize) as u16;
    let x = area.x + (area.width - width) / 2;
    draw_text_span(buf, x, area.y, content, tone, area.right());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_clips_at_max_x() {
        let mut buf = Buffer::new(10, 1);
        let end = draw_text_span(&mut buf, 2, 0, "ABCDEF", Tone::Primary, 5);
        assert_eq!(end, 5);
        assert_eq!(buf.row_text(0), "  ABC");
    }

    #[test]
    fn wide_grapheme_that_does_not_fit_is_dropped() {
        let mut buf = Buffer::new(10, 1);
        let end = draw_text_span(&mut buf, 0, 0, "a漢", Tone::Primary, 2);
        assert_eq!(end, 1);
        assert_eq!(buf.row_text(0), "a");
    }

    #[test]
    fn span_near_coordinate_limit_saturates() {
        let mut buf = Buffer::new(4, 1);
        let end = draw_text_span(&mut buf, u16::MAX - 1, 0, "漢a", Tone::Primary, u16::MAX);
        assert_eq!(end, u16::MAX);
        assert!(buf.to_lines().iter().all(String::is_empty));
    }

    #[test]
    fn centered_text() {
        let mut buf = Buffer::new(10, 1);
        let area = buf.area();
        draw_centered(&mut buf, area, "ABCD", Tone::Bright);
        assert_eq!(buf.row_text(0), "   ABCD");
        assert_eq!(buf.get(3, 0).map(|c| c.tone), Some(Tone::Bright));
    }
}
