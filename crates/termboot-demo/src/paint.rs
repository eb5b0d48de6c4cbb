#![forbid(unsafe_code)]

//! Row-diffing painter from a widget [`Buffer`] to crossterm commands.
//!
//! Only rows that changed since the previous frame are rewritten. Color
//! changes are emitted when the tone of consecutive cells differs.

use std::io::{self, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use termboot_widgets::{Buffer, Cell, Tone};

/// Terminal color for a tone.
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Primary => Color::Rgb { r: 0, g: 204, b: 85 },
        Tone::Bright => Color::Rgb { r: 102, g: 255, b: 153 },
        Tone::Subtle => Color::Rgb { r: 0, g: 136, b: 68 },
        Tone::Muted => Color::Rgb { r: 110, g: 110, b: 110 },
        Tone::Danger => Color::Rgb { r: 255, g: 51, b: 51 },
        Tone::DangerDim => Color::Rgb { r: 128, g: 24, b: 24 },
    }
}

fn is_bold(tone: Tone) -> bool {
    matches!(tone, Tone::Bright | Tone::Danger)
}

/// Paints frames, remembering the last one.
#[derive(Debug, Default)]
pub struct Painter {
    previous: Option<Buffer>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame so the next paint is a full repaint.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Write `frame` to `out`, returning the number of rows rewritten.
    pub fn paint<W: Write>(&mut self, out: &mut W, frame: &Buffer) -> io::Result<usize> {
        let full = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != frame.width() || prev.height() != frame.height());
        if full {
            out.queue(Clear(ClearType::All))?;
        }

        let mut rows = 0;
        for y in 0..frame.height() {
            let row = frame.row(y);
            let unchanged = !full && self.previous.as_ref().is_some_and(|prev| prev.row(y) == row);
            if unchanged {
                continue;
            }
            out.queue(MoveTo(0, y))?;
            paint_row(out, row)?;
            rows += 1;
        }

        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        out.flush()?;
        self.previous = Some(frame.clone());
        Ok(rows)
    }
}

fn paint_row<W: Write>(out: &mut W, row: &[Cell]) -> io::Result<()> {
    let mut current: Option<Tone> = None;
    let mut run = String::new();
    for cell in row.iter().filter(|c| !c.continuation) {
        if current != Some(cell.tone) {
            if let Some(tone) = current {
                flush_run(out, tone, &mut run)?;
            }
            current = Some(cell.tone);
        }
        run.push(cell.symbol);
    }
    if let Some(tone) = current {
        flush_run(out, tone, &mut run)?;
    }
    Ok(())
}

fn flush_run<W: Write>(out: &mut W, tone: Tone, run: &mut String) -> io::Result<()> {
    out.queue(SetAttribute(if is_bold(tone) {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    }))?;
    out.queue(SetForegroundColor(tone_color(tone)))?;
    out.queue(Print(run.as_str()))?;
    run.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(text: &str, y: u16) -> Buffer {
        let mut buf = Buffer::new(10, 8);
        for (i, ch) in text.chars().enumerate() {
            buf.set(i as u16, y, Cell::new(ch, Tone::Primary));
        }
        buf
    }

    #[test]
    fn first_paint_rewrites_every_row() {
        let mut painter = Painter::new();
        let mut out = Vec::new();
        let rows = painter.paint(&mut out, &frame_with("BOOT", 0)).unwrap();
        assert_eq!(rows, 8);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[2J"));
        assert!(text.contains("BOOT"));
    }

    #[test]
    fn unchanged_rows_are_skipped() {
        let mut painter = Painter::new();
        let mut out = Vec::new();
        painter.paint(&mut out, &frame_with("BOOT", 0)).unwrap();

        out.clear();
        let rows = painter.paint(&mut out, &frame_with("BOOT", 0)).unwrap();
        assert_eq!(rows, 0);

        out.clear();
        let mut next = frame_with("BOOT", 0);
        next.set(0, 5, Cell::new('X', Tone::Danger));
        let rows = painter.paint(&mut out, &next).unwrap();
        assert_eq!(rows, 1);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[6;1H"));
        assert!(!text.contains("BOOT"));
    }

    #[test]
    fn resize_or_invalidate_forces_full_repaint() {
        let mut painter = Painter::new();
        let mut out = Vec::new();
        painter.paint(&mut out, &frame_with("A", 0)).unwrap();

        let rows = painter.paint(&mut out, &Buffer::new(12, 3)).unwrap();
        assert_eq!(rows, 3);

        painter.invalidate();
        let rows = painter.paint(&mut out, &Buffer::new(12, 3)).unwrap();
        assert_eq!(rows, 3);
    }

    #[test]
    fn continuation_cells_are_not_printed() {
        let mut buf = Buffer::new(4, 1);
        buf.set_wide(0, 0, Cell::new('界', Tone::Primary));
        let mut out = Vec::new();
        paint_row(&mut out, buf.row(0)).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('界').count(), 1);
        assert!(text.ends_with("界  "));
    }

    #[test]
    fn tone_changes_switch_color() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::new('a', Tone::Primary));
        buf.set(1, 0, Cell::new('b', Tone::Danger));
        let mut out = Vec::new();
        paint_row(&mut out, buf.row(0)).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[38;2;0;204;85m"));
        assert!(text.contains("\x1b[38;2;255;51;51m"));
        assert!(text.contains("\x1b[1m"));
    }
}
