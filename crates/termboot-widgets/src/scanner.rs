#![forbid(unsafe_code)]

//! Decorative radar-style scanner.
//!
//! Geometry is defined in a 200x200 view box (center 100,100) and
//! rasterized onto whatever cell area the widget gets. A cell shows a ring
//! when the ring's circle passes through the cell's box, so rings stay one
//! cell thick at any size.
//!
//! The sweep rotates with `elapsed` and is only drawn while scanning. The
//! eight data points are fixed per seed and pulse with a per-dot phase.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::buffer::{Buffer, Cell, Tone};
use crate::geometry::Rect;
use crate::{Widget, draw_centered};

/// Status text while the scan runs.
pub const STATUS_SCANNING: &str = "SCANNING...";
/// Status text otherwise.
pub const STATUS_STANDBY: &str = "STANDBY";

/// Number of pseudo-random data points.
pub const DOT_COUNT: usize = 8;
/// Time for one full sweep revolution.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(2);
/// Pulse cycle of a data point.
pub const PULSE_PERIOD: Duration = Duration::from_secs(2);

/// Size that keeps the disc round on a typical 1:2 cell aspect.
pub const PREFERRED_WIDTH: u16 = 25;
pub const PREFERRED_HEIGHT: u16 = 12;

const VIEW: f64 = 200.0;
const CENTER: f64 = 100.0;
const SWEEP_RADIUS: f64 = 95.0;
/// Cross lines run from 5 to 195.
const LINE_MARGIN: f64 = 5.0;
/// Angular width of the sweep wedge, degrees.
const SWEEP_ARC: f64 = 90.0;

#[derive(Debug, Clone, Copy)]
enum Stroke {
    Solid,
    /// Dash pattern along the circumference, in view-box units.
    Dashed { on: f64, period: f64 },
}

const RINGS: [(f64, Stroke); 4] = [
    (95.0, Stroke::Solid),
    (75.0, Stroke::Dashed { on: 8.0, period: 16.0 }),
    (55.0, Stroke::Dashed { on: 4.0, period: 16.0 }),
    (35.0, Stroke::Solid),
];

/// A data point in view-box coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanDot {
    pub x: f64,
    pub y: f64,
    /// Pulse phase offset.
    pub delay: Duration,
}

fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

fn unit(state: &mut u32) -> f64 {
    f64::from(xorshift32(state)) / (f64::from(u32::MAX) + 1.0)
}

impl ScanDot {
    /// The eight data points for `seed`.
    ///
    /// Coordinates fall in `[20, 100)` on both axes; delays in `[0, 2s)`.
    pub fn generate(seed: u32) -> [ScanDot; DOT_COUNT] {
        let mut state = if seed == 0 { 0x9E37_79B9 } else { seed };
        std::array::from_fn(|_| {
            let x = unit(&mut state) * 80.0 + 10.0;
            let y = unit(&mut state) * 80.0 + 10.0;
            let delay = Duration::from_secs_f64(unit(&mut state) * 2.0);
            ScanDot {
                x: x + 10.0,
                y: y + 10.0,
                delay,
            }
        })
    }

    fn is_lit(&self, elapsed: Duration) -> bool {
        let phase = (elapsed + self.delay).as_millis() % PULSE_PERIOD.as_millis();
        phase < PULSE_PERIOD.as_millis() / 2
    }
}

/// Cell box in view-box units.
#[derive(Debug, Clone, Copy)]
struct CellBox {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl CellBox {
    fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }

    /// Whether the circle of `radius` around the view center crosses this box.
    fn crosses_circle(&self, radius: f64) -> bool {
        let nearest_x = CENTER.clamp(self.x0, self.x1) - CENTER;
        let nearest_y = CENTER.clamp(self.y0, self.y1) - CENTER;
        let far_x = (self.x0 - CENTER).abs().max((self.x1 - CENTER).abs());
        let far_y = (self.y0 - CENTER).abs().max((self.y1 - CENTER).abs());
        let near = nearest_x.hypot(nearest_y);
        let far = far_x.hypot(far_y);
        near <= radius && radius <= far
    }
}

/// Clockwise angle from 12 o'clock, degrees in `[0, 360)`.
fn bearing(x: f64, y: f64) -> f64 {
    (x - CENTER).atan2(CENTER - y).to_degrees().rem_euclid(360.0)
}

/// The scanner display.
#[derive(Debug, Clone)]
pub struct Scanner {
    scanning: bool,
    elapsed: Duration,
    dots: [ScanDot; DOT_COUNT],
}

impl Scanner {
    /// A scanner whose data points are derived from `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            scanning: false,
            elapsed: Duration::ZERO,
            dots: ScanDot::generate(seed),
        }
    }

    /// Draw the rotating sweep and the `SCANNING...` status.
    #[must_use]
    pub fn scanning(mut self, scanning: bool) -> Self {
        self.scanning = scanning;
        self
    }

    /// Animation clock for the sweep and dot pulse.
    #[must_use]
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn dots(&self) -> &[ScanDot; DOT_COUNT] {
        &self.dots
    }

    pub fn status_text(&self) -> &'static str {
        if self.scanning {
            STATUS_SCANNING
        } else {
            STATUS_STANDBY
        }
    }

    /// Current sweep rotation, degrees clockwise from 12 o'clock.
    pub fn sweep_rotation(&self) -> f64 {
        let period = SWEEP_PERIOD.as_secs_f64();
        (self.elapsed.as_secs_f64() % period) / period * 360.0
    }

    fn ring_symbol(cell: &CellBox) -> Option<(char, Tone)> {
        let (cx, cy) = cell.center();
        for (radius, stroke) in RINGS {
            if !cell.crosses_circle(radius) {
                continue;
            }
            match stroke {
                Stroke::Solid => return Some(('•', Tone::Primary)),
                Stroke::Dashed { on, period } => {
                    // Circle strokes start at 3 o'clock and run clockwise.
                    let theta = (cy - CENTER).atan2(cx - CENTER).rem_euclid(TAU);
                    if (radius * theta) % period < on {
                        return Some(('·', Tone::Subtle));
                    }
                }
            }
        }
        None
    }

    fn cross_symbol(cell: &CellBox) -> Option<char> {
        let span = LINE_MARGIN..=VIEW - LINE_MARGIN;
        let (cx, cy) = cell.center();
        let vertical = (cell.x0..cell.x1).contains(&CENTER) && span.contains(&cy);
        let horizontal = (cell.y0..cell.y1).contains(&CENTER) && span.contains(&cx);
        match (vertical, horizontal) {
            (true, true) => Some('┼'),
            (true, false) => Some('│'),
            (false, true) => Some('─'),
            (false, false) => None,
        }
    }

    fn render_disc(&self, disc: Rect, buf: &mut Buffer) {
        let sx = VIEW / f64::from(disc.width);
        let sy = VIEW / f64::from(disc.height);
        let rotation = self.sweep_rotation();

        for row in 0..disc.height {
            for col in 0..disc.width {
                let cell = CellBox {
                    x0: f64::from(col) * sx,
                    x1: f64::from(col + 1) * sx,
                    y0: f64::from(row) * sy,
                    y1: f64::from(row + 1) * sy,
                };
                let (x, y) = (disc.x + col, disc.y + row);
                let (cx, cy) = cell.center();

                let mut out = Self::cross_symbol(&cell)
                    .map(|symbol| Cell::new(symbol, Tone::Muted))
                    .unwrap_or_default();
                if let Some((symbol, tone)) = Self::ring_symbol(&cell) {
                    out = Cell::new(symbol, tone);
                }

                if self.scanning && (cx - CENTER).hypot(cy - CENTER) <= SWEEP_RADIUS {
                    let into = (bearing(cx, cy) - rotation).rem_euclid(360.0);
                    if into < SWEEP_ARC {
                        // Leading edge is the clockwise end of the wedge.
                        let leading = into >= SWEEP_ARC * 0.75;
                        if out.symbol == ' ' {
                            out.symbol = if leading { '▒' } else { '░' };
                        }
                        out.tone = Tone::Bright;
                    }
                }

                for dot in &self.dots {
                    if cell.contains(dot.x, dot.y) {
                        let tone = if dot.is_lit(self.elapsed) {
                            Tone::Bright
                        } else {
                            Tone::Subtle
                        };
                        out = Cell::new('●', tone);
                    }
                }
                if cell.contains(CENTER, CENTER) {
                    out = Cell::new('◉', Tone::Bright);
                }
                buf.set(x, y, out);
            }
        }
    }
}

impl Widget for Scanner {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Scanner",
            scanning = self.scanning,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.height < 2 || area.width == 0 {
            return;
        }
        let (disc, status) = area.split_top(area.height - 1);
        self.render_disc(disc, buf);
        draw_centered(buf, status, self.status_text(), Tone::Subtle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(scanner: &Scanner) -> Buffer {
        let mut buf = Buffer::new(PREFERRED_WIDTH, PREFERRED_HEIGHT);
        scanner.render(buf.area(), &mut buf);
        buf
    }

    fn count(buf: &Buffer, symbols: &[char]) -> usize {
        (0..buf.height())
            .flat_map(|y| buf.row(y).iter())
            .filter(|cell| symbols.contains(&cell.symbol))
            .count()
    }

    #[test]
    fn dots_are_deterministic_and_bounded() {
        let a = ScanDot::generate(7);
        let b = ScanDot::generate(7);
        assert_eq!(a, b);
        assert_ne!(a, ScanDot::generate(8));
        for dot in a {
            assert!((20.0..100.0).contains(&dot.x));
            assert!((20.0..100.0).contains(&dot.y));
            assert!(dot.delay < Duration::from_secs(2));
        }
    }

    #[test]
    fn zero_seed_still_scatters() {
        let dots = ScanDot::generate(0);
        assert!(dots.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn status_text_follows_scanning() {
        let buf = render(&Scanner::new(1));
        assert_eq!(buf.row_text(PREFERRED_HEIGHT - 1).trim(), STATUS_STANDBY);
        let buf = render(&Scanner::new(1).scanning(true));
        assert_eq!(buf.row_text(PREFERRED_HEIGHT - 1).trim(), STATUS_SCANNING);
    }

    #[test]
    fn sweep_only_while_scanning() {
        assert_eq!(count(&render(&Scanner::new(3)), &['░', '▒']), 0);
        assert!(count(&render(&Scanner::new(3).scanning(true)), &['░', '▒']) > 0);
    }

    #[test]
    fn sweep_rotates_with_elapsed() {
        let at = |ms| Scanner::new(3).scanning(true).elapsed(Duration::from_millis(ms));
        assert_eq!(at(0).sweep_rotation(), 0.0);
        assert!((at(500).sweep_rotation() - 90.0).abs() < 1e-9);
        assert_eq!(at(2_000).sweep_rotation(), 0.0);
        assert_ne!(render(&at(0)), render(&at(1_000)));
    }

    #[test]
    fn center_and_rings_are_drawn() {
        let buf = render(&Scanner::new(5));
        let center = buf.get(PREFERRED_WIDTH / 2, (PREFERRED_HEIGHT - 1) / 2);
        assert_eq!(center.map(|c| c.symbol), Some('◉'));
        assert!(count(&buf, &['•']) > 0);
        assert!(count(&buf, &['│', '─', '┼']) > 0);
    }

    #[test]
    fn tiny_area_is_ignored() {
        let mut buf = Buffer::new(4, 1);
        Scanner::new(1).render(buf.area(), &mut buf);
        assert_eq!(buf.row_text(0), "");
    }
}
