#![forbid(unsafe_code)]

//! Cell grid that widgets render into.
//!
//! The palette is semantic: widgets pick a [`Tone`] and the host maps tones
//! to concrete terminal colors.

use crate::geometry::Rect;

/// Semantic color of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// Regular phosphor green.
    #[default]
    Primary,
    /// Glowing emphasis.
    Bright,
    /// Subtle glow for labels.
    Subtle,
    /// Grey secondary text.
    Muted,
    /// Alarm red.
    Danger,
    /// Alarm red, dimmed (flash off phase).
    DangerDim,
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub tone: Tone,
    /// Trailing half of a double-width symbol to the left.
    pub continuation: bool,
}

impl Cell {
    pub const fn new(symbol: char, tone: Tone) -> Self {
        Self {
            symbol,
            tone,
            continuation: false,
        }
    }

    const fn continuation(tone: Tone) -> Self {
        Self {
            symbol: ' ',
            tone,
            continuation: true,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Tone::Primary)
    }
}

/// A width x height grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// A blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area.
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Write a double-width symbol: the cell plus its continuation.
    pub fn set_wide(&mut self, x: u16, y: u16, cell: Cell) {
        self.set(x, y, cell);
        self.set(x.saturating_add(1), y, Cell::continuation(cell.tone));
    }

    /// Recolor every cell in `area`, keeping symbols.
    pub fn set_tone_area(&mut self, area: Rect, tone: Tone) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.tone = tone;
                }
            }
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells of row `y`, empty if out of bounds.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Text of row `y`, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        let text: String = self
            .row(y)
            .iter()
            .filter(|cell| !cell.continuation)
            .map(|cell| cell.symbol)
            .collect();
        text.trim_end().to_owned()
    }

    /// Every row as text.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }

    /// Whether any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    /// First row containing `needle`.
    pub fn find_row(&self, needle: &str) -> Option<u16> {
        (0..self.height).find(|&y| self.row_text(y).contains(needle))
    }
}
