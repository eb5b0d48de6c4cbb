#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in terminal cells (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shrink by `margin` cells on every side.
    pub fn inner(&self, margin: u16) -> Rect {
        let twice = margin.saturating_mul(2);
        Rect {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            width: self.width.saturating_sub(twice),
            height: self.height.saturating_sub(twice),
        }
    }

    /// The overlapping region of two rectangles (empty if disjoint).
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// A single row of this rectangle, `offset` rows from the top.
    pub fn row(&self, offset: u16) -> Rect {
        if offset >= self.height {
            return Rect::new(self.x, self.bottom(), self.width, 0);
        }
        Rect::new(self.x, self.y + offset, self.width, 1)
    }

    /// A horizontally centered sub-rectangle at most `width` wide.
    pub fn centered(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Rect::new(self.x + (self.width - width) / 2, self.y, width, height)
    }

    /// Split off the top `rows` rows, returning `(top, rest)`.
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, rows),
            Rect::new(self.x, self.y + rows, self.width, self.height - rows),
        )
    }

    /// Lay out `count` equal cells in a grid with at most `columns` columns
    /// and `gap` cells between columns and rows.
    pub fn grid(&self, count: usize, columns: u16, row_height: u16, gap: u16) -> Vec<Rect> {
        let columns = columns.max(1);
        let total_gap = gap.saturating_mul(columns - 1);
        let col_width = self.width.saturating_sub(total_gap) / columns;
        (0..count)
            .map(|i| {
                let col = (i % columns as usize) as u16;
                let row = (i / columns as usize) as u16;
                Rect::new(
                    self.x.saturating_add(col.saturating_mul(col_width + gap)),
                    self.y.saturating_add(row.saturating_mul(row_height + gap)),
                    col_width,
                    row_height,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_shrinks_on_all_sides() {
        let r = Rect::new(2, 3, 10, 6).inner(1);
        assert_eq!(r, Rect::new(3, 4, 8, 4));
        assert!(Rect::new(0, 0, 1, 1).inner(1).is_empty());
    }

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, 10, 4, 4);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection(&Rect::new(2, 2, 4, 4)), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn centered_clamps_to_parent() {
        let r = Rect::new(0, 5, 20, 10);
        assert_eq!(r.centered(10, 2), Rect::new(5, 5, 10, 2));
        assert_eq!(r.centered(40, 2), Rect::new(0, 5, 20, 2));
    }

    #[test]
    fn split_top_partitions() {
        let (top, rest) = Rect::new(0, 0, 8, 5).split_top(2);
        assert_eq!(top, Rect::new(0, 0, 8, 2));
        assert_eq!(rest, Rect::new(0, 2, 8, 3));
        let (top, rest) = Rect::new(0, 0, 8, 1).split_top(4);
        assert_eq!(top.height, 1);
        assert!(rest.is_empty());
    }

    #[test]
    fn grid_wraps_rows() {
        let cells = Rect::new(0, 0, 32, 40).grid(5, 3, 4, 1);
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], Rect::new(0, 0, 10, 4));
        assert_eq!(cells[2], Rect::new(22, 0, 10, 4));
        assert_eq!(cells[3], Rect::new(0, 5, 10, 4));
    }
}
