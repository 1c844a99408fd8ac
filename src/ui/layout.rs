//! Grid navigation and paging
//!
//! The cursor addresses one cell of the rubric grid by display position
//! (row index, column index). All moves clamp at the edges except
//! Tab/Shift+Tab, which walk the cells in reading order and wrap.

use std::ops::Range;

/// Cursor position in the grid (display indices, not ids)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Grid dimensions plus how many row bands fit on screen
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    /// Row bands per page
    pub visible_rows: usize,
}

impl GridLayout {
    pub fn new(rows: usize, columns: usize, visible_rows: usize) -> Self {
        Self {
            rows,
            columns,
            visible_rows: visible_rows.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Row indices shown on the page containing `selected_row`
    pub fn visible_range(&self, selected_row: usize) -> Range<usize> {
        if self.rows == 0 {
            return 0..0;
        }

        let page = selected_row.min(self.rows - 1) / self.visible_rows;
        let start = page * self.visible_rows;
        let end = (start + self.visible_rows).min(self.rows);
        start..end
    }

    pub fn page(&self, selected_row: usize) -> usize {
        selected_row / self.visible_rows + 1
    }

    pub fn page_count(&self) -> usize {
        self.rows.div_ceil(self.visible_rows).max(1)
    }

    /// Pull a cursor back inside the grid
    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        Cursor {
            row: cursor.row.min(self.rows.saturating_sub(1)),
            column: cursor.column.min(self.columns.saturating_sub(1)),
        }
    }

    pub fn move_up(&self, cursor: Cursor) -> Cursor {
        Cursor {
            row: cursor.row.saturating_sub(1),
            ..cursor
        }
    }

    pub fn move_down(&self, cursor: Cursor) -> Cursor {
        self.clamp(Cursor {
            row: cursor.row + 1,
            ..cursor
        })
    }

    pub fn move_left(&self, cursor: Cursor) -> Cursor {
        Cursor {
            column: cursor.column.saturating_sub(1),
            ..cursor
        }
    }

    pub fn move_right(&self, cursor: Cursor) -> Cursor {
        self.clamp(Cursor {
            column: cursor.column + 1,
            ..cursor
        })
    }

    /// First level of the current row
    pub fn move_home(&self, cursor: Cursor) -> Cursor {
        Cursor {
            column: 0,
            ..cursor
        }
    }

    /// Last level of the current row
    pub fn move_end(&self, cursor: Cursor) -> Cursor {
        Cursor {
            column: self.columns.saturating_sub(1),
            ..cursor
        }
    }

    pub fn page_up(&self, cursor: Cursor) -> Cursor {
        Cursor {
            row: cursor.row.saturating_sub(self.visible_rows),
            ..cursor
        }
    }

    pub fn page_down(&self, cursor: Cursor) -> Cursor {
        self.clamp(Cursor {
            row: cursor.row + self.visible_rows,
            ..cursor
        })
    }

    /// Next cell in reading order, wrapping to the first
    pub fn tab_next(&self, cursor: Cursor) -> Cursor {
        if self.is_empty() {
            return Cursor::default();
        }
        let total = self.rows * self.columns;
        let index = (cursor.row * self.columns + cursor.column + 1) % total;
        Cursor::new(index / self.columns, index % self.columns)
    }

    /// Previous cell in reading order, wrapping to the last
    pub fn tab_prev(&self, cursor: Cursor) -> Cursor {
        if self.is_empty() {
            return Cursor::default();
        }
        let total = self.rows * self.columns;
        let index = cursor.row * self.columns + cursor.column;
        let index = if index == 0 { total - 1 } else { index - 1 };
        Cursor::new(index / self.columns, index % self.columns)
    }
}
