//! Windowed forward cursor over table rows.
//!
//! # Invariants
//! - The window is `[start, end)` with `start = clamp(offset, 0, len)` and
//!   `end = min(start + limit, len)`, or `len` when `limit <= 0`.
//! - The cursor never inspects row shape.

use super::Row;

/// Lazy, restartable cursor over a slice of rows (header already stripped).
///
/// Use either the explicit `advance`/`record` pair or the `Iterator` impl;
/// both move the same position.
#[derive(Debug)]
pub struct RecordCursor<'a, T = Row> {
    rows: &'a [T],
    start: usize,
    end: usize,
    next: usize,
    current: Option<usize>,
}

impl<T> Clone for RecordCursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            start: self.start,
            end: self.end,
            next: self.next,
            current: self.current,
        }
    }
}

impl<'a, T> RecordCursor<'a, T> {
    /// Builds a cursor over `rows` skipping `offset` rows and yielding at most
    /// `limit` rows. `limit <= 0` means unbounded; negative `offset` is zero.
    pub fn new(rows: &'a [T], limit: i64, offset: i64) -> Self {
        let len = rows.len();
        let start = usize::try_from(offset.max(0)).map_or(len, |offset| offset.min(len));
        let end = if limit > 0 {
            usize::try_from(limit).map_or(len, |limit| start.saturating_add(limit).min(len))
        } else {
            len
        };

        Self {
            rows,
            start,
            end,
            next: start,
            current: None,
        }
    }

    /// Moves to the next row in the window. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.next < self.end {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    /// Row under the cursor, or `None` before the first `advance` and after
    /// exhaustion.
    pub fn record(&self) -> Option<&'a T> {
        let rows = self.rows;
        self.current.and_then(|index| rows.get(index))
    }

    /// Zero-based index of the current row within the full slice.
    pub fn position(&self) -> Option<usize> {
        self.current
    }

    /// Rewinds to the window start for another pass over the same rows.
    pub fn reset(&mut self) {
        self.next = self.start;
        self.current = None;
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<'a, T> Iterator for RecordCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            self.record()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
