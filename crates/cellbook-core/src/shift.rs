//! Index remapping for row/column insertion and deletion
//!
//! Every structural edit is described once as an [`AxisEdit`] and then
//! applied to each piece of sheet state that carries coordinates: cell
//! storage, row/column metadata, merges, validations, comments, images.

use crate::cell::{CellAddress, CellRange};
use std::collections::BTreeMap;

/// The axis an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Row,
    Column,
}

/// A band of rows or columns being inserted or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisEdit {
    /// Indices pushed past `limit` fall off the sheet
    Insert { start: u32, count: u32, limit: u32 },
    Delete { start: u32, count: u32 },
}

impl AxisEdit {
    /// Where an index lands after the edit; `None` if it was deleted or
    /// pushed off the sheet
    pub(crate) fn map(&self, index: u32) -> Option<u32> {
        match *self {
            AxisEdit::Insert { start, count, limit } => {
                if index >= start {
                    index.checked_add(count).filter(|&n| n <= limit)
                } else {
                    Some(index)
                }
            }
            AxisEdit::Delete { start, count } => {
                let end = start.saturating_add(count);
                if index < start {
                    Some(index)
                } else if index < end {
                    None
                } else {
                    Some(index - count)
                }
            }
        }
    }

    /// Remap an inclusive span `lo..=hi`
    ///
    /// An insertion inside the span grows it. A deletion trims the part of
    /// the span that falls in the deleted band; `None` if nothing is left.
    pub(crate) fn map_span(&self, lo: u32, hi: u32) -> Option<(u32, u32)> {
        match *self {
            AxisEdit::Insert { limit, .. } => {
                let new_lo = self.map(lo)?;
                let new_hi = self.map(hi).unwrap_or(limit);
                Some((new_lo, new_hi))
            }
            AxisEdit::Delete { start, count } => {
                let end = start.saturating_add(count);
                let new_lo = if lo < start {
                    lo
                } else if lo >= end {
                    lo - count
                } else {
                    start
                };
                let new_hi = if hi < start {
                    hi
                } else if hi >= end {
                    hi - count
                } else {
                    start.saturating_sub(1)
                };
                (new_lo <= new_hi && new_hi >= 1).then_some((new_lo, new_hi))
            }
        }
    }

    pub(crate) fn start(&self) -> u32 {
        match *self {
            AxisEdit::Insert { start, .. } | AxisEdit::Delete { start, .. } => start,
        }
    }

    pub(crate) fn is_noop(&self) -> bool {
        match *self {
            AxisEdit::Insert { count, .. } | AxisEdit::Delete { count, .. } => count == 0,
        }
    }
}

/// Remap the keys of an ordered map in one pass
///
/// Entries below the edit point are untouched. Entries at or above it are
/// split off, remapped and reinserted, so an entry is never moved twice.
/// `on_move` sees every surviving moved value with its new key.
pub(crate) fn remap_keys<V>(
    map: &mut BTreeMap<u32, V>,
    edit: AxisEdit,
    mut on_move: impl FnMut(&mut V, u32),
) {
    let tail = map.split_off(&edit.start());
    for (key, mut value) in tail {
        if let Some(new_key) = edit.map(key) {
            on_move(&mut value, new_key);
            map.insert(new_key, value);
        }
    }
}

/// Remap a single address along one axis
pub(crate) fn shift_address(addr: CellAddress, axis: Axis, edit: AxisEdit) -> Option<CellAddress> {
    match axis {
        Axis::Row => edit
            .map(addr.row())
            .map(|row| CellAddress::from_parts(row, addr.column())),
        Axis::Column => edit
            .map(addr.column())
            .map(|col| CellAddress::from_parts(addr.row(), col)),
    }
}

/// Remap a range along one axis, growing or trimming it as needed
pub(crate) fn shift_range(range: CellRange, axis: Axis, edit: AxisEdit) -> Option<CellRange> {
    let (s, e) = (range.start(), range.end());
    let (start, end) = match axis {
        Axis::Row => {
            let (lo, hi) = edit.map_span(s.row(), e.row())?;
            (
                CellAddress::from_parts(lo, s.column()),
                CellAddress::from_parts(hi, e.column()),
            )
        }
        Axis::Column => {
            let (lo, hi) = edit.map_span(s.column(), e.column())?;
            (
                CellAddress::from_parts(s.row(), lo),
                CellAddress::from_parts(e.row(), hi),
            )
        }
    };
    CellRange::new(start, end).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn test_insert_map() {
        let edit = AxisEdit::Insert { start: 5, count: 3, limit: u32::MAX };
        assert_eq!(edit.map(4), Some(4));
        assert_eq!(edit.map(5), Some(8));
        assert_eq!(edit.map(10), Some(13));
        assert_eq!(edit.map(u32::MAX), None);

        let edit = AxisEdit::Insert { start: 5, count: 3, limit: 20 };
        assert_eq!(edit.map(17), Some(20));
        assert_eq!(edit.map(18), None);
    }

    #[test]
    fn test_delete_map() {
        let edit = AxisEdit::Delete { start: 5, count: 3 };
        assert_eq!(edit.map(4), Some(4));
        assert_eq!(edit.map(5), None);
        assert_eq!(edit.map(7), None);
        assert_eq!(edit.map(8), Some(5));
    }

    #[test]
    fn test_remap_keys_single_pass() {
        let mut map: BTreeMap<u32, u32> = (1..=6).map(|k| (k, k)).collect();
        remap_keys(&mut map, AxisEdit::Insert { start: 2, count: 1, limit: u32::MAX }, |_, _| {});
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7]);
        assert_eq!(map[&3], 2);

        remap_keys(&mut map, AxisEdit::Delete { start: 3, count: 2 }, |_, _| {});
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
        assert_eq!(map[&3], 4);
    }

    #[test]
    fn test_shift_range_insert_inside_grows() {
        let edit = AxisEdit::Insert { start: 3, count: 2, limit: 100 };
        assert_eq!(shift_range(range("A2:C4"), Axis::Row, edit), Some(range("A2:C6")));
        assert_eq!(shift_range(range("A2:A99"), Axis::Row, edit), Some(range("A2:A100")));
        assert_eq!(shift_range(range("A3:C4"), Axis::Row, edit), Some(range("A5:C6")));
        assert_eq!(shift_range(range("A1:C2"), Axis::Row, edit), Some(range("A1:C2")));
    }

    #[test]
    fn test_shift_range_delete_trims_or_drops() {
        let edit = AxisEdit::Delete { start: 2, count: 2 };
        // straddles the deleted band
        assert_eq!(shift_range(range("A1:A5"), Axis::Row, edit), Some(range("A1:A3")));
        // wholly inside the band
        assert_eq!(shift_range(range("A2:B3"), Axis::Row, edit), None);
        // starts inside the band
        assert_eq!(shift_range(range("A3:A6"), Axis::Row, edit), Some(range("A2:A4")));
        // columns
        assert_eq!(shift_range(range("A1:E1"), Axis::Column, edit), Some(range("A1:C1")));
    }

    #[test]
    fn test_delete_from_first_row() {
        let edit = AxisEdit::Delete { start: 1, count: 2 };
        assert_eq!(shift_range(range("A1:A2"), Axis::Row, edit), None);
        assert_eq!(shift_range(range("A1:A4"), Axis::Row, edit), Some(range("A1:A2")));
    }
}
