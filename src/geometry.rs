use tracing::warn;
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::helper::coordinate::{coordinate_from_index, index_from_coordinate};

/// Contiguous 1-based row range within one source document that is copied
/// to the output in a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: u32,
    pub end: u32,
}

impl RowWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// A merged region in a document's own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl MergedRange {
    /// Parses an A1 range like `B2:D3`. A bare cell reference counts as a
    /// one-cell range.
    pub fn parse(range: &str) -> Option<Self> {
        let (start, end) = match range.split_once(':') {
            Some((start, end)) => (start, end),
            None => (range, range),
        };
        let (start_col, start_row) = cell_ref(start)?;
        let (end_col, end_row) = cell_ref(end)?;
        Some(Self {
            min_row: start_row.min(end_row),
            max_row: start_row.max(end_row),
            min_col: start_col.min(end_col),
            max_col: start_col.max(end_col),
        })
    }

    pub fn to_a1(&self) -> String {
        let start = coordinate_from_index(&self.min_col, &self.min_row);
        let end = coordinate_from_index(&self.max_col, &self.max_row);
        format!("{start}:{end}")
    }
}

fn cell_ref(cell: &str) -> Option<(u32, u32)> {
    let (col, row, _, _) = index_from_coordinate(cell);
    match (col, row) {
        (Some(col), Some(row)) => Some((col, row)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRemap {
    /// Fully inside the window; translated by the window's row delta and
    /// the column offset.
    Translated(MergedRange),
    /// Straddles the window boundary. A truncated merge would corrupt the
    /// grid silently, so the range is dropped instead.
    PartialOverlap,
    /// No row in common with the window; belongs to some other block.
    Outside,
}

pub fn remap_merged_range(
    range: &MergedRange,
    window: RowWindow,
    target_start_row: u32,
    column_offset: u32,
) -> RangeRemap {
    if range.max_row < window.start || range.min_row > window.end {
        return RangeRemap::Outside;
    }
    if range.min_row < window.start || range.max_row > window.end {
        return RangeRemap::PartialOverlap;
    }
    RangeRemap::Translated(MergedRange {
        min_row: range.min_row - window.start + target_start_row,
        max_row: range.max_row - window.start + target_start_row,
        min_col: range.min_col + column_offset,
        max_col: range.max_col + column_offset,
    })
}

/// Registers every merged range of `src` that lies entirely inside `window`
/// on the output sheet. Partially overlapping ranges are dropped with a
/// warning; disjoint ranges are left for their own window's pass.
pub fn copy_merged_ranges(
    src: &Worksheet,
    target: &mut Worksheet,
    window: RowWindow,
    target_start_row: u32,
    column_offset: u32,
) {
    for range in src.get_merge_cells() {
        let a1 = range.get_range();
        let Some(parsed) = MergedRange::parse(&a1) else {
            warn!(range = %a1, "unparseable merged range; dropping it");
            continue;
        };
        match remap_merged_range(&parsed, window, target_start_row, column_offset) {
            RangeRemap::Translated(remapped) => {
                target.add_merge_cells(remapped.to_a1());
            }
            RangeRemap::PartialOverlap => {
                warn!(
                    range = %a1,
                    window_start = window.start,
                    window_end = window.end,
                    "merged range partially overlaps the copy window; dropping it"
                );
            }
            RangeRemap::Outside => {}
        }
    }
}

/// Applies the source's explicit column widths to the output, shifted by
/// the column offset. Only the first document's layout is authoritative, so
/// the engine calls this once.
pub fn copy_column_widths(src: &Worksheet, target: &mut Worksheet, column_offset: u32) {
    for column in src.get_column_dimensions() {
        let width = *column.get_width();
        if width <= 0.0 {
            continue;
        }
        let target_col = *column.get_col_num() + column_offset;
        target
            .get_column_dimension_by_number_mut(&target_col)
            .set_width(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_a1_ranges() {
        let range = MergedRange::parse("B2:D3").unwrap();
        assert_eq!(
            range,
            MergedRange {
                min_row: 2,
                max_row: 3,
                min_col: 2,
                max_col: 4,
            }
        );
        assert_eq!(range.to_a1(), "B2:D3");
    }

    #[test]
    fn single_cell_reference_is_a_one_cell_range() {
        let range = MergedRange::parse("C7").unwrap();
        assert_eq!(range.min_row, 7);
        assert_eq!(range.max_row, 7);
        assert_eq!(range.min_col, 3);
        assert_eq!(range.max_col, 3);
    }

    #[test]
    fn range_inside_window_translates_by_window_delta() {
        let range = MergedRange::parse("A2:B3").unwrap();
        let remapped = remap_merged_range(&range, RowWindow::new(2, 10), 6, 0);
        assert_eq!(
            remapped,
            RangeRemap::Translated(MergedRange {
                min_row: 6,
                max_row: 7,
                min_col: 1,
                max_col: 2,
            })
        );
    }

    #[test]
    fn column_offset_shifts_both_column_bounds() {
        let range = MergedRange::parse("A1:C1").unwrap();
        let remapped = remap_merged_range(&range, RowWindow::new(1, 1), 1, 1);
        assert_eq!(
            remapped,
            RangeRemap::Translated(MergedRange {
                min_row: 1,
                max_row: 1,
                min_col: 2,
                max_col: 4,
            })
        );
    }

    #[test]
    fn straddling_range_is_dropped_not_truncated() {
        let range = MergedRange::parse("A1:A3").unwrap();
        assert_eq!(
            remap_merged_range(&range, RowWindow::new(2, 10), 1, 0),
            RangeRemap::PartialOverlap
        );
    }

    #[test]
    fn disjoint_range_is_left_for_another_window() {
        let range = MergedRange::parse("A1:B1").unwrap();
        assert_eq!(
            remap_merged_range(&range, RowWindow::new(2, 10), 1, 0),
            RangeRemap::Outside
        );
    }
}
