use crate::config::CombineConfig;
use crate::geometry::RowWindow;
use crate::styles::{StyleRegistry, fingerprint_style};
use clap::ValueEnum;
use umya_spreadsheet::{Cell, Style, Worksheet};

/// Performance knob for style copying. Both strategies produce identical
/// output; the cached one collapses repeated formatting to one registry
/// entry instead of re-deriving every attribute per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum CopyStrategy {
    /// Re-derive the full style for every cell. Baseline reference,
    /// O(total cells) regardless of repetition.
    Direct,
    /// Route styles through the per-run registry, bounded by the number of
    /// distinct styles across the inputs.
    #[default]
    Cached,
}

impl CopyStrategy {
    pub fn new_copier(self) -> Box<dyn CellCopier> {
        match self {
            CopyStrategy::Direct => Box::new(DirectCopier),
            CopyStrategy::Cached => Box::new(CachedCopier::new()),
        }
    }
}

/// Style transfer seam between the two strategies. Value, formula and
/// hyperlink copying are shared code paths, so strategy choice can never
/// change anything but the cost of styling.
pub trait CellCopier {
    fn copy_style(&mut self, src: &Cell, target: &mut Cell);
}

pub struct DirectCopier;

impl CellCopier for DirectCopier {
    fn copy_style(&mut self, src: &Cell, target: &mut Cell) {
        let style = src.get_style();
        if *style != Style::default() {
            target.set_style(style.clone());
        }
    }
}

pub struct CachedCopier {
    registry: StyleRegistry,
}

impl CachedCopier {
    pub fn new() -> Self {
        Self {
            registry: StyleRegistry::new(),
        }
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }
}

impl Default for CachedCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl CellCopier for CachedCopier {
    fn copy_style(&mut self, src: &Cell, target: &mut Cell) {
        let style = src.get_style();
        if *style == Style::default() {
            return;
        }
        let fingerprint = fingerprint_style(style);
        let handle = self.registry.intern_or_create(fingerprint, || style.clone());
        target.set_style(handle.clone());
    }
}

/// Copies one cell: value (or formula, per config), style, hyperlink.
pub fn copy_cell(
    copier: &mut dyn CellCopier,
    src: &Cell,
    target: &mut Cell,
    preserve_formulas: bool,
) {
    if !src.get_formula().is_empty() && !preserve_formulas {
        // Bake in the last computed value; the formula text is dropped.
        target.set_value(src.get_value());
    } else {
        // Full value copy. For formula cells this carries the formula text
        // verbatim plus its cached result; references are not rewritten to
        // the combined layout.
        *target.get_cell_value_mut() = src.get_cell_value().clone();
    }

    copier.copy_style(src, target);

    if let Some(hyperlink) = src.get_hyperlink() {
        target.set_hyperlink(hyperlink.clone());
    }
}

/// Copies one source row to `target_row` on the output sheet: row height,
/// the optional provenance cell in column 1, then every cell shifted by the
/// configured column offset.
pub fn copy_row(
    copier: &mut dyn CellCopier,
    src: &Worksheet,
    target: &mut Worksheet,
    src_row: u32,
    target_row: u32,
    config: &CombineConfig,
    display_name: &str,
) {
    if let Some(dimension) = src.get_row_dimension(&src_row) {
        target
            .get_row_dimension_mut(&target_row)
            .set_height(*dimension.get_height());
    }

    if config.include_filename_column {
        target
            .get_cell_mut((1, target_row))
            .set_value(display_name.to_string());
    }

    let offset = config.column_offset();
    for col in 1..=src.get_highest_column() {
        let Some(src_cell) = src.get_cell((col, src_row)) else {
            continue;
        };
        let target_cell = target.get_cell_mut((col + offset, target_row));
        copy_cell(copier, src_cell, target_cell, config.preserve_formulas);
    }
}

/// Carries cell comments for one copy window. umya keeps comments on the
/// worksheet rather than the cell, so this runs once per copied block with
/// the same row/column remap as the block's cells.
pub fn copy_comments_in_window(
    src: &Worksheet,
    target: &mut Worksheet,
    window: RowWindow,
    target_start_row: u32,
    column_offset: u32,
) {
    let mut carried = Vec::new();
    for comment in src.get_comments() {
        let row = *comment.get_coordinate().get_row_num();
        let col = *comment.get_coordinate().get_col_num();
        if row < window.start || row > window.end {
            continue;
        }
        let mut moved = comment.clone();
        moved
            .get_coordinate_mut()
            .set_row_num(row - window.start + target_start_row)
            .set_col_num(col + column_offset);
        carried.push(moved);
    }
    for comment in carried {
        target.add_comments(comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umya_spreadsheet::Comment;

    fn books() -> (umya_spreadsheet::Spreadsheet, umya_spreadsheet::Spreadsheet) {
        (umya_spreadsheet::new_file(), umya_spreadsheet::new_file())
    }

    fn styled_source(sheet: &mut Worksheet, rows: u32) {
        for row in 1..=rows {
            sheet.get_cell_mut((1, row)).set_value_number(row as f64);
            sheet.get_style_mut((1, row)).get_font_mut().set_bold(true);
        }
    }

    #[test]
    fn cached_copier_registry_is_bounded_by_distinct_styles() {
        let (mut src_book, mut target_book) = books();
        let src = src_book.get_sheet_mut(&0).unwrap();
        styled_source(src, 50);
        // One row deviates: italic instead of plain bold.
        src.get_style_mut((1, 7)).get_font_mut().set_italic(true);

        let mut copier = CachedCopier::new();
        let target = target_book.get_sheet_mut(&0).unwrap();
        let src = src_book.get_sheet(&0).unwrap();
        for row in 1..=50 {
            let src_cell = src.get_cell((1, row)).unwrap();
            let target_cell = target.get_cell_mut((1, row));
            copy_cell(&mut copier, src_cell, target_cell, false);
        }

        assert_eq!(copier.registry().distinct_styles(), 2);
    }

    #[test]
    fn comments_in_window_are_remapped_with_the_block() {
        let (mut src_book, mut target_book) = books();
        let src = src_book.get_sheet_mut(&0).unwrap();

        let mut inside = Comment::default();
        inside.get_coordinate_mut().set_col_num(2).set_row_num(3);
        src.add_comments(inside);

        let mut outside = Comment::default();
        outside.get_coordinate_mut().set_col_num(1).set_row_num(9);
        src.add_comments(outside);

        let target = target_book.get_sheet_mut(&0).unwrap();
        let src = src_book.get_sheet(&0).unwrap();
        copy_comments_in_window(src, target, RowWindow::new(2, 5), 10, 1);

        let comments = target.get_comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(*comments[0].get_coordinate().get_row_num(), 11);
        assert_eq!(*comments[0].get_coordinate().get_col_num(), 3);
    }
}
