#![allow(dead_code)]
use umya_spreadsheet::{NumberingFormat, Worksheet};

#[derive(Clone, Debug)]
pub enum CellVal {
    Text(String),
    Num(f64),
    Formula { text: String, cached: String },
    Empty,
}

impl From<&str> for CellVal {
    fn from(s: &str) -> Self {
        CellVal::Text(s.to_string())
    }
}

impl From<f64> for CellVal {
    fn from(n: f64) -> Self {
        CellVal::Num(n)
    }
}

impl From<i32> for CellVal {
    fn from(n: i32) -> Self {
        CellVal::Num(n as f64)
    }
}

pub fn set_cell(sheet: &mut Worksheet, col: u32, row: u32, val: &CellVal) {
    match val {
        CellVal::Text(s) => {
            sheet.get_cell_mut((col, row)).set_value(s.clone());
        }
        CellVal::Num(n) => {
            sheet.get_cell_mut((col, row)).set_value_number(*n);
        }
        CellVal::Formula { text, cached } => {
            let cell = sheet.get_cell_mut((col, row));
            cell.set_formula(text.clone());
            cell.get_cell_value_mut()
                .set_formula_result_default(cached.clone());
        }
        CellVal::Empty => {}
    }
}

/// Fills a rectangular block starting at A1: one bold header row followed by
/// data rows. The shape every combination test starts from.
pub fn fill_table<H, R, V>(sheet: &mut Worksheet, headers: &[H], rows: &[R])
where
    H: AsRef<str>,
    R: AsRef<[V]>,
    V: Into<CellVal> + Clone,
{
    for (i, header) in headers.iter().enumerate() {
        let col = i as u32 + 1;
        sheet
            .get_cell_mut((col, 1))
            .set_value(header.as_ref().to_string());
        sheet.get_style_mut((col, 1)).get_font_mut().set_bold(true);
    }

    for (row_idx, row_data) in rows.iter().enumerate() {
        let row = row_idx as u32 + 2;
        for (col_idx, val) in row_data.as_ref().iter().enumerate() {
            let col = col_idx as u32 + 1;
            let cell_val: CellVal = val.clone().into();
            set_cell(sheet, col, row, &cell_val);
        }
    }
}

pub fn apply_solid_fill(sheet: &mut Worksheet, col: u32, row: u32, argb: &str) {
    sheet
        .get_style_mut((col, row))
        .get_fill_mut()
        .get_pattern_fill_mut()
        .set_pattern_type(umya_spreadsheet::PatternValues::Solid)
        .get_foreground_color_mut()
        .set_argb(argb);
}

pub fn apply_date_format(sheet: &mut Worksheet, col: u32, row: u32) {
    sheet
        .get_style_mut((col, row))
        .get_number_format_mut()
        .set_format_code(NumberingFormat::FORMAT_DATE_YYYYMMDD2);
}
