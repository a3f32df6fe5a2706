use crate::errors::CombineError;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// One input workbook, loaded in full. Read-only to the engine: the first
/// worksheet is the data sheet, matching how a single-table export is laid
/// out.
#[derive(Debug)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub display_name: String,
    book: Spreadsheet,
}

impl SourceDocument {
    pub fn load(path: &Path) -> Result<Self, CombineError> {
        let book =
            umya_spreadsheet::reader::xlsx::read(path).map_err(|err| CombineError::Input {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            display_name: display_name(path),
            book,
        })
    }

    pub fn sheet(&self) -> Result<&Worksheet, CombineError> {
        self.book.get_sheet(&0).ok_or_else(|| CombineError::Input {
            path: self.path.clone(),
            reason: "workbook contains no worksheets".to_string(),
        })
    }
}

/// File name used for progress lines and the provenance column.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
