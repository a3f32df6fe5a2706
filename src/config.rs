use anyhow::{Result, bail};

/// Policy for one combination run. All four fields are fixed for the whole
/// run; the engine applies them without defaults of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineConfig {
    /// Rows `1..=N` of the first document are kept verbatim as the header
    /// block. Must be at least 1.
    pub header_rows_first: u32,
    /// Rows `1..=M` are skipped at the top of every document after the
    /// first. A document with nothing below the skipped rows contributes
    /// zero rows and zero merges.
    pub delete_rows_others: u32,
    /// Insert a provenance column: output column 1 holds the originating
    /// file's name, and every copied cell shifts one column right.
    pub include_filename_column: bool,
    /// Keep formula text verbatim instead of baking in the last computed
    /// value. Cell references are not rewritten to the combined layout, so
    /// recalculation may produce #REF! errors; that tradeoff is the
    /// caller's to make.
    pub preserve_formulas: bool,
}

impl CombineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.header_rows_first == 0 {
            bail!("header_rows_first must be at least 1");
        }
        Ok(())
    }

    /// Column shift applied to every copied cell, merge and width when the
    /// provenance column is enabled.
    pub fn column_offset(&self) -> u32 {
        if self.include_filename_column { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CombineConfig {
        CombineConfig {
            header_rows_first: 1,
            delete_rows_others: 1,
            include_filename_column: false,
            preserve_formulas: false,
        }
    }

    #[test]
    fn rejects_zero_header_rows() {
        let config = CombineConfig {
            header_rows_first: 0,
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_delete_rows_is_valid() {
        let config = CombineConfig {
            delete_rows_others: 0,
            ..base()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn column_offset_follows_filename_column() {
        assert_eq!(base().column_offset(), 0);
        let with_column = CombineConfig {
            include_filename_column: true,
            ..base()
        };
        assert_eq!(with_column.column_offset(), 1);
    }
}
