use crate::config::CombineConfig;
use crate::copier::{CopyStrategy, copy_comments_in_window, copy_row};
use crate::errors::CombineError;
use crate::geometry::{RowWindow, copy_column_widths, copy_merged_ranges};
use crate::progress::{CancellationToken, ProgressEvent, ProgressSink, RunReport};
use crate::source::{SourceDocument, display_name};
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

const OUTPUT_SHEET_NAME: &str = "Combined Data";

enum Outcome {
    Completed(usize),
    Cancelled { at_document: usize },
}

/// Runs one combination: documents are processed strictly in order on the
/// caller's thread, progress events stream through `progress` in increasing
/// step order, and exactly one terminal report is returned. The output file
/// is written only on success; a cancelled or failed run leaves nothing
/// behind.
pub fn combine(
    sources: &[PathBuf],
    output: &Path,
    config: &CombineConfig,
    strategy: CopyStrategy,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> RunReport {
    info!(
        files = sources.len(),
        ?strategy,
        output = %output.display(),
        "starting combination run"
    );
    match run(sources, output, config, strategy, progress, cancel) {
        Ok(Outcome::Completed(count)) => RunReport::Succeeded {
            files_combined: count,
            message: format!("Successfully combined {count} files."),
        },
        Ok(Outcome::Cancelled { at_document }) => {
            debug!(at_document, "run cancelled at document boundary");
            RunReport::Cancelled {
                message: "Operation cancelled by user.".to_string(),
            }
        }
        Err(err) => RunReport::Failed {
            message: format!("{err:#}"),
        },
    }
}

fn run(
    sources: &[PathBuf],
    output: &Path,
    config: &CombineConfig,
    strategy: CopyStrategy,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    config.validate()?;

    // Fresh output and style registry per run; nothing persists across runs.
    let mut out_book = umya_spreadsheet::new_file();
    out_sheet(&mut out_book)?.set_name(OUTPUT_SHEET_NAME);
    let mut copier = strategy.new_copier();

    let offset = config.column_offset();
    let mut cursor: u32 = 1;

    for (index, path) in sources.iter().enumerate() {
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled { at_document: index });
        }

        let name = display_name(path);
        progress.emit(ProgressEvent {
            step: index,
            status: format!("Processing file {}/{}: {name}", index + 1, sources.len()),
        });

        let doc = SourceDocument::load(path)?;
        let sheet = doc.sheet()?;
        let last_row = sheet.get_highest_row();
        let out = out_sheet(&mut out_book)?;

        if index == 0 {
            if last_row == 0 {
                return Err(CombineError::EmptyFirstDocument { name }.into());
            }

            // Header block: rows 1..=H verbatim.
            let header_window = RowWindow::new(1, config.header_rows_first);
            for src_row in 1..=config.header_rows_first {
                copy_row(copier.as_mut(), sheet, out, src_row, cursor, config, &name);
                cursor += 1;
            }
            copy_merged_ranges(sheet, out, header_window, 1, offset);
            copy_comments_in_window(sheet, out, header_window, 1, offset);

            // First data block. Header and data are remapped separately:
            // the boundary is a hard row-range cut.
            let data_start = config.header_rows_first + 1;
            if data_start <= last_row {
                let data_window = RowWindow::new(data_start, last_row);
                let block_start = cursor;
                for src_row in data_start..=last_row {
                    copy_row(copier.as_mut(), sheet, out, src_row, cursor, config, &name);
                    cursor += 1;
                }
                copy_merged_ranges(sheet, out, data_window, block_start, offset);
                copy_comments_in_window(sheet, out, data_window, block_start, offset);
            }

            // The first document's layout is authoritative for widths.
            copy_column_widths(sheet, out, offset);
        } else {
            let start_row = config.delete_rows_others + 1;
            if start_row > last_row {
                debug!(document = %name, "nothing left after skip rows; skipping document");
                continue;
            }

            let window = RowWindow::new(start_row, last_row);
            let block_start = cursor;
            for src_row in start_row..=last_row {
                copy_row(copier.as_mut(), sheet, out, src_row, cursor, config, &name);
                cursor += 1;
            }
            copy_merged_ranges(sheet, out, window, block_start, offset);
            copy_comments_in_window(sheet, out, window, block_start, offset);
        }

        debug!(document = %name, rows_written = cursor - 1, "document copied");
    }

    progress.emit(ProgressEvent {
        step: sources.len(),
        status: "Saving combined file...".to_string(),
    });

    umya_spreadsheet::writer::xlsx::write(&out_book, output).map_err(|err| {
        CombineError::Persist {
            path: output.to_path_buf(),
            reason: err.to_string(),
        }
    })?;

    Ok(Outcome::Completed(sources.len()))
}

fn out_sheet(book: &mut Spreadsheet) -> Result<&mut Worksheet> {
    book.get_sheet_mut(&0)
        .ok_or_else(|| anyhow!("output workbook has no worksheet"))
}
