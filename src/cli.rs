use crate::config::CombineConfig;
use crate::copier::CopyStrategy;
use crate::engine::combine;
use crate::progress::{CancellationToken, ProgressEvent, RunReport};
use anyhow::{Result, anyhow, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

#[derive(Debug, Parser)]
#[command(
    name = "xlsx-combine",
    version,
    about = "Combine xlsx workbooks into one master workbook, preserving formatting"
)]
pub struct Cli {
    /// Input workbooks, in combination order.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Output path. Defaults to `<first input stem>_combined_<timestamp>.xlsx`
    /// next to the first input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Header rows to retain from the first file.
    #[arg(long, default_value_t = 1)]
    pub header_rows: u32,

    /// Rows to skip at the top of every file after the first.
    #[arg(long, default_value_t = 1)]
    pub skip_rows: u32,

    /// Add the originating file name as a new first column.
    #[arg(long)]
    pub filename_column: bool,

    /// Keep formula text instead of baking in computed values. May produce
    /// #REF! errors on recalculation, since references are not rewritten.
    #[arg(long)]
    pub preserve_formulas: bool,

    /// Style copy strategy; `direct` is the slower reference path.
    #[arg(long, value_enum, default_value_t = CopyStrategy::Cached)]
    pub strategy: CopyStrategy,

    /// Suppress the progress bar.
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let files = cli
        .files
        .iter()
        .map(|path| normalize_existing_file(path))
        .collect::<Result<Vec<_>>>()?;

    let output = match cli.output {
        Some(path) => normalize_destination_path(&path)?,
        None => default_output_path(&files[0]),
    };

    let config = CombineConfig {
        header_rows_first: cli.header_rows,
        delete_rows_others: cli.skip_rows,
        include_filename_column: cli.filename_column,
        preserve_formulas: cli.preserve_formulas,
    };
    config.validate()?;

    let (tx, rx) = crossbeam_channel::unbounded::<ProgressEvent>();
    let cancel = CancellationToken::new();

    // The engine gets its own thread so the presentation loop stays
    // responsive; the channel closes when the engine returns.
    let worker = {
        let files = files.clone();
        let output = output.clone();
        let strategy = cli.strategy;
        let cancel = cancel.clone();
        thread::spawn(move || {
            let sink = move |event: ProgressEvent| {
                let _ = tx.send(event);
            };
            combine(&files, &output, &config, strategy, &sink, &cancel)
        })
    };

    let bar = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64 + 1);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap()
            .progress_chars("#>-"),
        );
        bar
    };

    for event in rx {
        bar.set_position(event.step as u64);
        bar.set_message(event.status);
    }
    bar.finish_and_clear();

    let report = worker
        .join()
        .map_err(|_| anyhow!("combination worker panicked"))?;

    match &report {
        RunReport::Succeeded { message, .. } => {
            println!("{message}");
            println!("Combined file saved to: {}", output.display());
            Ok(())
        }
        RunReport::Cancelled { message } => {
            println!("{message}");
            Ok(())
        }
        RunReport::Failed { message } => Err(anyhow!("{message}")),
    }
}

/// Default output name beside the first input, e.g.
/// `report_combined_20260829_143000.xlsx`.
fn default_output_path(first_input: &Path) -> PathBuf {
    let stem = first_input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{stem}_combined_{timestamp}.xlsx");
    match first_input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn normalize_existing_file(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if !absolute.exists() {
        bail!("input file '{}' does not exist", absolute.display());
    }
    if !absolute.is_file() {
        bail!("input path '{}' is not a file", absolute.display());
    }
    Ok(fs::canonicalize(&absolute).unwrap_or(absolute))
}

fn normalize_destination_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if let Some(parent) = absolute.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        bail!(
            "destination directory '{}' does not exist",
            parent.display()
        );
    }
    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_beside_the_first_input() {
        let path = default_output_path(Path::new("/data/q1.xlsx"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(path.parent(), Some(Path::new("/data")));
        assert!(name.starts_with("q1_combined_"));
        assert!(name.ends_with(".xlsx"));
    }
}
