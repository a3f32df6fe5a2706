//! Combine ordered xlsx workbooks into a single output workbook while
//! preserving per-cell formatting, merged regions, column widths and row
//! heights. The combination engine streams rows document by document and
//! deduplicates styles through a per-run registry, so output size and run
//! time scale with distinct styles rather than total cell count.

pub mod cli;
pub mod config;
pub mod copier;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod progress;
pub mod source;
pub mod styles;

pub use config::CombineConfig;
pub use copier::CopyStrategy;
pub use engine::combine;
pub use errors::CombineError;
pub use progress::{CancellationToken, ProgressEvent, ProgressSink, RunReport};
