/// dirmap core: scanning, bucketing, treemap layout, and data model.
///
/// This crate contains all business logic with zero presentation code.
/// It is reusable across frontends (the CLI binary, the report renderer,
/// or anything that wants the raw numbers).
///
/// # Modules
///
/// - [`model`]: Arena of per-directory statistics and supporting types.
/// - [`scanner`]: Sequential post-order aggregation plus an optional
///   background worker with progress reporting.
/// - [`analysis`]: Global accumulators filled during the walk (extension
///   histogram, bounded top-N largest files).
/// - [`treemap`]: Bucketizer and squarified layout engine.
/// - [`export`]: JSON and CSV exports of a finished scan.
pub mod analysis;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;
pub mod treemap;

pub use error::{ExportError, ScanError};
pub use scanner::{aggregate, ScanOptions, ScanResult, ScanWarning};
