/// dirmap report: turns a finished scan into files a person can read.
///
/// # Modules
///
/// - [`options`]: Report knobs (tree depth, treemap grouping, extra outputs).
/// - [`svg`]: Squarified treemap rendered as a standalone SVG.
/// - [`tree_view`]: Box-drawing text tree re-listed from disk.
/// - [`markdown`]: The Markdown report tying everything together.
/// - [`hash`]: Streaming SHA-256 for the largest-files table.
/// - [`generate`]: Scan-and-write orchestration.
pub mod error;
pub mod generate;
pub mod hash;
pub mod markdown;
pub mod options;
pub mod svg;
pub mod tree_view;

pub use error::ReportError;
pub use generate::{generate_outputs, output_stem, render_outputs, ReportPaths};
pub use options::ReportOptions;
