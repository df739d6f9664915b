/// Global accumulators filled while the walk runs.
pub mod extensions;
pub mod top_files;

pub use extensions::{extension_of, ExtensionHistogram, ExtensionTotals, NO_EXTENSION};
pub use top_files::TopFiles;
