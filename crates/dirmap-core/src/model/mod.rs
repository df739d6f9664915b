/// Data model for a dirmap scan.
///
/// Re-exports the directory arena and supporting types.
pub mod depth;
pub mod dir_stat;
pub mod dir_tree;
pub mod file_fact;
pub mod size;

pub use depth::DepthLimit;
pub use dir_stat::{DirIndex, DirectoryStat};
pub use dir_tree::DirTree;
pub use file_fact::FileFact;
