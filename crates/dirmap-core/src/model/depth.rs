/// Depth limits for the tree view and the treemap grouping.
///
/// The command line keeps the "0 means unlimited" integer convention; inside
/// the crate that sentinel is decoded once into an explicit enum.
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DepthLimit {
    /// No limit: maximal detail.
    #[default]
    Unbounded,
    /// Stop at exactly this many path segments below the root.
    Exact(NonZeroUsize),
}

impl DepthLimit {
    /// Decode the external integer form, where `0` means unbounded.
    pub fn from_level(level: usize) -> Self {
        NonZeroUsize::new(level).map_or(Self::Unbounded, Self::Exact)
    }

    /// `true` when a node at `depth` may still be expanded into its children.
    pub fn allows_descent_below(self, depth: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Exact(n) => depth + 1 < n.get(),
        }
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unlimited"),
            Self::Exact(n) => write!(f, "{n}"),
        }
    }
}
