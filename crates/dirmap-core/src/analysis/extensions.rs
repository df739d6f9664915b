/// Per-extension byte and file totals.
///
/// Extensions are the file name's final suffix, dot included, lower-cased
/// (`"Main.RS"` → `".rs"`). Dotfiles such as `.bashrc` and names ending in a
/// bare dot have no suffix and fall into [`NO_EXTENSION`].
use compact_str::CompactString;
use serde::Serialize;
use std::collections::HashMap;

/// Bucket for files without a suffix.
pub const NO_EXTENSION: &str = "<no-ext>";

/// Size and count totals for one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionTotals {
    pub extension: CompactString,
    pub bytes: u64,
    pub files: u64,
}

/// Derive the histogram key for a file name.
pub fn extension_of(name: &str) -> CompactString {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => {
            CompactString::new(name[dot..].to_lowercase())
        }
        _ => CompactString::new(NO_EXTENSION),
    }
}

/// Running histogram keyed by extension.
#[derive(Debug, Default)]
pub struct ExtensionHistogram {
    totals: HashMap<CompactString, (u64, u64)>,
}

impl ExtensionHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one file.
    pub fn record(&mut self, file_name: &str, size: u64) {
        let entry = self.totals.entry(extension_of(file_name)).or_insert((0, 0));
        entry.0 += size;
        entry.1 += 1;
    }

    /// Finish into a list sorted by bytes descending, then by extension so
    /// equal totals render in a stable order.
    pub fn into_sorted(self) -> Vec<ExtensionTotals> {
        let mut results: Vec<ExtensionTotals> = self
            .totals
            .into_iter()
            .map(|(extension, (bytes, files))| ExtensionTotals {
                extension,
                bytes,
                files,
            })
            .collect();
        results.sort_by(|a, b| {
            b.bytes
                .cmp(&a.bytes)
                .then_with(|| a.extension.cmp(&b.extension))
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_lowercased_with_dot() {
        assert_eq!(extension_of("Main.RS"), ".rs");
        assert_eq!(extension_of("archive.tar.GZ"), ".gz");
    }

    #[test]
    fn names_without_suffix_use_sentinel() {
        assert_eq!(extension_of("Makefile"), NO_EXTENSION);
        assert_eq!(extension_of(".bashrc"), NO_EXTENSION);
        assert_eq!(extension_of("trailing."), NO_EXTENSION);
        assert_eq!(extension_of(""), NO_EXTENSION);
    }

    #[test]
    fn histogram_aggregates_and_sorts_by_bytes() {
        let mut hist = ExtensionHistogram::new();
        hist.record("a.rs", 100);
        hist.record("b.RS", 100);
        hist.record("logo.png", 150);
        hist.record("README", 5);

        let totals = hist.into_sorted();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].extension, ".rs");
        assert_eq!(totals[0].bytes, 200);
        assert_eq!(totals[0].files, 2);
        assert_eq!(totals[1].extension, ".png");
        assert_eq!(totals[2].extension, NO_EXTENSION);
    }

    #[test]
    fn equal_totals_are_ordered_by_name() {
        let mut hist = ExtensionHistogram::new();
        hist.record("z.zip", 10);
        hist.record("a.arc", 10);
        let totals = hist.into_sorted();
        assert_eq!(totals[0].extension, ".arc");
        assert_eq!(totals[1].extension, ".zip");
    }

    #[test]
    fn empty_histogram() {
        assert!(ExtensionHistogram::new().into_sorted().is_empty());
    }
}
