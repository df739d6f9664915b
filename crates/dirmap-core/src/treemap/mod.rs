/// Treemap input and layout.
///
/// [`bucketize`] partitions a scan's bytes into disjoint labeled buckets;
/// [`squarify`] turns a weight list into rectangles that tile a target area.
/// Rendering the rectangles is left to the caller.
pub mod bucket;
pub mod squarify;

pub use bucket::{
    bucketize, bucketize_tree, truncate, Bucket, BucketKind, GroupingDepth, Overflow,
    DIRECT_FILES_SUFFIX,
};
pub use squarify::{squarify, worst_ratio, LayoutCell, Rect};

/// Lay out buckets in `bounds`, pairing every rectangle with its bucket.
pub fn layout_buckets(buckets: &[Bucket], bounds: Rect) -> Vec<(&Bucket, Rect)> {
    let weights: Vec<f64> = buckets.iter().map(|b| b.size as f64).collect();
    squarify(&weights, bounds)
        .into_iter()
        .map(|cell| (&buckets[cell.index], cell.rect))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    #[test]
    fn layout_pairs_cells_with_their_buckets() {
        let buckets = vec![
            Bucket {
                label: CompactString::new("big/"),
                size: 300,
                kind: BucketKind::Subtree,
            },
            Bucket {
                label: CompactString::new("small.txt"),
                size: 100,
                kind: BucketKind::File,
            },
        ];
        let laid = layout_buckets(&buckets, Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(laid.len(), 2);
        assert_eq!(laid[0].0.label, "big/");
        assert!((laid[0].1.area() - 300.0).abs() < 1e-9);
        assert!((laid[1].1.area() - 100.0).abs() < 1e-9);
    }
}
