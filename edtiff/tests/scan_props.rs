//! Property-based tests for filename scan inference.

use proptest::prelude::*;
use edtiff::{dummy_scan, image_index, parse_image_index};

// =============================================================================
// Index Extraction
// =============================================================================

proptest! {
    /// Zero-padded trailing numbers are read back as the image index.
    #[test]
    fn index_from_padded_suffix(prefix in "[a-z]{1,8}", index in 0i64..1_000_000, width in 1usize..8) {
        let name = format!("{}_{:0width$}.tif", prefix, index, width = width);
        prop_assert_eq!(parse_image_index(&name), Some(index));
    }

    /// Only the part after the last underscore counts.
    #[test]
    fn index_ignores_earlier_segments(first in 0u32..1000, second in 1i64..1000) {
        let name = format!("run{}_grid_{}.tiff", first, second);
        prop_assert_eq!(image_index(&name), second);
    }

    /// Names without digits fall back to image 1.
    #[test]
    fn index_defaults_to_one(stem in "[a-z]{1,12}", ext in "(tif|tiff|TIF)") {
        let name = format!("sample_{}.{}", stem, ext);
        prop_assert_eq!(parse_image_index(&name), None);
        prop_assert_eq!(image_index(&name), 1);
    }

    /// Oscillation start advances half a degree per frame.
    #[test]
    fn oscillation_follows_index(index in 1i64..100_000) {
        let scan = dummy_scan(format!("/data/frame_{}.tif", index));
        prop_assert_eq!(scan.image_range, (index, index));
        prop_assert_eq!(scan.oscillation.0, 0.5 * (index - 1) as f64);
        prop_assert_eq!(scan.oscillation.1, 0.5);
        prop_assert_eq!(scan.epochs.len(), 1);
    }
}
