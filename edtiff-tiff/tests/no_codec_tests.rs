//! Container access without the `codec` feature.

#![cfg(not(feature = "codec"))]

use edtiff_tiff::fixture::{FixturePage, TiffWriter};
use edtiff_tiff::{decode, TiffContainer, TiffError};
use tempfile::TempDir;

#[test]
fn test_open_and_decode_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame_0001.tif");
    TiffWriter::new()
        .page(FixturePage::gray16(8, 8))
        .write_to(&path)
        .unwrap();

    assert!(matches!(
        TiffContainer::open(&path),
        Err(TiffError::CodecUnavailable)
    ));
    assert!(matches!(decode(&path), Err(TiffError::CodecUnavailable)));
}
