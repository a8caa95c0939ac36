//! Detection when the crate is built without the TIFF codec.

#![cfg(not(feature = "codec"))]

use edtiff::prelude::*;
use edtiff::{profiles, understand_generic, TiffError};
use edtiff_tiff::fixture::{FixturePage, TiffWriter};
use tempfile::TempDir;

#[test]
fn test_nothing_recognized_without_codec() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mpx_0001.tif");
    TiffWriter::new()
        .page(FixturePage::gray16(514, 514))
        .write_to(&path)
        .unwrap();

    let config = DetectionConfig::new().merlin(true).ued_bnl(true);
    let registry = FormatRegistry::with_builtin();

    assert!(!understand_generic(&path));
    assert!(registry.identify(&path, &config).is_none());
    assert!(!profiles::MEDIPIX.understand(&path, &config));
    assert!(!registry.understands("medipix", &path, &config).unwrap());
    assert!(matches!(
        registry.open(&path, &config),
        Err(Error::Unrecognized { .. })
    ));
}

#[test]
fn test_pixel_access_reports_codec_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mpx_0002.tif");
    TiffWriter::new()
        .page(FixturePage::gray16(514, 514))
        .write_to(&path)
        .unwrap();

    assert!(matches!(
        edtiff_tiff::decode(&path),
        Err(TiffError::CodecUnavailable)
    ));

    let image = ImportedImage::from_profile(&path, &profiles::MEDIPIX).unwrap();
    assert!(matches!(
        image.raw_data(),
        Err(Error::Tiff(TiffError::CodecUnavailable))
    ));
}
