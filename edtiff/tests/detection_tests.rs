//! Profile detection against synthetic detector images.

#![cfg(feature = "codec")]

use std::path::{Path, PathBuf};

use edtiff::prelude::*;
use edtiff::{profiles, understand_generic};
use edtiff_tiff::fixture::{FixturePage, TiffWriter};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, writer: TiffWriter) -> PathBuf {
    let path = dir.path().join(name);
    writer.write_to(&path).unwrap();
    path
}

fn single(dir: &TempDir, name: &str, page: FixturePage) -> PathBuf {
    write(dir, name, TiffWriter::new().page(page))
}

fn all_gates() -> DetectionConfig {
    DetectionConfig::new().merlin(true).ued_bnl(true)
}

fn identified(registry: &FormatRegistry, path: &Path, config: &DetectionConfig) -> Option<&'static str> {
    registry.identify(path, config).map(|p| p.name)
}

// =============================================================================
// Base Predicate
// =============================================================================

#[test]
fn test_generic_single_page() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "img_001.tif", FixturePage::gray16(8, 8));
    assert!(understand_generic(&path));
}

#[test]
fn test_multi_page_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "stack_001.tif",
        TiffWriter::new()
            .page(FixturePage::gray16(514, 514))
            .page(FixturePage::gray16(514, 514)),
    );

    assert!(!understand_generic(&path));
    let registry = FormatRegistry::with_builtin();
    assert_eq!(identified(&registry, &path, &all_gates()), None);
    assert!(!profiles::MEDIPIX.understand(&path, &all_gates()));
}

#[test]
fn test_reduced_resolution_page_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "pyramid_001.tif",
        TiffWriter::new()
            .page(FixturePage::gray16(514, 514))
            .page(FixturePage::gray16(257, 257).reduced()),
    );
    assert!(!understand_generic(&path));
}

#[test]
fn test_unreadable_files_not_recognized() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("notes_001.tif");
    std::fs::write(&text, b"not a tiff at all").unwrap();
    let empty = dir.path().join("empty_001.tif");
    std::fs::write(&empty, b"").unwrap();
    let missing = dir.path().join("missing_001.tif");

    let registry = FormatRegistry::with_builtin();
    for path in [&text, &empty, &missing] {
        assert!(!understand_generic(path));
        assert_eq!(identified(&registry, path, &all_gates()), None);
    }
}

// =============================================================================
// Per-Profile Predicates
// =============================================================================

#[test]
fn test_merlin_requires_flag() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "merlin_0001.tif", FixturePage::gray16(512, 512));
    let registry = FormatRegistry::with_builtin();

    assert_eq!(identified(&registry, &path, &DetectionConfig::new()), None);
    assert!(!profiles::MERLIN.understand(&path, &DetectionConfig::new()));

    let merlin = DetectionConfig::new().merlin(true);
    assert_eq!(identified(&registry, &path, &merlin), Some("merlin"));
    assert!(profiles::MERLIN.understand(&path, &merlin));
}

#[test]
fn test_ued_bnl_requires_flag() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "bnl_0001.tif", FixturePage::gray16(512, 512));
    let registry = FormatRegistry::with_builtin();

    let bnl = DetectionConfig::new().ued_bnl(true);
    assert_eq!(identified(&registry, &path, &bnl), Some("ued-bnl"));

    // Merlin comes first when both gates are open.
    assert_eq!(identified(&registry, &path, &all_gates()), Some("merlin"));
}

#[test]
fn test_asi_description() {
    let dir = TempDir::new().unwrap();
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    let asi = single(
        &dir,
        "asi_0001.tif",
        FixturePage::gray16(516, 516).description("ImageCameraName: timepix\nExposureTime: 0.1"),
    );
    assert_eq!(identified(&registry, &asi, &config), Some("asi"));

    let other = single(
        &dir,
        "asi_0002.tif",
        FixturePage::gray16(516, 516).description("ImageCameraName: medipix"),
    );
    assert_eq!(identified(&registry, &other, &config), None);

    let bare = single(&dir, "asi_0003.tif", FixturePage::gray16(516, 516));
    assert_eq!(identified(&registry, &bare, &config), None);

    let wrong_shape = single(
        &dir,
        "asi_0004.tif",
        FixturePage::gray16(512, 516).description("ImageCameraName: timepix"),
    );
    assert!(!profiles::ASI.understand(&wrong_shape, &config));
}

#[test]
fn test_tecnai_olympus_camera() {
    let dir = TempDir::new().unwrap();
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    let veleta = single(
        &dir,
        "tecnai_0001.tif",
        FixturePage::gray16(1024, 1024).olympus_camera("Veleta"),
    );
    assert_eq!(identified(&registry, &veleta, &config), Some("tecnai-g2"));

    let morada = single(
        &dir,
        "tecnai_0002.tif",
        FixturePage::gray16(1024, 1024).olympus_camera("Morada"),
    );
    assert_eq!(identified(&registry, &morada, &config), None);

    let plain = single(&dir, "tecnai_0003.tif", FixturePage::gray16(1024, 1024));
    assert_eq!(identified(&registry, &plain, &config), None);
}

/// Write a Veleta image, then let `patch` rewrite bytes of its SIS block.
fn patched_veleta(dir: &TempDir, name: &str, patch: impl FnOnce(&mut [u8])) -> PathBuf {
    let mut bytes = TiffWriter::new()
        .page(FixturePage::gray16(1024, 1024).olympus_camera("Veleta"))
        .to_bytes()
        .unwrap();
    let sis = bytes.windows(4).position(|w| w == b"SIS0").unwrap();
    patch(&mut bytes[sis..]);
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_tecnai_extreme_sis_month() {
    let dir = TempDir::new().unwrap();
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    let path = patched_veleta(&dir, "tecnai_0004.tif", |sis| {
        sis[16..18].copy_from_slice(&i16::MAX.to_le_bytes());
    });
    // The datetime is dropped; the camera name still identifies the image.
    assert!(understand_generic(&path));
    assert!(profiles::TECNAI_G2.understand(&path, &config));
    assert_eq!(identified(&registry, &path, &config), Some("tecnai-g2"));
}

#[test]
fn test_tecnai_corrupt_sis_rejected() {
    let dir = TempDir::new().unwrap();
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    let bad_magic = patched_veleta(&dir, "tecnai_0005.tif", |sis| sis[0] = b'X');
    assert!(understand_generic(&bad_magic));
    assert_eq!(identified(&registry, &bad_magic, &config), None);

    let past_end = patched_veleta(&dir, "tecnai_0006.tif", |sis| {
        sis[64..68].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
    });
    assert!(understand_generic(&past_end));
    assert!(!profiles::TECNAI_G2.understand(&past_end, &config));
    assert_eq!(identified(&registry, &past_end, &config), None);
}

#[test]
fn test_medipix_and_ued_shapes() {
    let dir = TempDir::new().unwrap();
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    let medipix = single(&dir, "mpx_0001.tif", FixturePage::gray16(514, 514));
    assert_eq!(identified(&registry, &medipix, &config), Some("medipix"));

    // 1300 rows by 1340 columns.
    let ued = single(&dir, "ued_0001.tif", FixturePage::gray16(1340, 1300));
    assert_eq!(identified(&registry, &ued, &config), Some("ued"));

    let transposed = single(&dir, "ued_0002.tif", FixturePage::gray16(1300, 1340));
    assert_eq!(identified(&registry, &transposed, &config), None);
}

#[test]
fn test_understands_by_name() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "mpx_0001.tif", FixturePage::gray16(514, 514));
    let registry = FormatRegistry::with_builtin();
    let config = DetectionConfig::new();

    assert!(registry.understands("medipix", &path, &config).unwrap());
    assert!(!registry.understands("asi", &path, &config).unwrap());
    assert!(registry.understands("pilatus", &path, &config).is_err());
}

#[test]
fn test_detection_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "mpx_0009.tif", FixturePage::gray16(514, 514));
    let registry = FormatRegistry::with_builtin();
    let config = all_gates();

    let first = identified(&registry, &path, &config);
    let second = identified(&registry, &path, &config);
    assert_eq!(first, Some("medipix"));
    assert_eq!(first, second);

    for profile in registry.profiles() {
        assert_eq!(
            profile.understand(&path, &config),
            profile.understand(&path, &config)
        );
    }
}

// =============================================================================
// Open and Pixel Access
// =============================================================================

#[test]
fn test_open_and_raw_data() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "mpx_0023.tif", FixturePage::gray16(514, 514));
    let registry = FormatRegistry::with_builtin();

    let image = registry.open(&path, &DetectionConfig::new()).unwrap();
    assert_eq!(image.profile, "medipix");
    let scan = image.scan.as_ref().unwrap();
    assert_eq!(scan.image_range, (23, 23));
    assert_eq!(scan.oscillation, (11.0, 0.5));

    let data = image.raw_data().unwrap();
    assert_eq!(data.dim(), (514, 514));
    // Ramp fixture: value is the linear index modulo 4096.
    assert_eq!(data[[0, 5]], 5.0);
    assert_eq!(data[[1, 0]], 514.0);
    assert_eq!(data[[8, 0]], (8 * 514 % 4096) as f64);

    let stats = image.pixel_stats().unwrap().unwrap();
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 4095.0);
    assert_eq!(stats.untrusted, 0);
}

#[test]
fn test_raw_data_custom_pixels() {
    let dir = TempDir::new().unwrap();
    let mut pixels = vec![0u16; 514 * 514];
    pixels[514 * 3 + 7] = 65535;
    let path = single(
        &dir,
        "mpx_0002.tif",
        FixturePage::gray16(514, 514).with_pixels(pixels),
    );

    let image = FormatRegistry::with_builtin()
        .open(&path, &DetectionConfig::new())
        .unwrap();
    let data = image.raw_data().unwrap();
    assert_eq!(data[[3, 7]], 65535.0);
    assert_eq!(data.sum(), 65535.0);
}

#[test]
fn test_open_unrecognized() {
    let dir = TempDir::new().unwrap();
    let path = single(&dir, "odd_0001.tif", FixturePage::gray16(100, 100));

    let err = FormatRegistry::with_builtin()
        .open(&path, &all_gates())
        .unwrap_err();
    assert!(matches!(err, Error::Unrecognized { .. }));
}
