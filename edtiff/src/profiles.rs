//! Built-in detector profiles, in detection order.

use edtiff_core::DetectorKind;

use crate::config::Gate;
use crate::profile::{DetectorProfile, GeometryStub, ImageKind, TagCheck};

/// Electron wavelength at 200 kV, in Angstrom.
pub const WAVELENGTH_200KV: f64 = 0.02508;

/// Nominal camera length used by the rotation-data profiles (mm).
pub const NOMINAL_DISTANCE: f64 = 2440.0;

const ROTATION_Y: ImageKind = ImageKind::Rotation {
    axis: [0.0, 1.0, 0.0],
};

/// Quantum Detectors Merlin. 512x512 is too common a shape to claim
/// unconditionally, so the profile is gated.
pub const MERLIN: DetectorProfile = DetectorProfile {
    name: "merlin",
    description: "Quantum Detectors Merlin",
    gate: Some(Gate::Merlin),
    shape: (512, 512),
    tag_check: None,
    geometry: GeometryStub {
        kind: DetectorKind::Pad,
        distance: NOMINAL_DISTANCE,
        pixel_size: (0.055, 0.055),
        image_size: (512, 512),
        dynamic_range: 12,
        wavelength: WAVELENGTH_200KV,
    },
    image: ROTATION_Y,
};

/// Amsterdam Scientific Instruments Timepix.
pub const ASI: DetectorProfile = DetectorProfile {
    name: "asi",
    description: "ASI Timepix",
    gate: None,
    shape: (516, 516),
    tag_check: Some(TagCheck::DescriptionContains("ImageCameraName: timepix")),
    geometry: GeometryStub {
        kind: DetectorKind::Pad,
        distance: NOMINAL_DISTANCE,
        pixel_size: (0.055, 0.055),
        image_size: (516, 516),
        dynamic_range: 20,
        wavelength: WAVELENGTH_200KV,
    },
    image: ROTATION_Y,
};

/// FEI Tecnai G2 with an Olympus Veleta camera.
pub const TECNAI_G2: DetectorProfile = DetectorProfile {
    name: "tecnai-g2",
    description: "FEI Tecnai G2 (Olympus Veleta)",
    gate: None,
    shape: (1024, 1024),
    tag_check: Some(TagCheck::OlympusCameraContains("Veleta")),
    geometry: GeometryStub {
        kind: DetectorKind::Pad,
        distance: NOMINAL_DISTANCE,
        pixel_size: (0.026, 0.026),
        image_size: (1024, 1024),
        dynamic_range: 14,
        wavelength: WAVELENGTH_200KV,
    },
    image: ROTATION_Y,
};

/// Medipix, 2x2 chips with a 2 pixel gap.
pub const MEDIPIX: DetectorProfile = DetectorProfile {
    name: "medipix",
    description: "Medipix 514x514",
    gate: None,
    shape: (514, 514),
    tag_check: None,
    geometry: GeometryStub {
        kind: DetectorKind::Pad,
        distance: NOMINAL_DISTANCE,
        pixel_size: (0.055, 0.055),
        image_size: (514, 514),
        dynamic_range: 16,
        wavelength: WAVELENGTH_200KV,
    },
    image: ROTATION_Y,
};

/// Ultrafast electron diffraction stills.
pub const UED: DetectorProfile = DetectorProfile {
    name: "ued",
    description: "UED stills 1300x1340",
    gate: None,
    shape: (1300, 1340),
    tag_check: None,
    geometry: GeometryStub {
        kind: DetectorKind::Pad,
        distance: NOMINAL_DISTANCE,
        pixel_size: (0.060, 0.060),
        // Declared as (fast, slow) = (1300, 1340) against a 1300-row page.
        image_size: (1300, 1340),
        dynamic_range: 20,
        wavelength: WAVELENGTH_200KV,
    },
    image: ImageKind::Still,
};

/// UED instrument at Brookhaven, 3.1 MeV electrons on a CCD. Shares the
/// 512x512 shape with Merlin and is gated the same way.
pub const UED_BNL: DetectorProfile = DetectorProfile {
    name: "ued-bnl",
    description: "UED BNL CCD stills",
    gate: Some(Gate::UedBnl),
    shape: (512, 512),
    tag_check: None,
    geometry: GeometryStub {
        kind: DetectorKind::Ccd,
        distance: 3480.0,
        pixel_size: (0.016, 0.016),
        image_size: (512, 512),
        dynamic_range: 20,
        wavelength: 0.03569,
    },
    image: ImageKind::Still,
};

/// Every built-in profile in the order detection tries them.
pub fn builtin() -> Vec<DetectorProfile> {
    vec![MERLIN, ASI, TECNAI_G2, MEDIPIX, UED, UED_BNL]
}
