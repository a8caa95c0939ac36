//! Flat-panel detector model.
//!
//! Geometry follows the usual laboratory convention: the beam travels along
//! -z, and a panel at `distance` millimetres sits in the plane z = -distance.
//! Panel axes are given as signed laboratory axis names (`"+x"`, `"-y"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{add, cross, scale, Vec3};

/// Sensor technology of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorKind {
    /// Hybrid pixel array detector.
    #[serde(rename = "PAD")]
    Pad,
    /// Charge-coupled device.
    #[serde(rename = "CCD")]
    Ccd,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pad => write!(f, "PAD"),
            Self::Ccd => write!(f, "CCD"),
        }
    }
}

/// Signed laboratory axis used to orient panel fast/slow directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    #[serde(rename = "+x")]
    PlusX,
    #[serde(rename = "-x")]
    MinusX,
    #[serde(rename = "+y")]
    PlusY,
    #[serde(rename = "-y")]
    MinusY,
    #[serde(rename = "+z")]
    PlusZ,
    #[serde(rename = "-z")]
    MinusZ,
}

impl AxisDirection {
    /// Unit vector for this direction.
    pub fn vector(self) -> Vec3 {
        match self {
            Self::PlusX => [1.0, 0.0, 0.0],
            Self::MinusX => [-1.0, 0.0, 0.0],
            Self::PlusY => [0.0, 1.0, 0.0],
            Self::MinusY => [0.0, -1.0, 0.0],
            Self::PlusZ => [0.0, 0.0, 1.0],
            Self::MinusZ => [0.0, 0.0, -1.0],
        }
    }

    /// Short name, e.g. `"+x"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlusX => "+x",
            Self::MinusX => "-x",
            Self::PlusY => "+y",
            Self::MinusY => "-y",
            Self::PlusZ => "+z",
            Self::MinusZ => "-z",
        }
    }
}

impl FromStr for AxisDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+x" | "x" => Ok(Self::PlusX),
            "-x" => Ok(Self::MinusX),
            "+y" | "y" => Ok(Self::PlusY),
            "-y" => Ok(Self::MinusY),
            "+z" | "z" => Ok(Self::PlusZ),
            "-z" => Ok(Self::MinusZ),
            other => Err(Error::UnknownAxis(other.to_string())),
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive valid intensity interval for a detector with `bits` of dynamic range.
///
/// The lower bound of -1 marks masked pixels as untrusted.
pub fn trusted_range_for_bits(bits: u32) -> (f64, f64) {
    (-1.0, 2f64.powi(bits as i32) - 1.0)
}

/// Beam centre (mm) at the middle of the panel: half of pixel size times image size, per axis.
pub fn beam_centre_for(pixel_size: (f64, f64), image_size: (usize, usize)) -> (f64, f64) {
    (
        pixel_size.0 * image_size.0 as f64 / 2.0,
        pixel_size.1 * image_size.1 as f64 / 2.0,
    )
}

/// One flat detector panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Sensor technology.
    pub kind: DetectorKind,
    /// Sample to panel distance along the beam (mm).
    pub distance: f64,
    /// Beam centre in panel millimetre coordinates (fast, slow).
    pub beam_centre: (f64, f64),
    /// Fast axis name.
    pub fast_axis: AxisDirection,
    /// Slow axis name.
    pub slow_axis: AxisDirection,
    /// Pixel size (fast, slow) in mm.
    pub pixel_size: (f64, f64),
    /// Image size (fast, slow) in pixels.
    pub image_size: (usize, usize),
    /// Inclusive trusted intensity range.
    pub trusted_range: (f64, f64),
}

impl Panel {
    /// Laboratory position of the first pixel corner.
    pub fn origin(&self) -> Vec3 {
        let fast = self.fast_axis.vector();
        let slow = self.slow_axis.vector();
        let along_beam = scale([0.0, 0.0, -1.0], self.distance);
        add(
            add(scale(fast, -self.beam_centre.0), scale(slow, -self.beam_centre.1)),
            along_beam,
        )
    }

    /// Panel normal (fast x slow).
    pub fn normal(&self) -> Vec3 {
        cross(self.fast_axis.vector(), self.slow_axis.vector())
    }

    /// Whether `value` lies inside the trusted range.
    pub fn is_trusted(&self, value: f64) -> bool {
        value >= self.trusted_range.0 && value <= self.trusted_range.1
    }
}

/// A detector built from one or more panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub panels: Vec<Panel>,
}

impl Detector {
    /// Single-panel detector from literal geometry.
    ///
    /// Axis names are parsed with [`AxisDirection::from_str`]; fast and slow
    /// must not be parallel.
    #[allow(clippy::too_many_arguments)]
    pub fn simple(
        kind: DetectorKind,
        distance: f64,
        beam_centre: (f64, f64),
        fast_axis: &str,
        slow_axis: &str,
        pixel_size: (f64, f64),
        image_size: (usize, usize),
        trusted_range: (f64, f64),
    ) -> Result<Self> {
        let fast_axis: AxisDirection = fast_axis.parse()?;
        let slow_axis: AxisDirection = slow_axis.parse()?;
        if cross(fast_axis.vector(), slow_axis.vector()) == [0.0, 0.0, 0.0] {
            return Err(Error::InvalidParameter(format!(
                "fast axis {} and slow axis {} are parallel",
                fast_axis, slow_axis
            )));
        }

        Ok(Self {
            panels: vec![Panel {
                kind,
                distance,
                beam_centre,
                fast_axis,
                slow_axis,
                pixel_size,
                image_size,
                trusted_range,
            }],
        })
    }

    /// The first panel. Every detector built by [`Detector::simple`] has one.
    pub fn panel(&self) -> Option<&Panel> {
        self.panels.first()
    }
}
