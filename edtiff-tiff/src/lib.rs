//! TIFF container access for diffraction images
//!
//! This crate exposes the small slice of a TIFF file that detector profiles
//! need to recognise an image: the page list, page shapes, sample layout and
//! a handful of tag values. Decoding of the TIFF structure and pixel data is
//! delegated to the [`tiff`](https://docs.rs/tiff) crate, enabled by the
//! default `codec` feature.
//!
//! # Features
//!
//! - Page and series introspection
//! - Tag values as strings, numbers, raw bytes or nested maps
//! - Olympus SIS (tag 33560) metadata parsing
//! - Single-plane pixel decoding widened to `f64`
//!
//! # Example
//!
//! ```no_run
//! use edtiff_tiff::{tags::tag, TiffContainer};
//!
//! let container = TiffContainer::open("frame_0001.tif")?;
//! let page = &container.pages()[0];
//! println!("{:?} {:?}", page.shape(), page.tag(tag::IMAGE_DESCRIPTION));
//! # Ok::<(), edtiff_tiff::TiffError>(())
//! ```

pub mod container;
pub mod decode;
pub mod error;
#[cfg(any(test, feature = "fixture"))]
pub mod fixture;
pub mod sis;
pub mod tags;
pub mod value;

pub use container::{Page, SampleFormat, SampleLayout, Series, TiffContainer};
pub use decode::{decode, RawImage, Samples};
pub use error::{Result, TiffError};
pub use value::TagValue;

/// TIFF magic number - little endian "II"
pub const TIFF_MAGIC_LE: [u8; 2] = [0x49, 0x49];

/// TIFF magic number - big endian "MM"
pub const TIFF_MAGIC_BE: [u8; 2] = [0x4D, 0x4D];

/// TIFF version (42)
pub const TIFF_VERSION: u16 = 42;

/// BigTIFF version (43)
pub const BIGTIFF_VERSION: u16 = 43;

/// Check whether `header` starts with a classic or BigTIFF signature.
pub fn probe(header: &[u8]) -> bool {
    if header.len() < 4 {
        return false;
    }

    let version = match [header[0], header[1]] {
        TIFF_MAGIC_LE => u16::from_le_bytes([header[2], header[3]]),
        TIFF_MAGIC_BE => u16::from_be_bytes([header[2], header[3]]),
        _ => return false,
    };

    version == TIFF_VERSION || version == BIGTIFF_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_numbers() {
        assert_eq!(TIFF_MAGIC_LE, [b'I', b'I']);
        assert_eq!(TIFF_MAGIC_BE, [b'M', b'M']);
    }

    #[test]
    fn test_probe() {
        assert!(probe(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]));
        assert!(probe(&[0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]));
        assert!(probe(&[0x49, 0x49, 0x2B, 0x00]));
        assert!(!probe(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!probe(&[0x49, 0x49]));
        assert!(!probe(&[0x49, 0x49, 0x2A, 0x01]));
    }
}
