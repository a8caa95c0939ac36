//! Pixel decoding

use std::path::Path;

use ndarray::Array2;

use crate::error::{Result, TiffError};

/// Decoded samples in their native type
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::U32(v) => v.len(),
            Samples::U64(v) => v.len(),
            Samples::I8(v) => v.len(),
            Samples::I16(v) => v.len(),
            Samples::I32(v) => v.len(),
            Samples::I64(v) => v.len(),
            Samples::F32(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native type name, e.g. `"u16"`
    pub fn type_name(&self) -> &'static str {
        match self {
            Samples::U8(_) => "u8",
            Samples::U16(_) => "u16",
            Samples::U32(_) => "u32",
            Samples::U64(_) => "u64",
            Samples::I8(_) => "i8",
            Samples::I16(_) => "i16",
            Samples::I32(_) => "i32",
            Samples::I64(_) => "i64",
            Samples::F32(_) => "f32",
            Samples::F64(_) => "f64",
        }
    }

    /// Widen every sample to `f64`. 64-bit integers beyond 2^53 lose precision.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Samples::U8(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::U16(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::U32(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::U64(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::I8(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::I16(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::I32(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::I64(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::F32(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::F64(v) => v.clone(),
        }
    }
}

/// A decoded image plane, rows of `width` interleaved samples
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub width: usize,
    pub height: usize,
    pub samples: Samples,
}

impl RawImage {
    /// Build an image, checking that the sample count is a whole number of pixels.
    pub fn new(width: usize, height: usize, samples: Samples) -> Result<Self> {
        let pixels = width * height;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(TiffError::SampleCountMismatch {
                width,
                height,
                available: samples.len(),
            });
        }
        Ok(RawImage {
            width,
            height,
            samples,
        })
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.samples.len() / (self.width * self.height)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Widen to a `height x width` array of `f64`.
    ///
    /// Multi-sample images have no 2-D representation and are rejected.
    pub fn to_f64_array(&self) -> Result<Array2<f64>> {
        let samples_per_pixel = self.samples_per_pixel();
        if samples_per_pixel != 1 {
            return Err(TiffError::UnsupportedSampleLayout { samples_per_pixel });
        }
        Array2::from_shape_vec((self.height, self.width), self.samples.to_f64()).map_err(|_| {
            TiffError::SampleCountMismatch {
                width: self.width,
                height: self.height,
                available: self.samples.len(),
            }
        })
    }
}

/// Decode the first image of the file at `path`.
#[cfg(feature = "codec")]
pub fn decode(path: impl AsRef<Path>) -> Result<RawImage> {
    use std::fs::File;
    use std::io::BufReader;
    use tiff::decoder::{Decoder, DecodingResult};

    let path = path.as_ref();
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let (width, height) = decoder.dimensions()?;

    let image = decoder
        .read_image()
        .map_err(|e| TiffError::DecodingError(format!("{}: {}", path.display(), e)))?;

    let samples = match image {
        DecodingResult::U8(v) => Samples::U8(v),
        DecodingResult::U16(v) => Samples::U16(v),
        DecodingResult::U32(v) => Samples::U32(v),
        DecodingResult::U64(v) => Samples::U64(v),
        DecodingResult::I8(v) => Samples::I8(v),
        DecodingResult::I16(v) => Samples::I16(v),
        DecodingResult::I32(v) => Samples::I32(v),
        DecodingResult::I64(v) => Samples::I64(v),
        DecodingResult::F32(v) => Samples::F32(v),
        DecodingResult::F64(v) => Samples::F64(v),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(TiffError::DecodingError(format!(
                "{}: unsupported sample type",
                path.display()
            )))
        }
    };

    tracing::debug!(
        path = %path.display(),
        width,
        height,
        sample_type = samples.type_name(),
        "decoded image"
    );
    RawImage::new(width as usize, height as usize, samples)
}

/// Always fails: the crate was built without the `codec` feature.
#[cfg(not(feature = "codec"))]
pub fn decode(_path: impl AsRef<Path>) -> Result<RawImage> {
    Err(TiffError::CodecUnavailable)
}
