//! Synthetic TIFF writer
//!
//! Writes small uncompressed little-endian TIFF files with 16-bit grayscale
//! pages. Used to build detector-shaped test images without shipping binary
//! fixtures.

use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::sis::{GENERAL_DATA_LEN, HEADER_LEN, SIS_MAGIC, SUBTAG_GENERAL};
use crate::tags::{subfile, tag};
use crate::{TIFF_MAGIC_LE, TIFF_VERSION};

const SHORT: u16 = 3;
const LONG: u16 = 4;
const ASCII: u16 = 2;

/// One 16-bit grayscale page.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u16>,
    pub description: Option<String>,
    pub olympus_camera: Option<String>,
    pub subfile_type: u32,
}

impl FixturePage {
    /// Page filled with a repeating ramp of values 0..4096.
    pub fn gray16(width: u32, height: u32) -> Self {
        let pixels = (0..width as usize * height as usize)
            .map(|i| (i % 4096) as u16)
            .collect();
        FixturePage {
            width,
            height,
            pixels,
            description: None,
            olympus_camera: None,
            subfile_type: 0,
        }
    }

    /// Replace the pixel values. Length must be width * height.
    pub fn with_pixels(mut self, pixels: Vec<u16>) -> Self {
        self.pixels = pixels;
        self
    }

    /// Add an ImageDescription tag
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Add an Olympus SIS block with the given camera name
    pub fn olympus_camera(mut self, camera: &str) -> Self {
        self.olympus_camera = Some(camera.to_string());
        self
    }

    /// Mark as a reduced-resolution page
    pub fn reduced(mut self) -> Self {
        self.subfile_type |= subfile::REDUCED_RESOLUTION;
        self
    }
}

/// Builder for a multi-page fixture file.
#[derive(Debug, Clone, Default)]
pub struct TiffWriter {
    pages: Vec<FixturePage>,
}

impl TiffWriter {
    pub fn new() -> Self {
        TiffWriter::default()
    }

    /// Append a page
    pub fn page(mut self, page: FixturePage) -> Self {
        self.pages.push(page);
        self
    }

    /// Encode all pages to TIFF bytes
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::new());
        output.write_all(&TIFF_MAGIC_LE)?;
        output.write_u16::<LittleEndian>(TIFF_VERSION)?;

        // Pointer to patch with the next IFD offset
        let mut link_pos = output.stream_position()?;
        output.write_u32::<LittleEndian>(0)?;

        for page in &self.pages {
            let ifd_offset = write_page(&mut output, page)?;
            let end = output.stream_position()?;
            output.seek(SeekFrom::Start(link_pos))?;
            output.write_u32::<LittleEndian>(ifd_offset)?;
            output.seek(SeekFrom::Start(end))?;
            // next-IFD field is the last 4 bytes of the IFD just written
            link_pos = end - 4;
        }

        Ok(output.into_inner())
    }

    /// Write the file to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.to_bytes()?)
    }
}

struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    value: u32,
}

fn write_page(output: &mut Cursor<Vec<u8>>, page: &FixturePage) -> io::Result<u32> {
    pad_to_word(output)?;
    let strip_offset = output.stream_position()? as u32;
    for &px in &page.pixels {
        output.write_u16::<LittleEndian>(px)?;
    }
    let strip_len = (page.pixels.len() * 2) as u32;

    let description = match &page.description {
        Some(text) => {
            pad_to_word(output)?;
            let offset = output.stream_position()? as u32;
            output.write_all(text.as_bytes())?;
            output.write_u8(0)?;
            Some((offset, text.len() as u32 + 1))
        }
        None => None,
    };

    let sis = match &page.olympus_camera {
        Some(camera) => {
            pad_to_word(output)?;
            let offset = output.stream_position()? as u32;
            output.write_all(&sis_block(offset, camera))?;
            Some(offset)
        }
        None => None,
    };

    let mut entries = vec![
        Entry { tag: tag::NEW_SUBFILE_TYPE, kind: LONG, count: 1, value: page.subfile_type },
        Entry { tag: tag::IMAGE_WIDTH, kind: LONG, count: 1, value: page.width },
        Entry { tag: tag::IMAGE_LENGTH, kind: LONG, count: 1, value: page.height },
        Entry { tag: tag::BITS_PER_SAMPLE, kind: SHORT, count: 1, value: 16 },
        Entry { tag: tag::COMPRESSION, kind: SHORT, count: 1, value: 1 },
        Entry { tag: tag::PHOTOMETRIC_INTERPRETATION, kind: SHORT, count: 1, value: 1 },
    ];
    if let Some((offset, len)) = description {
        entries.push(Entry { tag: tag::IMAGE_DESCRIPTION, kind: ASCII, count: len, value: offset });
    }
    entries.extend([
        Entry { tag: tag::STRIP_OFFSETS, kind: LONG, count: 1, value: strip_offset },
        Entry { tag: tag::SAMPLES_PER_PIXEL, kind: SHORT, count: 1, value: 1 },
        Entry { tag: tag::ROWS_PER_STRIP, kind: LONG, count: 1, value: page.height },
        Entry { tag: tag::STRIP_BYTE_COUNTS, kind: LONG, count: 1, value: strip_len },
    ]);
    if let Some(offset) = sis {
        entries.push(Entry { tag: tag::OLYMPUS_SIS, kind: LONG, count: 1, value: offset });
    }

    pad_to_word(output)?;
    let ifd_offset = output.stream_position()? as u32;
    output.write_u16::<LittleEndian>(entries.len() as u16)?;
    for entry in &entries {
        output.write_u16::<LittleEndian>(entry.tag)?;
        output.write_u16::<LittleEndian>(entry.kind)?;
        output.write_u32::<LittleEndian>(entry.count)?;
        if entry.kind == SHORT {
            // SHORT values are left-justified in the 4-byte field
            output.write_u16::<LittleEndian>(entry.value as u16)?;
            output.write_u16::<LittleEndian>(0)?;
        } else {
            output.write_u32::<LittleEndian>(entry.value)?;
        }
    }
    output.write_u32::<LittleEndian>(0)?;

    Ok(ifd_offset)
}

fn pad_to_word(output: &mut Cursor<Vec<u8>>) -> io::Result<()> {
    if output.stream_position()? % 2 != 0 {
        output.write_u8(0)?;
    }
    Ok(())
}

fn write_text(out: &mut Vec<u8>, text: &str, len: usize) {
    let bytes = text.as_bytes();
    let n = bytes.len().min(len - 1);
    out.extend_from_slice(&bytes[..n]);
    out.resize(out.len() + len - n, 0);
}

/// Olympus SIS block placed at absolute file offset `offset`, holding one
/// general data sub-block (26 um pixels, picture type "Diffraction").
pub fn sis_block(offset: u32, camera: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 8 + GENERAL_DATA_LEN);
    out.extend_from_slice(&SIS_MAGIC);
    out.extend_from_slice(&[0; 6]);
    // minute, hour, day, month (0-based), year - 1900
    for v in [26i16, 9, 14, 2, 119] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&[0; 6]);
    write_text(&mut out, "edtiff", 32);
    out.extend_from_slice(&1i16.to_le_bytes());

    let general_offset = offset + (HEADER_LEN + 8) as u32;
    out.extend_from_slice(&SUBTAG_GENERAL.to_le_bytes());
    out.extend_from_slice(&1i16.to_le_bytes());
    out.extend_from_slice(&general_offset.to_le_bytes());

    out.extend_from_slice(&[0; 10]);
    out.extend_from_slice(&(-6i16).to_le_bytes());
    out.extend_from_slice(&26.0f64.to_le_bytes());
    out.extend_from_slice(&26.0f64.to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&1.0f64.to_le_bytes());
    out.extend_from_slice(&[0; 2]);
    write_text(&mut out, camera, 34);
    write_text(&mut out, "Diffraction", 32);
    out
}
