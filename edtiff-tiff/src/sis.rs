//! Olympus SIS metadata (private tag 33560)
//!
//! The tag holds the absolute file offset of a little-endian `SIS0` block:
//!
//! ```text
//! 0   magic "SIS0"          4
//! 4   reserved              6
//! 10  minute, hour, day     3 x i16
//! 16  month (0-based)       i16
//! 18  year (since 1900)     i16
//! 20  reserved              6
//! 26  name                  32, NUL padded
//! 58  sub-tag count         i16
//! 60  sub-tags              count x (type i16, count i16, offset u32)
//! ```
//!
//! Only sub-tag type 1 (general data) is understood. Its offsets are
//! absolute file offsets as well.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Result, TiffError};
use crate::value::TagValue;

/// SIS block magic
pub const SIS_MAGIC: [u8; 4] = *b"SIS0";

/// Size of the SIS header including the sub-tag count
pub const HEADER_LEN: usize = 60;

/// Size of the general data sub-block
pub const GENERAL_DATA_LEN: usize = 112;

/// Sub-tag type holding calibration and camera names
pub const SUBTAG_GENERAL: i16 = 1;

/// Read the SIS block at `offset` into named fields.
///
/// Produces `name`, `datetime` (when valid), and from the general data block
/// `pixelsizex`, `pixelsizey`, `magnification`, `cameraname`, `picturetype`.
pub fn read_sis<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<BTreeMap<String, TagValue>> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != SIS_MAGIC {
        return Err(TiffError::InvalidSis(format!(
            "bad magic {:02x?} at offset {}",
            magic, offset
        )));
    }

    skip(reader, 6)?;
    let minute = reader.read_i16::<LittleEndian>()?;
    let hour = reader.read_i16::<LittleEndian>()?;
    let day = reader.read_i16::<LittleEndian>()?;
    let month = reader.read_i16::<LittleEndian>()?;
    let year = reader.read_i16::<LittleEndian>()?;
    skip(reader, 6)?;
    let name = read_text(reader, 32)?;
    let subtag_count = reader.read_i16::<LittleEndian>()?.max(0) as usize;

    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), TagValue::Ascii(name));
    if let Some(datetime) = format_datetime(year, month, day, hour, minute) {
        fields.insert("datetime".to_string(), TagValue::Ascii(datetime));
    }

    let mut subtags = Vec::with_capacity(subtag_count);
    for _ in 0..subtag_count {
        let kind = reader.read_i16::<LittleEndian>()?;
        let _count = reader.read_i16::<LittleEndian>()?;
        let data_offset = reader.read_u32::<LittleEndian>()?;
        subtags.push((kind, data_offset));
    }

    for (kind, data_offset) in subtags {
        if kind == SUBTAG_GENERAL {
            reader.seek(SeekFrom::Start(data_offset as u64))?;
            read_general(reader, &mut fields)?;
        }
    }

    Ok(fields)
}

fn read_general<R: Read>(reader: &mut R, fields: &mut BTreeMap<String, TagValue>) -> Result<()> {
    skip(reader, 10)?;
    let length_exponent = reader.read_i16::<LittleEndian>()?;
    let x_calibration = reader.read_f64::<LittleEndian>()?;
    let y_calibration = reader.read_f64::<LittleEndian>()?;
    skip(reader, 8)?;
    let magnification = reader.read_f64::<LittleEndian>()?;
    skip(reader, 2)?;
    let camera_name = read_text(reader, 34)?;
    let picture_type = read_text(reader, 32)?;

    let scale = 10f64.powi(length_exponent as i32);
    fields.insert(
        "pixelsizex".to_string(),
        TagValue::Float(vec![x_calibration * scale]),
    );
    fields.insert(
        "pixelsizey".to_string(),
        TagValue::Float(vec![y_calibration * scale]),
    );
    fields.insert(
        "magnification".to_string(),
        TagValue::Float(vec![magnification]),
    );
    fields.insert("cameraname".to_string(), TagValue::Ascii(camera_name));
    fields.insert("picturetype".to_string(), TagValue::Ascii(picture_type));
    Ok(())
}

fn skip<R: Read>(reader: &mut R, len: usize) -> Result<()> {
    let mut buf = [0u8; 16];
    reader.read_exact(&mut buf[..len])?;
    Ok(())
}

/// Read a fixed-width, NUL padded text field.
fn read_text<R: Read>(reader: &mut R, len: usize) -> Result<String> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&buf[..end]).trim().to_string())
}

fn format_datetime(year: i16, month: i16, day: i16, hour: i16, minute: i16) -> Option<String> {
    // Stored 0-based; widen before shifting so i16::MAX cannot overflow.
    let month = i32::from(month) + 1;
    let valid = (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && (0..24).contains(&hour)
        && (0..60).contains(&minute);
    valid.then(|| {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}",
            1900 + year as i32,
            month,
            day,
            hour,
            minute
        )
    })
}
