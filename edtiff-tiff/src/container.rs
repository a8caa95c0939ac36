//! TIFF container introspection
//!
//! [`TiffContainer::open`] reads the metadata of every page and releases the
//! file before returning, on success and on every error path. Pixel data is
//! not touched; see [`crate::decode`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TiffError};
use crate::tags::{subfile, tag};
use crate::value::TagValue;

/// Interpretation of each sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    Unsigned,
    Signed,
    Float,
    Other(u16),
}

impl SampleFormat {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => SampleFormat::Unsigned,
            2 => SampleFormat::Signed,
            3 => SampleFormat::Float,
            other => SampleFormat::Other(other),
        }
    }
}

/// Storage layout of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleLayout {
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub format: SampleFormat,
}

impl Default for SampleLayout {
    fn default() -> Self {
        SampleLayout {
            bits_per_sample: 1,
            samples_per_pixel: 1,
            format: SampleFormat::Unsigned,
        }
    }
}

/// One image plane of a container
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    shape: (u32, u32),
    layout: SampleLayout,
    subfile_type: u32,
    tags: BTreeMap<u16, TagValue>,
}

impl Page {
    /// Build a page from its dimensions and tag values. Layout and subfile
    /// type are taken from the tags, with TIFF defaults when absent.
    pub fn new(index: usize, width: u32, height: u32, tags: BTreeMap<u16, TagValue>) -> Self {
        let first = |id: u16, default: u64| {
            tags.get(&id)
                .and_then(TagValue::as_u64)
                .unwrap_or(default)
        };

        let layout = SampleLayout {
            bits_per_sample: first(tag::BITS_PER_SAMPLE, 1) as u16,
            samples_per_pixel: first(tag::SAMPLES_PER_PIXEL, 1) as u16,
            format: SampleFormat::from_u16(first(tag::SAMPLE_FORMAT, 1) as u16),
        };
        let subfile_type = first(tag::NEW_SUBFILE_TYPE, 0) as u32;

        Page {
            index,
            shape: (height, width),
            layout,
            subfile_type,
            tags,
        }
    }

    /// (height, width) in pixels
    pub fn shape(&self) -> (u32, u32) {
        self.shape
    }

    pub fn layout(&self) -> SampleLayout {
        self.layout
    }

    /// Reduced-resolution copy of another page
    pub fn is_reduced(&self) -> bool {
        self.subfile_type & subfile::REDUCED_RESOLUTION != 0
    }

    /// Get tag value by id
    pub fn tag(&self, id: u16) -> Option<&TagValue> {
        self.tags.get(&id)
    }

    /// ImageDescription text, if present and ASCII
    pub fn description(&self) -> Option<&str> {
        self.tag(tag::IMAGE_DESCRIPTION).and_then(TagValue::as_str)
    }
}

/// Consecutive pages forming one logical image or stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// Indices into [`TiffContainer::pages`]
    pub pages: Vec<usize>,
    /// (height, width) shared by every page
    pub shape: (u32, u32),
    pub layout: SampleLayout,
}

impl Series {
    /// Number of pages in the series
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Metadata snapshot of a TIFF file
#[derive(Debug, Clone)]
pub struct TiffContainer {
    path: PathBuf,
    pages: Vec<Page>,
    series: Vec<Series>,
}

impl TiffContainer {
    /// Open `path` and read the metadata of every page.
    ///
    /// The file handle lives only for the duration of this call.
    #[cfg(feature = "codec")]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pages = reader::read_pages(path)?;
        tracing::trace!(path = %path.display(), pages = pages.len(), "container closed");
        Ok(Self::from_pages(path, pages))
    }

    /// Always fails: the crate was built without the `codec` feature.
    #[cfg(not(feature = "codec"))]
    pub fn open(_path: impl AsRef<Path>) -> Result<Self> {
        Err(TiffError::CodecUnavailable)
    }

    /// Assemble a container from already-read pages.
    pub fn from_pages(path: impl Into<PathBuf>, pages: Vec<Page>) -> Self {
        let series = group_series(&pages);
        TiffContainer {
            path: path.into(),
            pages,
            series,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// First page, the one every detector profile inspects
    pub fn first_page(&self) -> Result<&Page> {
        self.pages.first().ok_or(TiffError::NoPages)
    }

    /// Exactly one page forming exactly one series
    pub fn is_single_image(&self) -> bool {
        self.pages.len() == 1 && self.series.len() == 1
    }
}

/// Group pages into series.
///
/// A new series starts whenever shape or layout changes between consecutive
/// full-resolution pages. Reduced-resolution pages are pyramid levels of the
/// preceding image and only form series when the file holds nothing else.
fn group_series(pages: &[Page]) -> Vec<Series> {
    let full: Vec<&Page> = pages.iter().filter(|p| !p.is_reduced()).collect();
    let candidates = if full.is_empty() {
        pages.iter().collect()
    } else {
        full
    };

    let mut series: Vec<Series> = Vec::new();
    for page in candidates {
        match series.last_mut() {
            Some(current) if current.shape == page.shape && current.layout == page.layout => {
                current.pages.push(page.index);
            }
            _ => series.push(Series {
                pages: vec![page.index],
                shape: page.shape,
                layout: page.layout,
            }),
        }
    }
    series
}

#[cfg(feature = "codec")]
mod reader {
    use std::fs::File;
    use std::io::{BufReader, Read, Seek, SeekFrom};
    use std::path::Path;

    use tiff::decoder::Decoder;
    use tiff::tags::Tag;
    use tracing::debug;

    use super::Page;
    use crate::error::{Result, TiffError};
    use crate::sis::read_sis;
    use crate::tags::{tag, tag_name, INTROSPECTED};
    use crate::value::TagValue;

    pub(super) fn read_pages(path: &Path) -> Result<Vec<Page>> {
        let mut reader = BufReader::new(File::open(path)?);

        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;
        if !crate::probe(&header) {
            return Err(TiffError::Malformed(format!(
                "no TIFF signature in {}",
                path.display()
            )));
        }
        reader.seek(SeekFrom::Start(0))?;

        let mut decoder = Decoder::new(reader)?;
        // Opened on demand for vendor blocks outside the IFD
        let mut raw: Option<BufReader<File>> = None;

        let mut pages = Vec::new();
        loop {
            let (width, height) = decoder.dimensions()?;
            let mut tags = std::collections::BTreeMap::new();

            for &id in INTROSPECTED {
                match decoder.find_tag(Tag::from_u16_exhaustive(id)) {
                    Ok(Some(value)) => {
                        if let Some(value) = TagValue::from_tiff(value) {
                            tags.insert(id, value);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => debug!(
                        page = pages.len(),
                        tag = tag_name(id),
                        error = %e,
                        "skipping unreadable tag"
                    ),
                }
            }

            let sis_offset = match tags.get(&tag::OLYMPUS_SIS) {
                Some(TagValue::Unsigned(offsets)) => offsets.first().copied(),
                _ => None,
            };
            if let Some(offset) = sis_offset {
                let file = match raw.take() {
                    Some(file) => file,
                    None => BufReader::new(File::open(path)?),
                };
                match read_sis(raw.insert(file), offset) {
                    Ok(fields) => {
                        tags.insert(tag::OLYMPUS_SIS, TagValue::Map(fields));
                    }
                    Err(e) => debug!(page = pages.len(), error = %e, "unparseable Olympus SIS block"),
                }
            }

            pages.push(Page::new(pages.len(), width, height, tags));

            if !decoder.more_images() {
                break;
            }
            decoder.next_image()?;
        }

        Ok(pages)
    }
}
