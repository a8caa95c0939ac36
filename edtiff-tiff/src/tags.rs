//! TIFF tag definitions

/// Tag ids read from every page
pub mod tag {
    // Structure
    pub const NEW_SUBFILE_TYPE: u16 = 254;
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const SAMPLE_FORMAT: u16 = 339;

    // Strips
    pub const STRIP_OFFSETS: u16 = 273;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;

    // Metadata
    pub const IMAGE_DESCRIPTION: u16 = 270;
    pub const MAKE: u16 = 271;
    pub const MODEL: u16 = 272;
    pub const SOFTWARE: u16 = 305;
    pub const DATE_TIME: u16 = 306;
    pub const ARTIST: u16 = 315;
    pub const COPYRIGHT: u16 = 33432;

    // Vendor private
    pub const OLYMPUS_SIS: u16 = 33560;
}

/// NewSubfileType flag bits
pub mod subfile {
    /// Reduced-resolution version of another image in the file
    pub const REDUCED_RESOLUTION: u32 = 1;
}

/// Tags read into each [`Page`](crate::Page) when a container is opened.
pub const INTROSPECTED: &[u16] = &[
    tag::NEW_SUBFILE_TYPE,
    tag::BITS_PER_SAMPLE,
    tag::COMPRESSION,
    tag::PHOTOMETRIC_INTERPRETATION,
    tag::IMAGE_DESCRIPTION,
    tag::MAKE,
    tag::MODEL,
    tag::SAMPLES_PER_PIXEL,
    tag::SOFTWARE,
    tag::DATE_TIME,
    tag::ARTIST,
    tag::SAMPLE_FORMAT,
    tag::COPYRIGHT,
    tag::OLYMPUS_SIS,
];

/// Get tag name
pub fn tag_name(tag_id: u16) -> &'static str {
    match tag_id {
        tag::NEW_SUBFILE_TYPE => "NewSubfileType",
        tag::IMAGE_WIDTH => "ImageWidth",
        tag::IMAGE_LENGTH => "ImageLength",
        tag::BITS_PER_SAMPLE => "BitsPerSample",
        tag::COMPRESSION => "Compression",
        tag::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tag::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tag::SAMPLE_FORMAT => "SampleFormat",
        tag::STRIP_OFFSETS => "StripOffsets",
        tag::ROWS_PER_STRIP => "RowsPerStrip",
        tag::STRIP_BYTE_COUNTS => "StripByteCounts",
        tag::IMAGE_DESCRIPTION => "ImageDescription",
        tag::MAKE => "Make",
        tag::MODEL => "Model",
        tag::SOFTWARE => "Software",
        tag::DATE_TIME => "DateTime",
        tag::ARTIST => "Artist",
        tag::COPYRIGHT => "Copyright",
        tag::OLYMPUS_SIS => "OlympusSIS",
        _ => "Unknown",
    }
}
