//! Loading of the font requested on the command line.
//!
//! A custom face must be a readable TrueType/OpenType file that parses as
//! a font; it is then rasterized by the canvas at the requested size.
//! Without one, the canvas falls back to the bundled monospace faces,
//! which only exist up to [`BUNDLED_FONT_SIZE_MAX`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;

use crate::config::{BUNDLED_FONT_SIZE_MAX, FONT_SIZE_MAX, FONT_SIZE_MIN};
use crate::error::ConfigError;

/// Container format detected from the first four bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    TrueType,
    OpenType,
    Collection,
}

impl FontFormat {
    fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match &magic {
            [0x00, 0x01, 0x00, 0x00] | b"true" => Some(Self::TrueType),
            b"OTTO" => Some(Self::OpenType),
            b"ttcf" => Some(Self::Collection),
            _ => None,
        }
    }
}

/// A parsed font file. Collections use their first face.
#[derive(Clone, Debug)]
pub struct FontFace {
    pub path: PathBuf,
    pub format: FontFormat,
    pub font: FontArc,
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.format == other.format
    }
}

impl Eq for FontFace {}

/// Read `path` and parse it as a font.
pub fn load_face(path: &Path) -> Result<FontFace, ConfigError> {
    let unreadable = |source| ConfigError::FontUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let unopenable = |reason| ConfigError::FontUnopenable {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    if file.metadata().map_err(unreadable)?.is_dir() {
        return Err(unopenable("is a directory"));
    }
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(unreadable)?;

    let magic: [u8; 4] = bytes
        .get(..4)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| unopenable("file too short"))?;
    let format = FontFormat::from_magic(magic)
        .ok_or_else(|| unopenable("not a TrueType or OpenType font"))?;
    let font = FontArc::try_from_vec(bytes).map_err(|_| unopenable("malformed font tables"))?;

    tracing::debug!(path = %path.display(), ?format, "font loaded");
    Ok(FontFace {
        path: path.to_path_buf(),
        format,
        font,
    })
}

/// Check the requested size against what the chosen face can draw.
///
/// Outline faces scale to any size in range; the bundled faces stop at
/// [`BUNDLED_FONT_SIZE_MAX`].
pub fn validate_size(size: u32, face: Option<&FontFace>) -> Result<u32, ConfigError> {
    let max = match face {
        Some(_) => FONT_SIZE_MAX,
        None => BUNDLED_FONT_SIZE_MAX,
    };
    if (FONT_SIZE_MIN..=max).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::InvalidFontSize {
            size,
            min: FONT_SIZE_MIN,
            max,
        })
    }
}

/// Smallest TrueType file `ab_glyph` accepts: no cmap, so every char
/// maps to glyph 0, a filled box.
///
/// Metrics in font units: 1024 per em, ascender 768, descender -256,
/// advance 640, box from (64, 0) to (576, 640).
#[cfg(test)]
pub(crate) fn box_font_bytes() -> Vec<u8> {
    fn words(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    let mut glyf = words(&[1, 64, 0, 576, 640]); // contours, bbox
    glyf.extend(words(&[3, 0])); // last point, no instructions
    glyf.extend([0x01; 4]); // on-curve, 16-bit deltas
    glyf.extend(words(&[64, 0, 512, 0]));
    glyf.extend(words(&[0, 640, 0, -640]));
    glyf.extend([0, 0]);

    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1024u16.to_be_bytes());
    head[36..44].copy_from_slice(&words(&[64, 0, 576, 640]));

    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[4..8].copy_from_slice(&words(&[768, -256]));
    hhea[34..36].copy_from_slice(&1u16.to_be_bytes());

    let hmtx = words(&[640, 64]);
    let loca = words(&[0, glyf.len() as i16 / 2]);
    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend(1u16.to_be_bytes());

    // Records must be sorted by tag.
    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"glyf", glyf),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
    ];

    let mut out = 0x0001_0000u32.to_be_bytes().to_vec();
    out.extend(words(&[6, 64, 2, 32]));
    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        out.extend([0; 4]); // checksum is not verified
        out.extend((offset as u32).to_be_bytes());
        out.extend((data.len() as u32).to_be_bytes());
        offset += data.len().next_multiple_of(4);
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    out
}
