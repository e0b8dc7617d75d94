//! Palette records and the canonical colour type.

use byteorder::{ByteOrder, LittleEndian};
use derive_more::derive::{Constructor, Deref};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    format::PaletteFormat,
    types::{EntryHeader, ENTRY_HEADER_LEN},
};

/// Most entries a palette can hold
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// One canonical 8-bit per channel colour
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha, 255 is opaque
    pub a: u8,
}

impl Rgba {
    /// A colour from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// Fully transparent black
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// An opaque colour
    pub const fn opaque(r: u8, g: u8, b: u8) -> Rgba {
        Rgba::new(r, g, b, 255)
    }

    /// The colour as `[r, g, b, a]`
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A decoded palette of at most 256 colours
///
/// Dereferences to the slice of its colours.
#[derive(Debug, Clone, PartialEq, Eq, Constructor, Deref)]
pub struct Palette {
    #[deref]
    colors: Vec<Rgba>,
    format: PaletteFormat,
}

impl Palette {
    /// The record format the palette was decoded from
    pub fn format(&self) -> PaletteFormat {
        self.format
    }

    /// Whether the palette carries per entry alpha
    pub fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    /// The decoded colours
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

fn decode_entry(format: PaletteFormat, entry: &[u8]) -> Rgba {
    match format {
        PaletteFormat::Rgb24 => Rgba::opaque(entry[2], entry[1], entry[0]),
        PaletteFormat::Dos24 => Rgba::opaque(entry[2] << 2, entry[1] << 2, entry[0] << 2),
        PaletteFormat::Argb1555 => {
            let v = LittleEndian::read_u16(entry);
            Rgba::new(
                (((v >> 10) & 0x1F) << 3) as u8,
                (((v >> 5) & 0x1F) << 3) as u8,
                ((v & 0x1F) << 3) as u8,
                if v & 0x8000 != 0 { 255 } else { 0 },
            )
        }
        PaletteFormat::Rgb565 => {
            let v = LittleEndian::read_u16(entry);
            Rgba::opaque(
                (((v >> 11) & 0x1F) << 3) as u8,
                (((v >> 5) & 0x3F) << 2) as u8,
                ((v & 0x1F) << 3) as u8,
            )
        }
        PaletteFormat::Argb32 => Rgba::new(entry[2], entry[1], entry[0], entry[3]),
    }
}

/// Decodes the palette record whose header starts at `offset` in `body`.
///
/// The number of entries is the record's width, capped at 256.
#[instrument(skip(body), err)]
pub fn decode_palette(body: &[u8], offset: usize) -> Result<Palette> {
    let header = EntryHeader::read_at(body, offset)?;
    let format = PaletteFormat::try_from(header.format_code())?;

    let mut count = header.width as usize;
    if count > MAX_PALETTE_ENTRIES {
        debug!(count, "palette declares too many entries, keeping the first 256");
        count = MAX_PALETTE_ENTRIES;
    }

    let start = offset + ENTRY_HEADER_LEN;
    let needed = count * format.entry_len();
    let data = body.get(start..start + needed).ok_or(Error::TruncatedData {
        needed,
        available: body.len() - start,
    })?;

    let colors = data
        .chunks_exact(format.entry_len())
        .map(|entry| decode_entry(format, entry))
        .collect();

    Ok(Palette::new(colors, format))
}
