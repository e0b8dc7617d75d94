//! Pixel and palette format codes.

use crate::error::Error;

/// Encoding of a bitmap's pixel data
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One palette index per pixel, expanded from 4-bit source data
    Indexed4,
    /// One palette index per pixel
    Indexed8,
    /// 8:8:8:8 stored B, G, R, A
    Argb32,
    /// 8:8:8 stored B, G, R
    Rgb24,
    /// 1:5:5:5 with the alpha bit on top
    Argb1555,
    /// PlayStation 1:5:5:5 with red in the low bits
    Abgr1555,
    /// 0:5:6:5
    Rgb565,
    /// 4:4:4:4
    Argb4444,
    /// 4x4 blocks of 8 bytes
    Dxt1,
    /// 4x4 blocks of 16 bytes with explicit alpha
    Dxt3,
}

impl PixelFormat {
    /// The format id as stored in an entry header
    pub const fn code(self) -> u8 {
        match self {
            PixelFormat::Indexed4 => 0x7A,
            PixelFormat::Indexed8 => 0x7B,
            PixelFormat::Argb32 => 0x7D,
            PixelFormat::Rgb24 => 0x7F,
            PixelFormat::Argb1555 => 0x7E,
            PixelFormat::Abgr1555 => 0x42,
            PixelFormat::Rgb565 => 0x78,
            PixelFormat::Argb4444 => 0x6D,
            PixelFormat::Dxt1 => 0x60,
            PixelFormat::Dxt3 => 0x61,
        }
    }

    /// Number of bytes the pixel data of a `width` x `height` bitmap occupies
    ///
    /// Block compressed formats round both dimensions up to a multiple of 4.
    pub fn encoded_len(self, width: u16, height: u16) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            PixelFormat::Indexed4 | PixelFormat::Indexed8 => w * h,
            PixelFormat::Argb32 => w * h * 4,
            PixelFormat::Rgb24 => w * h * 3,
            PixelFormat::Argb1555
            | PixelFormat::Abgr1555
            | PixelFormat::Rgb565
            | PixelFormat::Argb4444 => w * h * 2,
            PixelFormat::Dxt1 => w.div_ceil(4) * h.div_ceil(4) * 8,
            PixelFormat::Dxt3 => w.div_ceil(4) * h.div_ceil(4) * 16,
        }
    }

    /// Whether pixels are indices into a palette
    pub fn needs_palette(self) -> bool {
        matches!(self, PixelFormat::Indexed4 | PixelFormat::Indexed8)
    }

    /// Whether the encoding itself can express transparency
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Argb32
                | PixelFormat::Argb1555
                | PixelFormat::Abgr1555
                | PixelFormat::Argb4444
                | PixelFormat::Dxt1
                | PixelFormat::Dxt3
        )
    }
}

impl TryFrom<u8> for PixelFormat {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code & 0x7F {
            0x7A => PixelFormat::Indexed4,
            0x7B => PixelFormat::Indexed8,
            0x7D => PixelFormat::Argb32,
            0x7F => PixelFormat::Rgb24,
            0x7E => PixelFormat::Argb1555,
            0x42 => PixelFormat::Abgr1555,
            0x78 => PixelFormat::Rgb565,
            0x6D => PixelFormat::Argb4444,
            0x60 => PixelFormat::Dxt1,
            0x61 => PixelFormat::Dxt3,
            other => return Err(Error::UnsupportedPixelFormat(other)),
        })
    }
}

/// Encoding of a palette record's entries
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PaletteFormat {
    /// 8:8:8 stored B, G, R
    Rgb24,
    /// 6:6:6 stored B, G, R in the low bits of each byte
    Dos24,
    /// 1:5:5:5 with the alpha bit on top
    Argb1555,
    /// 0:5:6:5
    Rgb565,
    /// 8:8:8:8 stored B, G, R, A
    Argb32,
}

impl PaletteFormat {
    /// The format id as stored in an entry header
    pub const fn code(self) -> u8 {
        match self {
            PaletteFormat::Rgb24 => 0x24,
            PaletteFormat::Dos24 => 0x22,
            PaletteFormat::Argb1555 => 0x2D,
            PaletteFormat::Rgb565 => 0x29,
            PaletteFormat::Argb32 => 0x2A,
        }
    }

    /// Size of one palette entry in bytes
    pub const fn entry_len(self) -> usize {
        match self {
            PaletteFormat::Rgb24 | PaletteFormat::Dos24 => 3,
            PaletteFormat::Argb1555 | PaletteFormat::Rgb565 => 2,
            PaletteFormat::Argb32 => 4,
        }
    }

    /// Whether entries carry their own alpha
    pub fn has_alpha(self) -> bool {
        matches!(self, PaletteFormat::Argb1555 | PaletteFormat::Argb32)
    }
}

impl TryFrom<u8> for PaletteFormat {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code & 0x7F {
            0x24 => PaletteFormat::Rgb24,
            0x22 => PaletteFormat::Dos24,
            0x2D => PaletteFormat::Argb1555,
            0x29 => PaletteFormat::Rgb565,
            0x2A => PaletteFormat::Argb32,
            other => return Err(Error::UnsupportedPaletteFormat(other)),
        })
    }
}
