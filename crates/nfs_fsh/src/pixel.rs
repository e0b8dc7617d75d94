//! Conversion of encoded pixel data into canonical RGBA.

use byteorder::{ByteOrder, LittleEndian};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    format::PixelFormat,
    palette::{Palette, Rgba},
    read::Texture,
};

/// Decoded pixels of a texture, row-major and top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgba>,
}

impl RgbaBuffer {
    fn filled(width: u16, height: u16, color: Rgba) -> RgbaBuffer {
        RgbaBuffer {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// All pixels, `width * height` of them
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The pixel at column `x` of row `y`, if inside the image
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Whether any pixel is not fully opaque
    pub fn is_translucent(&self) -> bool {
        self.pixels.iter().any(|p| p.a != 255)
    }

    /// The pixels as interleaved `r, g, b, a` bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}

/// Position and width of one channel inside a 16-bit pixel
#[derive(Debug, Copy, Clone)]
struct Channel {
    shift: u16,
    bits: u16,
}

impl Channel {
    const fn new(shift: u16, bits: u16) -> Self {
        Channel { shift, bits }
    }

    fn expand(self, value: u16) -> u8 {
        let max = (1u32 << self.bits) - 1;
        let v = ((value >> self.shift) as u32) & max;
        ((v * 255 + max / 2) / max) as u8
    }
}

/// Layout of a packed 16-bit format
#[derive(Debug, Copy, Clone)]
struct Packed16 {
    red: Channel,
    green: Channel,
    blue: Channel,
    alpha: Option<Channel>,
}

const ARGB_1555: Packed16 = Packed16 {
    red: Channel::new(10, 5),
    green: Channel::new(5, 5),
    blue: Channel::new(0, 5),
    alpha: Some(Channel::new(15, 1)),
};

const ABGR_1555: Packed16 = Packed16 {
    red: Channel::new(0, 5),
    green: Channel::new(5, 5),
    blue: Channel::new(10, 5),
    alpha: Some(Channel::new(15, 1)),
};

const RGB_565: Packed16 = Packed16 {
    red: Channel::new(11, 5),
    green: Channel::new(5, 6),
    blue: Channel::new(0, 5),
    alpha: None,
};

const ARGB_4444: Packed16 = Packed16 {
    red: Channel::new(8, 4),
    green: Channel::new(4, 4),
    blue: Channel::new(0, 4),
    alpha: Some(Channel::new(12, 4)),
};

impl Packed16 {
    fn decode(&self, value: u16) -> Rgba {
        Rgba::new(
            self.red.expand(value),
            self.green.expand(value),
            self.blue.expand(value),
            self.alpha.map_or(255, |a| a.expand(value)),
        )
    }
}

fn decode_indexed(data: &[u8], palette: Option<&Palette>) -> Result<Vec<Rgba>> {
    let palette = palette.ok_or(Error::MissingPalette)?;
    data.iter()
        .map(|index| {
            palette
                .get(*index as usize)
                .copied()
                .ok_or(Error::PaletteIndexOutOfRange {
                    index: *index as usize,
                    len: palette.len(),
                })
        })
        .collect()
}

fn decode_packed16(data: &[u8], layout: &Packed16) -> Vec<Rgba> {
    data.chunks_exact(2)
        .map(|p| layout.decode(LittleEndian::read_u16(p)))
        .collect()
}

/// PlayStation pixels are only transparent when the alpha bit is clear and the colour is black.
fn decode_playstation(data: &[u8]) -> Vec<Rgba> {
    data.chunks_exact(2)
        .map(|p| {
            let value = LittleEndian::read_u16(p);
            let color = ABGR_1555.decode(value);
            let a = if value == 0 { 0 } else { 255 };
            Rgba { a, ..color }
        })
        .collect()
}

fn rgb565(value: u16) -> [u32; 3] {
    [
        RGB_565.red.expand(value) as u32,
        RGB_565.green.expand(value) as u32,
        RGB_565.blue.expand(value) as u32,
    ]
}

/// The four colours a DXT colour block selects from
fn dxt_color_table(color0: u16, color1: u16) -> [Rgba; 4] {
    let c0 = rgb565(color0);
    let c1 = rgb565(color1);
    let mix = |f: fn(u32, u32) -> u32| {
        Rgba::opaque(
            f(c0[0], c1[0]) as u8,
            f(c0[1], c1[1]) as u8,
            f(c0[2], c1[2]) as u8,
        )
    };

    let first = Rgba::opaque(c0[0] as u8, c0[1] as u8, c0[2] as u8);
    let second = Rgba::opaque(c1[0] as u8, c1[1] as u8, c1[2] as u8);

    if color0 > color1 {
        [
            first,
            second,
            mix(|a, b| (2 * a + b) / 3),
            mix(|a, b| (a + 2 * b) / 3),
        ]
    } else {
        [first, second, mix(|a, b| (a + b) / 2), Rgba::TRANSPARENT]
    }
}

fn decode_dxt(data: &[u8], width: u16, height: u16, block_len: usize) -> Vec<Rgba> {
    let mut out = RgbaBuffer::filled(width, height, Rgba::TRANSPARENT);
    let (w, h) = (width as usize, height as usize);
    let blocks_wide = w.div_ceil(4);

    for (block_index, block) in data.chunks_exact(block_len).enumerate() {
        let (alpha, color) = block.split_at(block_len - 8);
        let explicit_alpha = (!alpha.is_empty()).then(|| LittleEndian::read_u64(alpha));

        let table = dxt_color_table(
            LittleEndian::read_u16(&color[0..2]),
            LittleEndian::read_u16(&color[2..4]),
        );
        let indices = LittleEndian::read_u32(&color[4..8]);

        let block_x = (block_index % blocks_wide) * 4;
        let block_y = (block_index / blocks_wide) * 4;

        for i in 0..16 {
            let (x, y) = (block_x + i % 4, block_y + i / 4);
            if x >= w || y >= h {
                continue;
            }

            let mut pixel = table[((indices >> (2 * i)) & 0x03) as usize];
            if let Some(bits) = explicit_alpha {
                pixel.a = ((bits >> (4 * i)) & 0x0F) as u8 * 17;
            }
            out.pixels[y * w + x] = pixel;
        }
    }

    out.pixels
}

/// Decodes raw pixel data of the given format.
///
/// `data` must hold at least [`PixelFormat::encoded_len`] bytes, extra bytes are ignored.
pub fn decode_raw(
    format: PixelFormat,
    width: u16,
    height: u16,
    data: &[u8],
    palette: Option<&Palette>,
) -> Result<RgbaBuffer> {
    let needed = format.encoded_len(width, height);
    let data = data.get(..needed).ok_or(Error::TruncatedData {
        needed,
        available: data.len(),
    })?;

    let pixels = match format {
        PixelFormat::Indexed4 | PixelFormat::Indexed8 => decode_indexed(data, palette)?,
        PixelFormat::Argb32 => data
            .chunks_exact(4)
            .map(|p| Rgba::new(p[2], p[1], p[0], p[3]))
            .collect(),
        PixelFormat::Rgb24 => data
            .chunks_exact(3)
            .map(|p| Rgba::opaque(p[2], p[1], p[0]))
            .collect(),
        PixelFormat::Argb1555 => decode_packed16(data, &ARGB_1555),
        PixelFormat::Abgr1555 => decode_playstation(data),
        PixelFormat::Rgb565 => decode_packed16(data, &RGB_565),
        PixelFormat::Argb4444 => decode_packed16(data, &ARGB_4444),
        PixelFormat::Dxt1 => decode_dxt(data, width, height, 8),
        PixelFormat::Dxt3 => decode_dxt(data, width, height, 16),
    };

    Ok(RgbaBuffer {
        width,
        height,
        pixels,
    })
}

/// Decodes the pixels of a texture into canonical RGBA.
///
/// Fails for this texture only, the archive it came from stays usable.
#[instrument(skip_all, fields(name = texture.name(), format = ?texture.format()), err)]
pub fn decode(texture: &Texture) -> Result<RgbaBuffer> {
    decode_raw(
        texture.format(),
        texture.width(),
        texture.height(),
        texture.raw_data(),
        texture.palette(),
    )
}
