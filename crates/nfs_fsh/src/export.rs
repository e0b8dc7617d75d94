//! Writing decoded textures as Windows bitmaps
//!

use std::{
    collections::HashSet,
    fs::{self, File},
    io::{Cursor, Write},
    path::{Path, PathBuf},
};

use binrw::BinWrite;
use bon::Builder;
use tracing::{debug, instrument, warn};

use crate::{
    error::{Error, Result},
    pixel::RgbaBuffer,
    read::{Archive, Texture},
};

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const GRAYSCALE_PALETTE_LEN: u32 = 256 * 4;

/// Options for how textures are extracted from an archive
#[derive(Debug, Clone, Copy, Builder)]
pub struct ExtractOptions {
    /// Name files after their texture when the name is safe to use
    #[builder(default = true)]
    pub preserve_names: bool,

    /// Keep alpha in a 32-bit image instead of writing a separate alpha image
    #[builder(default)]
    pub combine_alpha: bool,

    /// Replace files that already exist
    #[builder(default)]
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions::builder().build()
    }
}

#[derive(BinWrite)]
#[bw(little, magic = b"BM")]
struct BitmapFileHeader {
    file_size: u32,
    reserved: u32,
    pixel_offset: u32,
}

#[derive(BinWrite)]
#[bw(little)]
struct BitmapInfoHeader {
    header_len: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    image_size: u32,
    x_pixels_per_meter: i32,
    y_pixels_per_meter: i32,
    colors_used: u32,
    colors_important: u32,
}

fn row_len(width: u16, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize / 8).next_multiple_of(4)
}

/// Pixel array size and total file size, failing when either overflows the header fields
fn sizes(width: u16, height: u16, bits_per_pixel: u16, pixel_offset: u32) -> Result<(u32, u32)> {
    let too_large = || Error::ImageTooLarge { width, height };
    let image_size = u32::try_from(row_len(width, bits_per_pixel) * height as usize)
        .map_err(|_| too_large())?;
    let file_size = pixel_offset.checked_add(image_size).ok_or_else(too_large)?;
    Ok((image_size, file_size))
}

/// Serializes a bitmap with `bits_per_pixel` of 8, 24 or 32, emitting each row top to bottom
/// with `pixel` and storing them bottom-up.
fn encode(
    buffer: &RgbaBuffer,
    bits_per_pixel: u16,
    pixel: impl Fn(&mut Vec<u8>, [u8; 4]),
) -> Result<Vec<u8>> {
    let (width, height) = (buffer.width(), buffer.height());
    let row_len = row_len(width, bits_per_pixel);
    let palette_len = if bits_per_pixel == 8 {
        GRAYSCALE_PALETTE_LEN
    } else {
        0
    };
    let pixel_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + palette_len;
    let (image_size, file_size) = sizes(width, height, bits_per_pixel, pixel_offset)?;

    let mut out = Cursor::new(Vec::with_capacity(file_size as usize));
    BitmapFileHeader {
        file_size,
        reserved: 0,
        pixel_offset,
    }
    .write(&mut out)?;
    BitmapInfoHeader {
        header_len: INFO_HEADER_LEN,
        width: width as i32,
        height: height as i32,
        planes: 1,
        bits_per_pixel,
        compression: 0,
        image_size,
        x_pixels_per_meter: 0,
        y_pixels_per_meter: 0,
        colors_used: if palette_len > 0 { 256 } else { 0 },
        colors_important: 0,
    }
    .write(&mut out)?;

    let mut out = out.into_inner();
    if palette_len > 0 {
        out.extend((0..=255u8).flat_map(|level| [level, level, level, 0]));
    }

    if width > 0 {
        for row in buffer.pixels().chunks_exact(width as usize).rev() {
            let start = out.len();
            for color in row {
                pixel(&mut out, color.to_array());
            }
            out.resize(start + row_len, 0);
        }
    }

    Ok(out)
}

/// Encodes a bitmap keeping alpha as 32-bit BGRA, or dropping it as 24-bit BGR.
pub fn encode_bmp(buffer: &RgbaBuffer, keep_alpha: bool) -> Result<Vec<u8>> {
    if keep_alpha {
        encode(buffer, 32, |out, [r, g, b, a]| out.extend([b, g, r, a]))
    } else {
        encode(buffer, 24, |out, [r, g, b, _]| out.extend([b, g, r]))
    }
}

/// Encodes the alpha channel alone as an 8-bit grayscale bitmap.
pub fn encode_alpha_bmp(buffer: &RgbaBuffer) -> Result<Vec<u8>> {
    encode(buffer, 8, |out, [_, _, _, a]| out.push(a))
}

fn write_file(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    let mut file = if overwrite {
        File::create(path)?
    } else {
        File::create_new(path)?
    };
    file.write_all(data)?;
    Ok(())
}

/// Writes a texture as a bitmap.
///
/// With `combine_alpha` a texture that has alpha becomes a 32-bit image, every other case
/// produces a 24-bit image. The texture is decoded before the file is created, so a decode
/// failure leaves nothing behind.
#[instrument(skip(texture), fields(name = texture.name()), err)]
pub fn export_bmp(texture: &Texture, path: &Path, combine_alpha: bool) -> Result<()> {
    let data = encode_bmp(&texture.decode()?, combine_alpha && texture.has_alpha())?;
    write_file(path, &data, true)
}

/// Writes the alpha channel of a texture as an 8-bit grayscale bitmap.
#[instrument(skip(texture), fields(name = texture.name()), err)]
pub fn export_alpha_bmp(texture: &Texture, path: &Path) -> Result<()> {
    if !texture.has_alpha() {
        return Err(Error::MissingAlpha);
    }
    let data = encode_alpha_bmp(&texture.decode()?)?;
    write_file(path, &data, true)
}

/// Device names Windows resolves in every directory
const RESERVED_NAMES: [&str; 4] = ["CON", "PRN", "AUX", "NUL"];

fn is_reserved_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_NAMES.contains(&upper.as_str())
        || (upper.len() == 4
            && (upper.starts_with("COM") || upper.starts_with("LPT"))
            && matches!(upper.as_bytes()[3], b'1'..=b'9'))
}

/// Whether a texture name can be used as a file name as is
fn is_safe_name(name: &str) -> bool {
    (1..=4).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        && !is_reserved_name(name)
}

/// Picks unique file stems for every texture of an archive, keeping the `_a` alpha names free
/// for textures that get one.
fn file_stems(archive: &Archive, options: &ExtractOptions) -> Vec<String> {
    let mut used = HashSet::new();
    archive
        .textures()
        .iter()
        .enumerate()
        .map(|(index, texture)| {
            let sidecar = !options.combine_alpha && texture.has_alpha();
            let taken = |stem: &str| {
                let stem = stem.to_ascii_lowercase();
                used.contains(&stem) || (sidecar && used.contains(&format!("{stem}_a")))
            };

            let mut stem = if options.preserve_names && is_safe_name(texture.name()) {
                texture.name().to_owned()
            } else {
                format!("{index:04}")
            };
            if taken(&stem) {
                stem = format!("{stem}_{index:04}");
            }

            used.insert(stem.to_ascii_lowercase());
            if sidecar {
                used.insert(format!("{}_a", stem.to_ascii_lowercase()));
            }
            stem
        })
        .collect()
}

/// Writes every texture of an archive into `dir`, returning the paths written.
///
/// Textures that fail to decode are logged and skipped, file system errors stop the
/// extraction.
#[instrument(skip(archive), err)]
pub fn extract_all(
    archive: &Archive,
    dir: &Path,
    options: &ExtractOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (texture, stem) in archive
        .textures()
        .iter()
        .zip(file_stems(archive, options))
    {
        let buffer = match texture.decode() {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!(name = texture.name(), "skipping texture: {err}");
                continue;
            }
        };

        let keep_alpha = options.combine_alpha && texture.has_alpha();
        let path = dir.join(format!("{stem}.bmp"));
        write_file(&path, &encode_bmp(&buffer, keep_alpha)?, options.overwrite)?;
        debug!(path = %path.display(), "wrote texture");
        written.push(path);

        if !options.combine_alpha && texture.has_alpha() {
            let path = dir.join(format!("{stem}_a.bmp"));
            write_file(&path, &encode_alpha_bmp(&buffer)?, options.overwrite)?;
            debug!(path = %path.display(), "wrote alpha");
            written.push(path);
        }
    }

    Ok(written)
}
