//! Types for reading FSH archives
//!

use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{Cursor, Read},
    path::Path,
};

use binrw::BinRead;
use indexmap::IndexMap;
use tracing::{debug, instrument, trace, warn};

use crate::{
    error::{DecodeWarning, Error, Result, TextureNotFoundError},
    format::{PaletteFormat, PixelFormat},
    palette::{decode_palette, Palette},
    pixel::{self, RgbaBuffer},
    types::{
        ArchiveHeader, DirectoryEntry, EntryHeader, ARCHIVE_HEADER_LEN, DIRECTORY_ENTRY_LEN,
        ENTRY_HEADER_LEN, PALETTE_NAME,
    },
};

/// A texture decoded from an archive entry
///
/// The pixel data is kept in its encoded form, see [`Texture::decode`].
#[derive(Clone)]
pub struct Texture {
    name: String,
    name_raw: [u8; 4],
    header: EntryHeader,
    format: PixelFormat,
    data: Vec<u8>,
    palette: Option<Palette>,
    local_palette: bool,
    has_alpha: bool,
    compressed: bool,
}

impl Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("data", &self.data.len())
            .field("palette", &self.palette.as_ref().map(|p| p.len()))
            .field("has_alpha", &self.has_alpha)
            .finish()
    }
}

/// Methods for retrieving information on textures
impl Texture {
    /// Get the name of the texture with NUL padding removed
    ///
    /// # Warnings
    ///
    /// Names are not guaranteed to be printable or unique, and are not safe to use as file names
    /// without validation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the four name bytes as stored in the directory
    pub fn name_raw(&self) -> &[u8; 4] {
        &self.name_raw
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.header.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.header.height
    }

    /// Encoding of the pixel data
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The four format specific values of the entry header
    pub fn misc(&self) -> [u16; 4] {
        self.header.misc
    }

    /// The encoded pixel data, after any nested decompression
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// The palette the texture's indices refer to, either its own or the archive's
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Whether a palette was resolved for this texture
    pub fn has_palette(&self) -> bool {
        self.palette.is_some()
    }

    /// Whether the palette came from an attachment of this texture rather than the archive
    pub fn has_local_palette(&self) -> bool {
        self.local_palette
    }

    /// Whether the texture can carry transparency
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Whether the pixel data was stored in its own QFS stream
    pub fn was_compressed(&self) -> bool {
        self.compressed
    }

    /// Decode the pixels into canonical RGBA
    pub fn decode(&self) -> Result<RgbaBuffer> {
        pixel::decode(self)
    }

    /// Decode the pixels into interleaved `r, g, b, a` bytes
    pub fn to_rgba_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.decode()?.to_bytes())
    }
}

/// Bounds checked walk along the attachment chain of an entry
struct Attachments<'a> {
    body: &'a [u8],
    offset: usize,
    delta: i32,
    remaining: usize,
}

impl<'a> Attachments<'a> {
    fn new(body: &'a [u8], offset: usize, header: &EntryHeader) -> Self {
        Attachments {
            body,
            offset,
            delta: header.next_attachment(),
            remaining: body.len() / ENTRY_HEADER_LEN,
        }
    }
}

impl Iterator for Attachments<'_> {
    type Item = Result<(usize, EntryHeader)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.delta == 0 || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let next = self.offset as i64 + self.delta as i64;
        let header = usize::try_from(next)
            .map_err(|_| Error::TruncatedData {
                needed: ENTRY_HEADER_LEN,
                available: 0,
            })
            .and_then(|offset| EntryHeader::read_at(self.body, offset).map(|h| (offset, h)));

        match header {
            Ok((offset, header)) => {
                self.offset = offset;
                self.delta = header.next_attachment();
                Some(Ok((offset, header)))
            }
            Err(err) => {
                self.delta = 0;
                Some(Err(err))
            }
        }
    }
}

/// FSH archive reader
///
/// ```no_run
/// fn list_textures(data: &[u8]) -> nfs_fsh::error::Result<()> {
///     let archive = nfs_fsh::Archive::parse(data)?;
///
///     for texture in archive.textures() {
///         println!("{}: {}x{} {:?}", texture.name(), texture.width(), texture.height(), texture.format());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Archive {
    header: ArchiveHeader,
    directory: Vec<DirectoryEntry>,
    textures: Vec<Texture>,
    names: IndexMap<Box<str>, usize>,
    palette: Option<Palette>,
    compressed: bool,
    warnings: Vec<DecodeWarning>,
}

impl Archive {
    /// Read an archive from a file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Archive> {
        Self::parse(&std::fs::read(path)?)
    }

    /// Read an archive collecting the textures it contains.
    pub fn from_reader(mut reader: impl Read) -> Result<Archive> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Parse an archive, decompressing it first if it is wrapped in QFS.
    ///
    /// Problems confined to a single entry are recorded in [`Archive::warnings`] instead of
    /// failing the whole archive.
    #[instrument(skip_all, fields(size = data.len()), err)]
    pub fn parse(data: &[u8]) -> Result<Archive> {
        let (body, compressed) = if nfs_qfs::is_compressed(data) {
            (Cow::Owned(nfs_qfs::decompress(data)?), true)
        } else {
            (Cow::Borrowed(data), false)
        };

        if body.len() < ARCHIVE_HEADER_LEN {
            return Err(Error::InvalidMagic);
        }
        let mut reader = Cursor::new(body.as_ref());
        let header = ArchiveHeader::read(&mut reader).map_err(|_| Error::InvalidMagic)?;

        let directory = Self::get_directory(&mut reader, &header, body.len())?;
        debug!(
            entries = directory.len(),
            compressed,
            magic = ?header.magic,
            "read directory"
        );

        let mut warnings = Vec::new();
        let palette = Self::get_global_palette(&body, &directory, &mut warnings);

        let mut textures = Vec::new();
        let mut names = IndexMap::with_capacity(directory.len());
        for entry in &directory {
            let Some(texture) =
                Self::get_texture(&body, &directory, entry, palette.as_ref(), &mut warnings)
            else {
                continue;
            };

            names
                .entry(texture.name.clone().into_boxed_str())
                .or_insert(textures.len());
            textures.push(texture);
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        Ok(Archive {
            header,
            directory,
            textures,
            names,
            palette,
            compressed,
            warnings,
        })
    }

    /// Number of textures contained in this archive.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether this archive contains no textures
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The archive header
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Every directory entry, including palettes and auxiliary records
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// The textures in directory order
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Returns an iterator over all texture names in this archive.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(|t| t.name())
    }

    /// The archive wide palette, if one was found
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Whether the archive itself was wrapped in QFS
    pub fn was_compressed(&self) -> bool {
        self.compressed
    }

    /// Problems with individual entries found while parsing
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Get the index of the first texture with this name, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Search for a texture by name
    pub fn by_name(&self, name: &str) -> Result<&Texture> {
        let Some(index) = self.index_for_name(name) else {
            return Err(Error::TextureNotFound(TextureNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a texture by index
    pub fn by_index(&self, index: usize) -> Result<&Texture> {
        self.textures
            .get(index)
            .ok_or(Error::TextureNotFound(TextureNotFoundError::Index(index)))
    }

    /// Consume the archive, returning its textures
    pub fn into_textures(self) -> Vec<Texture> {
        self.textures
    }

    fn get_directory(
        reader: &mut Cursor<&[u8]>,
        header: &ArchiveHeader,
        available: usize,
    ) -> Result<Vec<DirectoryEntry>> {
        let fits = usize::try_from(header.entry_count)
            .ok()
            .and_then(|count| count.checked_mul(DIRECTORY_ENTRY_LEN))
            .and_then(|len| len.checked_add(ARCHIVE_HEADER_LEN))
            .is_some_and(|end| end <= available);
        if !fits {
            return Err(Error::TruncatedDirectory {
                entries: header.entry_count,
                available,
            });
        }

        (0..header.entry_count)
            .map(|_| DirectoryEntry::read(reader).map_err(Error::from))
            .collect()
    }

    fn entry_offset(entry: &DirectoryEntry) -> Result<usize> {
        usize::try_from(entry.offset).map_err(|_| Error::TruncatedData {
            needed: ENTRY_HEADER_LEN,
            available: 0,
        })
    }

    fn get_global_palette(
        body: &[u8],
        directory: &[DirectoryEntry],
        warnings: &mut Vec<DecodeWarning>,
    ) -> Option<Palette> {
        if let Some(entry) = directory.iter().find(|e| e.name == PALETTE_NAME) {
            match Self::entry_offset(entry).and_then(|offset| decode_palette(body, offset)) {
                Ok(palette) => {
                    trace!(entries = palette.len(), "using named palette");
                    return Some(palette);
                }
                Err(cause) => warnings.push(DecodeWarning {
                    name: entry.display_name(),
                    offset: entry.offset as usize,
                    cause,
                }),
            }
        }

        directory.iter().find_map(|entry| {
            let offset = Self::entry_offset(entry).ok()?;
            let header = EntryHeader::read_at(body, offset).ok()?;
            PaletteFormat::try_from(header.format_code()).ok()?;
            let palette = decode_palette(body, offset).ok()?;
            trace!(name = %entry.display_name(), "using first palette record");
            Some(palette)
        })
    }

    fn get_texture(
        body: &[u8],
        directory: &[DirectoryEntry],
        entry: &DirectoryEntry,
        global_palette: Option<&Palette>,
        warnings: &mut Vec<DecodeWarning>,
    ) -> Option<Texture> {
        let name = entry.display_name();
        let mut report = |cause: Error| {
            warnings.push(DecodeWarning {
                name: name.clone(),
                offset: entry.offset as usize,
                cause,
            })
        };

        let header =
            match Self::entry_offset(entry).and_then(|offset| EntryHeader::read_at(body, offset)) {
                Ok(header) => header,
                Err(cause) => {
                    report(cause);
                    return None;
                }
            };

        let format = match PixelFormat::try_from(header.format_code()) {
            Ok(format) => format,
            Err(_) if PaletteFormat::try_from(header.format_code()).is_ok() => {
                trace!(%name, "skipping palette record");
                return None;
            }
            Err(_) => {
                debug!(%name, code = header.format_code(), "skipping auxiliary record");
                return None;
            }
        };

        let offset = entry.offset as usize;
        let next_offset = directory
            .iter()
            .filter_map(|e| usize::try_from(e.offset).ok())
            .filter(|o| *o > offset)
            .min()
            .unwrap_or(body.len())
            .min(body.len());

        let texture = Self::decode_entry(
            body,
            offset,
            next_offset,
            &header,
            format,
            global_palette,
            &mut report,
        );

        Some(Texture {
            name,
            name_raw: entry.name,
            ..texture
        })
    }

    /// Builds the texture for the entry at `offset` whose header has already been read.
    fn decode_entry(
        body: &[u8],
        offset: usize,
        next_offset: usize,
        header: &EntryHeader,
        format: PixelFormat,
        global_palette: Option<&Palette>,
        report: &mut impl FnMut(Error),
    ) -> Texture {
        let expected = format.encoded_len(header.width, header.height);
        let start = offset + ENTRY_HEADER_LEN;
        let end = next_offset.max(start);

        let raw_copy = |limit: usize| body[start..(start + expected).min(limit)].to_vec();

        let data = if header.is_compressed() {
            match nfs_qfs::decompress(&body[start..end]) {
                Ok(mut data) => {
                    data.truncate(expected);
                    data
                }
                Err(cause) => {
                    report(cause.into());
                    raw_copy(end)
                }
            }
        } else {
            raw_copy(end)
        };

        let mut local_palette = None;
        for attachment in Attachments::new(body, offset, header) {
            let (attachment_offset, attachment) = match attachment {
                Ok(found) => found,
                Err(cause) => {
                    report(cause);
                    break;
                }
            };

            let code = attachment.format_code();
            if local_palette.is_some()
                || !format.needs_palette()
                || PaletteFormat::try_from(code).is_err()
            {
                trace!(code, attachment_offset, "skipping attachment");
                continue;
            }

            match decode_palette(body, attachment_offset) {
                Ok(palette) => local_palette = Some(palette),
                Err(cause) => report(cause),
            }
        }

        let has_alpha =
            format.has_alpha() || local_palette.as_ref().is_some_and(|p| p.has_alpha());
        let local = local_palette.is_some();
        let palette = if format.needs_palette() {
            local_palette.or_else(|| global_palette.cloned())
        } else {
            None
        };

        Texture {
            name: String::new(),
            name_raw: [0; 4],
            header: *header,
            format,
            data,
            palette,
            local_palette: local,
            has_alpha,
            compressed: header.is_compressed(),
        }
    }
}

#[cfg(test)]
mod test {
    use nfs_qfs::CompressionLevel;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result, TextureNotFoundError};
    use crate::format::{PaletteFormat, PixelFormat};
    use crate::palette::Rgba;
    use crate::read::Archive;

    const RED: Rgba = Rgba::opaque(0xFF, 0, 0);
    const GREEN: Rgba = Rgba::opaque(0, 0xFF, 0);

    fn record(code: u32, width: u16, height: u16, data: &[u8]) -> Vec<u8> {
        let mut out = code.to_le_bytes().to_vec();
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&[0; 8]);
        out.extend_from_slice(data);
        out
    }

    /// An rgb24 palette holding red then green
    fn red_green_palette(code: u32) -> Vec<u8> {
        record(code | 0x24, 2, 1, &[0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00])
    }

    fn archive(entries: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut offset = 16 + entries.len() * 8;
        let mut out = b"SHPI".to_vec();
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(entries.len() as i32).to_le_bytes());
        out.extend_from_slice(b"GIMX");
        for (name, data) in entries {
            out.extend_from_slice(*name);
            out.extend_from_slice(&(offset as i32).to_le_bytes());
            offset += data.len();
        }
        for (_, data) in entries {
            out.extend_from_slice(data);
        }
        let size = out.len() as i32;
        out[4..8].copy_from_slice(&size.to_le_bytes());
        out
    }

    /// One 2x2 indexed texture followed by an attached palette
    fn indexed_with_local_palette() -> Vec<u8> {
        let mut entry = record(0x7B | (20 << 8), 2, 2, &[0, 1, 0, 1]);
        entry.extend(red_green_palette(0));
        archive(&[(b"TEX1", entry)])
    }

    #[traced_test]
    #[test]
    fn parse_indexed_texture_with_local_palette() -> Result<()> {
        let archive = Archive::parse(&indexed_with_local_palette())?;

        assert_eq!(archive.len(), 1);
        assert!(archive.warnings().is_empty());

        let texture = archive.by_name("TEX1")?;
        assert_eq!(texture.width(), 2);
        assert_eq!(texture.height(), 2);
        assert_eq!(texture.format(), PixelFormat::Indexed8);
        assert!(texture.has_palette());
        assert!(texture.has_local_palette());
        assert!(!texture.has_alpha());
        assert_eq!(texture.decode()?.pixels(), &[RED, GREEN, RED, GREEN]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn use_named_global_palette() -> Result<()> {
        let data = archive(&[
            (b"!pal", red_green_palette(0)),
            (b"TEX1", record(0x7B, 2, 1, &[1, 0])),
        ]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["TEX1"]);
        assert_eq!(archive.palette().map(|p| p.format()), Some(PaletteFormat::Rgb24));

        let texture = archive.by_index(0)?;
        assert!(texture.has_palette());
        assert!(!texture.has_local_palette());
        assert_eq!(texture.to_rgba_bytes()?, vec![0, 0xFF, 0, 0xFF, 0xFF, 0, 0, 0xFF]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn fall_back_to_first_palette_record() -> Result<()> {
        let data = archive(&[
            (b"TEX1", record(0x7B, 1, 1, &[1])),
            (b"PAL0", red_green_palette(0)),
        ]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_name("TEX1")?.decode()?.pixels(), &[GREEN]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn named_palette_wins_over_earlier_records() -> Result<()> {
        let data = archive(&[
            (b"PAL0", red_green_palette(0)),
            (b"!pal", record(0x24, 1, 1, &[0xFF, 0x00, 0x00])),
            (b"TEX1", record(0x7B, 1, 1, &[0])),
        ]);
        let archive = Archive::parse(&data)?;

        assert!(archive.warnings().is_empty());
        assert_eq!(
            archive.by_name("TEX1")?.decode()?.pixels(),
            &[Rgba::opaque(0, 0, 0xFF)]
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn named_entry_that_is_not_a_palette_falls_back() -> Result<()> {
        let data = archive(&[
            (b"!pal", record(0x7D, 1, 1, &[0, 0, 0, 0])),
            (b"TEX1", record(0x7B, 1, 1, &[1])),
            (b"PAL0", red_green_palette(0)),
        ]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.warnings().len(), 1);
        assert_eq!(archive.warnings()[0].name, "!pal");
        assert!(matches!(
            archive.warnings()[0].cause,
            Error::UnsupportedPaletteFormat(0x7D)
        ));
        assert_eq!(archive.by_name("TEX1")?.decode()?.pixels(), &[GREEN]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn local_palette_wins_over_global() -> Result<()> {
        let mut entry = record(0x7B | (17 << 8), 1, 1, &[0]);
        entry.extend(record(0x24, 1, 1, &[0xFF, 0x00, 0x00]));
        let data = archive(&[(b"!pal", red_green_palette(0)), (b"TEX1", entry)]);
        let archive = Archive::parse(&data)?;

        assert_eq!(
            archive.by_name("TEX1")?.decode()?.pixels(),
            &[Rgba::opaque(0, 0, 0xFF)]
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn local_alpha_palette_gives_alpha() -> Result<()> {
        let mut entry = record(0x7B | (17 << 8), 1, 1, &[0]);
        entry.extend(record(0x2A, 1, 1, &[0x10, 0x20, 0x30, 0x40]));
        let archive = Archive::parse(&archive(&[(b"TEX1", entry)]))?;

        let texture = archive.by_index(0)?;
        assert!(texture.has_alpha());
        assert_eq!(texture.decode()?.pixels(), &[Rgba::new(0x30, 0x20, 0x10, 0x40)]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn missing_palette_fails_on_decode() -> Result<()> {
        let archive = Archive::parse(&archive(&[(b"TEX1", record(0x7B, 1, 1, &[0]))]))?;

        let texture = archive.by_index(0)?;
        assert!(!texture.has_palette());
        assert!(matches!(texture.decode(), Err(Error::MissingPalette)));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn direct_colour_texture() -> Result<()> {
        let data = archive(&[(b"ARGB", record(0x7D, 1, 1, &[0x01, 0x02, 0x03, 0x80]))]);
        let archive = Archive::parse(&data)?;

        let texture = archive.by_index(0)?;
        assert!(texture.has_alpha());
        assert!(!texture.has_palette());
        assert_eq!(texture.decode()?.pixels(), &[Rgba::new(0x03, 0x02, 0x01, 0x80)]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn parse_compressed_archive() -> Result<()> {
        let plain = indexed_with_local_palette();
        let packed = nfs_qfs::compress(&plain, CompressionLevel::default())?;

        let archive = Archive::parse(&packed)?;
        assert!(archive.was_compressed());
        assert_eq!(
            archive.by_name("TEX1")?.decode()?.pixels(),
            &[RED, GREEN, RED, GREEN]
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn parse_compressed_entry() -> Result<()> {
        let packed = nfs_qfs::compress(&[0, 1, 1, 0], CompressionLevel::default())?;
        let data = archive(&[
            (b"!pal", red_green_palette(0)),
            (b"TEX1", record(0x7B | 0x80, 2, 2, &packed)),
        ]);
        let archive = Archive::parse(&data)?;

        let texture = archive.by_name("TEX1")?;
        assert!(texture.was_compressed());
        assert_eq!(texture.raw_data(), &[0, 1, 1, 0]);
        assert_eq!(texture.decode()?.pixels(), &[RED, GREEN, GREEN, RED]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn corrupt_compressed_entry_keeps_raw_bytes() -> Result<()> {
        let data = archive(&[(b"RAW ", record(0x7D | 0x80, 1, 1, &[1, 2, 3, 4]))]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.warnings().len(), 1);
        assert_eq!(archive.by_index(0)?.raw_data(), &[1, 2, 3, 4]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn truncated_pixels_fail_on_decode() -> Result<()> {
        let archive = Archive::parse(&archive(&[(b"TEX1", record(0x7D, 4, 4, &[0; 8]))]))?;

        let texture = archive.by_index(0)?;
        assert_eq!(texture.raw_data().len(), 8);
        assert!(matches!(
            texture.decode(),
            Err(Error::TruncatedData {
                needed: 64,
                available: 8
            })
        ));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn skip_entries_outside_archive() -> Result<()> {
        // the second entry points past the end of the archive
        let mut data = archive(&[
            (b"TEX1", record(0x7D, 1, 1, &[0; 4])),
            (b"GONE", Vec::new()),
        ]);
        let bad = 16 + 8 + 4;
        data[bad..bad + 4].copy_from_slice(&0x1000i32.to_le_bytes());

        let archive = Archive::parse(&data)?;
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["TEX1"]);
        assert_eq!(archive.warnings().len(), 1);
        assert_eq!(archive.warnings()[0].name, "GONE");

        Ok(())
    }

    #[traced_test]
    #[test]
    fn stop_at_attachment_outside_archive() -> Result<()> {
        let data = archive(&[(b"TEX1", record(0x7B | (0x7000 << 8), 1, 1, &[0]))]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.warnings().len(), 1);
        assert!(!archive.by_index(0)?.has_palette());

        Ok(())
    }

    #[traced_test]
    #[test]
    fn attachment_cycle_terminates() -> Result<()> {
        // the attachment points back at the texture header
        let mut entry = record(0x7B | (21 << 8), 1, 1, &[0, 0, 0, 0, 0]);
        entry.extend(record(0x6F | ((-21i32 as u32) << 8), 0, 0, &[]));
        let archive = Archive::parse(&archive(&[(b"LOOP", entry)]))?;

        assert_eq!(archive.len(), 1);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn auxiliary_records_are_not_textures() -> Result<()> {
        let data = archive(&[
            (b"TEX1", record(0x7D, 1, 1, &[0; 4])),
            (b"TXT ", record(0x6F, 4, 0, b"text")),
        ]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.directory().len(), 2);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn lookup_by_name() -> Result<()> {
        let data = archive(&[
            (b"AB\0\0", record(0x7D, 1, 1, &[1, 1, 1, 1])),
            (b"AB\0\0", record(0x7D, 1, 1, &[2, 2, 2, 2])),
        ]);
        let archive = Archive::parse(&data)?;

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.index_for_name("AB"), Some(0));
        assert_eq!(archive.by_name("AB")?.raw_data(), &[1, 1, 1, 1]);
        assert_eq!(archive.by_index(1)?.name_raw(), b"AB\0\0");
        assert!(matches!(
            archive.by_name("CD"),
            Err(Error::TextureNotFound(TextureNotFoundError::Name(_)))
        ));
        assert!(matches!(
            archive.by_index(2),
            Err(Error::TextureNotFound(TextureNotFoundError::Index(2)))
        ));

        Ok(())
    }

    #[test]
    fn reject_truncated_directory() {
        let mut data = archive(&[]);
        data[8..12].copy_from_slice(&5i32.to_le_bytes());

        assert!(matches!(
            Archive::parse(&data),
            Err(Error::TruncatedDirectory {
                entries: 5,
                available: 16
            })
        ));
    }

    #[test]
    fn reject_negative_entry_count() {
        let mut data = archive(&[]);
        data[8..12].copy_from_slice(&(-1i32).to_le_bytes());

        assert!(matches!(
            Archive::parse(&data),
            Err(Error::TruncatedDirectory { entries: -1, .. })
        ));
    }

    #[test]
    fn reject_bad_magic() {
        assert!(matches!(
            Archive::parse(b"SHPX000000000000"),
            Err(Error::InvalidMagic)
        ));
        assert!(matches!(Archive::parse(b"SHPI"), Err(Error::InvalidMagic)));
    }

    #[test]
    fn empty_archive() -> Result<()> {
        let archive = Archive::parse(&archive(&[]))?;
        assert!(archive.is_empty());
        assert!(archive.palette().is_none());
        Ok(())
    }
}
