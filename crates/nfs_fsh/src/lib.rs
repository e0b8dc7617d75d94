//! This library handles reading **FSH** texture archives used by the early *Need for Speed* titles.
//!
//! # FSH Archive Format Documentation
//!
//! An FSH (also called SHPI) archive is a flat container of named bitmaps, palettes and auxiliary
//! records. The whole file is often wrapped in QFS compression, in which case it is decompressed
//! with [`nfs_qfs`] before parsing. Archives are typically identified with the `.fsh` or `.qfs`
//! extension.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `SHPI` (PC) or `SHPP` (PlayStation)               |
//! | 0x0004         | File Size              | 4 bytes: Size recorded by the tool that wrote the archive  |
//! | 0x0008         | Entry Count            | 4 bytes: Number of directory entries                       |
//! | 0x000C         | Directory Id           | 4 bytes: Opaque identifier, commonly `GIMX`                |
//! | 0x0010         | Directory              | 8 bytes per entry: 4 byte name, 4 byte offset              |
//!
//! ### Entries
//!
//! Every directory offset points at a 16-byte entry header followed by the entry data:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Code                   | 4 bytes: format id, compression flag and attachment offset |
//! | 0x0004         | Width                  | 2 bytes: Width in pixels, or palette entry count           |
//! | 0x0006         | Height                 | 2 bytes: Height in pixels                                  |
//! | 0x0008         | Misc                   | 8 bytes: Format specific values                            |
//!
//! - **Code**: bits 0-6 hold the format id, bit 7 marks data wrapped in its own QFS stream, and
//!   bits 8-31 are the signed distance from this header to the next attachment (0 when none).
//! - **Attachments** are further records chained behind a bitmap, such as its own palette.
//!
//! ### Pixel Formats
//!
//! | Code   | Format                   | Bytes                        |
//! |--------|--------------------------|------------------------------|
//! | `0x7B` | 8-bit indexed            | `w * h`                      |
//! | `0x7A` | 4-bit indexed            | `w * h`                      |
//! | `0x7D` | 32-bit ARGB              | `w * h * 4`                  |
//! | `0x7F` | 24-bit RGB               | `w * h * 3`                  |
//! | `0x7E` | 16-bit ARGB 1:5:5:5      | `w * h * 2`                  |
//! | `0x78` | 16-bit RGB 5:6:5         | `w * h * 2`                  |
//! | `0x6D` | 16-bit ARGB 4:4:4:4      | `w * h * 2`                  |
//! | `0x42` | PlayStation ABGR 1:5:5:5 | `w * h * 2`                  |
//! | `0x60` | DXT1                     | `ceil(w/4) * ceil(h/4) * 8`  |
//! | `0x61` | DXT3                     | `ceil(w/4) * ceil(h/4) * 16` |
//!
//! ### Palette Formats
//!
//! | Code   | Format                   | Bytes per entry |
//! |--------|--------------------------|-----------------|
//! | `0x24` | 24-bit RGB               | 3               |
//! | `0x22` | DOS 24-bit, 6 bits each  | 3               |
//! | `0x2D` | 16-bit ARGB 1:5:5:5      | 2               |
//! | `0x29` | 16-bit RGB 5:6:5         | 2               |
//! | `0x2A` | 32-bit ARGB              | 4               |
//!
//! Indexed bitmaps use their first palette attachment, falling back to the entry named `!pal`,
//! and then to the first palette record in the directory.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - Multi-byte colours are stored in B, G, R, A order
//!

pub mod error;
pub mod export;
pub mod format;
pub mod palette;
pub mod pixel;
pub mod read;
pub mod types;

pub use export::{export_alpha_bmp, export_bmp, extract_all, ExtractOptions};
pub use format::{PaletteFormat, PixelFormat};
pub use palette::{Palette, Rgba};
pub use pixel::RgbaBuffer;
pub use read::{Archive, Texture};
