//! This library handles detecting, decompressing and creating **QFS** compressed data used by the
//! early *Need for Speed* titles.
//!
//! # QFS Compression Format Documentation
//!
//! QFS (also known as RefPack) is a byte oriented LZ77 variant. Archives such as `.fsh` and `.qfs`
//! files are frequently stored wrapped in it, and individual archive entries may carry a nested
//! QFS stream of their own.
//!
//! ## Header
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Flags                  | 1 byte: `0x10`, or `0x11` when a compressed size follows   |
//! | 0x0001         | Magic number           | 1 byte: `0xFB`                                             |
//! | 0x0002         | Uncompressed Size      | 3 bytes: Big-endian size of the decompressed data          |
//! | 0x0005         | Compressed Size        | 3 bytes: Only present when bit 0 of the flags is set       |
//!
//! ## Control Codes
//!
//! The header is followed by a sequence of control codes. Each code may carry up to three literal
//! bytes copied straight to the output, followed by a back-reference copying earlier output.
//!
//! | First byte    | Size | Literals             | Copy length                      | Back offset                                  |
//! |---------------|------|----------------------|----------------------------------|----------------------------------------------|
//! | `0x00..=0x7F` | 2    | `b0 & 3`             | `((b0 >> 2) & 7) + 3`            | `((b0 >> 5) << 8) + b1 + 1`                  |
//! | `0x80..=0xBF` | 3    | `b1 >> 6`            | `(b0 & 0x3F) + 4`                | `((b1 & 0x3F) << 8) + b2 + 1`                |
//! | `0xC0..=0xDF` | 4    | `b0 & 3`             | `(((b0 >> 2) & 3) << 8) + b3 + 5`| `((b0 & 0x10) << 12) + (b1 << 8) + b2 + 1`   |
//! | `0xE0..=0xFB` | 1    | `((b0 & 0x1F) << 2) + 4` | none                         | none                                         |
//! | `0xFC..=0xFF` | 1    | `b0 & 3`             | none, ends the stream            | none                                         |
//!
//! Back-references may overlap the bytes they produce, which is how runs are encoded.
//!
//! ```
//! # fn doit() -> nfs_qfs::error::Result<()> {
//! use nfs_qfs::{compress, decompress, is_compressed, CompressionLevel};
//!
//! let packed = compress(b"abcabcabcabcabcabc", CompressionLevel::DEFAULT)?;
//! assert!(is_compressed(&packed));
//! assert_eq!(decompress(&packed)?, b"abcabcabcabcabcabc");
//! # Ok(())
//! # }
//! # doit().unwrap();
//! ```

pub mod compress;
pub mod decompress;
pub mod error;
pub mod header;
mod opcode;

pub use compress::{compress, CompressionLevel};
pub use decompress::decompress;
pub use header::{header_len, is_compressed, uncompressed_size};
