//! Base types for structure of FSH file.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::error::{Error, Result};

/// Size of the archive header in bytes
pub const ARCHIVE_HEADER_LEN: usize = 16;

/// Size of a directory entry in bytes
pub const DIRECTORY_ENTRY_LEN: usize = 8;

/// Size of an entry header in bytes
pub const ENTRY_HEADER_LEN: usize = 16;

/// Name of the entry holding the archive wide palette
pub const PALETTE_NAME: [u8; 4] = *b"!pal";

/// Identifies which platform the archive was built for
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Magic {
    /// PC archives
    #[brw(magic = b"SHPI")]
    Pc,

    /// PlayStation archives
    #[brw(magic = b"SHPP")]
    PlayStation,
}

/// FSH file header
///
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ArchiveHeader {
    /// Platform the archive was built for
    pub magic: Magic,

    /// The size of the archive as recorded by the tool that wrote it
    pub file_size: i32,

    /// The number of directory entries following the header
    pub entry_count: i32,

    /// Opaque identifier, commonly `GIMX`
    pub directory_id: [u8; 4],
}

/// FSH directory entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DirectoryEntry {
    /// Four byte name, not necessarily printable
    pub name: [u8; 4],

    /// Offset of the entry header from the start of the archive body
    pub offset: i32,
}

impl DirectoryEntry {
    /// The name with trailing NUL padding removed, lossily decoded
    pub fn display_name(&self) -> String {
        let end = self
            .name
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }
}

/// Header in front of every bitmap, palette and attachment record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct EntryHeader {
    /// Format id in bits 0-6, nested compression flag in bit 7, and the signed distance to the
    /// next attachment in bits 8-31
    pub code: u32,

    /// Width in pixels, or the number of entries of a palette
    pub width: u16,

    /// Height in pixels
    pub height: u16,

    /// Format specific values such as the centre and position of a bitmap
    pub misc: [u16; 4],
}

impl EntryHeader {
    /// Reads the header at `offset`, failing if it does not fit in `body`.
    pub fn read_at(body: &[u8], offset: usize) -> Result<EntryHeader> {
        let available = body.len().saturating_sub(offset);
        if available < ENTRY_HEADER_LEN {
            return Err(Error::TruncatedData {
                needed: ENTRY_HEADER_LEN,
                available,
            });
        }

        Ok(EntryHeader::read(&mut Cursor::new(
            &body[offset..offset + ENTRY_HEADER_LEN],
        ))?)
    }

    /// The format id with the compression flag masked off
    pub fn format_code(&self) -> u8 {
        (self.code & 0x7F) as u8
    }

    /// Whether the record data is wrapped in its own QFS stream
    pub fn is_compressed(&self) -> bool {
        self.code & 0x80 != 0
    }

    /// Signed distance from this header to the next attachment, 0 when there is none
    pub fn next_attachment(&self) -> i32 {
        (self.code as i32) >> 8
    }
}
