//! Detection of the QFS header.

use byteorder::{BigEndian, ByteOrder};

/// Second byte of every QFS stream
pub const QFS_MAGIC: u8 = 0xFB;

/// Flag byte written by [`crate::compress`]
pub const QFS_FLAGS: u8 = 0x10;

/// Header length when only the uncompressed size is present
pub const SHORT_HEADER_LEN: usize = 5;

/// Header length when the flags announce an additional compressed size
pub const LONG_HEADER_LEN: usize = 8;

/// Largest size the 24-bit header field can describe
pub const MAX_UNCOMPRESSED_SIZE: usize = 0xFF_FFFF;

/// Returns true if `data` starts with a QFS header.
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= SHORT_HEADER_LEN && (data[0] & 0xFE) == QFS_FLAGS && data[1] == QFS_MAGIC
}

/// The declared size of the decompressed data, or [`None`] if `data` is not a QFS stream.
pub fn uncompressed_size(data: &[u8]) -> Option<u32> {
    is_compressed(data).then(|| BigEndian::read_u24(&data[2..5]))
}

/// Length of the header in front of the first control code.
///
/// Only meaningful when [`is_compressed`] holds.
pub fn header_len(data: &[u8]) -> usize {
    match data.first() {
        Some(flags) if flags & 0x01 != 0 => LONG_HEADER_LEN,
        _ => SHORT_HEADER_LEN,
    }
}
