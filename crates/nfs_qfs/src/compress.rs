//! QFS compression
//!
//! A greedy LZ77 encoder. Matches are found with hash chains keyed on the next two bytes and
//! limited to a 128 KiB window. The output is a valid QFS stream, but it is not byte identical to
//! the streams shipped with the games.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    header::{MAX_UNCOMPRESSED_SIZE, QFS_FLAGS, QFS_MAGIC},
    opcode::{Opcode, MAX_COPY_LENGTH, MAX_INLINE_LITERALS, MAX_LITERAL_BLOCK, WINDOW_SIZE},
};

/// How many hash chain links are probed for every input position
///
/// Higher levels find longer matches at the cost of speed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompressionLevel(pub u16);

impl CompressionLevel {
    /// Only probe the most recent candidates
    pub const FAST: CompressionLevel = CompressionLevel(8);

    /// A balance of ratio and speed
    pub const DEFAULT: CompressionLevel = CompressionLevel(64);

    /// Probe deep into every chain
    pub const BEST: CompressionLevel = CompressionLevel(1024);
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u16> for CompressionLevel {
    fn from(value: u16) -> Self {
        CompressionLevel(value.max(1))
    }
}

const NO_POSITION: u32 = u32::MAX;
const WINDOW_MASK: usize = WINDOW_SIZE - 1;

struct MatchFinder {
    head: Vec<u32>,
    prev: Vec<u32>,
    max_chain: usize,
}

impl MatchFinder {
    fn new(level: CompressionLevel) -> Self {
        MatchFinder {
            head: vec![NO_POSITION; 1 << 16],
            prev: vec![NO_POSITION; WINDOW_SIZE],
            max_chain: level.0.max(1) as usize,
        }
    }

    fn hash(data: &[u8], position: usize) -> usize {
        ((data[position] as usize) << 8) | data[position + 1] as usize
    }

    fn insert(&mut self, data: &[u8], position: usize) {
        if position + 1 >= data.len() {
            return;
        }
        let hash = Self::hash(data, position);
        self.prev[position & WINDOW_MASK] = self.head[hash];
        self.head[hash] = position as u32;
    }

    /// Finds the longest encodable back-reference for `position` and records the position.
    fn longest_match(&mut self, data: &[u8], position: usize) -> Option<Opcode> {
        let available = data.len() - position;
        if available < 3 {
            self.insert(data, position);
            return None;
        }

        let max_length = available.min(MAX_COPY_LENGTH);
        let target = &data[position..position + max_length];

        let mut best: Option<(usize, Opcode)> = None;
        let mut candidate = self.head[Self::hash(data, position)];
        let mut probes = self.max_chain;

        while candidate != NO_POSITION && probes > 0 {
            let start = candidate as usize;
            let offset = position - start;
            if offset >= WINDOW_SIZE {
                break;
            }

            let length = data[start..]
                .iter()
                .zip(target)
                .take_while(|(a, b)| a == b)
                .count();

            if length > best.map_or(2, |(l, _)| l) {
                if let Some(opcode) = Opcode::back_reference(length, offset) {
                    best = Some((length, opcode));
                    if length == max_length {
                        break;
                    }
                }
            }

            let next = self.prev[start & WINDOW_MASK];
            if next == NO_POSITION || next as usize >= start {
                break;
            }
            candidate = next;
            probes -= 1;
        }

        self.insert(data, position);
        best.map(|(_, opcode)| opcode)
    }
}

/// Writes literal blocks until at most three literals remain, returning the remainder.
fn flush_literals<'a>(out: &mut Vec<u8>, mut pending: &'a [u8]) -> &'a [u8] {
    while pending.len() > MAX_INLINE_LITERALS {
        let count = (pending.len() & !0x03).min(MAX_LITERAL_BLOCK);
        Opcode::Literal { literals: count }.write(out);
        out.extend_from_slice(&pending[..count]);
        pending = &pending[count..];
    }
    pending
}

/// Compresses `data` into a QFS stream with a five byte header.
///
/// Inputs larger than 16 MiB cannot be described by the header and fail with
/// [`Error::InputTooLarge`].
///
/// ```
/// # fn doit() -> nfs_qfs::error::Result<()> {
/// use nfs_qfs::{compress, decompress, CompressionLevel};
///
/// let data = vec![7u8; 4096];
/// let packed = compress(&data, CompressionLevel::FAST)?;
/// assert!(packed.len() < data.len());
/// assert_eq!(decompress(&packed)?, data);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[instrument(skip(data), fields(size = data.len()), err)]
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    if data.len() > MAX_UNCOMPRESSED_SIZE {
        return Err(Error::InputTooLarge(data.len()));
    }

    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    out.write_all(&[QFS_FLAGS, QFS_MAGIC])?;
    out.write_u24::<BigEndian>(data.len() as u32)?;

    let mut finder = MatchFinder::new(level);
    let mut position = 0;
    let mut literal_start = 0;

    while position < data.len() {
        let Some(opcode) = finder.longest_match(data, position) else {
            position += 1;
            continue;
        };

        let inline = flush_literals(&mut out, &data[literal_start..position]);
        let opcode = opcode.with_literals(inline.len());
        opcode.write(&mut out);
        out.extend_from_slice(inline);

        let length = opcode.copy().map_or(1, |(length, _)| length);
        for covered in position + 1..position + length {
            finder.insert(data, covered);
        }
        position += length;
        literal_start = position;
    }

    let trailing = flush_literals(&mut out, &data[literal_start..]);
    Opcode::Stop {
        literals: trailing.len(),
    }
    .write(&mut out);
    out.extend_from_slice(trailing);

    debug!(compressed = out.len(), "compressed");
    Ok(out)
}
