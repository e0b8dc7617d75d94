//! QFS decompression

use tracing::{instrument, trace};

use crate::{
    error::{Error, Result},
    header::{header_len, uncompressed_size},
    opcode::Opcode,
};

fn corrupt(position: usize, reason: &'static str) -> Error {
    Error::CorruptCompressedStream { position, reason }
}

/// Decompresses a QFS stream, header included.
///
/// The whole declared size is allocated up front. Any control code that would read past the
/// input, write past the declared size, or reference data before the start of the output fails
/// with [`Error::CorruptCompressedStream`].
///
/// ```
/// # fn doit() -> nfs_qfs::error::Result<()> {
/// // "abcabcabc": three literals inline with a 6 byte copy from 3 back, then stop
/// let packed = [0x10, 0xFB, 0x00, 0x00, 0x09, 0x0F, 0x02, b'a', b'b', b'c', 0xFC];
/// assert_eq!(nfs_qfs::decompress(&packed)?, b"abcabcabc");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[instrument(skip_all, fields(size = data.len()), err)]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let declared = uncompressed_size(data).ok_or(Error::NotCompressed)? as usize;
    let mut position = header_len(data);
    if data.len() < position {
        return Err(corrupt(data.len(), "header is truncated"));
    }

    trace!(declared, "decompressing");
    let mut out = Vec::with_capacity(declared);

    loop {
        if position >= data.len() {
            // Some streams omit the stop code once the output is complete
            if out.len() == declared {
                break;
            }
            return Err(corrupt(position, "input ended before the declared size"));
        }

        let (opcode, size) =
            Opcode::read(&data[position..]).ok_or(corrupt(position, "truncated control code"))?;
        position += size;

        let literals = opcode.literals();
        let literal_bytes = data
            .get(position..position + literals)
            .ok_or(corrupt(position, "literal run exceeds input"))?;
        if out.len() + literals > declared {
            return Err(corrupt(position, "literal run exceeds declared size"));
        }
        out.extend_from_slice(literal_bytes);
        position += literals;

        if let Opcode::Stop { .. } = opcode {
            if out.len() != declared {
                return Err(corrupt(position, "stop code before the declared size"));
            }
            break;
        }

        if let Some((length, offset)) = opcode.copy() {
            copy_back_reference(&mut out, length, offset, declared)
                .map_err(|reason| corrupt(position, reason))?;
        }
    }

    Ok(out)
}

/// Appends `length` bytes starting `offset` bytes before the end of `out`.
///
/// Source and destination may overlap, in which case the copy repeats the bytes it produces.
fn copy_back_reference(
    out: &mut Vec<u8>,
    length: usize,
    offset: usize,
    declared: usize,
) -> core::result::Result<(), &'static str> {
    if offset > out.len() {
        return Err("back-reference precedes the start of the output");
    }
    if out.len() + length > declared {
        return Err("back-reference exceeds declared size");
    }

    let start = out.len() - offset;
    if offset >= length {
        out.extend_from_within(start..start + length);
    } else {
        for i in start..start + length {
            let byte = out[i];
            out.push(byte);
        }
    }

    Ok(())
}
