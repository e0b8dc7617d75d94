//! The five QFS control code families.

/// Size of the sliding window searched for back-references
pub(crate) const WINDOW_SIZE: usize = 1 << 17;

/// Longest back-reference a single control code can describe
pub(crate) const MAX_COPY_LENGTH: usize = 1028;

/// Most literal bytes a literal block can carry
pub(crate) const MAX_LITERAL_BLOCK: usize = 112;

/// Most literal bytes any other control code can carry
pub(crate) const MAX_INLINE_LITERALS: usize = 3;

/// A decoded control code
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Opcode {
    /// `0x00..=0x7F`: two bytes, copies 3 to 10 bytes from up to 1024 back
    Short {
        literals: usize,
        length: usize,
        offset: usize,
    },

    /// `0x80..=0xBF`: three bytes, copies 4 to 67 bytes from up to 16384 back
    Medium {
        literals: usize,
        length: usize,
        offset: usize,
    },

    /// `0xC0..=0xDF`: four bytes, copies 5 to 1028 bytes from up to 131072 back
    Long {
        literals: usize,
        length: usize,
        offset: usize,
    },

    /// `0xE0..=0xFB`: a block of 4 to 112 literal bytes
    Literal { literals: usize },

    /// `0xFC..=0xFF`: up to three trailing literal bytes, then end of stream
    Stop { literals: usize },
}

impl Opcode {
    /// Decodes the control code at the start of `input`, returning it with its encoded size.
    ///
    /// Returns [`None`] when `input` ends inside the control code.
    pub fn read(input: &[u8]) -> Option<(Opcode, usize)> {
        let ctrl = *input.first()? as usize;
        let byte = |i: usize| input.get(i).map(|b| *b as usize);

        Some(match ctrl {
            0x00..=0x7F => {
                let b1 = byte(1)?;
                let op = Opcode::Short {
                    literals: ctrl & 0x03,
                    length: ((ctrl >> 2) & 0x07) + 3,
                    offset: ((ctrl >> 5) << 8) + b1 + 1,
                };
                (op, 2)
            }
            0x80..=0xBF => {
                let (b1, b2) = (byte(1)?, byte(2)?);
                let op = Opcode::Medium {
                    literals: b1 >> 6,
                    length: (ctrl & 0x3F) + 4,
                    offset: ((b1 & 0x3F) << 8) + b2 + 1,
                };
                (op, 3)
            }
            0xC0..=0xDF => {
                let (b1, b2, b3) = (byte(1)?, byte(2)?, byte(3)?);
                let op = Opcode::Long {
                    literals: ctrl & 0x03,
                    length: (((ctrl >> 2) & 0x03) << 8) + b3 + 5,
                    offset: ((ctrl & 0x10) << 12) + (b1 << 8) + b2 + 1,
                };
                (op, 4)
            }
            0xE0..=0xFB => (
                Opcode::Literal {
                    literals: ((ctrl & 0x1F) << 2) + 4,
                },
                1,
            ),
            _ => (
                Opcode::Stop {
                    literals: ctrl & 0x03,
                },
                1,
            ),
        })
    }

    /// Picks the smallest family able to encode a back-reference.
    ///
    /// Returns [`None`] for references no family can express. These include three byte
    /// matches further than 1024 back and four byte matches further than 16384 back.
    pub fn back_reference(length: usize, offset: usize) -> Option<Opcode> {
        if length < 3 || offset == 0 {
            return None;
        }

        if offset <= 1024 && length <= 10 {
            Some(Opcode::Short {
                literals: 0,
                length,
                offset,
            })
        } else if length >= 4 && offset <= 16384 && length <= 67 {
            Some(Opcode::Medium {
                literals: 0,
                length,
                offset,
            })
        } else if length >= 5 && length <= MAX_COPY_LENGTH && offset < WINDOW_SIZE {
            Some(Opcode::Long {
                literals: 0,
                length,
                offset,
            })
        } else {
            None
        }
    }

    /// Replaces the inline literal count of a back-reference.
    pub fn with_literals(self, count: usize) -> Opcode {
        debug_assert!(count <= MAX_INLINE_LITERALS);
        match self {
            Opcode::Short { length, offset, .. } => Opcode::Short {
                literals: count,
                length,
                offset,
            },
            Opcode::Medium { length, offset, .. } => Opcode::Medium {
                literals: count,
                length,
                offset,
            },
            Opcode::Long { length, offset, .. } => Opcode::Long {
                literals: count,
                length,
                offset,
            },
            other => other,
        }
    }

    /// Number of literal bytes following the control code
    pub fn literals(&self) -> usize {
        match *self {
            Opcode::Short { literals, .. }
            | Opcode::Medium { literals, .. }
            | Opcode::Long { literals, .. }
            | Opcode::Literal { literals }
            | Opcode::Stop { literals } => literals,
        }
    }

    /// The `(length, offset)` of the back-reference, if the code carries one
    pub fn copy(&self) -> Option<(usize, usize)> {
        match *self {
            Opcode::Short { length, offset, .. }
            | Opcode::Medium { length, offset, .. }
            | Opcode::Long { length, offset, .. } => Some((length, offset)),
            Opcode::Literal { .. } | Opcode::Stop { .. } => None,
        }
    }

    /// Appends the encoded control code to `out`. Literal bytes are not included.
    pub fn write(&self, out: &mut Vec<u8>) {
        match *self {
            Opcode::Short {
                literals,
                length,
                offset,
            } => {
                let o = offset - 1;
                out.push((((o >> 8) << 5) | ((length - 3) << 2) | literals) as u8);
                out.push(o as u8);
            }
            Opcode::Medium {
                literals,
                length,
                offset,
            } => {
                let o = offset - 1;
                out.push((0x80 | (length - 4)) as u8);
                out.push(((literals << 6) | (o >> 8)) as u8);
                out.push(o as u8);
            }
            Opcode::Long {
                literals,
                length,
                offset,
            } => {
                let o = offset - 1;
                let l = length - 5;
                out.push((0xC0 | ((o >> 16) << 4) | ((l >> 8) << 2) | literals) as u8);
                out.push((o >> 8) as u8);
                out.push(o as u8);
                out.push(l as u8);
            }
            Opcode::Literal { literals } => out.push((0xE0 | ((literals - 4) >> 2)) as u8),
            Opcode::Stop { literals } => out.push((0xFC | literals) as u8),
        }
    }
}
