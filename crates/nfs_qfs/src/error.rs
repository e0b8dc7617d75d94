//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// data does not start with a qfs header
    #[error("data does not start with a qfs header")]
    NotCompressed,

    /// a control code would read or write past a buffer bound
    #[error("corrupt compressed stream at byte {position}: {reason}")]
    #[diagnostic(help("the stream is damaged or was not produced by a qfs compressor"))]
    CorruptCompressedStream {
        /// Offset in the compressed input where decoding stopped
        position: usize,
        /// What was inconsistent
        reason: &'static str,
    },

    /// input too large for the 24-bit size field
    #[error("input of {0} bytes does not fit the 24-bit qfs size field")]
    InputTooLarge(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
