//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`nfs_qfs::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Compression(#[from] nfs_qfs::error::Error),

    /// file is not an fsh archive
    #[error("file is not an fsh archive")]
    InvalidMagic,

    /// directory does not fit in the archive
    #[error("directory of {entries} entries does not fit in {available} bytes")]
    TruncatedDirectory {
        /// Declared number of directory entries
        entries: i32,
        /// Size of the archive body
        available: usize,
    },

    /// record data ends early
    #[error("record needs {needed} bytes but only {available} are available")]
    TruncatedData {
        /// Bytes required by the record
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// unsupported pixel format
    #[error("unsupported pixel format {0:#04x}")]
    UnsupportedPixelFormat(u8),

    /// unsupported palette format
    #[error("unsupported palette format {0:#04x}")]
    UnsupportedPaletteFormat(u8),

    /// a pixel referenced a palette entry that does not exist
    #[error("palette index {index} out of range for a palette of {len} entries")]
    PaletteIndexOutOfRange {
        /// The index found in the pixel data
        index: usize,
        /// The number of palette entries
        len: usize,
    },

    /// texture needs a palette and none was resolved
    #[error("texture needs a palette and none was resolved")]
    MissingPalette,

    /// bitmap is too large for the container's 32-bit size fields
    #[error("a {width}x{height} bitmap does not fit in a bmp file")]
    ImageTooLarge {
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },

    /// texture has no alpha channel
    #[error("texture has no alpha channel")]
    MissingAlpha,

    /// unable to find requested texture
    #[error("unable to find requested texture")]
    TextureNotFound(#[from] TextureNotFoundError),
}

/// Error type to provide further information when a texture has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested texture")]
pub enum TextureNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// A problem with a single archive entry that did not stop the archive from being read
///
/// The affected texture is either kept with best-effort data or skipped, see
/// [`crate::read::Archive::warnings`].
#[derive(Error, Diagnostic, Debug)]
#[error("entry {name:?} at offset {offset:#x}: {cause}")]
#[diagnostic(severity(Warning))]
pub struct DecodeWarning {
    /// Name of the directory entry
    pub name: String,
    /// Offset of the entry header in the archive body
    pub offset: usize,
    /// What went wrong
    pub cause: Error,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
