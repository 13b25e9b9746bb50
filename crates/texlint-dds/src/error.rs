//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when reading DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    BadMagic([u8; 4]),

    /// Header size field is not 124.
    #[error("invalid DDS header size: expected 124, got {0}")]
    BadHeaderSize(u32),

    /// The buffer ended before all header fields were available.
    #[error("truncated DDS header: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// Width or height is zero.
    #[error("empty DDS image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// DXGI format code outside the format table.
    #[error("unknown DXGI format code {0}")]
    UnknownFormat(u32),
}

impl From<texlint_common::Error> for Error {
    fn from(err: texlint_common::Error) -> Self {
        match err {
            texlint_common::Error::UnexpectedEof { needed, available } => {
                Error::Truncated { needed, available }
            }
        }
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
