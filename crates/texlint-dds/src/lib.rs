//! DDS texture header parsing for texlint.
//!
//! This crate reads the fixed 128-byte DDS header and the optional 20-byte
//! DX10 extension, and carries the DXGI format table used to judge pixel
//! sizes and block compression. Surface data is never touched.
//!
//! # Example
//!
//! ```no_run
//! use texlint_dds::DdsFile;
//!
//! let dds = DdsFile::read("path/to/texture.dds")?;
//! if let Some(format) = dds.dxgi_format() {
//!     println!("{}x{} {}", dds.width(), dds.height(), format);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod format;
mod header;

pub use error::{Error, Result};
pub use file::{DdsFile, TextureKind, BASE_HEADER_LEN, MAX_HEADER_LEN};
pub use format::{DxgiFormat, FormatInfo, FORMATS};
pub use header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC, ResourceDimension};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
