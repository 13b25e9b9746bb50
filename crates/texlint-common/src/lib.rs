//! Common utilities for texlint.
//!
//! This crate provides the foundational pieces shared by the texlint crates:
//!
//! - [`BinaryReader`] - Bounds-checked little-endian reading from byte slices
//! - [`Error`] - Errors raised while reading binary data

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};
