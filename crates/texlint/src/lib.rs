//! texlint - texture asset linting for GLES rendering backends.
//!
//! This crate provides a unified interface to the texlint crates.
//!
//! # Crates
//!
//! - [`texlint_common`] - Common utilities (binary reading)
//! - [`texlint_dds`] - DDS header parsing and the DXGI format table
//! - [`texlint_lint`] - Lint profiles, rules, asset scanning and reports
//!
//! # Example
//!
//! ```no_run
//! use texlint::prelude::*;
//!
//! let dds = DdsFile::read("textures/albedo.dds")?;
//! for message in lint_dds(&dds, &LintProfile::ES2) {
//!     println!("{message}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use texlint_common as common;
pub use texlint_dds as dds;
pub use texlint_lint as lint;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use texlint_dds::{DdsFile, DxgiFormat, TextureKind};
    pub use texlint_lint::{
        lint_dds, lint_image, scan, AssetSet, IdentifyInspector, LintMessage, LintProfile,
        LintReport, Linter, ScanOptions, Severity,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
