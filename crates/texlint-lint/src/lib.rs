//! Texture asset linting.
//!
//! - [`scan`] - Find DDS/PNG/JPG assets from comma-separated glob patterns
//! - [`LintProfile`] - Per-backend thresholds and supported formats
//! - [`lint_dds`] / [`lint_image`] - The rules themselves
//! - [`Linter`] - Reads files, applies the rules, fills a [`LintReport`]
//!
//! # Example
//!
//! ```no_run
//! use texlint_lint::{scan, IdentifyInspector, LintProfile, LintReport, Linter, ScanOptions};
//!
//! let assets = scan(&ScanOptions::new(".", "textures/*.dds", true))?;
//! let linter = Linter::new(LintProfile::by_name("es2")?, IdentifyInspector::default());
//!
//! let mut report = LintReport::new();
//! linter.lint_assets(&assets, &mut report, |_, _| {});
//! print!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod image;
mod linter;
mod profile;
mod report;
mod rules;
mod scan;

pub use error::{Error, ExternalToolError, Result};
pub use image::{lint_image, parse_identify_output, IdentifyInspector, ImageInfo, ImageInspector};
pub use linter::Linter;
pub use profile::LintProfile;
pub use report::{FileReport, LintMessage, LintReport, Severity};
pub use rules::lint_dds;
pub use scan::{scan, AssetKind, AssetSet, PatternSummary, ScanOptions};
