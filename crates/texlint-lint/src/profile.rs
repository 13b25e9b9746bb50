//! Backend lint profiles.
//!
//! A profile is pure data: the bytes-per-pixel budget and the DXGI formats
//! the backend can sample. Profiles are picked by name once at startup and
//! shared read-only by every lint call.

use std::fmt;

use texlint_dds::DxgiFormat;

use crate::{Error, Result};

/// A named set of thresholds and supported formats for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintProfile {
    pub name: &'static str,
    pub description: &'static str,
    /// Largest bytes per pixel (or per block) accepted without a warning.
    pub max_bytes_per_pixel: u32,
    pub supported_formats: &'static [DxgiFormat],
}

const ES2_FORMATS: &[DxgiFormat] = &[
    DxgiFormat::R8G8B8A8_TYPELESS,
    DxgiFormat::R8G8B8A8_UNORM,
    DxgiFormat::R8G8B8A8_UINT,
    DxgiFormat::R8_TYPELESS,
    DxgiFormat::R8_UNORM,
    DxgiFormat::R8_UINT,
    DxgiFormat::A8_UNORM,
];

const ES3_FORMATS: &[DxgiFormat] = &[
    DxgiFormat::R8G8B8A8_TYPELESS,
    DxgiFormat::R8G8B8A8_UNORM,
    DxgiFormat::R8G8B8A8_UNORM_SRGB,
    DxgiFormat::R8G8B8A8_UINT,
    DxgiFormat::R8G8B8A8_SNORM,
    DxgiFormat::R8G8B8A8_SINT,
    DxgiFormat::R8G8_TYPELESS,
    DxgiFormat::R8G8_UNORM,
    DxgiFormat::R8G8_UINT,
    DxgiFormat::R8G8_SNORM,
    DxgiFormat::R8G8_SINT,
    DxgiFormat::R8_TYPELESS,
    DxgiFormat::R8_UNORM,
    DxgiFormat::R8_UINT,
    DxgiFormat::R8_SNORM,
    DxgiFormat::R8_SINT,
    DxgiFormat::A8_UNORM,
    DxgiFormat::R16_FLOAT,
    DxgiFormat::R16G16_FLOAT,
    DxgiFormat::R16G16B16A16_FLOAT,
    DxgiFormat::R11G11B10_FLOAT,
    DxgiFormat::R10G10B10A2_UNORM,
    DxgiFormat::R32_FLOAT,
];

impl LintProfile {
    /// OpenGL ES 2 style backend.
    pub const ES2: LintProfile = LintProfile {
        name: "es2",
        description: "OpenGL ES 2 backend",
        max_bytes_per_pixel: 4,
        supported_formats: ES2_FORMATS,
    };

    /// OpenGL ES 3 style backend with a tighter bandwidth budget.
    pub const ES3: LintProfile = LintProfile {
        name: "es3",
        description: "OpenGL ES 3 backend",
        max_bytes_per_pixel: 3,
        supported_formats: ES3_FORMATS,
    };

    /// All built-in profiles.
    pub const ALL: &'static [LintProfile] = &[Self::ES2, Self::ES3];

    /// Look a profile up by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }

    /// Replace the bytes-per-pixel threshold.
    pub fn with_max_bytes_per_pixel(mut self, max: u32) -> Self {
        self.max_bytes_per_pixel = max;
        self
    }

    pub fn supports(&self, format: DxgiFormat) -> bool {
        self.supported_formats.contains(&format)
    }
}

impl fmt::Display for LintProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, max {} bytes per pixel)", self.name, self.description, self.max_bytes_per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(LintProfile::by_name("es2").unwrap().max_bytes_per_pixel, 4);
        assert_eq!(LintProfile::by_name("ES3").unwrap().max_bytes_per_pixel, 3);
        assert!(matches!(LintProfile::by_name("vulkan"), Err(Error::UnknownProfile(_))));
    }

    #[test]
    fn test_allow_lists_differ() {
        let es2 = LintProfile::ES2;
        let es3 = LintProfile::ES3;

        assert!(es2.supports(DxgiFormat::R8G8B8A8_UNORM));
        assert!(!es2.supports(DxgiFormat::R8G8B8A8_UNORM_SRGB));
        assert!(es3.supports(DxgiFormat::R8G8B8A8_UNORM_SRGB));
        assert!(!es3.supports(DxgiFormat::BC1_UNORM));
    }

    #[test]
    fn test_threshold_override_keeps_allow_list() {
        let custom = LintProfile::ES2.with_max_bytes_per_pixel(8);
        assert_eq!(custom.max_bytes_per_pixel, 8);
        assert_eq!(custom.supported_formats, LintProfile::ES2.supported_formats);
    }
}
