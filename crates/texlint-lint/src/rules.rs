//! DDS lint rules.

use texlint_dds::{DdsFile, DxgiFormat, FormatInfo};

use crate::profile::LintProfile;
use crate::report::LintMessage;

/// Lint a parsed DDS header against a profile.
///
/// Rules run in a fixed order: format resolution, allow-list, cubemap
/// mipmaps, size budget, compression. When the format cannot be resolved
/// or is missing from the format table, one error is emitted and the rules
/// that depend on the table are skipped.
pub fn lint_dds(dds: &DdsFile, profile: &LintProfile) -> Vec<LintMessage> {
    let mut messages = Vec::new();

    let info = match dds.dxgi_format() {
        None => {
            messages.push(LintMessage::error("Could not determine DXGI format."));
            None
        }
        Some(format) => match format.info() {
            Ok(info) => {
                if let Some(msg) = check_supported(format, info, profile) {
                    messages.push(msg);
                }
                Some(info)
            }
            Err(_) => {
                messages.push(LintMessage::error(format!("Unknown DXGI format code {}.", format.0)));
                None
            }
        },
    };

    if let Some(msg) = check_cubemap_mips(dds.is_cubemap(), dds.mipmap_count()) {
        messages.push(msg);
    }

    if let Some(info) = info {
        if let Some(msg) = check_size(info.bytes_per_pixel_or_block, profile) {
            messages.push(msg);
        }
        if let Some(msg) = check_compression(info.compressed) {
            messages.push(msg);
        }
    }

    messages
}

fn check_supported(format: DxgiFormat, info: &FormatInfo, profile: &LintProfile) -> Option<LintMessage> {
    (!profile.supports(format)).then(|| {
        LintMessage::error(format!("Unsupported texture format 'DXGI_FORMAT_{}'.", info.name))
    })
}

fn check_cubemap_mips(is_cubemap: bool, mipmap_count: u32) -> Option<LintMessage> {
    (is_cubemap && mipmap_count > 1).then(|| {
        LintMessage::warning(
            "Cubemap with mipmaps can't be used as specular env map. Convert to octahedron map instead!",
        )
    })
}

fn check_size(bytes_per_pixel_or_block: u32, profile: &LintProfile) -> Option<LintMessage> {
    (bytes_per_pixel_or_block > profile.max_bytes_per_pixel).then(|| {
        LintMessage::warning(format!(
            "Bytes per pixel > {}. Check format!",
            profile.max_bytes_per_pixel
        ))
    })
}

fn check_compression(compressed: bool) -> Option<LintMessage> {
    compressed.then(|| LintMessage::warning("Compression detected. Check if supported!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use rstest::rstest;
    use texlint_dds::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};

    fn dds_2d(format: DxgiFormat, mips: u32) -> DdsFile {
        DdsFile::with_dx10(
            DdsHeader::new(64, 64, mips, DdsPixelFormat::dx10()),
            DdsHeaderDxt10::texture_2d(format.0),
        )
    }

    fn dds_cube(format: DxgiFormat, mips: u32) -> DdsFile {
        DdsFile::with_dx10(
            DdsHeader::new(64, 64, mips, DdsPixelFormat::dx10()).with_cubemap_caps(),
            DdsHeaderDxt10::cubemap(format.0),
        )
    }

    fn count(messages: &[LintMessage], severity: Severity) -> usize {
        messages.iter().filter(|m| m.severity == severity).count()
    }

    fn size_warnings(messages: &[LintMessage]) -> usize {
        messages.iter().filter(|m| m.text.starts_with("Bytes per pixel")).count()
    }

    #[test]
    fn test_clean_rgba8_es2() {
        let messages = lint_dds(&dds_2d(DxgiFormat::R8G8B8A8_UNORM, 1), &LintProfile::ES2);
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[rstest]
    #[case(4, 0)]
    #[case(5, 1)]
    #[case(16, 1)]
    fn test_size_threshold_es2(#[case] bytes: u32, #[case] expected: usize) {
        let warnings = check_size(bytes, &LintProfile::ES2).into_iter().count();
        assert_eq!(warnings, expected);
    }

    #[rstest]
    #[case(3, 0)]
    #[case(4, 1)]
    fn test_size_threshold_es3(#[case] bytes: u32, #[case] expected: usize) {
        let warnings = check_size(bytes, &LintProfile::ES3).into_iter().count();
        assert_eq!(warnings, expected);
    }

    #[test]
    fn test_profiles_diverge_on_four_bytes() {
        let dds = dds_2d(DxgiFormat::R8G8B8A8_UNORM, 1);
        assert_eq!(size_warnings(&lint_dds(&dds, &LintProfile::ES2)), 0);
        assert_eq!(size_warnings(&lint_dds(&dds, &LintProfile::ES3)), 1);
    }

    #[test]
    fn test_wide_format_gets_size_warning() {
        let dds = dds_2d(DxgiFormat::R16G16B16A16_FLOAT, 1);
        let messages = lint_dds(&dds, &LintProfile::ES2);
        assert_eq!(size_warnings(&messages), 1);
        assert!(messages.contains(&LintMessage::warning("Bytes per pixel > 4. Check format!")));
    }

    #[test]
    fn test_cubemap_with_mips_warns() {
        let messages = lint_dds(&dds_cube(DxgiFormat::R8G8B8A8_UNORM, 3), &LintProfile::ES2);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Warning);
        assert!(messages[0].text.starts_with("Cubemap with mipmaps"));

        let flat = lint_dds(&dds_2d(DxgiFormat::R8G8B8A8_UNORM, 3), &LintProfile::ES2);
        assert!(flat.is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_cubemap_without_chain_is_fine(#[case] mips: u32) {
        let messages = lint_dds(&dds_cube(DxgiFormat::R8G8B8A8_UNORM, mips), &LintProfile::ES2);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_unsupported_format_yields_one_error() {
        let dds = dds_2d(DxgiFormat::R8G8B8A8_UNORM_SRGB, 1);
        let messages = lint_dds(&dds, &LintProfile::ES2);
        assert_eq!(count(&messages, Severity::Error), 1);
        assert_eq!(
            messages[0].text,
            "Unsupported texture format 'DXGI_FORMAT_R8G8B8A8_UNORM_SRGB'."
        );

        let es3 = lint_dds(&dds, &LintProfile::ES3);
        assert_eq!(count(&es3, Severity::Error), 0);
        assert_eq!(size_warnings(&es3), 1);
    }

    #[test]
    fn test_compressed_format() {
        let messages = lint_dds(&dds_2d(DxgiFormat::BC7_UNORM, 1), &LintProfile::ES2);
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "Unsupported texture format 'DXGI_FORMAT_BC7_UNORM'.",
                "Bytes per pixel > 4. Check format!",
                "Compression detected. Check if supported!",
            ]
        );
    }

    #[test]
    fn test_unknown_code_skips_table_rules() {
        let messages = lint_dds(&dds_cube(DxgiFormat(200), 4), &LintProfile::ES2);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], LintMessage::error("Unknown DXGI format code 200."));
        assert_eq!(messages[1].severity, Severity::Warning);
    }

    #[test]
    fn test_legacy_without_dxgi_equivalent() {
        let pf = DdsPixelFormat::from_masks(DdsPixelFormat::RGB, 24, 0xFF_0000, 0xFF00, 0xFF, 0);
        let dds = DdsFile::legacy(DdsHeader::new(8, 8, 1, pf));
        let messages = lint_dds(&dds, &LintProfile::ES2);
        assert_eq!(messages, [LintMessage::error("Could not determine DXGI format.")]);
    }

    #[test]
    fn test_legacy_dxt1_is_linted_like_bc1() {
        let pf = DdsPixelFormat::from_four_cc(FourCC::DXT1);
        let dds = DdsFile::legacy(DdsHeader::new(8, 8, 1, pf));
        let messages = lint_dds(&dds, &LintProfile::ES2);
        assert_eq!(count(&messages, Severity::Error), 1);
        assert!(messages.iter().any(|m| m.text.starts_with("Compression detected")));
        assert_eq!(size_warnings(&messages), 1);
    }
}
