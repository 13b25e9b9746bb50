//! Per-file lint driver.

use std::path::Path;

use texlint_dds::DdsFile;
use tracing::{debug, warn};

use crate::image::{lint_image, ImageInspector};
use crate::profile::LintProfile;
use crate::report::{LintMessage, LintReport};
use crate::rules::lint_dds;
use crate::scan::{AssetKind, AssetSet};

/// Applies a profile to files on disk.
///
/// The profile and inspector are read-only; all findings go to the
/// [`LintReport`] passed in by the caller.
#[derive(Debug, Clone)]
pub struct Linter<I> {
    profile: LintProfile,
    inspector: I,
}

impl<I: ImageInspector> Linter<I> {
    pub fn new(profile: LintProfile, inspector: I) -> Self {
        Self { profile, inspector }
    }

    pub fn profile(&self) -> &LintProfile {
        &self.profile
    }

    /// Lint one DDS file. A file that cannot be read or parsed yields a
    /// single error.
    pub fn lint_dds_file(&self, path: &Path) -> Vec<LintMessage> {
        match DdsFile::read(path) {
            Ok(dds) => lint_dds(&dds, &self.profile),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable DDS");
                vec![LintMessage::error(format!("Could not read file: {e}."))]
            }
        }
    }

    /// Lint one PNG or JPG. Tool failures yield a single error.
    pub fn lint_image_file(&self, path: &Path) -> Vec<LintMessage> {
        match self.inspector.inspect(path) {
            Ok(info) => lint_image(&info),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image inspection failed");
                vec![LintMessage::error(format!("Could not read file: {e}."))]
            }
        }
    }

    /// Lint a file of any supported kind; `None` for other extensions.
    pub fn lint_path(&self, path: &Path) -> Option<Vec<LintMessage>> {
        match AssetKind::from_path(path)? {
            AssetKind::Dds => Some(self.lint_dds_file(path)),
            AssetKind::Png | AssetKind::Jpg => Some(self.lint_image_file(path)),
        }
    }

    /// Lint every asset, DDS first, then PNG, then JPG.
    ///
    /// `on_progress(done, total)` is called after each file.
    pub fn lint_assets(
        &self,
        assets: &AssetSet,
        report: &mut LintReport,
        mut on_progress: impl FnMut(usize, usize),
    ) {
        let total = assets.total();
        let mut done = 0;

        for path in &assets.dds {
            report.record(path, self.lint_dds_file(path));
            done += 1;
            on_progress(done, total);
        }
        for path in assets.png.iter().chain(&assets.jpg) {
            report.record(path, self.lint_image_file(path));
            done += 1;
            on_progress(done, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalToolError;
    use crate::image::ImageInfo;
    use crate::report::Severity;
    use crate::scan::{scan, ScanOptions};
    use std::fs;
    use texlint_dds::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, DxgiFormat};

    /// Inspector answering from the file name instead of running a tool.
    struct FakeInspector;

    impl ImageInspector for FakeInspector {
        fn inspect(&self, path: &Path) -> Result<ImageInfo, ExternalToolError> {
            let name = path.file_name().unwrap().to_string_lossy();
            if name.starts_with("broken") {
                return Err(ExternalToolError::Failed {
                    tool: "fake".into(),
                    status: "exit status: 1".into(),
                    stderr: "bad image".into(),
                });
            }
            Ok(ImageInfo {
                is_srgb: name.contains("srgb"),
                bit_depth: if name.contains("16") { 16 } else { 8 },
            })
        }
    }

    fn write_dds(path: &Path, dds: &DdsFile) {
        let mut bytes = dds.to_bytes();
        bytes.extend_from_slice(&[0u8; 64]);
        fs::write(path, bytes).unwrap();
    }

    fn rgba8(mips: u32) -> DdsFile {
        DdsFile::with_dx10(
            DdsHeader::new(128, 128, mips, DdsPixelFormat::dx10()),
            DdsHeaderDxt10::texture_2d(DxgiFormat::R8G8B8A8_UNORM.0),
        )
    }

    fn rgba8_cube(mips: u32) -> DdsFile {
        DdsFile::with_dx10(
            DdsHeader::new(128, 128, mips, DdsPixelFormat::dx10()).with_cubemap_caps(),
            DdsHeaderDxt10::cubemap(DxgiFormat::R8G8B8A8_UNORM.0),
        )
    }

    fn lint_dir(dir: &Path, profile: LintProfile) -> (AssetSet, LintReport) {
        let assets = scan(&ScanOptions::new(dir, "*", false)).unwrap();
        let mut report = LintReport::new();
        let mut calls = 0;
        Linter::new(profile, FakeInspector).lint_assets(&assets, &mut report, |done, total| {
            calls += 1;
            assert_eq!(done, calls);
            assert!(done <= total);
        });
        assert_eq!(calls, assets.total());
        (assets, report)
    }

    #[test]
    fn test_clean_directory_has_no_messages() {
        let dir = tempfile::tempdir().unwrap();
        write_dds(&dir.path().join("albedo.dds"), &rgba8(1));

        let (assets, report) = lint_dir(dir.path(), LintProfile::ES2);
        let path = &assets.dds[0];
        assert!(report.contains(path));
        assert!(report.messages(path).is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_cubemap_with_mips_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_dds(&dir.path().join("env.dds"), &rgba8_cube(4));

        let (assets, report) = lint_dir(dir.path(), LintProfile::ES2);
        let messages = report.messages(&assets.dds[0]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Warning);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_unreadable_dds_yields_one_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fake.dds"), b"\x89PNG\r\n\x1a\n not a dds").unwrap();
        let mut short = rgba8(1).to_bytes();
        short.truncate(100);
        fs::write(dir.path().join("short.dds"), short).unwrap();

        let (assets, report) = lint_dir(dir.path(), LintProfile::ES2);
        for path in &assets.dds {
            let messages = report.messages(path);
            assert_eq!(messages.len(), 1, "{}", path.display());
            assert!(messages[0].is_error());
            assert!(messages[0].text.starts_with("Could not read file"));
        }
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_images_go_through_inspector() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.png"), b"").unwrap();
        fs::write(dir.path().join("srgb16.jpg"), b"").unwrap();
        fs::write(dir.path().join("broken.png"), b"").unwrap();

        let (assets, report) = lint_dir(dir.path(), LintProfile::ES2);
        assert_eq!(assets.png.len(), 2);
        assert_eq!(assets.jpg.len(), 1);

        let jpg = report.messages(&assets.jpg[0]);
        assert_eq!(jpg.len(), 2);

        let broken = assets.png.iter().find(|p| p.ends_with("broken.png")).unwrap();
        assert_eq!(report.messages(broken).len(), 1);
        assert!(report.messages(broken)[0].is_error());

        let ok = assets.png.iter().find(|p| p.ends_with("ok.png")).unwrap();
        assert!(report.messages(ok).is_empty());
    }

    #[test]
    fn test_report_order_is_dds_then_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        write_dds(&dir.path().join("z.dds"), &rgba8(1));

        let (_, report) = lint_dir(dir.path(), LintProfile::ES2);
        let names: Vec<_> = report
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["z.dds", "a.png"]);
    }

    #[test]
    fn test_lint_path_ignores_unknown_extensions() {
        let linter = Linter::new(LintProfile::ES3, FakeInspector);
        assert!(linter.lint_path(Path::new("model.gltf")).is_none());
        assert!(linter.lint_path(Path::new("tex.png")).is_some());
    }
}
