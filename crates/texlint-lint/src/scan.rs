//! Asset discovery.
//!
//! Patterns are split into a directory part and a file-name glob. The
//! directory part may itself contain wildcards and is resolved against the
//! base directory. Matching directories are then either globbed directly or
//! walked recursively with the file-name glob applied to every file below
//! them. Unreadable entries are skipped, as a shell glob would.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Kind of texture asset, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Dds,
    Png,
    Jpg,
}

impl AssetKind {
    /// Classify a path by extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "dds" => Some(Self::Dds),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            _ => None,
        }
    }
}

/// What to scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub base_dir: PathBuf,
    pub patterns: Vec<String>,
    pub recursive: bool,
}

impl ScanOptions {
    pub fn new(base_dir: impl Into<PathBuf>, patterns: &str, recursive: bool) -> Self {
        Self {
            base_dir: base_dir.into(),
            patterns: Self::parse_patterns(patterns),
            recursive,
        }
    }

    /// Split a comma-separated pattern list, dropping empty entries.
    pub fn parse_patterns(patterns: &str) -> Vec<String> {
        patterns
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Counts for one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSummary {
    /// The glob that was searched, with the base directory prepended.
    pub pattern: String,
    pub textures_added: usize,
    pub unknown_skipped: usize,
}

/// Texture files found by a scan, bucketed by kind, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct AssetSet {
    pub dds: Vec<PathBuf>,
    pub png: Vec<PathBuf>,
    pub jpg: Vec<PathBuf>,
    /// Distinct unrecognized extensions, sorted.
    pub unknown_extensions: BTreeSet<String>,
    pub patterns: Vec<PatternSummary>,
}

impl AssetSet {
    pub fn total(&self) -> usize {
        self.dds.len() + self.png.len() + self.jpg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Whether linting needs the external image tool.
    pub fn needs_image_tool(&self) -> bool {
        !self.png.is_empty() || !self.jpg.is_empty()
    }

    fn bucket(&mut self, kind: AssetKind) -> &mut Vec<PathBuf> {
        match kind {
            AssetKind::Dds => &mut self.dds,
            AssetKind::Png => &mut self.png,
            AssetKind::Jpg => &mut self.jpg,
        }
    }
}

/// Find texture assets matching the options.
pub fn scan(options: &ScanOptions) -> Result<AssetSet> {
    let mut assets = AssetSet::default();
    let mut seen: FxHashSet<PathBuf> = FxHashSet::default();

    for pattern in &options.patterns {
        let (dir_part, file_glob) = split_pattern(pattern);
        let searched = options.base_dir.join(dir_part.join(&file_glob)).display().to_string();
        let dirs = dir_glob(&options.base_dir, &dir_part);

        let matches = if options.recursive {
            info!(pattern = %searched, "globbing recursively");
            let matcher = compile(&file_glob)?;
            let mut matches = Vec::new();
            for dir in glob_paths(&dirs)?.into_iter().filter(|d| d.is_dir()) {
                matches.extend(walk(&dir, &matcher));
            }
            matches
        } else {
            info!(pattern = %searched, "globbing");
            compile(&file_glob)?;
            glob_paths(&Path::new(&dirs).join(&file_glob).to_string_lossy())?
        };

        let mut summary = PatternSummary { pattern: searched, textures_added: 0, unknown_skipped: 0 };

        for path in matches {
            if !path.is_file() {
                continue;
            }
            let path = absolute(path)?;

            match AssetKind::from_path(&path) {
                Some(kind) => {
                    if seen.insert(path.clone()) {
                        debug!(path = %path.display(), ?kind, "asset");
                        assets.bucket(kind).push(path);
                        summary.textures_added += 1;
                    }
                }
                None => {
                    let ext = path
                        .extension()
                        .map(|e| format!(".{}", e.to_string_lossy()))
                        .unwrap_or_default();
                    if assets.unknown_extensions.insert(ext.clone()) {
                        info!(extension = %ext, "unknown file type");
                    }
                    summary.unknown_skipped += 1;
                }
            }
        }

        assets.patterns.push(summary);
    }

    Ok(assets)
}

/// Split `pattern` into its directory glob and file-name glob.
fn split_pattern(pattern: &str) -> (PathBuf, String) {
    let pattern_path = Path::new(pattern);
    match (pattern_path.parent(), pattern_path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            (parent.to_path_buf(), name.to_string_lossy().into_owned())
        }
        _ => (PathBuf::new(), pattern.to_string()),
    }
}

/// Glob for the directories to search. The base directory is taken
/// literally, the pattern's own directory part is not.
fn dir_glob(base_dir: &Path, dir_part: &Path) -> String {
    let mut dir = PathBuf::from(glob::Pattern::escape(&base_dir.to_string_lossy()));
    if !dir_part.as_os_str().is_empty() {
        dir.push(dir_part);
    }
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.to_string_lossy().into_owned()
    }
}

fn compile(pattern: &str) -> Result<glob::Pattern> {
    glob::Pattern::new(pattern).map_err(|source| Error::Pattern { pattern: pattern.to_string(), source })
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|source| Error::Pattern { pattern: pattern.to_string(), source })?;
    Ok(paths
        .filter_map(|entry| entry.map_err(|e| warn!(error = %e, "skipping unreadable path")).ok())
        .collect())
}

fn walk(dir: &Path, matcher: &glob::Pattern) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && matcher.matches(&entry.file_name().to_string_lossy()) {
            out.push(entry.into_path());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_parse_patterns() {
        assert_eq!(ScanOptions::parse_patterns("*.dds, tex/*.png,,"), ["*.dds", "tex/*.png"]);
    }

    #[test]
    fn test_asset_kind() {
        assert_eq!(AssetKind::from_path(Path::new("a.DDS")), Some(AssetKind::Dds));
        assert_eq!(AssetKind::from_path(Path::new("a.jpeg")), Some(AssetKind::Jpg));
        assert_eq!(AssetKind::from_path(Path::new("a.ktx")), None);
        assert_eq!(AssetKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_flat_scan_buckets_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.dds"));
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("c.ktx"));
        touch(&dir.path().join("sub/d.dds"));

        let assets = scan(&ScanOptions::new(dir.path(), "*", false)).unwrap();
        assert_eq!(assets.dds.len(), 1);
        assert_eq!(assets.png.len(), 1);
        assert!(assets.jpg.is_empty());
        assert_eq!(assets.unknown_extensions.iter().collect::<Vec<_>>(), [".ktx"]);
        assert_eq!(assets.patterns[0].textures_added, 2);
        assert_eq!(assets.patterns[0].unknown_skipped, 1);
        assert!(assets.needs_image_tool());
    }

    #[test]
    fn test_recursive_scan() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("textures/a.dds"));
        touch(&dir.path().join("textures/env/b.dds"));
        touch(&dir.path().join("textures/env/deep/c.dds"));
        touch(&dir.path().join("other/d.dds"));

        let assets = scan(&ScanOptions::new(dir.path(), "textures/*.dds", true)).unwrap();
        assert_eq!(assets.dds.len(), 3);
        assert!(assets.dds.iter().all(|p| p.is_absolute()));

        let flat = scan(&ScanOptions::new(dir.path(), "textures/*.dds", false)).unwrap();
        assert_eq!(flat.dds.len(), 1);
    }

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.dds"));
        touch(&dir.path().join("b.jpg"));

        let assets = scan(&ScanOptions::new(dir.path(), "*.dds,a.*,*", false)).unwrap();
        assert_eq!(assets.total(), 2);
        let added: Vec<_> = assets.patterns.iter().map(|p| p.textures_added).collect();
        assert_eq!(added, [1, 0, 1]);
    }

    #[rstest]
    #[case(false, 2)]
    #[case(true, 3)]
    fn test_wildcard_in_directory_part(#[case] recursive: bool, #[case] expected: usize) {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("textures_a/a.dds"));
        touch(&dir.path().join("textures_b/b.dds"));
        touch(&dir.path().join("textures_b/cube/c.dds"));
        touch(&dir.path().join("other/d.dds"));

        let assets = scan(&ScanOptions::new(dir.path(), "textures_*/*.dds", recursive)).unwrap();
        assert_eq!(assets.dds.len(), expected);
        assert!(assets.dds.iter().all(|p| !p.ends_with("other/d.dds")));
    }

    #[test]
    fn test_base_dir_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("assets[1]");
        touch(&base.join("tex/a.dds"));

        let assets = scan(&ScanOptions::new(&base, "tex/*.dds", false)).unwrap();
        assert_eq!(assets.dds.len(), 1);
        assert_eq!(assets.patterns[0].pattern, base.join("tex").join("*.dds").display().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.dds"));
        touch(&dir.path().join("locked/b.dds"));
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let readable = fs::read_dir(&locked).is_ok();
        let result = scan(&ScanOptions::new(dir.path(), "*.dds", true));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let assets = result.unwrap();
        // Running as root ignores the permission bits.
        let expected = if readable { 2 } else { 1 };
        assert_eq!(assets.dds.len(), expected);
    }

    #[test]
    fn test_missing_directory_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        for recursive in [false, true] {
            let assets = scan(&ScanOptions::new(dir.path(), "missing/*.dds", recursive)).unwrap();
            assert!(assets.is_empty());
            assert_eq!(assets.patterns[0].textures_added, 0);
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan(&ScanOptions::new(dir.path(), "[*.dds", true)).unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }
}
