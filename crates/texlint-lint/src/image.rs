//! PNG/JPG inspection through an external tool.
//!
//! Standard images are not parsed here. ImageMagick's `identify` reports the
//! colorspace and bit depth, and [`lint_image`] judges the result.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, warn};

use crate::error::ExternalToolError;
use crate::report::LintMessage;

/// Facts about a standard image that the lint rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub is_srgb: bool,
    pub bit_depth: u32,
}

/// Source of [`ImageInfo`] for a file on disk.
pub trait ImageInspector {
    fn inspect(&self, path: &Path) -> Result<ImageInfo, ExternalToolError>;
}

/// Lint the inspection result of a PNG or JPG.
pub fn lint_image(info: &ImageInfo) -> Vec<LintMessage> {
    let mut messages = Vec::new();
    if info.is_srgb {
        messages.push(LintMessage::warning("sRGB detected! Must not end up in *SRGB* GL texture!"));
    }
    if info.bit_depth != 8 {
        messages.push(LintMessage::error("Image is not 8-bit."));
    }
    messages
}

/// Inspector backed by ImageMagick's `identify`.
#[derive(Debug, Clone)]
pub struct IdentifyInspector {
    program: PathBuf,
    timeout: Duration,
}

impl Default for IdentifyInspector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM, Self::DEFAULT_TIMEOUT)
    }
}

impl IdentifyInspector {
    pub const DEFAULT_PROGRAM: &'static str = "identify";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { program: program.into(), timeout }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check that the tool can be run at all.
    pub fn probe(&self) -> Result<(), ExternalToolError> {
        self.run(&[OsStr::new("-version")]).map(|_| ())
    }

    fn tool_name(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self, args: &[&OsStr]) -> Result<String, ExternalToolError> {
        let tool = self.tool_name();
        // Timeouts too large to represent mean no deadline.
        let deadline = Instant::now().checked_add(self.timeout);

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ExternalToolError::NotFound(tool.clone()),
                _ => ExternalToolError::Spawn { tool: tool.clone(), source },
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let out = match recv_until(&stdout, deadline) {
            Ok(out) => out,
            Err(RecvTimeoutError::Timeout) => return Err(self.kill(&mut child)),
            Err(RecvTimeoutError::Disconnected) => Vec::new(),
        };

        let status = match wait_until(&mut child, deadline) {
            Some(status) => status,
            None => return Err(self.kill(&mut child)),
        };

        if !status.success() {
            let err = recv_until(&stderr, deadline).unwrap_or_default();
            return Err(ExternalToolError::Failed {
                tool,
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&err).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn kill(&self, child: &mut Child) -> ExternalToolError {
        warn!(tool = %self.program.display(), timeout = ?self.timeout, "killing external tool");
        let _ = child.kill();
        let _ = child.wait();
        ExternalToolError::Timeout { tool: self.tool_name(), timeout: self.timeout }
    }
}

impl ImageInspector for IdentifyInspector {
    fn inspect(&self, path: &Path) -> Result<ImageInfo, ExternalToolError> {
        let output = self.run(&[path.as_os_str()])?;
        debug!(path = %path.display(), output = output.trim(), "identify");
        parse_identify_output(&self.tool_name(), &output)
    }
}

/// Read a child pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> crossbeam_channel::Receiver<Vec<u8>> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

fn recv_until(
    rx: &crossbeam_channel::Receiver<Vec<u8>>,
    deadline: Option<Instant>,
) -> Result<Vec<u8>, RecvTimeoutError> {
    match deadline {
        Some(deadline) => rx.recv_deadline(deadline),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    }
}

fn wait_until(child: &mut Child, deadline: Option<Instant>) -> Option<ExitStatus> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) if deadline.map_or(true, |d| Instant::now() < d) => {
                thread::sleep(Duration::from_millis(5))
            }
            _ => return None,
        }
    }
}

/// Extract colorspace and bit depth from `identify` output.
///
/// Output looks like `tex.png PNG 256x256 256x256+0+0 8-bit sRGB 3c 1.2KB ...`.
/// Multi-frame images print one line per frame; the first bit depth wins.
/// The leading file name of each line is ignored.
pub fn parse_identify_output(tool: &str, output: &str) -> Result<ImageInfo, ExternalToolError> {
    let fields = move || output.lines().flat_map(|line| line.split_whitespace().skip(1));
    let bit_depth = fields().find_map(|token| token.strip_suffix("-bit")?.parse::<u32>().ok());

    match bit_depth {
        Some(bit_depth) => Ok(ImageInfo {
            is_srgb: fields().any(|token| token == "sRGB"),
            bit_depth,
        }),
        None => Err(ExternalToolError::UnrecognizedOutput {
            tool: tool.to_string(),
            output: output.trim().to_string(),
        }),
    }
}
