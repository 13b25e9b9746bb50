//! Parsed DDS file headers.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use texlint_common::BinaryReader;
use tracing::debug;
use zerocopy::IntoBytes;

use crate::format::DxgiFormat;
use crate::header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, ResourceDimension};
use crate::{Error, Result, DDS_MAGIC};

/// Size of magic plus base header.
pub const BASE_HEADER_LEN: usize = 4 + DdsHeader::SIZE as usize;

/// Size of magic plus base header plus DX10 header.
pub const MAX_HEADER_LEN: usize = BASE_HEADER_LEN + DdsHeaderDxt10::SIZE;

/// Texture shape as far as linting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture1D,
    Texture2D,
    Texture3D,
    TextureCube,
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextureKind::Texture1D => "1D",
            TextureKind::Texture2D => "2D",
            TextureKind::Texture3D => "3D",
            TextureKind::TextureCube => "Cube",
        };
        f.write_str(s)
    }
}

/// The headers of a DDS file.
///
/// Only the header is parsed; surface data is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsFile {
    pub header: DdsHeader,
    pub dx10: Option<DdsHeaderDxt10>,
}

impl DdsFile {
    /// Assemble a DX10 file header. The FourCC is forced to `DX10`.
    pub fn with_dx10(mut header: DdsHeader, dx10: DdsHeaderDxt10) -> Self {
        header.pixel_format.four_cc = crate::FourCC::DX10;
        let flags = header.pixel_format.flags;
        header.pixel_format.flags = flags | DdsPixelFormat::FOURCC;
        Self { header, dx10: Some(dx10) }
    }

    /// Assemble a legacy file header without a DX10 extension.
    pub fn legacy(header: DdsHeader) -> Self {
        Self { header, dx10: None }
    }

    /// Parse the headers at the start of `data`.
    ///
    /// Trailing surface data is ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let magic: [u8; 4] = reader.read_array().map_err(|_| truncated(4, data.len()))?;
        if &magic != DDS_MAGIC {
            return Err(Error::BadMagic(magic));
        }

        let size = reader.peek_u32().map_err(|_| truncated(8, data.len()))?;
        if size != DdsHeader::SIZE {
            return Err(Error::BadHeaderSize(size));
        }

        let header: DdsHeader = reader
            .read_struct()
            .map_err(|_| truncated(BASE_HEADER_LEN, data.len()))?;

        let dx10 = if header.is_dx10() {
            let dx10: DdsHeaderDxt10 = reader
                .read_struct()
                .map_err(|_| truncated(MAX_HEADER_LEN, data.len()))?;
            Some(dx10)
        } else {
            None
        };

        let (width, height) = (header.width, header.height);
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }

        Ok(Self { header, dx10 })
    }

    /// Read and parse the headers of a file on disk.
    ///
    /// At most [`MAX_HEADER_LEN`] bytes are read.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut buf = Vec::with_capacity(MAX_HEADER_LEN);
        File::open(path)?
            .take(MAX_HEADER_LEN as u64)
            .read_to_end(&mut buf)?;

        debug!(path = %path.display(), bytes = buf.len(), "read DDS header");
        Self::parse(&buf)
    }

    /// Serialize magic, header and optional DX10 header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MAX_HEADER_LEN);
        out.extend_from_slice(DDS_MAGIC);
        out.extend_from_slice(self.header.as_bytes());
        if let Some(dx10) = &self.dx10 {
            out.extend_from_slice(dx10.as_bytes());
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn depth(&self) -> u32 {
        self.header.depth
    }

    /// Mipmap count as stored in the header.
    pub fn mipmap_count(&self) -> u32 {
        self.header.mipmap_count
    }

    /// Number of mip levels; a stored count of 0 means a single level.
    pub fn mip_levels(&self) -> u32 {
        self.mipmap_count().max(1)
    }

    pub fn has_dx10_header(&self) -> bool {
        self.dx10.is_some()
    }

    /// DXGI format from the DX10 header, or inferred from the legacy
    /// pixel format.
    pub fn dxgi_format(&self) -> Option<DxgiFormat> {
        match &self.dx10 {
            Some(dx10) => Some(DxgiFormat(dx10.dxgi_format)),
            None => DxgiFormat::from_legacy(&self.header.pixel_format),
        }
    }

    /// Cubemap per the DX10 misc flag or the legacy caps2 bit.
    pub fn is_cubemap(&self) -> bool {
        let caps2 = self.header.caps2;
        let legacy = caps2 & DdsHeader::CAPS2_CUBEMAP != 0;
        legacy || self.dx10.as_ref().is_some_and(DdsHeaderDxt10::is_cubemap)
    }

    /// Array size from the DX10 header; legacy files hold one element.
    pub fn array_size(&self) -> u32 {
        self.dx10.as_ref().map_or(1, |dx10| {
            let size = dx10.array_size;
            size.max(1)
        })
    }

    pub fn kind(&self) -> TextureKind {
        if self.is_cubemap() {
            return TextureKind::TextureCube;
        }
        match self.dx10.as_ref().map(DdsHeaderDxt10::dimension) {
            Some(ResourceDimension::Texture1D) => TextureKind::Texture1D,
            Some(ResourceDimension::Texture3D) => TextureKind::Texture3D,
            Some(_) => TextureKind::Texture2D,
            None => {
                let caps2 = self.header.caps2;
                if caps2 & DdsHeader::CAPS2_VOLUME != 0 {
                    TextureKind::Texture3D
                } else {
                    TextureKind::Texture2D
                }
            }
        }
    }
}

fn truncated(needed: usize, available: usize) -> Error {
    Error::Truncated { needed, available }
}

const HEADER_FLAG_NAMES: &[(u32, &str)] = &[
    (DdsHeader::FLAG_CAPS, "CAPS"),
    (DdsHeader::FLAG_HEIGHT, "HEIGHT"),
    (DdsHeader::FLAG_WIDTH, "WIDTH"),
    (DdsHeader::FLAG_PITCH, "PITCH"),
    (DdsHeader::FLAG_PIXELFORMAT, "PIXELFORMAT"),
    (DdsHeader::FLAG_MIPMAPCOUNT, "MIPMAPCOUNT"),
    (DdsHeader::FLAG_LINEARSIZE, "LINEARSIZE"),
    (DdsHeader::FLAG_DEPTH, "DEPTH"),
];

const CAPS_NAMES: &[(u32, &str)] = &[
    (DdsHeader::CAPS_COMPLEX, "COMPLEX"),
    (DdsHeader::CAPS_TEXTURE, "TEXTURE"),
    (DdsHeader::CAPS_MIPMAP, "MIPMAP"),
];

const CAPS2_NAMES: &[(u32, &str)] = &[
    (DdsHeader::CAPS2_CUBEMAP, "CUBEMAP"),
    (0x400, "POSITIVEX"),
    (0x800, "NEGATIVEX"),
    (0x1000, "POSITIVEY"),
    (0x2000, "NEGATIVEY"),
    (0x4000, "POSITIVEZ"),
    (0x8000, "NEGATIVEZ"),
    (DdsHeader::CAPS2_VOLUME, "VOLUME"),
];

const PIXEL_FLAG_NAMES: &[(u32, &str)] = &[
    (DdsPixelFormat::ALPHAPIXELS, "ALPHAPIXELS"),
    (DdsPixelFormat::ALPHA, "ALPHA"),
    (DdsPixelFormat::FOURCC, "FOURCC"),
    (DdsPixelFormat::RGB, "RGB"),
    (DdsPixelFormat::YUV, "YUV"),
    (DdsPixelFormat::LUMINANCE, "LUMINANCE"),
];

struct Flags(u32, &'static [(u32, &'static str)]);

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)?;
        let names: Vec<&str> = self
            .1
            .iter()
            .filter(|(bit, _)| self.0 & bit == *bit)
            .map(|(_, name)| *name)
            .collect();
        if !names.is_empty() {
            write!(f, " [{}]", names.join(" | "))?;
        }
        Ok(())
    }
}

impl fmt::Display for DdsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.header;
        let pf = h.pixel_format;
        let (size, flags, pitch, caps, caps2, caps3, caps4) =
            (h.size, h.flags, h.pitch_or_linear_size, h.caps, h.caps2, h.caps3, h.caps4);

        writeln!(f, "Magic: \"DDS \"")?;
        writeln!(f, "Size: {size}")?;
        writeln!(f, "Flags: {}", Flags(flags, HEADER_FLAG_NAMES))?;
        writeln!(f, "Width: {}, Height: {}, Depth: {}", self.width(), self.height(), self.depth())?;
        writeln!(f, "PitchOrLinearSize: {pitch}")?;
        writeln!(f, "MipmapCount: {}", self.mipmap_count())?;
        writeln!(f, "Caps: {}", Flags(caps, CAPS_NAMES))?;
        writeln!(f, "Caps2: {}", Flags(caps2, CAPS2_NAMES))?;
        writeln!(f, "Caps3: {caps3:#x}")?;
        writeln!(f, "Caps4: {caps4:#x}")?;

        let (pf_size, pf_flags, bits) = (pf.size, pf.flags, pf.rgb_bit_count);
        let (r, g, b, a) = (pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask);
        writeln!(f, "PixelFormat:")?;
        writeln!(f, "    Size: {pf_size}")?;
        writeln!(f, "    Flags: {}", Flags(pf_flags, PIXEL_FLAG_NAMES))?;
        writeln!(f, "    FourCC: {}", pf.four_cc)?;
        writeln!(f, "    RGB BitCount: {bits}")?;
        writeln!(f, "    Masks: R {r:#010x} G {g:#010x} B {b:#010x} A {a:#010x}")?;

        match &self.dx10 {
            Some(dx10) => {
                let (format, dim, misc, array, misc2) = (
                    dx10.dxgi_format,
                    dx10.resource_dimension,
                    dx10.misc_flag,
                    dx10.array_size,
                    dx10.misc_flags2,
                );
                writeln!(f, "DX10:")?;
                writeln!(f, "    Format: {} ({format})", DxgiFormat(format))?;
                writeln!(f, "    Dimension: {:?} ({dim})", dx10.dimension())?;
                writeln!(f, "    MiscFlag: {misc:#b}")?;
                writeln!(f, "    ArraySize: {array}")?;
                writeln!(f, "    MiscFlags2: {misc2:#b}")?;
            }
            None => writeln!(f, "DX10: none")?,
        }

        match self.dxgi_format() {
            Some(format) => write!(f, "Resolved: {} {}", self.kind(), format),
            None => write!(f, "Resolved: {} (no DXGI equivalent)", self.kind()),
        }
    }
}
