//! DXGI format metadata.
//!
//! [`FORMATS`] is indexed directly by DXGI code for `0..=115`; the three
//! late additions (`P208`, `V208`, `V408`) live at `130..=132` and are kept
//! in a separate tail table.

use crate::header::{DdsPixelFormat, FourCC};
use crate::{Error, Result};

/// Static metadata for one DXGI format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Name without the `DXGI_FORMAT_` prefix.
    pub name: &'static str,
    /// Bytes per pixel, or per 4x4 block for block-compressed formats.
    /// 0 when the size is not a whole number of bytes per pixel.
    pub bytes_per_pixel_or_block: u32,
    /// Block-compressed format.
    pub compressed: bool,
}

const fn px(name: &'static str, bytes_per_pixel_or_block: u32) -> FormatInfo {
    FormatInfo { name, bytes_per_pixel_or_block, compressed: false }
}

const fn bc(name: &'static str, bytes_per_block: u32) -> FormatInfo {
    FormatInfo { name, bytes_per_pixel_or_block: bytes_per_block, compressed: true }
}

/// DXGI formats `0..=115`, indexed by code.
pub static FORMATS: [FormatInfo; 116] = [
    px("UNKNOWN", 0),
    px("R32G32B32A32_TYPELESS", 16),
    px("R32G32B32A32_FLOAT", 16),
    px("R32G32B32A32_UINT", 16),
    px("R32G32B32A32_SINT", 16),
    px("R32G32B32_TYPELESS", 12),
    px("R32G32B32_FLOAT", 12),
    px("R32G32B32_UINT", 12),
    px("R32G32B32_SINT", 12),
    px("R16G16B16A16_TYPELESS", 8),
    px("R16G16B16A16_FLOAT", 8),
    px("R16G16B16A16_UNORM", 8),
    px("R16G16B16A16_UINT", 8),
    px("R16G16B16A16_SNORM", 8),
    px("R16G16B16A16_SINT", 8),
    px("R32G32_TYPELESS", 8),
    px("R32G32_FLOAT", 8),
    px("R32G32_UINT", 8),
    px("R32G32_SINT", 8),
    px("R32G8X24_TYPELESS", 8),
    px("D32_FLOAT_S8X24_UINT", 8),
    px("R32_FLOAT_X8X24_TYPELESS", 8),
    px("X32_TYPELESS_G8X24_UINT", 8),
    px("R10G10B10A2_TYPELESS", 4),
    px("R10G10B10A2_UNORM", 4),
    px("R10G10B10A2_UINT", 4),
    px("R11G11B10_FLOAT", 4),
    px("R8G8B8A8_TYPELESS", 4),
    px("R8G8B8A8_UNORM", 4),
    px("R8G8B8A8_UNORM_SRGB", 4),
    px("R8G8B8A8_UINT", 4),
    px("R8G8B8A8_SNORM", 4),
    px("R8G8B8A8_SINT", 4),
    px("R16G16_TYPELESS", 4),
    px("R16G16_FLOAT", 4),
    px("R16G16_UNORM", 4),
    px("R16G16_UINT", 4),
    px("R16G16_SNORM", 4),
    px("R16G16_SINT", 4),
    px("R32_TYPELESS", 4),
    px("D32_FLOAT", 4),
    px("R32_FLOAT", 4),
    px("R32_UINT", 4),
    px("R32_SINT", 4),
    px("R24G8_TYPELESS", 4),
    px("D24_UNORM_S8_UINT", 4),
    px("R24_UNORM_X8_TYPELESS", 4),
    px("X24_TYPELESS_G8_UINT", 4),
    px("R8G8_TYPELESS", 2),
    px("R8G8_UNORM", 2),
    px("R8G8_UINT", 2),
    px("R8G8_SNORM", 2),
    px("R8G8_SINT", 2),
    px("R16_TYPELESS", 2),
    px("R16_FLOAT", 2),
    px("D16_UNORM", 2),
    px("R16_UNORM", 2),
    px("R16_UINT", 2),
    px("R16_SNORM", 2),
    px("R16_SINT", 2),
    px("R8_TYPELESS", 1),
    px("R8_UNORM", 1),
    px("R8_UINT", 1),
    px("R8_SNORM", 1),
    px("R8_SINT", 1),
    px("A8_UNORM", 1),
    px("R1_UNORM", 0),
    px("R9G9B9E5_SHAREDEXP", 4),
    px("R8G8_B8G8_UNORM", 4),
    px("G8R8_G8B8_UNORM", 4),
    bc("BC1_TYPELESS", 8),
    bc("BC1_UNORM", 8),
    bc("BC1_UNORM_SRGB", 8),
    bc("BC2_TYPELESS", 16),
    bc("BC2_UNORM", 16),
    bc("BC2_UNORM_SRGB", 16),
    bc("BC3_TYPELESS", 16),
    bc("BC3_UNORM", 16),
    bc("BC3_UNORM_SRGB", 16),
    bc("BC4_TYPELESS", 8),
    bc("BC4_UNORM", 8),
    bc("BC4_SNORM", 8),
    bc("BC5_TYPELESS", 16),
    bc("BC5_UNORM", 16),
    bc("BC5_SNORM", 16),
    px("B5G6R5_UNORM", 2),
    px("B5G5R5A1_UNORM", 2),
    px("B8G8R8A8_UNORM", 4),
    px("B8G8R8X8_UNORM", 4),
    px("R10G10B10_XR_BIAS_A2_UNORM", 4),
    px("B8G8R8A8_TYPELESS", 4),
    px("B8G8R8A8_UNORM_SRGB", 4),
    px("B8G8R8X8_TYPELESS", 4),
    px("B8G8R8X8_UNORM_SRGB", 4),
    bc("BC6H_TYPELESS", 16),
    bc("BC6H_UF16", 16),
    bc("BC6H_SF16", 16),
    bc("BC7_TYPELESS", 16),
    bc("BC7_UNORM", 16),
    bc("BC7_UNORM_SRGB", 16),
    px("AYUV", 4),
    px("Y410", 4),
    px("Y416", 8),
    px("NV12", 0),
    px("P010", 0),
    px("P016", 0),
    px("420_OPAQUE", 0),
    px("YUY2", 4),
    px("Y210", 8),
    px("Y216", 8),
    px("NV11", 0),
    px("AI44", 1),
    px("IA44", 1),
    px("P8", 1),
    px("A8P8", 2),
    px("B4G4R4A4_UNORM", 2),
];

const TAIL_START: u32 = 130;

static TAIL_FORMATS: [FormatInfo; 3] = [px("P208", 0), px("V208", 0), px("V408", 0)];

/// A raw DXGI format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    pub const UNKNOWN: Self = Self(0);
    pub const R32G32B32A32_FLOAT: Self = Self(2);
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    pub const R16G16B16A16_UNORM: Self = Self(11);
    pub const R16G16B16A16_SNORM: Self = Self(13);
    pub const R32G32_FLOAT: Self = Self(16);
    pub const R10G10B10A2_UNORM: Self = Self(24);
    pub const R11G11B10_FLOAT: Self = Self(26);
    pub const R8G8B8A8_TYPELESS: Self = Self(27);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    pub const R8G8B8A8_UINT: Self = Self(30);
    pub const R8G8B8A8_SNORM: Self = Self(31);
    pub const R8G8B8A8_SINT: Self = Self(32);
    pub const R16G16_FLOAT: Self = Self(34);
    pub const R16G16_UNORM: Self = Self(35);
    pub const R32_FLOAT: Self = Self(41);
    pub const R8G8_TYPELESS: Self = Self(48);
    pub const R8G8_UNORM: Self = Self(49);
    pub const R8G8_UINT: Self = Self(50);
    pub const R8G8_SNORM: Self = Self(51);
    pub const R8G8_SINT: Self = Self(52);
    pub const R16_FLOAT: Self = Self(54);
    pub const R16_UNORM: Self = Self(56);
    pub const R8_TYPELESS: Self = Self(60);
    pub const R8_UNORM: Self = Self(61);
    pub const R8_UINT: Self = Self(62);
    pub const R8_SNORM: Self = Self(63);
    pub const R8_SINT: Self = Self(64);
    pub const A8_UNORM: Self = Self(65);
    pub const BC1_UNORM: Self = Self(71);
    pub const BC2_UNORM: Self = Self(74);
    pub const BC3_UNORM: Self = Self(77);
    pub const BC4_UNORM: Self = Self(80);
    pub const BC4_SNORM: Self = Self(81);
    pub const BC5_UNORM: Self = Self(83);
    pub const BC5_SNORM: Self = Self(84);
    pub const B5G6R5_UNORM: Self = Self(85);
    pub const B5G5R5A1_UNORM: Self = Self(86);
    pub const B8G8R8A8_UNORM: Self = Self(87);
    pub const B8G8R8X8_UNORM: Self = Self(88);
    pub const BC7_UNORM: Self = Self(98);
    pub const B4G4R4A4_UNORM: Self = Self(115);

    /// Look up the table entry for this code.
    pub fn info(self) -> Result<&'static FormatInfo> {
        let code = self.0;
        let entry = if (code as usize) < FORMATS.len() {
            FORMATS.get(code as usize)
        } else {
            code.checked_sub(TAIL_START)
                .and_then(|i| TAIL_FORMATS.get(i as usize))
        };
        entry.ok_or(Error::UnknownFormat(code))
    }

    /// Bytes per pixel, or per block for compressed formats.
    pub fn bytes_per_pixel_or_block(self) -> Result<u32> {
        self.info().map(|info| info.bytes_per_pixel_or_block)
    }

    /// Whether the format is block-compressed.
    pub fn is_compressed(self) -> Result<bool> {
        self.info().map(|info| info.compressed)
    }

    /// Table name without the `DXGI_FORMAT_` prefix.
    pub fn name(self) -> Option<&'static str> {
        self.info().ok().map(|info| info.name)
    }

    /// Infer the DXGI equivalent of a legacy (pre-DX10) pixel format.
    ///
    /// Returns `None` for layouts with no DXGI equivalent, such as 24-bit RGB.
    pub fn from_legacy(pf: &DdsPixelFormat) -> Option<Self> {
        if pf.has_flag(DdsPixelFormat::FOURCC) {
            return Self::from_four_cc(pf.four_cc);
        }

        let bits = pf.rgb_bit_count;
        let masks = (pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask);

        if pf.has_flag(DdsPixelFormat::RGB) {
            return match (bits, masks) {
                (32, (0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000)) => Some(Self::R8G8B8A8_UNORM),
                (32, (0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000)) => Some(Self::B8G8R8A8_UNORM),
                (32, (0xFF_0000, 0xFF00, 0xFF, 0)) => Some(Self::B8G8R8X8_UNORM),
                (32, (0x3FF, 0xF_FC00, 0x3FF0_0000, 0xC000_0000)) => Some(Self::R10G10B10A2_UNORM),
                (32, (0xFFFF, 0xFFFF_0000, 0, 0)) => Some(Self::R16G16_UNORM),
                (16, (0xF800, 0x07E0, 0x001F, 0)) => Some(Self::B5G6R5_UNORM),
                (16, (0x7C00, 0x03E0, 0x001F, 0x8000)) => Some(Self::B5G5R5A1_UNORM),
                (16, (0x0F00, 0x00F0, 0x000F, 0xF000)) => Some(Self::B4G4R4A4_UNORM),
                _ => None,
            };
        }

        if pf.has_flag(DdsPixelFormat::LUMINANCE) {
            return match (bits, masks) {
                (8, (0xFF, _, _, 0)) => Some(Self::R8_UNORM),
                (16, (0xFFFF, _, _, 0)) => Some(Self::R16_UNORM),
                (16, (0xFF, _, _, 0xFF00)) => Some(Self::R8G8_UNORM),
                _ => None,
            };
        }

        if pf.has_flag(DdsPixelFormat::ALPHA) && bits == 8 {
            return Some(Self::A8_UNORM);
        }

        None
    }

    fn from_four_cc(four_cc: FourCC) -> Option<Self> {
        let format = match four_cc {
            FourCC::DXT1 => Self::BC1_UNORM,
            FourCC::DXT2 | FourCC::DXT3 => Self::BC2_UNORM,
            FourCC::DXT4 | FourCC::DXT5 => Self::BC3_UNORM,
            FourCC::ATI1 | FourCC::BC4U => Self::BC4_UNORM,
            FourCC::BC4S => Self::BC4_SNORM,
            FourCC::ATI2 | FourCC::BC5U => Self::BC5_UNORM,
            FourCC::BC5S => Self::BC5_SNORM,
            // D3DFORMAT values stored in place of a tag
            other => match other.as_u32() {
                36 => Self::R16G16B16A16_UNORM,
                110 => Self::R16G16B16A16_SNORM,
                111 => Self::R16_FLOAT,
                112 => Self::R16G16_FLOAT,
                113 => Self::R16G16B16A16_FLOAT,
                114 => Self::R32_FLOAT,
                115 => Self::R32G32_FLOAT,
                116 => Self::R32G32B32A32_FLOAT,
                _ => return None,
            },
        };
        Some(format)
    }
}

impl std::fmt::Display for DxgiFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "DXGI_FORMAT_{name}"),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}

impl From<u32> for DxgiFormat {
    fn from(code: u32) -> Self {
        Self(code)
    }
}
