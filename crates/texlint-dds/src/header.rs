//! DDS header structures.
//!
//! Layouts follow the public DDS file format: a 4-byte magic, a 124-byte
//! [`DdsHeader`], and an optional 20-byte [`DdsHeaderDxt10`] when the pixel
//! format FourCC is `DX10`. All fields are little-endian.

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

/// DDS file header, excluding the leading magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    pub const FLAG_CAPS: u32 = 0x1;
    pub const FLAG_HEIGHT: u32 = 0x2;
    pub const FLAG_WIDTH: u32 = 0x4;
    pub const FLAG_PITCH: u32 = 0x8;
    pub const FLAG_PIXELFORMAT: u32 = 0x1000;
    pub const FLAG_MIPMAPCOUNT: u32 = 0x20000;
    pub const FLAG_LINEARSIZE: u32 = 0x80000;
    pub const FLAG_DEPTH: u32 = 0x800000;

    pub const CAPS_COMPLEX: u32 = 0x8;
    pub const CAPS_TEXTURE: u32 = 0x1000;
    pub const CAPS_MIPMAP: u32 = 0x400000;

    pub const CAPS2_CUBEMAP: u32 = 0x200;
    pub const CAPS2_CUBEMAP_ALL_FACES: u32 = 0xFC00;
    pub const CAPS2_VOLUME: u32 = 0x200000;

    /// Build a header for a 2D texture with the given pixel format.
    ///
    /// Flags and caps are filled in the way common DDS writers do, so the
    /// result is accepted by other tools.
    pub fn new(width: u32, height: u32, mipmap_count: u32, pixel_format: DdsPixelFormat) -> Self {
        let mut header = Self::new_zeroed();
        header.size = Self::SIZE;
        header.flags = Self::FLAG_CAPS | Self::FLAG_HEIGHT | Self::FLAG_WIDTH | Self::FLAG_PIXELFORMAT;
        header.height = height;
        header.width = width;
        header.depth = 1;
        header.mipmap_count = mipmap_count;
        header.pixel_format = pixel_format;
        header.caps = Self::CAPS_TEXTURE;
        if mipmap_count > 1 {
            header.flags |= Self::FLAG_MIPMAPCOUNT;
            header.caps |= Self::CAPS_COMPLEX | Self::CAPS_MIPMAP;
        }
        header
    }

    /// Mark the header as a full cubemap (all six faces).
    pub fn with_cubemap_caps(mut self) -> Self {
        self.caps |= Self::CAPS_COMPLEX;
        self.caps2 |= Self::CAPS2_CUBEMAP | Self::CAPS2_CUBEMAP_ALL_FACES;
        self
    }

    /// Check if this is a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.four_cc == FourCC::DX10
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    pub const ALPHAPIXELS: u32 = 0x1;
    pub const ALPHA: u32 = 0x2;
    pub const FOURCC: u32 = 0x4;
    pub const RGB: u32 = 0x40;
    pub const YUV: u32 = 0x200;
    pub const LUMINANCE: u32 = 0x20000;

    /// Pixel format announcing a trailing DX10 header.
    pub fn dx10() -> Self {
        Self::from_four_cc(FourCC::DX10)
    }

    /// Pixel format identified only by a FourCC.
    pub fn from_four_cc(four_cc: FourCC) -> Self {
        let mut pf = Self::new_zeroed();
        pf.size = Self::SIZE;
        pf.flags = Self::FOURCC;
        pf.four_cc = four_cc;
        pf
    }

    /// Uncompressed pixel format described by bit masks.
    pub fn from_masks(flags: u32, bit_count: u32, r: u32, g: u32, b: u32, a: u32) -> Self {
        let mut pf = Self::new_zeroed();
        pf.size = Self::SIZE;
        pf.flags = flags;
        pf.rgb_bit_count = bit_count;
        pf.r_bit_mask = r;
        pf.g_bit_mask = g;
        pf.b_bit_mask = b;
        pf.a_bit_mask = a;
        pf
    }

    /// Check whether a flag bit is set.
    #[inline]
    pub fn has_flag(&self, flag: u32) -> bool {
        let flags = self.flags;
        flags & flag != 0
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const DXT1: Self = Self(*b"DXT1");
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    pub const ATI1: Self = Self(*b"ATI1");
    pub const ATI2: Self = Self(*b"ATI2");
    pub const BC4U: Self = Self(*b"BC4U");
    pub const BC4S: Self = Self(*b"BC4S");
    pub const BC5U: Self = Self(*b"BC5U");
    pub const BC5S: Self = Self(*b"BC5S");
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");

    /// Interpret the code as a little-endian integer.
    ///
    /// Legacy writers store D3DFORMAT enum values here instead of ASCII
    /// tags, e.g. 113 for `D3DFMT_A16B16G16R16F`.
    #[inline]
    pub fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            for b in self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{}", self.as_u32())
        }
    }
}

/// Resource dimension stored in the DX10 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDimension {
    Unknown,
    Buffer,
    Texture1D,
    Texture2D,
    Texture3D,
    /// Any value outside the documented range.
    Other(u32),
}

impl From<u32> for ResourceDimension {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::Buffer,
            2 => Self::Texture1D,
            3 => Self::Texture2D,
            4 => Self::Texture3D,
            other => Self::Other(other),
        }
    }
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    /// DXGI format.
    pub dxgi_format: u32,
    /// Resource dimension.
    pub resource_dimension: u32,
    /// Misc flags.
    pub misc_flag: u32,
    /// Array size.
    pub array_size: u32,
    /// Misc flags 2.
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    /// Serialized size in bytes.
    pub const SIZE: usize = 20;

    /// `DDS_RESOURCE_MISC_TEXTURECUBE`.
    pub const MISC_TEXTURECUBE: u32 = 0x4;

    /// DX10 header for a single 2D texture.
    pub fn texture_2d(dxgi_format: u32) -> Self {
        Self {
            dxgi_format,
            resource_dimension: 3,
            misc_flag: 0,
            array_size: 1,
            misc_flags2: 0,
        }
    }

    /// DX10 header for a single cubemap (six faces, array size 1).
    pub fn cubemap(dxgi_format: u32) -> Self {
        Self {
            misc_flag: Self::MISC_TEXTURECUBE,
            ..Self::texture_2d(dxgi_format)
        }
    }

    /// Decoded resource dimension.
    pub fn dimension(&self) -> ResourceDimension {
        ResourceDimension::from(self.resource_dimension)
    }

    /// Whether the cubemap misc flag is set.
    pub fn is_cubemap(&self) -> bool {
        let misc = self.misc_flag;
        misc & Self::MISC_TEXTURECUBE != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes_match_file_format() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), DdsPixelFormat::SIZE as usize);
        assert_eq!(std::mem::size_of::<DdsHeaderDxt10>(), DdsHeaderDxt10::SIZE);
    }

    #[test]
    fn test_new_sets_mipmap_caps_only_for_chains() {
        let single = DdsHeader::new(16, 16, 1, DdsPixelFormat::dx10());
        let single_caps = single.caps;
        assert_eq!(single_caps & DdsHeader::CAPS_MIPMAP, 0);

        let chain = DdsHeader::new(16, 16, 5, DdsPixelFormat::dx10());
        let chain_caps = chain.caps;
        let chain_flags = chain.flags;
        assert_ne!(chain_caps & DdsHeader::CAPS_MIPMAP, 0);
        assert_ne!(chain_flags & DdsHeader::FLAG_MIPMAPCOUNT, 0);
    }

    #[test]
    fn test_dx10_detection() {
        assert!(DdsHeader::new(4, 4, 1, DdsPixelFormat::dx10()).is_dx10());
        assert!(!DdsHeader::new(4, 4, 1, DdsPixelFormat::from_four_cc(FourCC::DXT1)).is_dx10());
    }

    #[test]
    fn test_cubemap_misc_flag() {
        assert!(DdsHeaderDxt10::cubemap(28).is_cubemap());
        assert!(!DdsHeaderDxt10::texture_2d(28).is_cubemap());
        assert_eq!(DdsHeaderDxt10::texture_2d(28).dimension(), ResourceDimension::Texture2D);
    }

    #[test]
    fn test_four_cc_display() {
        assert_eq!(FourCC::DX10.to_string(), "DX10");
        assert_eq!(FourCC(113u32.to_le_bytes()).to_string(), "113");
        assert_eq!(FourCC(113u32.to_le_bytes()).as_u32(), 113);
    }
}
