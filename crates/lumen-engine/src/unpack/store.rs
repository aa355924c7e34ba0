use crate::driver::gl::{self, GlEnum};

/// Client pixel component type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelType {
    UnsignedByte,
    Float,
    UnsignedShort4444,
    UnsignedShort5551,
    UnsignedShort565,
}

impl PixelType {
    pub fn from_gl(value: GlEnum) -> Option<Self> {
        Some(match value {
            gl::UNSIGNED_BYTE => Self::UnsignedByte,
            gl::FLOAT => Self::Float,
            gl::UNSIGNED_SHORT_4_4_4_4 => Self::UnsignedShort4444,
            gl::UNSIGNED_SHORT_5_5_5_1 => Self::UnsignedShort5551,
            gl::UNSIGNED_SHORT_5_6_5 => Self::UnsignedShort565,
            _ => return None,
        })
    }

    /// Packed types store a whole pixel in one 16-bit word.
    #[inline]
    pub fn is_packed(self) -> bool {
        matches!(
            self,
            Self::UnsignedShort4444 | Self::UnsignedShort5551 | Self::UnsignedShort565
        )
    }
}

/// Client pixel format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Alpha,
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_gl(value: GlEnum) -> Option<Self> {
        Some(match value {
            gl::ALPHA => Self::Alpha,
            gl::LUMINANCE => Self::Luminance,
            gl::LUMINANCE_ALPHA => Self::LuminanceAlpha,
            gl::RGB => Self::Rgb,
            gl::RGBA => Self::Rgba,
            _ => return None,
        })
    }

    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Self::Alpha | Self::Luminance => 1,
            Self::LuminanceAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Formats premultiplication applies to.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::LuminanceAlpha | Self::Rgba)
    }
}

/// Per-context unpack configuration set through `pixel_store_i`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelStore {
    pub flip_y: bool,
    pub premultiply_alpha: bool,
    /// Stored and reported; never acted on.
    pub colorspace_conversion: GlEnum,
    /// Row alignment in bytes: 1, 2, 4 or 8.
    pub unpack_alignment: u32,
}

impl Default for PixelStore {
    fn default() -> Self {
        Self {
            flip_y: false,
            premultiply_alpha: false,
            colorspace_conversion: gl::BROWSER_DEFAULT_WEBGL,
            unpack_alignment: 4,
        }
    }
}

impl PixelStore {
    /// Alignments the unpack state accepts.
    pub const ALIGNMENTS: [u32; 4] = [1, 2, 4, 8];

    /// True when uploads can skip the transform and use client memory as is.
    #[inline]
    pub fn is_passthrough(&self) -> bool {
        !self.flip_y && !self.premultiply_alpha
    }

    /// Bytes between the starts of consecutive rows.
    ///
    /// `pixel_size * width` rounded up to the unpack alignment, or `None`
    /// when that overflows.
    #[inline]
    pub fn row_stride(&self, pixel_size: usize, width: usize) -> Option<usize> {
        let align = self.unpack_alignment.max(1) as usize;
        pixel_size.checked_mul(width)?.div_ceil(align).checked_mul(align)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_is_passthrough() {
        let store = PixelStore::default();
        assert!(store.is_passthrough());
        assert_eq!(store.unpack_alignment, 4);
        assert_eq!(store.colorspace_conversion, gl::BROWSER_DEFAULT_WEBGL);
    }

    #[test]
    fn row_stride_rounds_up_to_alignment() {
        let store = PixelStore::default();
        assert_eq!(store.row_stride(3, 3), Some(12));
        assert_eq!(store.row_stride(4, 3), Some(12));
        assert_eq!(store.row_stride(1, 5), Some(8));
        assert_eq!(store.row_stride(16, usize::MAX), None);
    }

    #[test]
    fn row_stride_with_byte_alignment_is_tight() {
        let store = PixelStore { unpack_alignment: 1, ..PixelStore::default() };
        assert_eq!(store.row_stride(3, 3), Some(9));
    }

    #[test]
    fn from_gl_rejects_unknown() {
        assert_eq!(PixelType::from_gl(0x1234), None);
        assert_eq!(PixelFormat::from_gl(gl::UNSIGNED_BYTE), None);
        assert_eq!(PixelFormat::from_gl(gl::LUMINANCE_ALPHA), Some(PixelFormat::LuminanceAlpha));
    }
}
