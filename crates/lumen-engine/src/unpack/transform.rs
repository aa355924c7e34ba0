use std::borrow::Cow;
use std::fmt;

use super::store::{PixelFormat, PixelStore, PixelType};

/// Value written to a 5-5-5-1 pixel whose alpha bit is clear when
/// premultiplying.
///
/// Premultiplying a zero-alpha 5-5-5-1 pixel does not produce transparent
/// black: the pixel bytes are replaced with this value in little-endian order,
/// i.e. `[1, 0]`. Uploads depend on this exact output.
pub const PACKED_5551_ZERO_ALPHA: u16 = 0x0001;

/// Client buffer cannot be unpacked.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnpackError {
    /// The source holds fewer bytes than the declared image needs.
    SourceTooShort { required: usize, actual: usize },
    /// The declared image size does not fit in memory arithmetic.
    TooLarge { width: usize, height: usize },
}

impl fmt::Display for UnpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnpackError::SourceTooShort { required, actual } => {
                write!(f, "pixel source too short: need {required} bytes, got {actual}")
            }
            UnpackError::TooLarge { width, height } => {
                write!(f, "image of {width}x{height} pixels is too large")
            }
        }
    }
}

impl std::error::Error for UnpackError {}

/// Bytes per pixel of client memory.
///
/// One byte per channel for `UnsignedByte`, four per channel for `Float`, and
/// a single 16-bit word for the packed types regardless of `format`.
pub fn pixel_size(ty: PixelType, format: PixelFormat) -> usize {
    match ty {
        PixelType::UnsignedByte => format.channels(),
        PixelType::Float => 4 * format.channels(),
        PixelType::UnsignedShort4444 | PixelType::UnsignedShort5551 | PixelType::UnsignedShort565 => 2,
    }
}

/// Minimum source length for a `width` x `height` image.
///
/// Every row but the last is padded to the row stride.
pub fn required_len(
    store: &PixelStore,
    ty: PixelType,
    format: PixelFormat,
    width: usize,
    height: usize,
) -> Result<usize, UnpackError> {
    if width == 0 || height == 0 {
        return Ok(0);
    }
    let size = pixel_size(ty, format);
    store
        .row_stride(size, width)
        .and_then(|stride| stride.checked_mul(height - 1))
        .and_then(|padded| padded.checked_add(size * width))
        .ok_or(UnpackError::TooLarge { width, height })
}

/// Produces a freshly allocated, unpacked copy of `src`.
///
/// The output is `row_stride * height` bytes. With `flip_y`, source row `i`
/// lands at row `height - 1 - i`; only the `width * pixel_size` payload of each
/// row is copied and row padding is left zeroed. With `premultiply_alpha` on a
/// format carrying alpha, color channels are scaled by alpha afterwards.
pub fn unpack(
    store: &PixelStore,
    ty: PixelType,
    format: PixelFormat,
    width: usize,
    height: usize,
    src: &[u8],
) -> Result<Vec<u8>, UnpackError> {
    let required = required_len(store, ty, format, width, height)?;
    if src.len() < required {
        return Err(UnpackError::SourceTooShort { required, actual: src.len() });
    }

    // `required` fitting implies every product below fits too.
    let size = pixel_size(ty, format);
    let row_bytes = size * width;
    let stride = store
        .row_stride(size, width)
        .ok_or(UnpackError::TooLarge { width, height })?;
    let len = stride
        .checked_mul(height)
        .ok_or(UnpackError::TooLarge { width, height })?;
    let mut out = vec![0u8; len];

    if store.flip_y {
        for row in 0..height {
            let from = row * stride;
            let to = (height - 1 - row) * stride;
            out[to..to + row_bytes].copy_from_slice(&src[from..from + row_bytes]);
        }
    } else {
        let n = src.len().min(out.len());
        out[..n].copy_from_slice(&src[..n]);
    }

    if store.premultiply_alpha && format.has_alpha() {
        for row in 0..height {
            let start = row * stride;
            premultiply_row(&mut out[start..start + row_bytes], ty, format);
        }
    }

    Ok(out)
}

/// Returns the bytes to hand to the driver.
///
/// Borrows `src` untouched when neither flip nor premultiply is active; the
/// owned buffer otherwise is released when the caller drops it.
pub fn prepare<'a>(
    store: &PixelStore,
    ty: PixelType,
    format: PixelFormat,
    width: usize,
    height: usize,
    src: &'a [u8],
) -> Result<Cow<'a, [u8]>, UnpackError> {
    if store.is_passthrough() {
        return Ok(Cow::Borrowed(src));
    }
    unpack(store, ty, format, width, height, src).map(Cow::Owned)
}

#[inline]
fn scale(channel: u8, alpha: u8) -> u8 {
    (channel as u16 * alpha as u16 / 255) as u8
}

fn premultiply_row(row: &mut [u8], ty: PixelType, format: PixelFormat) {
    match (ty, format) {
        (PixelType::UnsignedByte, PixelFormat::LuminanceAlpha) => {
            let pixels: &mut [[u8; 2]] = bytemuck::cast_slice_mut(row);
            for [l, a] in pixels {
                *l = scale(*l, *a);
            }
        }
        (PixelType::UnsignedByte, PixelFormat::Rgba) => {
            let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(row);
            for [r, g, b, a] in pixels {
                *r = scale(*r, *a);
                *g = scale(*g, *a);
                *b = scale(*b, *a);
            }
        }
        // Nibbles are read per byte: byte 0 holds r (low) and g (high),
        // byte 1 holds b (low) and a (high).
        (PixelType::UnsignedShort4444, _) => {
            let pixels: &mut [[u8; 2]] = bytemuck::cast_slice_mut(row);
            for [lo, hi] in pixels {
                let a = *hi >> 4;
                let nibble = |c: u8| c * a / 15;
                let (r, g, b) = (nibble(*lo & 0xf), nibble(*lo >> 4), nibble(*hi & 0xf));
                *lo = r | (g << 4);
                *hi = b | (a << 4);
            }
        }
        // The alpha bit is bit 0 of the first byte.
        (PixelType::UnsignedShort5551, _) => {
            let pixels: &mut [[u8; 2]] = bytemuck::cast_slice_mut(row);
            for px in pixels {
                if px[0] & 1 == 0 {
                    *px = PACKED_5551_ZERO_ALPHA.to_le_bytes();
                }
            }
        }
        // Float and 5-6-5 data is uploaded as given.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(flip_y: bool, premultiply_alpha: bool) -> PixelStore {
        PixelStore { flip_y, premultiply_alpha, ..PixelStore::default() }
    }

    fn rows(height: usize, stride: usize) -> Vec<u8> {
        (0..height).flat_map(|r| vec![r as u8 + 1; stride]).collect()
    }

    // ── pixel_size ────────────────────────────────────────────────────────

    #[test]
    fn pixel_size_by_type_and_format() {
        assert_eq!(pixel_size(PixelType::UnsignedByte, PixelFormat::Alpha), 1);
        assert_eq!(pixel_size(PixelType::UnsignedByte, PixelFormat::LuminanceAlpha), 2);
        assert_eq!(pixel_size(PixelType::UnsignedByte, PixelFormat::Rgb), 3);
        assert_eq!(pixel_size(PixelType::UnsignedByte, PixelFormat::Rgba), 4);
        assert_eq!(pixel_size(PixelType::Float, PixelFormat::Rgba), 16);
        assert_eq!(pixel_size(PixelType::Float, PixelFormat::Luminance), 4);
        assert_eq!(pixel_size(PixelType::UnsignedShort565, PixelFormat::Rgb), 2);
        assert_eq!(pixel_size(PixelType::UnsignedShort4444, PixelFormat::Rgba), 2);
    }

    // ── copy / stride ─────────────────────────────────────────────────────

    #[test]
    fn identity_when_options_off_and_stride_natural() {
        let src: Vec<u8> = (0..48).collect();
        let out = unpack(&store(false, false), PixelType::UnsignedByte, PixelFormat::Rgba, 3, 4, &src)
            .unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn rgb_width_three_pads_rows_to_twelve() {
        // Rows are 9 payload bytes; with alignment 4 each occupies 12.
        let src: Vec<u8> = (1..=21).collect();
        let out = unpack(&store(true, false), PixelType::UnsignedByte, PixelFormat::Rgb, 3, 2, &src)
            .unwrap();
        assert_eq!(out.len(), 24);
        assert_eq!(&out[0..9], &src[12..21]);
        assert_eq!(&out[9..12], &[0, 0, 0]);
        assert_eq!(&out[12..21], &src[0..9]);
        assert_eq!(&out[21..24], &[0, 0, 0]);
    }

    #[test]
    fn last_row_need_not_be_padded() {
        let s = store(true, false);
        assert_eq!(required_len(&s, PixelType::UnsignedByte, PixelFormat::Rgb, 3, 2), Ok(21));
        let err = unpack(&s, PixelType::UnsignedByte, PixelFormat::Rgb, 3, 2, &[0; 20]).unwrap_err();
        assert_eq!(err, UnpackError::SourceTooShort { required: 21, actual: 20 });
    }

    #[test]
    fn oversized_image_is_rejected_before_allocating() {
        let s = store(true, false);
        let huge = i32::MAX as usize;
        assert_eq!(
            required_len(&s, PixelType::Float, PixelFormat::Rgba, huge, huge),
            Err(UnpackError::TooLarge { width: huge, height: huge })
        );
        let err = unpack(&s, PixelType::Float, PixelFormat::Rgba, usize::MAX, 1, &[0; 16]).unwrap_err();
        assert_eq!(err, UnpackError::TooLarge { width: usize::MAX, height: 1 });
    }

    #[test]
    fn empty_image_needs_no_source() {
        let out = unpack(&store(true, true), PixelType::UnsignedByte, PixelFormat::Rgba, 0, 5, &[])
            .unwrap();
        assert!(out.is_empty());
    }

    // ── flip ──────────────────────────────────────────────────────────────

    #[test]
    fn flip_single_row_is_noop() {
        let src = vec![9, 8, 7, 6];
        let out = unpack(&store(true, false), PixelType::UnsignedByte, PixelFormat::Rgba, 1, 1, &src)
            .unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn flip_reverses_four_rows() {
        let src = rows(4, 8);
        let out = unpack(&store(true, false), PixelType::UnsignedByte, PixelFormat::Rgba, 2, 4, &src)
            .unwrap();
        for row in 0..4 {
            assert_eq!(&out[row * 8..row * 8 + 8], &[(4 - row) as u8; 8]);
        }
    }

    // ── premultiply ───────────────────────────────────────────────────────

    #[test]
    fn premultiply_rgba8_half_alpha() {
        let out = unpack(
            &store(false, true),
            PixelType::UnsignedByte,
            PixelFormat::Rgba,
            1,
            1,
            &[255, 255, 255, 128],
        )
        .unwrap();
        assert_eq!(out, vec![128, 128, 128, 128]);
    }

    #[test]
    fn premultiply_luminance_alpha() {
        let out = unpack(
            &store(false, true),
            PixelType::UnsignedByte,
            PixelFormat::LuminanceAlpha,
            2,
            1,
            &[200, 0, 200, 255],
        )
        .unwrap();
        assert_eq!(out, vec![0, 0, 200, 255]);
    }

    #[test]
    fn premultiply_skips_formats_without_alpha() {
        let src = vec![255, 255, 255, 0];
        let out = unpack(&store(false, true), PixelType::UnsignedByte, PixelFormat::Rgb, 1, 1, &src)
            .unwrap();
        assert_eq!(&out[..3], &src[..3]);
    }

    #[test]
    fn premultiply_4444_scales_by_high_nibble_of_second_byte() {
        let out = unpack(
            &store(false, true),
            PixelType::UnsignedShort4444,
            PixelFormat::Rgba,
            2,
            1,
            &[0xff, 0x8f, 0x21, 0xf3],
        )
        .unwrap();
        // Alpha 8 scales 15 down to 8; the opaque pixel is unchanged.
        assert_eq!(out, vec![0x88, 0x88, 0x21, 0xf3]);
    }

    #[test]
    fn premultiply_4444_zero_alpha_clears_color() {
        let out = unpack(
            &store(false, true),
            PixelType::UnsignedShort4444,
            PixelFormat::Rgba,
            1,
            1,
            &[0xff, 0x0f, 0, 0],
        )
        .unwrap();
        assert_eq!(&out[..2], &[0x00, 0x00]);
    }

    #[test]
    fn premultiply_5551_zero_alpha_writes_sentinel() {
        let src = [0xfe, 0xff, 0xcd, 0xab];
        let out = unpack(
            &store(false, true),
            PixelType::UnsignedShort5551,
            PixelFormat::Rgba,
            2,
            1,
            &src,
        )
        .unwrap();
        assert_eq!(&out[..2], &[1, 0]);
        assert_eq!(u16::from_le_bytes([out[0], out[1]]), PACKED_5551_ZERO_ALPHA);
        assert_eq!(&out[2..], &[0xcd, 0xab]);
    }

    #[test]
    fn premultiply_leaves_float_data_alone() {
        let src: Vec<u8> = [1.0f32, 1.0, 1.0, 0.5]
            .iter()
            .flat_map(|c| c.to_ne_bytes())
            .collect();
        let out = unpack(&store(false, true), PixelType::Float, PixelFormat::Rgba, 1, 1, &src)
            .unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn flip_and_premultiply_combine() {
        let src = [255, 0, 0, 255, 255, 255, 255, 0];
        let out = unpack(&store(true, true), PixelType::UnsignedByte, PixelFormat::Rgba, 1, 2, &src)
            .unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 255, 0, 0, 255]);
    }

    // ── prepare ───────────────────────────────────────────────────────────

    #[test]
    fn prepare_borrows_when_passthrough() {
        let src = [1u8, 2, 3];
        let out = prepare(&store(false, false), PixelType::UnsignedByte, PixelFormat::Rgba, 5, 5, &src)
            .unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &src);
    }

    #[test]
    fn prepare_owns_when_flipping() {
        let src = [1u8, 2, 3, 4];
        let out = prepare(&store(true, false), PixelType::UnsignedByte, PixelFormat::Rgba, 1, 1, &src)
            .unwrap();
        assert!(matches!(out, Cow::Owned(_)));
    }
}
