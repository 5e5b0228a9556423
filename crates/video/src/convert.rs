use crate::*;

/// Alpha written when a frame without an alpha channel is expanded to RGBA.
pub const OPAQUE_ALPHA: u8 = 255;

/// Expand `src` into 4-channel RGBA, writing into `out`.
///
/// Luma broadcasts into R, G and B; RGB gains an opaque alpha; RGBA is copied.
/// `out` is resized to exactly `width * height * 4` bytes.
pub fn expand_to_rgba(src: &Frame, out: &mut Vec<u8>) -> Result<(), VideoError> {
    src.ensure_continuous()?;
    expand_pixels_to_rgba(src.layout, &src.data, out);
    Ok(())
}

/// Same as [`expand_to_rgba`] for bare interleaved pixels. Trailing partial pixels are ignored.
pub fn expand_pixels_to_rgba(layout: PixelLayout, data: &[u8], out: &mut Vec<u8>) {
    let pixels = data.len() / layout.channels();
    out.resize(pixels * 4, 0);
    match layout {
        PixelLayout::Luma => {
            for (dst, &l) in out.chunks_exact_mut(4).zip(data.iter()) {
                dst.copy_from_slice(&[l, l, l, OPAQUE_ALPHA]);
            }
        }
        PixelLayout::Rgb => {
            for (dst, rgb) in out.chunks_exact_mut(4).zip(data.chunks_exact(3)) {
                dst.copy_from_slice(&[rgb[0], rgb[1], rgb[2], OPAQUE_ALPHA]);
            }
        }
        PixelLayout::Rgba => out.copy_from_slice(&data[..pixels * 4]),
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    [
        (y + ((359 * v) >> 8)).clamp(0, 255) as u8,
        (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8,
        (y + ((454 * u) >> 8)).clamp(0, 255) as u8,
    ]
}

/// Converts packed YUYV (4:2:2) to interleaved RGB.
///
/// Returns `None` if `data` is shorter than `width * height * 2` bytes.
pub fn yuyv_to_rgb(data: &[u8], width: usize, height: usize) -> Option<Vec<u8>> {
    let pixel_count = width * height;
    let expected_len = pixel_count * 2;
    if data.len() < expected_len {
        return None;
    }
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data[..expected_len].chunks_exact(4) {
        rgb.extend_from_slice(&yuv_to_rgb(chunk[0], chunk[1], chunk[3]));
        rgb.extend_from_slice(&yuv_to_rgb(chunk[2], chunk[1], chunk[3]));
    }
    Some(rgb)
}
