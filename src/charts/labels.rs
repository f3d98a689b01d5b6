//! Rotated tick labels
//! Plotters can only turn text by multiples of 90 degrees, so angled labels
//! are rendered to a small bitmap, rotated, then blended onto the chart.

use crate::charts::{draw_err, ChartError};
use image::{Rgb, RgbImage};
use plotters::prelude::*;

const WHITE_PX: Rgb<u8> = Rgb([255, 255, 255]);
const PADDING: u32 = 2;

/// Render `text` in black on a white, tightly padded bitmap.
pub fn render_text(text: &str, font_size: f64) -> Result<RgbImage, ChartError> {
    let style = ("sans-serif", font_size).into_font().color(&BLACK);
    let (w, h) = style.font.box_size(text).map_err(draw_err)?;
    let size = (w.max(1) + 2 * PADDING, h.max(1) + 2 * PADDING);

    let mut buffer = vec![255u8; (size.0 * size.1 * 3) as usize];
    {
        let area = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        area.draw(&Text::new(
            text.to_string(),
            (PADDING as i32, PADDING as i32),
            style,
        ))
        .map_err(draw_err)?;
        area.present().map_err(draw_err)?;
    }
    RgbImage::from_raw(size.0, size.1, buffer).ok_or(ChartError::Buffer)
}

/// Rotate counter-clockwise by `degrees` with nearest-neighbour sampling.
/// The canvas grows to fit; uncovered pixels are white.
pub fn rotate(src: &RgbImage, degrees: f64) -> RgbImage {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (src.width() as f64, src.height() as f64);

    let out_w = ((w * cos.abs() + h * sin.abs()) - 1e-9).ceil().max(1.0) as u32;
    let out_h = ((w * sin.abs() + h * cos.abs()) - 1e-9).ceil().max(1.0) as u32;
    let mut out = RgbImage::from_pixel(out_w, out_h, WHITE_PX);

    let (cx, cy) = (w / 2.0, h / 2.0);
    let (ocx, ocy) = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - ocx;
        let dy = y as f64 + 0.5 - ocy;
        // Inverse mapping into the source; y grows downwards.
        let sx = (cx + dx * cos - dy * sin).floor();
        let sy = (cy + dx * sin + dy * cos).floor();
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *px = *src.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

/// Copy `src` onto `dst` at (left, top) keeping the darker channel, so the
/// white label background never covers the chart. Clipped at the edges.
pub fn blend_darken(dst: &mut RgbImage, src: &RgbImage, left: i64, top: i64) {
    for (x, y, px) in src.enumerate_pixels() {
        let dx = left + x as i64;
        let dy = top + y as i64;
        if dx < 0 || dy < 0 || dx >= dst.width() as i64 || dy >= dst.height() as i64 {
            continue;
        }
        let target = dst.get_pixel_mut(dx as u32, dy as u32);
        for c in 0..3 {
            target[c] = target[c].min(px[c]);
        }
    }
}

/// Draw `text` rotated by `degrees`, horizontally centred on `anchor.0`
/// with its top edge `gap` pixels below `anchor.1`.
pub fn draw_rotated_label(
    img: &mut RgbImage,
    text: &str,
    anchor: (i32, i32),
    degrees: f64,
    font_size: f64,
    gap: i32,
) -> Result<(), ChartError> {
    let rotated = rotate(&render_text(text, font_size)?, degrees);
    let left = anchor.0 as i64 - rotated.width() as i64 / 2;
    let top = (anchor.1 + gap) as i64;
    blend_darken(img, &rotated, left, top);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK_PX: Rgb<u8> = Rgb([0, 0, 0]);

    fn bar(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, BLACK_PX)
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let src = bar(10, 4);
        assert_eq!(rotate(&src, 0.0), src);
    }

    #[test]
    fn test_rotate_ninety_swaps_dimensions() {
        let out = rotate(&bar(10, 4), 90.0);
        assert_eq!(out.dimensions(), (4, 10));
    }

    #[test]
    fn test_rotate_forty_five_runs_diagonally() {
        let mut src = RgbImage::from_pixel(40, 4, WHITE_PX);
        for x in 0..40 {
            src.put_pixel(x, 1, BLACK_PX);
            src.put_pixel(x, 2, BLACK_PX);
        }
        let out = rotate(&src, 45.0);
        let (w, h) = out.dimensions();
        assert_eq!(w, h);

        // Counter-clockwise: text rises to the right.
        assert_eq!(out.get_pixel(w - 4, 3), &BLACK_PX);
        assert_eq!(out.get_pixel(3, h - 4), &BLACK_PX);
        assert_eq!(out.get_pixel(2, 2), &WHITE_PX);
        assert_eq!(out.get_pixel(w - 3, h - 3), &WHITE_PX);
    }

    #[test]
    fn test_blend_darken_clips_and_keeps_dark() {
        let mut dst = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let mut src = RgbImage::from_pixel(3, 3, WHITE_PX);
        src.put_pixel(1, 1, BLACK_PX);

        blend_darken(&mut dst, &src, 2, 2);
        assert_eq!(dst.get_pixel(3, 3), &BLACK_PX);
        assert_eq!(dst.get_pixel(2, 2), &Rgb([100, 100, 100]));
    }
}
