//! Fit-and-center compositing (letterboxing) onto a fixed-size canvas.
//!
//! The page image is only ever shrunk, never enlarged. When it already fits
//! inside the canvas it is pasted at its native size.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// Compute the size of `(width, height)` shrunk to fit inside
/// `(max_width, max_height)` with its aspect ratio preserved.
///
/// The constrained side is set to the box; the other side is the floor or
/// ceiling of its exact value, whichever reproduces the source aspect ratio
/// more closely, and never below 1 px.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (max_width >= width && max_height >= height) {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let (bx, by) = (max_width as f64, max_height as f64);

    if bx / by >= aspect {
        let exact = by * aspect;
        let w = closest(exact, |n| (aspect - n / by).abs());
        (w, max_height)
    } else {
        let exact = bx / aspect;
        let h = closest(exact, |n| {
            if n == 0.0 {
                0.0
            } else {
                (aspect - bx / n).abs()
            }
        });
        (max_width, h)
    }
}

fn closest(exact: f64, error: impl Fn(f64) -> f64) -> u32 {
    let lo = exact.floor();
    let hi = exact.ceil();
    let pick = if error(hi) < error(lo) { hi } else { lo };
    (pick as u32).max(1)
}

/// Shrink `img` to fit inside a `width × height` canvas filled with
/// `background`, centered with integer offsets (any odd pixel goes to the
/// right/bottom margin).
pub fn fit_and_center(
    img: &DynamicImage,
    width: u32,
    height: u32,
    background: Rgb<u8>,
) -> RgbImage {
    let src = img.to_rgb8();
    let (fit_w, fit_h) = fit_within(src.width(), src.height(), width, height);

    let scaled = if (fit_w, fit_h) == (src.width(), src.height()) {
        src
    } else {
        imageops::resize(&src, fit_w, fit_h, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::from_pixel(width, height, background);
    let left = (width - scaled.width()) / 2;
    let top = (height - scaled.height()) / 2;
    imageops::replace(&mut canvas, &scaled, left as i64, top as i64);

    debug!(
        "Composited {}x{} onto {}x{} canvas at ({}, {})",
        scaled.width(),
        scaled.height(),
        width,
        height,
        left,
        top
    );

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_without_change() {
        assert_eq!(fit_within(100, 50, 800, 600), (100, 50));
        assert_eq!(fit_within(800, 600, 800, 600), (800, 600));
    }

    #[test]
    fn wide_image_constrained_by_width() {
        // 2000x1000 into 800x600 → width-bound, height 400
        assert_eq!(fit_within(2000, 1000, 800, 600), (800, 400));
    }

    #[test]
    fn tall_image_constrained_by_height() {
        // US Letter at 300 DPI into 800x600
        assert_eq!(fit_within(2550, 3300, 800, 600), (464, 600));
    }

    #[test]
    fn never_below_one_pixel() {
        assert_eq!(fit_within(10_000, 1, 100, 100), (100, 1));
    }

    #[test]
    fn one_side_fits_other_does_not() {
        // Width already fits but height does not: still shrinks both.
        assert_eq!(fit_within(400, 1200, 800, 600), (200, 600));
    }

    #[test]
    fn canvas_has_requested_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2000, 1000, Rgb([0, 0, 0])));
        let out = fit_and_center(&img, 800, 600, Rgb([255, 255, 255]));
        assert_eq!(out.dimensions(), (800, 600));
    }

    #[test]
    fn letterbox_margins_keep_background() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2000, 1000, Rgb([0, 0, 0])));
        let bg = Rgb([10, 200, 30]);
        let out = fit_and_center(&img, 800, 600, bg);
        // Scaled image is 800x400 at top offset 100.
        assert_eq!(*out.get_pixel(400, 50), bg);
        assert_eq!(*out.get_pixel(400, 550), bg);
        assert_eq!(*out.get_pixel(400, 300), Rgb([0, 0, 0]));
    }

    #[test]
    fn small_image_is_centered_not_enlarged() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(11, 5, Rgb([0, 0, 0])));
        let bg = Rgb([255, 255, 255]);
        let out = fit_and_center(&img, 20, 10, bg);
        // left = (20 - 11) / 2 = 4, top = (10 - 5) / 2 = 2
        assert_eq!(*out.get_pixel(3, 4), bg);
        assert_eq!(*out.get_pixel(4, 2), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(14, 6), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(15, 6), bg);
        assert_eq!(*out.get_pixel(4, 7), bg);
    }
}
