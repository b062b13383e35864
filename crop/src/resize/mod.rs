pub mod png;

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};
use anyhow::{anyhow, bail, Result};
use tracing::debug;


/// Share of the source width the circle content is shrunk to.
pub const INSET_SCALE: f64 = config::DEFAULT_SCALE;

/// Width is `floor(width * scale)`, height follows the aspect ratio the way
/// resizers do when asked for a zero height: `floor(0.7 + height / (width / new_width))`.
pub fn target_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = ((width as f64 * scale).floor() as u32).max(1);
    let scale_x = width as f64 / w as f64;
    let h = ((0.7 + height as f64 / scale_x) as u32).max(1);

    (w, h)
}

pub fn resample(img: &DynamicImage, scale: f64) -> Result<RgbaImage> {
    if !(scale > 0.0 && scale <= 1.0) {
        bail!("Resample scale must be within (0, 1], got {}", scale)
    }

    let src = img.to_rgba8();
    let (width, height) = src.dimensions();
    let (w, h) = target_dimensions(width, height, scale);

    let src_image = Image::from_vec_u8(width, height, src.into_raw(), PixelType::U8x4)
        .map_err(|e| anyhow!("Failed to read source image into resize buffer: {}", e))?;

    let mut dst_image = Image::new(w, h, PixelType::U8x4);

    debug!("Resampling {}x{} image to width: {} and height: {}...", width, height, w, h);

    // Lanczos3 keeps the shrunk content free of aliasing
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    resizer.resize(&src_image, &mut dst_image, &options)
        .map_err(|e| anyhow!("Failed to resample image: {}", e))?;

    RgbaImage::from_raw(w, h, dst_image.into_vec())
        .ok_or_else(|| anyhow!("Resampled buffer doesn't match {}x{}", w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn square_dimensions() {
        assert_eq!(target_dimensions(100, 100, 0.81), (81, 81));
        assert_eq!(target_dimensions(64, 64, 0.81), (51, 51));
        assert_eq!(target_dimensions(100, 100, 1.0), (100, 100));
    }

    #[test]
    fn height_keeps_aspect_ratio() {
        assert_eq!(target_dimensions(200, 100, 0.81), (162, 81));
        assert_eq!(target_dimensions(100, 200, 0.81), (81, 162));
    }

    #[test]
    fn tiny_images_stay_non_empty() {
        assert_eq!(target_dimensions(1, 1, 0.81), (1, 1));
        assert_eq!(target_dimensions(1, 10, 0.81), (1, 10));
    }

    #[test]
    fn resample_solid_color() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([0, 200, 0, 255])));
        let out = resample(&img, 0.81).unwrap();

        assert_eq!(out.dimensions(), (81, 81));

        let center = out.get_pixel(40, 40);
        assert!(center.0[1] > 180 && center.0[0] < 20 && center.0[2] < 20, "{:?}", center);
        assert!(center.0[3] > 250);
    }

    #[test]
    fn resample_rejects_bad_scale() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));

        assert!(resample(&img, 0.0).is_err());
        assert!(resample(&img, 1.5).is_err());
        assert!(resample(&img, f64::NAN).is_err());
    }
}
