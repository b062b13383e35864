use anyhow::{bail, Result};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::resize::{resample, INSET_SCALE};

use super::*;


#[derive(Clone, Debug)]
pub struct CropOptions {
    pub border_width: u32,
    pub border_color: Rgba<u8>,
    pub scale: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            border_width: config::DEFAULT_BORDER_WIDTH,
            border_color: BLACK,
            scale: INSET_SCALE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Exterior,
    Border,
    Interior { sample_x: u32, sample_y: u32 },
}

/// Largest canvas a single crop may allocate, 1 GiB of RGBA.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Circle layout for one crop.
///
/// Coordinates handed to `classify` are output buffer coordinates, i.e. offsets from
/// the top left corner of the expanded box. The circle is centered on the source image,
/// which sits `border` pixels in from every side, so the center is
/// `(border + width / 2, border + height / 2)`. The outer radius is half of the source
/// width, the source is expected to be square or close to it.
#[derive(Clone, Copy, Debug)]
pub struct CircleGeometry {
    pub width: u32,
    pub height: u32,
    pub border: u32,
    pub resized_width: u32,
    pub resized_height: u32,
}

impl CircleGeometry {
    pub fn outer_radius(&self) -> i64 {
        (self.width / 2) as i64
    }
    /// Negative when the border is wider than the circle.
    pub fn inner_radius(&self) -> i64 {
        self.outer_radius() - self.border as i64
    }
    pub fn center(&self) -> (i64, i64) {
        (
            self.border as i64 + (self.width / 2) as i64,
            self.border as i64 + (self.height / 2) as i64,
        )
    }
    /// `None` when the expanded box doesn't fit in `u32`.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let pad = self.border.checked_mul(2)?;

        Some((self.width.checked_add(pad)?, self.height.checked_add(pad)?))
    }
    pub fn distance(&self, x: u32, y: u32) -> f64 {
        let (cx, cy) = self.center();
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;

        ((dx * dx + dy * dy) as f64).sqrt()
    }
    pub fn classify(&self, x: u32, y: u32) -> Region {
        let distance = self.distance(x, y);
        let inner = self.inner_radius() as f64;
        let outer = self.outer_radius() as f64;

        if distance > inner && distance <= outer {
            Region::Border
        }
        else if distance <= inner {
            // Maps against the original size, only the upper left part of the
            // resized image is ever reached. The far edge of the disk can land one
            // past the last column or row, those stick to the edge.
            let sample_x = x as u64 * self.resized_width as u64 / self.width as u64;
            let sample_y = y as u64 * self.resized_height as u64 / self.height as u64;

            Region::Interior {
                sample_x: (sample_x as u32).min(self.resized_width.saturating_sub(1)),
                sample_y: (sample_y as u32).min(self.resized_height.saturating_sub(1)),
            }
        }
        else {
            Region::Exterior
        }
    }
}

/// Size of the expanded box, refuses borders that overflow or blow past `MAX_CANVAS_PIXELS`.
pub fn checked_canvas_size(width: u32, height: u32, border: u32) -> Result<(u32, u32)> {
    let geometry = CircleGeometry { width, height, border, resized_width: 0, resized_height: 0 };

    let (w, h) = match geometry.canvas_size() {
        Some(s) => s,
        None => bail!("Border of {} px doesn't fit around a {}x{} image", border, width, height),
    };

    if w as u64 * h as u64 > MAX_CANVAS_PIXELS {
        bail!("Border of {} px makes a {}x{} canvas, limit is {} pixels", border, w, h, MAX_CANVAS_PIXELS)
    }

    Ok((w, h))
}

/// Draw the circle into a new transparent canvas, border ring in `color`,
/// interior sampled from `resized`.
pub fn round_with_border(width: u32, height: u32, border: u32, resized: &RgbaImage, color: Rgba<u8>) -> Result<RgbaImage> {
    let (canvas_w, canvas_h) = checked_canvas_size(width, height, border)?;

    let geometry = CircleGeometry {
        width,
        height,
        border,
        resized_width: resized.width(),
        resized_height: resized.height(),
    };

    let mut img = RgbaImage::from_pixel(canvas_w, canvas_h, TRANSPARENT);

    for (x, y, p) in img.enumerate_pixels_mut() {
        match geometry.classify(x, y) {
            Region::Border => *p = color,
            Region::Interior { sample_x, sample_y } => {
                *p = match resized.get_pixel_checked(sample_x, sample_y) {
                    Some(s) => *s,
                    None => TRANSPARENT,
                };
            },
            Region::Exterior => (),
        }
    }

    Ok(img)
}

pub fn crop_to_circle(img: &DynamicImage, options: &CropOptions) -> Result<RgbaImage> {
    if img.width() == 0 || img.height() == 0 {
        bail!("Can't crop an image with zero width or height")
    }

    // Fail on absurd borders before spending time on the resample
    checked_canvas_size(img.width(), img.height(), options.border_width)?;

    let resized = resample(img, options.scale)?;

    round_with_border(img.width(), img.height(), options.border_width, &resized, options.border_color)
}
