use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use anyhow::{Result, anyhow};


pub fn png_writer(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = vec![];

    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    ).map_err(|e| anyhow!("Failed to create PNG image: {}", e))
    .map(|_| buf)
}
