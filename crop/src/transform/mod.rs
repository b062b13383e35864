mod round;

use std::{num::NonZeroU32, path::PathBuf};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba};

use anyhow::{anyhow, bail, Result};
use tracing::debug;

pub use round::*;


pub const TRANSPARENT: Rgba<u8> = image::Rgba::<u8>([0, 0, 0, 0]);
pub const BLACK: Rgba<u8> = image::Rgba::<u8>([0, 0, 0, 255]);

#[derive(Clone, Debug)]
pub struct Croppable {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
    pub source_path: PathBuf,
    pub target_name: String,
}

impl Croppable {
    /// Border eats the whole circle, output is an all-border or empty disk.
    pub fn border_swallows_circle(&self, border_width: u32) -> bool {
        border_width >= self.width.get() / 2
    }
}

pub async fn croppable_img(importable: PathBuf) -> Result<(Croppable, DynamicImage)> {
    if !importable.is_file() {
        bail!("Circle cropper fed with a non file: {:?}", &importable)
    }

    let name: String = importable.to_string_lossy().into();

    tokio::task::spawn_blocking(move || {
        // Only PNG input is accepted, don't guess
        let mut reader = ImageReader::open(&importable)?;
        reader.set_format(ImageFormat::Png);

        let img = reader.decode()?;

        // Read image width and height into non-zero enum to avoid problems later on
        let width = match NonZeroU32::new(img.width()) {
            Some(w) => w,
            None => bail!("Failed to read width from image"),
        };

        let height = match NonZeroU32::new(img.height()) {
            Some(h) => h,
            None => bail!("Failed to read height from image"),
        };

        debug!("Cropper received image {:?} of width: {} and height: {}", importable, width, height);

        // Output keeps the source filename, extension included
        let target_name = match importable.file_name() {
            Some(f) => match f.to_str() {
                Some(s) => s.to_string(),
                None => bail!("Failed to extract filename from source image path"),
            },
            None => bail!("Failed to extract filename from source image path")
        };

        let croppable = Croppable {
            width,
            height,
            source_path: importable,
            target_name,
        };

        Ok((croppable, img))
    })
    .await
    .map_err(|e|anyhow!("{}: Source image failed to load: {}", name, e))?
}
