
use std::path::PathBuf;
use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use super::resize::png::*;
use crate::transform::{crop_to_circle, croppable_img, CropOptions};


pub async fn crop_action(importable: PathBuf, target_file: PathBuf, options: CropOptions) -> Result<String> {
    info!("Processing: {}", importable.display());

    let (croppable, img) = croppable_img(importable).await?;

    if croppable.border_swallows_circle(options.border_width) {
        warn!(
            "Border of {} px leaves no room for image content in {:?} (width {}), output is all border",
            options.border_width, croppable.source_path, croppable.width
        );
    }

    let source = croppable.source_path.display().to_string();

    // Cropping and encoding are CPU bound, keep them off the async workers
    let buf = tokio::task::spawn_blocking(move || {
        let cropped = crop_to_circle(&img, &options)?;

        debug!(
            "Cropped {} into {}x{} circle with {} px border",
            croppable.target_name, cropped.width(), cropped.height(), options.border_width
        );

        png_writer(&cropped)
    })
    .await
    .map_err(|e| anyhow!("{}: Crop task failed: {}", source, e))?
    .map_err(|e| anyhow!("{}: {}", source, e))?;

    if let Err(e) = tokio::fs::write(&target_file, &buf).await {
        return Err(anyhow!("Failed to write cropped image {}: {}", target_file.display(), e))
    }

    Ok(format!("Cropped image {} saved to {}", source, target_file.display()))
}
