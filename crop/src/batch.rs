use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Result};
use tokio::fs::create_dir_all;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::actions::crop_action;
use crate::settings::Settings;


pub const SOURCE_EXT: &str = ".png";

pub struct CropStats {
    pub succeeded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub aborted: bool,
}

impl CropStats {
    pub fn new() -> Self {
        Self { succeeded: vec![], skipped: vec![], failed: vec![], aborted: false }
    }
    pub fn push(&mut self, response: Result<String>) {
        match response {
            Ok(s) => self.succeeded.push(s),
            Err(e) => self.failed.push(e.to_string()),
        }
    }
    pub fn extend(&mut self, child: Result<Self>) {
        match child {
            Ok(s) => {
                self.succeeded.extend(s.succeeded);
                self.skipped.extend(s.skipped);
                self.failed.extend(s.failed);
                self.aborted |= s.aborted;
            },
            Err(e) => {
                self.failed.push(e.to_string());
            },
        }
    }
}

/// Suffix match on the whole name, so a file called just `.png` counts too.
pub fn is_source_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(SOURCE_EXT.as_bytes())
}

/// Walk `root` and pair every `.png` file with its flattened target in `output_dir`.
///
/// Anything under `output_dir` is left out so earlier results are not cropped again.
/// `output_dir` has to exist.
pub fn build_queue(root: &Path, output_dir: &Path, stats: &mut CropStats, fail_fast: bool)
-> Result<Vec<(PathBuf, PathBuf)>> {
    let root = root.canonicalize()
        .map_err(|e| anyhow!("Unable to open source folder {}: {}", root.display(), e))?;
    let output = output_dir.canonicalize()
        .map_err(|e| anyhow!("Unable to open output folder {}: {}", output_dir.display(), e))?;

    let mut queue = vec![];
    let mut names = HashSet::new();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(&output));

    for i in walker {
        let e = match i {
            Ok(x) => x,
            Err(e) => match fail_fast {
                true => bail!("Failed to read dir entry: {}", e),
                false => {
                    error!("Failed to read dir entry: {}", e);
                    stats.failed.push(format!("Failed to read dir entry: {}", e));
                    continue;
                }
            }
        };

        let file = match e.path().is_file() {
            true => e.into_path(),
            false => continue,
        };

        let name = match file.file_name() {
            Some(n) => n.to_owned(),
            None => continue,
        };

        if !is_source_name(&name) {
            debug!("Skipping non PNG file {:?}", file);
            continue;
        }

        // Output is flat, first one in walk order keeps the name
        if !names.insert(name.clone()) {
            warn!("Skipping {:?}, another image already claimed {:?}", file, name);
            stats.skipped.push(format!("Image {} shares its name with an earlier image", file.display()));
            continue;
        }

        let mut target = output_dir.to_owned();
        target.push(name);

        debug!("Sending file {:?} to crop queue", &file);
        queue.push((file, target));
    }

    Ok(queue)
}

pub async fn run_batch(settings: &Settings) -> Result<CropStats> {
    if let Err(e) = create_dir_all(&settings.output_dir).await {
        bail!("Failed to create output dir {}: {}", settings.output_dir.display(), e)
    }

    let mut stats = CropStats::new();
    let queue = build_queue(&settings.folder, &settings.output_dir, &mut stats, settings.fail_fast)?;
    let chunk_size = settings.parallel_img_max.max(1);

    info!("Processing crop queue of {} files in chunks of {} images concurrently...", queue.len(), chunk_size);

    for c in queue.chunks(chunk_size) {
        let chunk = c.to_vec();

        debug!("Proceed to cropping chunk of {} source images", chunk.len());

        let mut handles = JoinSet::new();

        for (importable, target) in chunk {
            let options = settings.crop.clone();

            handles.spawn(async move {
                crop_action(importable, target, options).await
            });
        }

        while let Some(r) = handles.join_next().await {
            match r {
                Ok(r) => stats.push(r),
                Err(e) => stats.failed.push(format!("Failed to join crop task: {}", e)),
            }
        }

        if settings.fail_fast && !stats.failed.is_empty() {
            stats.aborted = true;
            break;
        }
    }

    Ok(stats)
}
