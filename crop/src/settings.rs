use std::path::PathBuf;
use anyhow::{anyhow, bail, Result};
use clap::Parser;
use image::Rgba;

use config::Config;

use crate::transform::CropOptions;


#[derive(Parser, Debug)]
#[command(name = "crop-images")]
#[command(about = "Crops images into circles")]
#[command(long_about = "Crops every PNG under a folder into a circle with a specified border width")]
pub struct Cli {
    /// Folder to search for PNG images
    pub folder: Option<PathBuf>,

    /// Folder path, used when no positional folder is given
    #[arg(short = 'f', long = "folder")]
    pub folder_flag: Option<PathBuf>,

    /// Border width in pixels [default: 20]
    #[arg(short, long)]
    pub pixels: Option<u32>,

    /// Path to a config.toml, defaults to config.toml inside the folder
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output folder for cropped images [default: cropped_images]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Border color as hex RGB or RGBA (e.g. "#000000" or "#ff0000ff")
    #[arg(long)]
    pub color: Option<String>,

    /// How many images are cropped concurrently [default: 4]
    #[arg(short = 'j', long)]
    pub parallel: Option<usize>,

    /// Stop the whole batch on the first failing image
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Positional folder wins over `--folder`.
    pub fn folder(&self) -> Option<PathBuf> {
        self.folder.clone().or_else(|| self.folder_flag.clone())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub folder: PathBuf,
    pub output_dir: PathBuf,
    pub crop: CropOptions,
    pub parallel_img_max: usize,
    pub fail_fast: bool,
}

impl Settings {
    /// Command line takes precedence over the config file, config file over defaults.
    pub fn resolve(cli: &Cli, folder: PathBuf, config: &Config) -> Result<Self> {
        let border_width = match cli.pixels {
            Some(u) => u,
            None => config.border_width(),
        };

        let border_color = match cli.color {
            Some(ref c) => parse_hex_color(c)?,
            None => Rgba(config.border_color()),
        };

        let scale = config.scale();

        if !(scale > 0.0 && scale <= 1.0) {
            bail!("Scale must be within (0, 1], got {}", scale)
        }

        let parallel_img_max = match cli.parallel {
            Some(u) => u,
            None => config.parallel_img_max(),
        };

        if parallel_img_max == 0 {
            bail!("At least one image has to be processed at a time")
        }

        let output_dir = match cli.output {
            Some(ref p) => p.to_owned(),
            None => config.output_dir(),
        };

        Ok(Self {
            folder,
            output_dir,
            crop: CropOptions { border_width, border_color, scale },
            parallel_img_max,
            fail_fast: cli.fail_fast || config.fail_fast,
        })
    }
}

pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');

    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        bail!("Invalid color {:?}, expected #RRGGBB or #RRGGBBAA", s)
    }

    let mut rgba = [0, 0, 0, 255];

    for (i, c) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
        *c = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|e| anyhow!("Invalid color {:?}: {}", s, e))?;
    }

    Ok(Rgba(rgba))
}
