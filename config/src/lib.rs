use serde::Deserialize;
use tracing::debug;
use std::path::{Path, PathBuf};
use std::fs::read_to_string;
use anyhow::{anyhow, Result};


pub const DEFAULT_BORDER_WIDTH: u32 = 20;
pub const DEFAULT_BORDER_COLOR: [u8; 4] = [0, 0, 0, 255];
pub const DEFAULT_SCALE: f64 = 0.81;
pub const DEFAULT_OUTPUT_DIR: &str = "cropped_images";
pub const DEFAULT_PARALLEL_IMG_MAX: usize = 4;
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Border {
    pub width: Option<u32>,
    pub color: Option<[u8; 4]>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(skip)]
    pub source: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub parallel_img_max: Option<usize>,
    pub scale: Option<f64>,
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default)]
    pub border: Border,
}

impl Config {
    pub fn from_path<T>(path: T) -> Result<Self>
    where T: AsRef<Path> {
        let path = path.as_ref();

        let contents = read_to_string(path).map_err(|e|
            anyhow!("Unable to read config file {} to string: {}", path.display(), e)
        )?;

        let mut config = toml::from_str::<Self>(&contents).map_err(|e|
            anyhow!("Unable to read config file {} as toml: {}", path.display(), e)
        )?;

        debug!("Config loaded from {}", path.display());

        config.source = Some(path.to_owned());

        Ok(config)
    }
    /// Reads `config.toml` from the given dir, falls back to defaults when there is none.
    pub fn from_dir<T>(dir: T) -> Result<Self>
    where T: AsRef<Path> {
        let mut file = dir.as_ref().to_owned();
        file.push(CONFIG_FILE);

        match file.is_file() {
            true => Self::from_path(file),
            false => {
                debug!("No {} in {}, using defaults", CONFIG_FILE, dir.as_ref().display());
                Ok(Self::default())
            }
        }
    }
    pub fn border_width(&self) -> u32 {
        match self.border.width {
            Some(u) => u,
            None => DEFAULT_BORDER_WIDTH,
        }
    }
    pub fn border_color(&self) -> [u8; 4] {
        match self.border.color {
            Some(c) => c,
            None => DEFAULT_BORDER_COLOR,
        }
    }
    pub fn scale(&self) -> f64 {
        match self.scale {
            Some(s) => s,
            None => DEFAULT_SCALE,
        }
    }
    pub fn output_dir(&self) -> PathBuf {
        match self.output_dir {
            Some(ref p) => p.to_owned(),
            None => PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
    pub fn parallel_img_max(&self) -> usize {
        match self.parallel_img_max {
            Some(u) => u,
            None => DEFAULT_PARALLEL_IMG_MAX,
        }
    }
}
