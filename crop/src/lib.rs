pub mod actions;
pub mod batch;
pub mod resize;
pub mod settings;
pub mod transform;

pub use batch::{build_queue, run_batch, CropStats};
pub use resize::resample;
pub use settings::{Cli, Settings};
pub use transform::{crop_to_circle, CircleGeometry, CropOptions, Region};
