use std::process::ExitCode;
use clap::Parser;
use tracing::{error, debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use crop::{run_batch, Cli, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop=info,crop_images=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    debug!("Logging initialized...");

    let cli = Cli::parse();

    let folder = match cli.folder() {
        Some(f) => f,
        None => {
            error!("Please provide the folder path");
            return ExitCode::FAILURE;
        }
    };

    // Explicit config file, else config.toml next to the images
    let config = match cli.config {
        Some(ref p) => Config::from_path(p),
        None => Config::from_dir(&folder),
    };

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to init config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    debug!("Config loaded...");

    let settings = match Settings::resolve(&cli, folder, &config) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    debug!("Cropping {:?} into {:?} with {} px border", settings.folder, settings.output_dir, settings.crop.border_width);

    let stats = match run_batch(&settings).await {
        Ok(s) => s,
        Err(e) => {
            error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Report errors
    if !stats.failed.is_empty() {
        error!("Cropping failed for {} files", stats.failed.len());

        for (i, e) in stats.failed.iter().enumerate() {
            error!("{}: {}", i, e);
        }
    }

    if stats.aborted {
        error!("Batch stopped on first failure, remaining images were not processed");
    }

    // Report ignored
    if !stats.skipped.is_empty() {
        warn!("Cropper skipped {} images", stats.skipped.len());

        for (i, s) in stats.skipped.iter().enumerate() {
            warn!("{}: {}", i, s);
        }
    }

    if !stats.succeeded.is_empty() {
        info!("Cropped successfully {} source images", stats.succeeded.len());
    }

    match stats.failed.is_empty() {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}
