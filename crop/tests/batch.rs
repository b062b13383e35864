// Batch driver tests: directory walking, flattening and failure handling

use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use crop::{build_queue, run_batch, CropOptions, CropStats, Settings};
use image::{ImageFormat, Rgba, RgbaImage};

fn write_png(path: &Path, size: u32) {
    RgbaImage::from_pixel(size, size, Rgba([200, 40, 40, 255]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn settings(folder: &Path, output_dir: PathBuf, fail_fast: bool) -> Settings {
    Settings {
        folder: folder.to_owned(),
        output_dir,
        crop: CropOptions { border_width: 2, ..CropOptions::default() },
        parallel_img_max: 2,
        fail_fast,
    }
}

#[tokio::test]
async fn only_png_files_are_cropped_and_flattened() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_png(&src.path().join("a.png"), 20);
    write(src.path().join("b.jpg"), b"not looked at").unwrap();
    create_dir_all(src.path().join("sub")).unwrap();
    write_png(&src.path().join("sub").join("c.png"), 16);

    let output_dir = out.path().join("cropped_images");
    let stats = run_batch(&settings(src.path(), output_dir.clone(), false)).await.unwrap();

    assert_eq!(stats.succeeded.len(), 2);
    assert!(stats.failed.is_empty());
    assert!(!stats.aborted);

    let a = image::open(output_dir.join("a.png")).unwrap().to_rgba8();
    let c = image::open(output_dir.join("c.png")).unwrap().to_rgba8();

    assert_eq!(a.dimensions(), (24, 24));
    assert_eq!(c.dimensions(), (20, 20));
    assert!(!output_dir.join("b.jpg").exists());
    assert!(!output_dir.join("sub").exists());
}

#[test]
fn extension_match_is_exact() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_png(&src.path().join("upper.PNG"), 8);
    write_png(&src.path().join("lower.png"), 8);
    write_png(&src.path().join(".png"), 8);
    write(src.path().join("png"), b"no extension").unwrap();

    let mut stats = CropStats::new();
    let queue = build_queue(src.path(), out.path(), &mut stats, false).unwrap();

    // Sorted walk: ".png" comes before "lower.png"
    assert_eq!(queue.len(), 2);
    assert!(queue[0].0.ends_with(".png"));
    assert_eq!(queue[0].1, out.path().join(".png"));
    assert!(queue[1].0.ends_with("lower.png"));
    assert_eq!(queue[1].1, out.path().join("lower.png"));
}

#[test]
fn output_dir_inside_source_is_not_walked() {
    let src = tempfile::tempdir().unwrap();
    let output_dir = src.path().join("cropped_images");
    create_dir_all(&output_dir).unwrap();

    write_png(&src.path().join("a.png"), 8);
    write_png(&output_dir.join("a.png"), 8);

    let mut stats = CropStats::new();
    let queue = build_queue(src.path(), &output_dir, &mut stats, false).unwrap();

    assert_eq!(queue.len(), 1);
    assert!(stats.skipped.is_empty());
}

#[test]
fn duplicate_basenames_keep_the_first() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_png(&src.path().join("a.png"), 8);
    create_dir_all(src.path().join("z")).unwrap();
    write_png(&src.path().join("z").join("a.png"), 8);

    let mut stats = CropStats::new();
    let queue = build_queue(src.path(), out.path(), &mut stats, false).unwrap();

    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].0, src.path().canonicalize().unwrap().join("a.png"));
    assert_eq!(stats.skipped.len(), 1);
}

#[tokio::test]
async fn broken_png_does_not_stop_the_batch() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write(src.path().join("a.png"), b"garbage").unwrap();
    write_png(&src.path().join("b.png"), 10);

    let stats = run_batch(&settings(src.path(), out.path().to_owned(), false)).await.unwrap();

    assert_eq!(stats.failed.len(), 1);
    assert_eq!(stats.succeeded.len(), 1);
    assert!(out.path().join("b.png").is_file());
}

#[tokio::test]
async fn fail_fast_stops_after_first_failing_chunk() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // Sorted walk, chunks of one: a.png fails first
    write(src.path().join("a.png"), b"garbage").unwrap();
    write_png(&src.path().join("b.png"), 10);

    let mut s = settings(src.path(), out.path().to_owned(), true);
    s.parallel_img_max = 1;

    let stats = run_batch(&s).await.unwrap();

    assert!(stats.aborted);
    assert_eq!(stats.failed.len(), 1);
    assert!(stats.succeeded.is_empty());
    assert!(!out.path().join("b.png").exists());
}

#[tokio::test]
async fn missing_source_folder_is_an_error() {
    let out = tempfile::tempdir().unwrap();
    let missing = out.path().join("does-not-exist");

    assert!(run_batch(&settings(&missing, out.path().join("o"), false)).await.is_err());
}
