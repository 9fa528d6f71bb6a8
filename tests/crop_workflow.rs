use std::io::Cursor;
use std::time::Duration;

use crop_web::CropError;
use crop_web::acquire::{self, LoadedImage};
use crop_web::export::save_file;
use crop_web::geometry::{Alignment, CropRect, Extent, Size};
use crop_web::notify::{Level, Notifications};
use crop_web::ratio::RATIOS;
use crop_web::state::{CropOptions, CropperState};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    std::fs::write(path, out.into_inner()).unwrap();
}

async fn load(path: &std::path::Path) -> crop_web::Result<LoadedImage> {
    let prepared = acquire::read_file(path).await?;
    LoadedImage::decode(prepared)
}

#[tokio::test]
async fn scaled_crop_exports_natural_region() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("landscape.png");
    write_png(&source, 800, 600);

    let mut state = CropperState::new(CropOptions::default());
    let mut notifications = Notifications::new(Duration::from_secs(4));
    state.apply_load(load(&source).await, &mut notifications);
    state.set_displayed_size(Extent::new(400.0, 300.0));
    state.set_crop(CropRect::new(50.0, 50.0, 100.0, 75.0));

    assert_eq!(state.natural_crop_size(), Some((200, 150)));

    let exported = state.export(92).unwrap();
    assert_eq!((exported.width, exported.height), (200, 150));

    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let saved = save_file(&exported, "landscape.png", &out_dir).unwrap();
    assert_eq!(saved, out_dir.join("landscape.png"));

    // Keeps the source name, so the extension says png while the bytes are JPEG
    let written = image::load_from_memory(&std::fs::read(&saved).unwrap()).unwrap();
    assert_eq!(image::guess_format(&std::fs::read(&saved).unwrap()).unwrap(), ImageFormat::Jpeg);
    assert_eq!(written.dimensions(), (200, 150));
}

#[tokio::test]
async fn non_image_drop_warns_and_keeps_current_image() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("photo.png");
    write_png(&source, 64, 48);
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "shopping list").unwrap();

    let mut state = CropperState::new(CropOptions::default());
    let mut notifications = Notifications::new(Duration::from_secs(4));
    state.apply_load(load(&source).await, &mut notifications);
    state.set_displayed_size(Extent::new(64.0, 48.0));
    let crop_before = state.crop();

    let result = load(&notes).await;
    assert!(matches!(result, Err(CropError::InvalidInput)));
    state.apply_load(result, &mut notifications);

    assert_eq!(state.image().map(|i| i.name.as_str()), Some("photo.png"));
    assert_eq!(state.crop(), crop_before);
    assert_eq!(notifications.toasts().len(), 1);
    assert_eq!(notifications.toasts()[0].level, Level::Warning);
}

#[tokio::test]
async fn presets_compose_into_a_right_aligned_square() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("wide.png");
    write_png(&source, 800, 400);

    let mut state = CropperState::new(CropOptions::default());
    let mut notifications = Notifications::new(Duration::from_secs(4));
    state.apply_load(load(&source).await, &mut notifications);
    state.set_displayed_size(Extent::new(800.0, 400.0));

    state.toggle_ratio(RATIOS[0]);
    state.select_size(Size::Large);
    state.align_x(Alignment::Right);

    let crop = state.crop();
    assert_eq!((crop.x, crop.y, crop.width, crop.height), (400.0, 0.0, 400.0, 400.0));
    assert_eq!(state.selected_size(), Some(Size::Large));

    let exported = state.export(80).unwrap();
    assert_eq!((exported.width, exported.height), (400, 400));
}

#[test]
fn saving_without_an_image_fails() {
    let state = CropperState::new(CropOptions::default());
    assert!(matches!(state.export(92), Err(CropError::NoImage)));
}
