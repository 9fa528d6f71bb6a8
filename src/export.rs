//! Extracting the selected region at natural resolution and writing it out
//! as a JPEG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::buffer::ConvertBuffer;
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};
use log::{debug, info};

use crate::acquire::to_data_uri;
use crate::error::{CropError, Result};
use crate::geometry::{CropRect, Extent, scale_factors};

/// Largest surface side we are willing to allocate.
pub const MAX_SURFACE_SIDE: u32 = 32_767;

pub const DEFAULT_FILE_NAME: &str = "download";

#[derive(Clone, Debug)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
    pub data_uri: String,
}

/// Draw the natural-resolution region behind `crop` onto a fresh surface.
/// Parts of the region outside the image stay transparent.
pub fn render_surface(image: &DynamicImage, crop: &CropRect, displayed: Extent) -> Result<RgbaImage> {
    let (natural_w, natural_h) = image.dimensions();
    let natural = Extent::new(natural_w as f32, natural_h as f32);
    let (scale_x, scale_y) = scale_factors(natural, displayed);
    let source = crop.scaled(scale_x, scale_y);

    let width = source.width.max(0.0) as u32;
    let height = source.height.max(0.0) as u32;
    if width == 0 || height == 0 || width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
        return Err(CropError::Surface { width, height });
    }

    let x0 = source.x.round() as i64;
    let y0 = source.y.round() as i64;
    debug!(
        "surface {}x{} from natural region ({}, {}, {}, {})",
        width, height, x0, y0, width, height
    );

    let left = x0.max(0);
    let top = y0.max(0);
    let right = (x0 + width as i64).min(natural_w as i64);
    let bottom = (y0 + height as i64).min(natural_h as i64);

    // Region entirely inside the image: the cropped pixels are the surface
    if left == x0 && top == y0 && right - left == width as i64 && bottom - top == height as i64 {
        return Ok(image.crop_imm(x0 as u32, y0 as u32, width, height).into_rgba8());
    }

    let mut surface = RgbaImage::new(width, height);
    if right > left && bottom > top {
        let visible = image
            .crop_imm(
                left as u32,
                top as u32,
                (right - left) as u32,
                (bottom - top) as u32,
            )
            .into_rgba8();
        image::imageops::replace(&mut surface, &visible, left - x0, top - y0);
    }

    Ok(surface)
}

pub fn encode_jpeg(surface: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb: RgbImage = surface.convert();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(out.into_inner())
}

pub fn crop_image(
    image: &DynamicImage,
    crop: &CropRect,
    displayed: Extent,
    quality: u8,
) -> Result<ExportedImage> {
    let surface = render_surface(image, crop, displayed)?;
    let jpeg = encode_jpeg(&surface, quality)?;
    let data_uri = to_data_uri("image/jpeg", &jpeg);
    Ok(ExportedImage {
        width: surface.width(),
        height: surface.height(),
        jpeg,
        data_uri,
    })
}

/// Pick `dir/name`, or `dir/stem (n).ext` when that already exists.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let name = if name.trim().is_empty() {
        DEFAULT_FILE_NAME
    } else {
        name
    };
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(index) if index > 0 => (&name[..index], &name[index..]),
        _ => (name, ""),
    };
    (1..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Write the export into `dir` under the source's file name.
pub fn save_file(exported: &ExportedImage, file_name: &str, dir: &Path) -> Result<PathBuf> {
    let path = unique_path(dir, file_name);
    std::fs::write(&path, &exported.jpeg).map_err(|source| CropError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(
        "saved {}x{} crop to {}",
        exported.width,
        exported.height,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Every pixel records its own coordinates.
    fn coordinate_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, (x / 256) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn scaled_crop_reads_natural_pixels() {
        let image = coordinate_image(800, 600);
        let crop = CropRect::new(50.0, 50.0, 100.0, 75.0);

        let surface = render_surface(&image, &crop, Extent::new(400.0, 300.0)).unwrap();
        assert_eq!(surface.dimensions(), (200, 150));
        assert_eq!(*surface.get_pixel(0, 0), image.get_pixel(100, 100));
        assert_eq!(*surface.get_pixel(199, 149), image.get_pixel(299, 249));
    }

    #[test]
    fn full_crop_at_one_to_one_reproduces_the_image() {
        let image = coordinate_image(64, 48);
        let crop = CropRect::new(0.0, 0.0, 64.0, 48.0);
        let surface = render_surface(&image, &crop, Extent::new(64.0, 48.0)).unwrap();
        assert_eq!(surface, image.to_rgba8());
    }

    #[test]
    fn empty_crop_cannot_allocate_a_surface() {
        let image = coordinate_image(10, 10);
        let err = render_surface(&image, &CropRect::default(), Extent::new(10.0, 10.0)).unwrap_err();
        assert!(matches!(err, CropError::Surface { width: 0, height: 0 }));
    }

    #[test]
    fn region_past_the_edge_stays_blank() {
        let image = coordinate_image(10, 10);
        let crop = CropRect::new(5.0, 5.0, 10.0, 10.0);
        let surface = render_surface(&image, &crop, Extent::new(10.0, 10.0)).unwrap();
        assert_eq!(surface.dimensions(), (10, 10));
        assert_eq!(*surface.get_pixel(0, 0), image.get_pixel(5, 5));
        assert_eq!(*surface.get_pixel(9, 9), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn region_left_of_the_image_is_offset_into_the_surface() {
        let image = coordinate_image(10, 10);
        let crop = CropRect::new(-4.0, 2.0, 8.0, 4.0);
        let surface = render_surface(&image, &crop, Extent::new(10.0, 10.0)).unwrap();
        assert_eq!(surface.dimensions(), (8, 4));
        assert_eq!(*surface.get_pixel(3, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*surface.get_pixel(4, 0), image.get_pixel(0, 2));
        assert_eq!(*surface.get_pixel(7, 3), image.get_pixel(3, 5));
    }

    #[test]
    fn transparent_pixels_encode_as_black() {
        let surface = RgbaImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let jpeg = encode_jpeg(&surface, 100).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert!(decoded.get_pixel(1, 8).0.iter().all(|c| *c < 16));
        assert!(decoded.get_pixel(14, 8).0.iter().all(|c| *c > 239));
    }

    #[test]
    fn export_is_jpeg_of_surface_size() {
        let image = coordinate_image(80, 60);
        let crop = CropRect::new(10.0, 10.0, 20.0, 15.0);
        let exported = crop_image(&image, &crop, Extent::new(40.0, 30.0), 92).unwrap();
        assert_eq!((exported.width, exported.height), (40, 30));
        assert!(exported.data_uri.starts_with("data:image/jpeg;base64,"));

        let decoded = image::load_from_memory(&exported.jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn saving_twice_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let image = coordinate_image(8, 8);
        let exported = crop_image(&image, &CropRect::new(0.0, 0.0, 8.0, 8.0), Extent::new(8.0, 8.0), 90)
            .unwrap();

        let first = save_file(&exported, "cat.jpg", dir.path()).unwrap();
        let second = save_file(&exported, "cat.jpg", dir.path()).unwrap();
        let unnamed = save_file(&exported, "", dir.path()).unwrap();

        assert_eq!(first, dir.path().join("cat.jpg"));
        assert_eq!(second, dir.path().join("cat (1).jpg"));
        assert_eq!(unnamed, dir.path().join("download"));
        assert!(second.exists());
    }
}
