//! Turning a file, a dropped item or a remote URL into a Base64 data URI,
//! and decoding that URI back into pixels.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use eframe::egui;
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;

use crate::error::{CropError, Result};
use crate::geometry::Extent;

/// An accepted image, encoded and ready to hand to the crop view.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    pub data_uri: String,
    pub name: String,
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}

pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a `data:<mime>;base64,<payload>` URI into its MIME type and bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CropError::Decode("not a data uri".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CropError::Decode("data uri has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CropError::Decode("data uri is not base64".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| CropError::Decode(err.to_string()))?;
    Ok((mime.to_string(), bytes))
}

/// Accept `bytes` only if they are an image. A declared image type is
/// trusted; a missing or generic type falls back to content sniffing.
pub fn prepare_blob(bytes: &[u8], declared_mime: Option<&str>, name: impl Into<String>) -> Result<PreparedImage> {
    let mime = match declared_mime {
        Some(mime) if is_image_mime(mime) => Some(mime),
        None | Some("") | Some("application/octet-stream") => sniff_mime(bytes),
        Some(_) => None,
    };

    let Some(mime) = mime else {
        warn!("rejected input with type {:?}", declared_mime);
        return Err(CropError::InvalidInput);
    };

    Ok(PreparedImage {
        data_uri: to_data_uri(mime, bytes),
        name: name.into(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub async fn read_file(path: &Path) -> Result<PreparedImage> {
    let name = file_name(path);
    let bytes = tokio::fs::read(path).await.map_err(|source| CropError::Read {
        name: name.clone(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    prepare_blob(&bytes, mime_from_path(path), name)
}

/// Only the first dropped item is used.
pub async fn read_dropped(files: &[egui::DroppedFile]) -> Result<PreparedImage> {
    let file = files.first().ok_or(CropError::InvalidInput)?;

    if let Some(bytes) = &file.bytes {
        let declared = (!file.mime.is_empty()).then_some(file.mime.as_str());
        return prepare_blob(bytes, declared, file.name.clone());
    }

    match &file.path {
        Some(path) => read_file(path).await,
        None => Err(CropError::InvalidInput),
    }
}

/// The URL box only fetches http(s) addresses, one at a time.
pub fn can_fetch(url: &str, fetching: bool) -> bool {
    url.starts_with("http") && !fetching
}

/// Final segment of the URL's path.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|err| CropError::InvalidUrl(err.to_string()))?;
    let path = parsed.path();
    Ok(match path.rfind('/') {
        Some(index) => path[index + 1..].to_string(),
        None => path.to_string(),
    })
}

/// Substitute the percent-encoded `url` into a proxy template's `{url}`.
pub fn proxied_url(template: &str, url: &str) -> String {
    template.replace("{url}", &urlencoding::encode(url))
}

pub struct Fetcher {
    client: reqwest::Client,
    proxy_template: String,
}

impl Fetcher {
    pub fn new(proxy_template: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| CropError::Network(err.to_string()))?;
        Ok(Self {
            client,
            proxy_template: proxy_template.into(),
        })
    }

    /// Fetch directly, then once through the proxy if that fails.
    pub async fn fetch(&self, url: &str) -> Result<PreparedImage> {
        let name = file_name_from_url(url)?;

        let (bytes, mime) = match self.get(url).await {
            Ok(body) => body,
            Err(primary) => {
                warn!("fetching {} failed ({}), retrying through proxy", url, primary);
                let proxied = proxied_url(&self.proxy_template, url);
                self.get(&proxied).await.map_err(|fallback| {
                    CropError::Network(format!("{}; proxy: {}", primary, fallback))
                })?
            }
        };

        info!("fetched {} ({} bytes)", url, bytes.len());
        prepare_blob(&bytes, mime.as_deref(), name)
    }

    async fn get(&self, url: &str) -> std::result::Result<(Vec<u8>, Option<String>), reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
        let bytes = response.bytes().await?;
        Ok((bytes.to_vec(), mime))
    }
}

/// A decoded image together with where it came from.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub name: String,
    pub data_uri: String,
    pub image: DynamicImage,
}

impl LoadedImage {
    pub fn decode(prepared: PreparedImage) -> Result<Self> {
        let (_, bytes) = decode_data_uri(&prepared.data_uri)?;
        let image =
            image::load_from_memory(&bytes).map_err(|err| CropError::Decode(err.to_string()))?;
        info!(
            "loaded {} ({}x{})",
            prepared.name,
            image.width(),
            image.height()
        );
        Ok(Self {
            name: prepared.name,
            data_uri: prepared.data_uri,
            image,
        })
    }

    pub fn natural_size(&self) -> Extent {
        let (w, h) = self.image.dimensions();
        Extent::new(w as f32, h as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn data_uri_carries_mime_and_payload() {
        let uri = to_data_uri("image/png", b"abc");
        assert_eq!(uri, "data:image/png;base64,YWJj");
        let (mime, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"abc");
        assert!(decode_data_uri("http://example.com").is_err());
    }

    #[test]
    fn non_image_blob_is_rejected() {
        let err = prepare_blob(b"hello", Some("text/plain"), "notes.txt").unwrap_err();
        assert!(matches!(err, CropError::InvalidInput));

        let err = prepare_blob(b"hello", None, "notes").unwrap_err();
        assert!(matches!(err, CropError::InvalidInput));
    }

    #[test]
    fn untyped_image_blob_is_sniffed() {
        let prepared = prepare_blob(&png_bytes(), Some("application/octet-stream"), "x").unwrap();
        assert!(prepared.data_uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn url_file_name_is_last_path_segment() {
        assert_eq!(
            file_name_from_url("https://example.com/a/b/cat.jpg?w=200").unwrap(),
            "cat.jpg"
        );
        assert_eq!(file_name_from_url("https://example.com/").unwrap(), "");
        assert!(file_name_from_url("not a url").is_err());
    }

    #[test]
    fn proxy_wraps_the_encoded_url() {
        assert_eq!(
            proxied_url("https://proxy.test/?url={url}", "https://a.b/c d.png"),
            "https://proxy.test/?url=https%3A%2F%2Fa.b%2Fc%20d.png"
        );
    }

    #[test]
    fn fetch_needs_http_and_idle() {
        assert!(can_fetch("https://example.com/x.png", false));
        assert!(!can_fetch("https://example.com/x.png", true));
        assert!(!can_fetch("ftp://example.com/x.png", false));
    }

    #[tokio::test]
    async fn reads_image_file_into_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let prepared = read_file(&path).await.unwrap();
        assert_eq!(prepared.name, "red.png");
        assert!(prepared.data_uri.starts_with("data:image/png;base64,"));

        let loaded = LoadedImage::decode(prepared).unwrap();
        assert_eq!(loaded.natural_size(), Extent::new(4.0, 3.0));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("gone.png")).await.unwrap_err();
        assert!(matches!(err, CropError::Read { .. }));
    }

    #[tokio::test]
    async fn text_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();
        let err = read_file(&path).await.unwrap_err();
        assert!(matches!(err, CropError::InvalidInput));
    }

    #[tokio::test]
    async fn dropped_bytes_use_declared_type() {
        let dropped = egui::DroppedFile {
            name: "pasted.png".into(),
            mime: "image/png".into(),
            bytes: Some(png_bytes().into()),
            ..Default::default()
        };
        let prepared = read_dropped(&[dropped]).await.unwrap();
        assert_eq!(prepared.name, "pasted.png");
        assert!(read_dropped(&[]).await.is_err());
    }
}
