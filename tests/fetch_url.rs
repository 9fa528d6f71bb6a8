use std::io::Cursor;

use crop_web::CropError;
use crop_web::acquire::{Fetcher, LoadedImage};
use crop_web::geometry::Extent;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mockito::Matcher;

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(6, 4, Rgb([10, 200, 10]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn proxy_template(server: &mockito::ServerGuard) -> String {
    format!("{}/proxy?url={{url}}", server.url())
}

#[tokio::test]
async fn direct_fetch_names_image_after_last_segment() {
    let mut server = mockito::Server::new_async().await;
    let direct = server
        .mock("GET", "/images/kitten.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .create_async()
        .await;

    let fetcher = Fetcher::new(proxy_template(&server)).unwrap();
    let prepared = fetcher
        .fetch(&format!("{}/images/kitten.png", server.url()))
        .await
        .unwrap();

    direct.assert_async().await;
    assert_eq!(prepared.name, "kitten.png");
    assert!(prepared.data_uri.starts_with("data:image/png;base64,"));

    let loaded = LoadedImage::decode(prepared).unwrap();
    assert_eq!(loaded.natural_size(), Extent::new(6.0, 4.0));
}

#[tokio::test]
async fn failed_fetch_retries_once_through_proxy() {
    let mut server = mockito::Server::new_async().await;
    let image_url = format!("{}/blocked/photo.png", server.url());

    let direct = server
        .mock("GET", "/blocked/photo.png")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let proxied = server
        .mock("GET", Matcher::Regex("^/proxy".into()))
        .match_query(Matcher::UrlEncoded("url".into(), image_url.clone()))
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .expect(1)
        .create_async()
        .await;

    let fetcher = Fetcher::new(proxy_template(&server)).unwrap();
    let prepared = fetcher.fetch(&image_url).await.unwrap();

    direct.assert_async().await;
    proxied.assert_async().await;
    assert_eq!(prepared.name, "photo.png");
}

#[tokio::test]
async fn unreachable_host_retries_once_through_proxy() {
    // Bind then drop a listener so nothing answers on that port
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let image_url = format!("http://127.0.0.1:{}/photo.png", port);

    let mut server = mockito::Server::new_async().await;
    let proxied = server
        .mock("GET", Matcher::Regex("^/proxy".into()))
        .match_query(Matcher::UrlEncoded("url".into(), image_url.clone()))
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .expect(1)
        .create_async()
        .await;

    let fetcher = Fetcher::new(proxy_template(&server)).unwrap();
    let prepared = fetcher.fetch(&image_url).await.unwrap();

    proxied.assert_async().await;
    assert_eq!(prepared.name, "photo.png");
    assert!(prepared.data_uri.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn both_attempts_failing_is_a_network_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/gone.png")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex("^/proxy".into()))
        .with_status(502)
        .create_async()
        .await;

    let fetcher = Fetcher::new(proxy_template(&server)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/gone.png", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, CropError::Network(_)));
    assert!(err.to_string().contains("proxy"));
}

#[tokio::test]
async fn html_response_is_not_an_image() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<html></html>")
        .create_async()
        .await;

    let fetcher = Fetcher::new(proxy_template(&server)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/page", server.url()))
        .await
        .unwrap_err();
    assert!(matches!(err, CropError::InvalidInput));
}
