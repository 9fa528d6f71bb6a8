use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use eframe::egui;
use image::GenericImageView;
use log::{error, info};

use crate::acquire::{self, Fetcher, LoadedImage, PreparedImage};
use crate::config::AppConfig;
use crate::error::{CropError, Result};
use crate::export;
use crate::notify::Notifications;
use crate::state::{CropOptions, CropperState};

use super::crop_view::CropView;
use super::dropzone::{Dropzone, DropzoneAction};
use super::panel::{self, PanelAction};
use super::toasts;

/// Larger images are downscaled for the on-screen texture only.
const MAX_TEXTURE_SIDE: u32 = 4096;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "gif", "webp", "ico"];

struct LoadResult {
    from_url: bool,
    result: Result<LoadedImage>,
}

pub struct CropperApp {
    config: AppConfig,
    state: CropperState,
    notifications: Notifications,
    texture: Option<egui::TextureHandle>,
    crop_view: CropView,
    dropzone: Dropzone,
    dark_mode: bool,
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<Fetcher>,
    fetching: bool,
    tx: mpsc::Sender<LoadResult>,
    rx: mpsc::Receiver<LoadResult>,
}

impl CropperApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        initial_source: Option<String>,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let fetcher = Arc::new(Fetcher::new(config.proxy_template.clone())?);
        let (tx, rx) = mpsc::channel();

        let dark_mode = config.dark_mode;
        cc.egui_ctx.set_visuals(if dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut app = Self {
            state: CropperState::new(CropOptions {
                rule_of_thirds: config.rule_of_thirds,
                locked: false,
            }),
            notifications: Notifications::new(Duration::from_secs_f32(config.toast_seconds)),
            texture: None,
            crop_view: CropView::default(),
            dropzone: Dropzone::default(),
            dark_mode,
            runtime,
            fetcher,
            fetching: false,
            tx,
            rx,
            config,
        };

        match initial_source {
            Some(source) if source.starts_with("http") => app.fetch_url(&cc.egui_ctx, source),
            Some(source) => app.open_path(&cc.egui_ctx, PathBuf::from(source)),
            None => {}
        }

        Ok(app)
    }

    /// Run an acquisition on the runtime, decode off the UI thread and hand
    /// the result back through the channel.
    fn spawn_load<F>(&self, ctx: &egui::Context, from_url: bool, acquisition: F)
    where
        F: Future<Output = Result<PreparedImage>> + Send + 'static,
    {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = match acquisition.await {
                Ok(prepared) => tokio::task::spawn_blocking(move || LoadedImage::decode(prepared))
                    .await
                    .unwrap_or_else(|err| Err(CropError::Decode(err.to_string()))),
                Err(err) => Err(err),
            };
            if tx.send(LoadResult { from_url, result }).is_err() {
                error!("load finished after the window closed");
            }
            ctx.request_repaint();
        });
    }

    fn open_path(&mut self, ctx: &egui::Context, path: PathBuf) {
        info!("opening {}", path.display());
        self.spawn_load(ctx, false, async move { acquire::read_file(&path).await });
    }

    fn pick_file(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
        {
            self.open_path(ctx, path);
        }
    }

    fn fetch_url(&mut self, ctx: &egui::Context, url: String) {
        if !acquire::can_fetch(&url, self.fetching) {
            return;
        }
        info!("fetching {}", url);
        self.fetching = true;
        let fetcher = Arc::clone(&self.fetcher);
        self.spawn_load(ctx, true, async move { fetcher.fetch(&url).await });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return;
        }
        self.spawn_load(ctx, false, async move { acquire::read_dropped(&dropped_files).await });
    }

    fn poll_loads(&mut self) {
        while let Ok(LoadResult { from_url, result }) = self.rx.try_recv() {
            if from_url {
                self.fetching = false;
            }
            let loaded = result.is_ok();
            self.state.apply_load(result, &mut self.notifications);
            if loaded {
                self.texture = None;
            }
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(loaded) = self.state.image() {
            let image = &loaded.image;
            let (w, h) = image.dimensions();
            let display_image = if w > MAX_TEXTURE_SIDE || h > MAX_TEXTURE_SIDE {
                image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE)
            } else {
                image.clone()
            };
            let size = [display_image.width() as _, display_image.height() as _];
            let image_buffer = display_image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn save(&mut self) {
        let Some(name) = self.state.image().map(|image| image.name.clone()) else {
            self.notifications
                .report("Error Saving Crop", &CropError::NoImage);
            return;
        };

        let saved = self
            .state
            .export(self.config.jpeg_quality)
            .and_then(|exported| export::save_file(&exported, &name, &self.config.output_dir));
        match saved {
            Ok(path) => self.notifications.info(format!("Saved {}", path.display())),
            Err(err) => self.notifications.report("Error Saving Crop", &err),
        }
    }

    fn close(&mut self) {
        self.state.unload();
        self.texture = None;
    }

    fn header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new("Crop Web").size(22.0).strong());
                    ui.label("A simple tool to crop images.");
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, hint) = if self.dark_mode {
                        ("☀", "Switch to light mode")
                    } else {
                        ("🌙", "Switch to dark mode")
                    };
                    if ui.button(icon).on_hover_text(hint).clicked() {
                        self.dark_mode = !self.dark_mode;
                        ctx.set_visuals(if self.dark_mode {
                            egui::Visuals::dark()
                        } else {
                            egui::Visuals::light()
                        });
                    }
                });
            });
        });
    }
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_loads();

        if self.state.is_loaded() && self.texture.is_none() {
            self.load_texture(ctx);
        }

        self.header(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let Some(texture) = self.texture.clone() else {
                    match self.dropzone.show(ui, self.fetching) {
                        Some(DropzoneAction::PickFile) => self.pick_file(ctx),
                        Some(DropzoneAction::FetchUrl(url)) => self.fetch_url(ctx, url),
                        None => {}
                    }
                    return;
                };

                self.crop_view.show(
                    ui,
                    &texture,
                    &mut self.state,
                    self.config.max_display_height,
                );

                if let Some(label) = self.state.header_label() {
                    let name = self
                        .state
                        .image()
                        .map(|image| image.name.clone())
                        .unwrap_or_default();
                    ui.add_space(6.0);
                    ui.label(label).on_hover_text(name);
                }

                ui.separator();

                match panel::show(ui, &mut self.state) {
                    Some(PanelAction::Save) => self.save(),
                    Some(PanelAction::NewFile) => self.pick_file(ctx),
                    Some(PanelAction::Close) => self.close(),
                    None => {}
                }
            });
        });

        toasts::show(ctx, &mut self.notifications);
    }
}
