pub mod app;
pub mod crop_view;
pub mod dropzone;
pub mod panel;
pub mod toasts;

pub use app::CropperApp;
