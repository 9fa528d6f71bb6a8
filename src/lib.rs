pub mod acquire;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod notify;
pub mod ratio;
pub mod selection;
pub mod state;
pub mod ui;
pub mod util;

pub use error::{CropError, Result};
