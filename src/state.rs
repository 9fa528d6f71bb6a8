//! All editing state for the one image being cropped. Panels receive it by
//! `&mut` and change it only through these setters.

use log::{debug, info};

use crate::acquire::LoadedImage;
use crate::error::{CropError, Result};
use crate::export::{self, ExportedImage};
use crate::geometry::{
    Alignment, AxisConstraint, CropRect, Extent, Size, VerticalAlignment, initial_crop,
    natural_crop_size, size_preset_rect, size_to_pixels, x_alignments, y_alignments,
};
use crate::notify::Notifications;
use crate::ratio::{self, RatioPreset};
use crate::util::shorten_name;

/// Preset values are compared with this slack, in displayed pixels.
const PRESET_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropOptions {
    pub rule_of_thirds: bool,
    pub locked: bool,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            rule_of_thirds: true,
            locked: false,
        }
    }
}

#[derive(Default)]
pub struct CropperState {
    image: Option<LoadedImage>,
    displayed: Option<Extent>,
    crop: CropRect,
    selected_ratio: Option<RatioPreset>,
    selected_size: Option<Size>,
    pub options: CropOptions,
}

impl CropperState {
    pub fn new(options: CropOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn displayed(&self) -> Option<Extent> {
        self.displayed
    }

    pub fn selected_ratio(&self) -> Option<RatioPreset> {
        self.selected_ratio
    }

    pub fn selected_size(&self) -> Option<Size> {
        self.selected_size
    }

    /// Replace whatever was loaded. Presets belong to the previous image and
    /// are cleared; the crop is placed once the view reports how large the
    /// image is drawn.
    pub fn load(&mut self, image: LoadedImage) {
        self.image = Some(image);
        self.reset_selection();
    }

    /// Successful loads replace the image; failures become toasts and leave
    /// the current image alone.
    pub fn apply_load(&mut self, result: Result<LoadedImage>, notifications: &mut Notifications) {
        match result {
            Ok(image) => self.load(image),
            Err(err) => notifications.report("Error Loading Image", &err),
        }
    }

    pub fn unload(&mut self) {
        if let Some(image) = self.image.take() {
            info!("closed {}", image.name);
        }
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.displayed = None;
        self.crop = CropRect::default();
        self.selected_ratio = None;
        self.selected_size = None;
    }

    /// Record the on-screen size of the image. The first report places the
    /// initial crop; later ones rescale the crop to cover the same pixels.
    pub fn set_displayed_size(&mut self, displayed: Extent) {
        if self.image.is_none() || displayed.is_empty() {
            return;
        }

        match self.displayed {
            None => {
                self.crop = initial_crop(displayed, self.crop.aspect);
                debug!("initial crop {:?}", self.crop);
            }
            Some(previous) if previous != displayed && !previous.is_empty() => {
                let sx = displayed.width / previous.width;
                let sy = displayed.height / previous.height;
                self.crop = self.crop.scaled(sx, sy).clamp_to(displayed);
            }
            Some(_) => {}
        }
        self.displayed = Some(displayed);
    }

    /// Clicking the active ratio clears it. The crop keeps its position and
    /// height and takes its width from the new aspect.
    pub fn toggle_ratio(&mut self, preset: RatioPreset) {
        self.selected_ratio = ratio::toggle(self.selected_ratio, preset);
        let aspect = self.selected_ratio.map(|r| r.aspect);
        self.crop = self.crop.with_aspect(aspect);

        if let (Some(_), Some(displayed)) = (aspect, self.displayed) {
            self.crop = self.crop.fit_aspect(displayed);
        }
    }

    pub fn select_size(&mut self, size: Size) {
        self.selected_size = Some(size);
        if let Some(displayed) = self.displayed {
            self.crop = size_preset_rect(displayed, self.crop.aspect, size);
        }
    }

    /// Store the rectangle reported by the crop view. A size preset stays
    /// selected only while its governing dimension is untouched.
    pub fn set_crop(&mut self, crop: CropRect) {
        self.crop = crop;

        if let (Some(size), Some(displayed)) = (self.selected_size, self.displayed) {
            let axis = AxisConstraint::resolve(displayed, crop.aspect).governing();
            let expected = size_to_pixels(axis.of_extent(&displayed), size);
            if (expected - axis.of_rect(&crop)).abs() > PRESET_EPSILON {
                self.selected_size = None;
            }
        }
    }

    pub fn align_x(&mut self, alignment: Alignment) {
        let offsets = x_alignments(
            self.displayed.map(|d| d.width),
            Some(self.crop.width).filter(|w| *w > 0.0),
        );
        self.crop.x = alignment.pick(&offsets);
    }

    pub fn align_y(&mut self, alignment: VerticalAlignment) {
        let offsets = y_alignments(
            self.displayed.map(|d| d.height),
            Some(self.crop.height).filter(|h| *h > 0.0),
        );
        self.crop.y = alignment.pick(&offsets);
    }

    pub fn toggle_rule_of_thirds(&mut self) {
        self.options.rule_of_thirds = !self.options.rule_of_thirds;
    }

    pub fn toggle_locked(&mut self) {
        self.options.locked = !self.options.locked;
    }

    pub fn can_save(&self) -> bool {
        self.image.is_some() && self.crop.has_area()
    }

    /// The selection's size in original pixels.
    pub fn natural_crop_size(&self) -> Option<(u32, u32)> {
        let image = self.image.as_ref()?;
        let displayed = self.displayed?;
        Some(natural_crop_size(&self.crop, image.natural_size(), displayed))
    }

    /// `shortened-name - WxH` for the loaded image.
    pub fn header_label(&self) -> Option<String> {
        let image = self.image.as_ref()?;
        let natural = image.natural_size();
        Some(format!(
            "{} - {}x{}",
            shorten_name(&image.name),
            natural.width as u32,
            natural.height as u32
        ))
    }

    pub fn export(&self, quality: u8) -> Result<ExportedImage> {
        let image = self.image.as_ref().ok_or(CropError::NoImage)?;
        let displayed = self.displayed.ok_or(CropError::NoImage)?;
        export::crop_image(&image.image, &self.crop, displayed, quality)
    }
}
