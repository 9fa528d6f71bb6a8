//! Crop rectangle math: size presets, alignment presets and the scaling
//! between displayed and natural image pixels.

use log::debug;

/// Width and height of an image or selection, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// A selection on the displayed image, in displayed pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub aspect: Option<f32>,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            aspect: None,
        }
    }

    pub fn with_aspect(mut self, aspect: Option<f32>) -> Self {
        self.aspect = aspect.filter(|a| *a > 0.0);
        self
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn scaled(self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            x: self.x * scale_x,
            y: self.y * scale_y,
            width: self.width * scale_x,
            height: self.height * scale_y,
            ..self
        }
    }

    /// Keep `x`, `y` and `height`, derive the width from `aspect`, then shrink
    /// and shift until the rectangle lies inside `bounds`.
    pub fn fit_aspect(self, bounds: Extent) -> Self {
        let Some(aspect) = self.aspect else {
            return self.clamp_to(bounds);
        };

        let mut height = self.height;
        let mut width = height * aspect;
        if width > bounds.width {
            width = bounds.width;
            height = width / aspect;
        }
        if height > bounds.height {
            height = bounds.height;
            width = height * aspect;
        }

        Self {
            width,
            height,
            ..self
        }
        .clamp_to(bounds)
    }

    /// Move the rectangle inside `bounds`, cutting it down only when it is
    /// larger than the bounds themselves.
    pub fn clamp_to(self, bounds: Extent) -> Self {
        let width = self.width.clamp(0.0, bounds.width.max(0.0));
        let height = self.height.clamp(0.0, bounds.height.max(0.0));
        let x = self.x.clamp(0.0, (bounds.width - width).max(0.0));
        let y = self.y.clamp(0.0, (bounds.height - height).max(0.0));
        Self {
            x,
            y,
            width,
            height,
            ..self
        }
    }
}

/// Size presets. This is a closed set: each variant owns a fixed divisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn divisor(&self) -> f32 {
        match self {
            Size::Large => 1.0,
            Size::Medium => 1.25,
            Size::Small => 1.5,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        };
        write!(f, "{}", s)
    }
}

/// Apply a size preset to the dimension it governs.
pub fn size_to_pixels(free_dimension_px: f32, size: Size) -> f32 {
    free_dimension_px / size.divisor()
}

/// Horizontal alignment presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const ALL: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

    pub fn pick(&self, offsets: &AlignmentOffsets) -> f32 {
        match self {
            Alignment::Left => offsets.start,
            Alignment::Center => offsets.center,
            Alignment::Right => offsets.end,
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Alignment::Left => "Left",
            Alignment::Center => "Center",
            Alignment::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Vertical alignment presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    pub const ALL: [VerticalAlignment; 3] = [
        VerticalAlignment::Top,
        VerticalAlignment::Middle,
        VerticalAlignment::Bottom,
    ];

    pub fn pick(&self, offsets: &AlignmentOffsets) -> f32 {
        match self {
            VerticalAlignment::Top => offsets.start,
            VerticalAlignment::Middle => offsets.center,
            VerticalAlignment::Bottom => offsets.end,
        }
    }
}

impl std::fmt::Display for VerticalAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerticalAlignment::Top => "Top",
            VerticalAlignment::Middle => "Middle",
            VerticalAlignment::Bottom => "Bottom",
        };
        write!(f, "{}", s)
    }
}

/// Offsets of a crop along one axis for the start, center and end presets.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AlignmentOffsets {
    pub start: f32,
    pub center: f32,
    pub end: f32,
}

/// Offsets along one axis. Missing or zero extents give all-zero offsets.
pub fn alignment_offsets(image_extent: Option<f32>, crop_extent: Option<f32>) -> AlignmentOffsets {
    match (image_extent, crop_extent) {
        (Some(image), Some(crop)) if image != 0.0 && crop != 0.0 => AlignmentOffsets {
            start: 0.0,
            center: (image - crop) / 2.0,
            end: image - crop,
        },
        _ => AlignmentOffsets::default(),
    }
}

pub fn x_alignments(image_width: Option<f32>, crop_width: Option<f32>) -> AlignmentOffsets {
    alignment_offsets(image_width, crop_width)
}

pub fn y_alignments(image_height: Option<f32>, crop_height: Option<f32>) -> AlignmentOffsets {
    alignment_offsets(image_height, crop_height)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn of_rect(&self, rect: &CropRect) -> f32 {
        match self {
            Axis::Width => rect.width,
            Axis::Height => rect.height,
        }
    }

    pub fn of_extent(&self, extent: &Extent) -> f32 {
        match self {
            Axis::Width => extent.width,
            Axis::Height => extent.height,
        }
    }
}

/// Which dimension a size preset governs for a given image and aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisConstraint {
    /// No aspect: both dimensions are sized independently.
    Unlocked,
    /// Aspect active: the limiting dimension is sized, the other is derived.
    Locked { aspect: f32, governing: Axis },
}

impl AxisConstraint {
    pub fn resolve(image: Extent, aspect: Option<f32>) -> Self {
        match aspect.filter(|a| *a > 0.0) {
            None => AxisConstraint::Unlocked,
            // Wider target than the image: full width leaves height to spare.
            Some(aspect) if image.aspect() <= aspect => AxisConstraint::Locked {
                aspect,
                governing: Axis::Width,
            },
            Some(aspect) => AxisConstraint::Locked {
                aspect,
                governing: Axis::Height,
            },
        }
    }

    /// The axis compared against a preset when deciding whether the user
    /// has resized away from it.
    pub fn governing(&self) -> Axis {
        match self {
            AxisConstraint::Unlocked => Axis::Width,
            AxisConstraint::Locked { governing, .. } => *governing,
        }
    }
}

/// Crop at the origin sized by `size` on the governing axis.
pub fn size_preset_rect(image: Extent, aspect: Option<f32>, size: Size) -> CropRect {
    let constraint = AxisConstraint::resolve(image, aspect);
    debug!("size preset {} with {:?}", size, constraint);

    match constraint {
        AxisConstraint::Unlocked => CropRect::new(
            0.0,
            0.0,
            size_to_pixels(image.width, size),
            size_to_pixels(image.height, size),
        ),
        AxisConstraint::Locked {
            aspect,
            governing: Axis::Width,
        } => {
            let width = size_to_pixels(image.width, size);
            CropRect::new(0.0, 0.0, width, width / aspect).with_aspect(Some(aspect))
        }
        AxisConstraint::Locked {
            aspect,
            governing: Axis::Height,
        } => {
            let height = size_to_pixels(image.height, size);
            CropRect::new(0.0, 0.0, height * aspect, height).with_aspect(Some(aspect))
        }
    }
}

/// The selection placed when an image is first shown: half the image height
/// at the origin, half the width too unless an aspect decides it.
pub fn initial_crop(displayed: Extent, aspect: Option<f32>) -> CropRect {
    let height = displayed.height / 2.0;
    match aspect.filter(|a| *a > 0.0) {
        None => CropRect::new(0.0, 0.0, displayed.width / 2.0, height),
        Some(aspect) => CropRect::new(0.0, 0.0, 0.0, height)
            .with_aspect(Some(aspect))
            .fit_aspect(displayed),
    }
}

/// `natural / displayed` per axis. A zero displayed extent maps 1:1.
pub fn scale_factors(natural: Extent, displayed: Extent) -> (f32, f32) {
    let sx = if displayed.width > 0.0 {
        natural.width / displayed.width
    } else {
        1.0
    };
    let sy = if displayed.height > 0.0 {
        natural.height / displayed.height
    } else {
        1.0
    };
    (sx, sy)
}

/// Size of the selection in original image pixels, rounded for display.
pub fn natural_crop_size(crop: &CropRect, natural: Extent, displayed: Extent) -> (u32, u32) {
    let (sx, sy) = scale_factors(natural, displayed);
    (
        (crop.width.max(0.0) * sx).round() as u32,
        (crop.height.max(0.0) * sy).round() as u32,
    )
}
