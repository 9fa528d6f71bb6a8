//! Pointer interaction with the crop selection: which handle is grabbed and
//! how the rectangle follows the pointer. Positions are displayed pixels
//! relative to the image's top-left corner.

use eframe::egui::{Pos2, Vec2, pos2};

use crate::geometry::{CropRect, Extent};

const MIN_SIZE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Center, // Moving
}

pub fn hit_test(pos: Pos2, rect: &CropRect, tolerance: f32) -> Option<ResizeHandle> {
    if !rect.has_area() {
        return None;
    }

    let min = pos2(rect.x, rect.y);
    let max = pos2(rect.right(), rect.bottom());

    if pos.distance(min) < tolerance {
        return Some(ResizeHandle::TopLeft);
    }
    if pos.distance(pos2(max.x, min.y)) < tolerance {
        return Some(ResizeHandle::TopRight);
    }
    if pos.distance(pos2(min.x, max.y)) < tolerance {
        return Some(ResizeHandle::BottomLeft);
    }
    if pos.distance(max) < tolerance {
        return Some(ResizeHandle::BottomRight);
    }

    if (pos.x - min.x).abs() < tolerance && pos.y > min.y && pos.y < max.y {
        return Some(ResizeHandle::Left);
    }
    if (pos.x - max.x).abs() < tolerance && pos.y > min.y && pos.y < max.y {
        return Some(ResizeHandle::Right);
    }
    if (pos.y - min.y).abs() < tolerance && pos.x > min.x && pos.x < max.x {
        return Some(ResizeHandle::Top);
    }
    if (pos.y - max.y).abs() < tolerance && pos.x > min.x && pos.x < max.x {
        return Some(ResizeHandle::Bottom);
    }

    if pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y {
        return Some(ResizeHandle::Center);
    }

    None
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragKind {
    Handle(ResizeHandle),
    NewSelection,
}

/// An in-progress drag. The rectangle is always recomputed from the state at
/// drag start plus the total pointer travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropDrag {
    pub kind: DragKind,
    origin: Pos2,
    start: CropRect,
}

impl CropDrag {
    /// A locked selection can only be moved, never resized or redrawn.
    pub fn begin(pos: Pos2, current: &CropRect, locked: bool, tolerance: f32) -> Option<Self> {
        let kind = match hit_test(pos, current, tolerance) {
            Some(ResizeHandle::Center) => DragKind::Handle(ResizeHandle::Center),
            Some(handle) if !locked => DragKind::Handle(handle),
            Some(_) => {
                let inside = pos.x >= current.x
                    && pos.x <= current.right()
                    && pos.y >= current.y
                    && pos.y <= current.bottom();
                if !inside {
                    return None;
                }
                DragKind::Handle(ResizeHandle::Center)
            }
            None if !locked => DragKind::NewSelection,
            None => return None,
        };

        Some(Self {
            kind,
            origin: pos,
            start: *current,
        })
    }

    pub fn update(&self, pos: Pos2, bounds: Extent) -> CropRect {
        let delta = pos - self.origin;
        let start = self.start;
        let aspect = start.aspect;

        let rect = match self.kind {
            DragKind::Handle(ResizeHandle::Center) => CropRect {
                x: (start.x + delta.x).clamp(0.0, (bounds.width - start.width).max(0.0)),
                y: (start.y + delta.y).clamp(0.0, (bounds.height - start.height).max(0.0)),
                ..start
            },
            DragKind::NewSelection => {
                let anchor = pos2(
                    self.origin.x.clamp(0.0, bounds.width),
                    self.origin.y.clamp(0.0, bounds.height),
                );
                let dir = Vec2::new(signum(delta.x), signum(delta.y));
                let raw = Vec2::new(delta.x.abs(), delta.y.abs());
                corner_rect(anchor, dir, raw, aspect, bounds)
            }
            DragKind::Handle(
                handle @ (ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomLeft
                | ResizeHandle::BottomRight),
            ) => {
                // Anchor is the fixed opposite corner.
                let (anchor, corner, dir) = match handle {
                    ResizeHandle::TopLeft => (
                        pos2(start.right(), start.bottom()),
                        pos2(start.x, start.y),
                        Vec2::new(-1.0, -1.0),
                    ),
                    ResizeHandle::TopRight => (
                        pos2(start.x, start.bottom()),
                        pos2(start.right(), start.y),
                        Vec2::new(1.0, -1.0),
                    ),
                    ResizeHandle::BottomLeft => (
                        pos2(start.right(), start.y),
                        pos2(start.x, start.bottom()),
                        Vec2::new(-1.0, 1.0),
                    ),
                    _ => (
                        pos2(start.x, start.y),
                        pos2(start.right(), start.bottom()),
                        Vec2::new(1.0, 1.0),
                    ),
                };
                let moved = corner + delta;
                let raw = Vec2::new((moved.x - anchor.x) * dir.x, (moved.y - anchor.y) * dir.y);
                corner_rect(anchor, dir, raw, aspect, bounds)
            }
            DragKind::Handle(ResizeHandle::Left | ResizeHandle::Right) => {
                let (anchor_x, dir_x) = match self.kind {
                    DragKind::Handle(ResizeHandle::Left) => (start.right(), -1.0),
                    _ => (start.x, 1.0),
                };
                let max_w = if dir_x > 0.0 { bounds.width - anchor_x } else { anchor_x };
                let raw_w = start.width + delta.x * dir_x;
                let mut width = raw_w.max(MIN_SIZE).min(max_w);
                let (y, height) = match aspect {
                    None => (start.y, start.height),
                    Some(a) => {
                        // Drive width, keep the vertical center
                        let mut height = width / a;
                        if height > bounds.height {
                            height = bounds.height;
                            width = height * a;
                        }
                        let center_y = start.y + start.height * 0.5;
                        (center_y - height * 0.5, height)
                    }
                };
                let x = if dir_x > 0.0 { anchor_x } else { anchor_x - width };
                CropRect {
                    x,
                    y,
                    width,
                    height,
                    ..start
                }
            }
            DragKind::Handle(ResizeHandle::Top | ResizeHandle::Bottom) => {
                let (anchor_y, dir_y) = match self.kind {
                    DragKind::Handle(ResizeHandle::Top) => (start.bottom(), -1.0),
                    _ => (start.y, 1.0),
                };
                let max_h = if dir_y > 0.0 { bounds.height - anchor_y } else { anchor_y };
                let raw_h = start.height + delta.y * dir_y;
                let mut height = raw_h.max(MIN_SIZE).min(max_h);
                let (x, width) = match aspect {
                    None => (start.x, start.width),
                    Some(a) => {
                        let mut width = height * a;
                        if width > bounds.width {
                            width = bounds.width;
                            height = width / a;
                        }
                        let center_x = start.x + start.width * 0.5;
                        (center_x - width * 0.5, width)
                    }
                };
                let y = if dir_y > 0.0 { anchor_y } else { anchor_y - height };
                CropRect {
                    x,
                    y,
                    width,
                    height,
                    ..start
                }
            }
        };

        rect.clamp_to(bounds)
    }
}

fn signum(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Rectangle grown from `anchor` in direction `dir` by `raw`, projected onto
/// the aspect when one is set and limited to the space left in `bounds`.
fn corner_rect(anchor: Pos2, dir: Vec2, raw: Vec2, aspect: Option<f32>, bounds: Extent) -> CropRect {
    let max_w = if dir.x > 0.0 { bounds.width - anchor.x } else { anchor.x };
    let max_h = if dir.y > 0.0 { bounds.height - anchor.y } else { anchor.y };
    let raw = Vec2::new(raw.x.max(MIN_SIZE), raw.y.max(MIN_SIZE));

    let (width, height) = match aspect {
        None => (raw.x.min(max_w), raw.y.min(max_h)),
        Some(a) => {
            // Project onto the aspect vector (a, 1)
            let u = Vec2::new(a, 1.0);
            let lambda = raw.dot(u) / u.length_sq();
            let mut width = a * lambda;
            let mut height = lambda;
            if width > max_w {
                width = max_w;
                height = width / a;
            }
            if height > max_h {
                height = max_h;
                width = height * a;
            }
            (width, height)
        }
    };

    let x = if dir.x > 0.0 { anchor.x } else { anchor.x - width };
    let y = if dir.y > 0.0 { anchor.y } else { anchor.y - height };
    CropRect::new(x, y, width, height).with_aspect(aspect)
}
