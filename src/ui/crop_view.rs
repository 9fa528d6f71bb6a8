use eframe::egui;

use crate::geometry::Extent;
use crate::selection::{CropDrag, DragKind, ResizeHandle};
use crate::state::CropperState;

const HANDLE_TOLERANCE: f32 = 10.0;
const HANDLE_RADIUS: f32 = 6.0;

/// Draws the loaded image with the crop selection on top and turns pointer
/// drags into crop updates.
#[derive(Default)]
pub struct CropView {
    drag: Option<CropDrag>,
}

impl CropView {
    /// Fit the image into the available width and `max_height` without
    /// enlarging it.
    pub fn display_size(image_size: egui::Vec2, available_width: f32, max_height: f32) -> egui::Vec2 {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            return egui::Vec2::ZERO;
        }
        let scale = (available_width / image_size.x)
            .min(max_height / image_size.y)
            .min(1.0);
        image_size * scale
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        texture: &egui::TextureHandle,
        state: &mut CropperState,
        max_height: f32,
    ) {
        let Some(natural) = state.image().map(|image| image.natural_size()) else {
            return;
        };
        let display_size = Self::display_size(
            egui::vec2(natural.width, natural.height),
            ui.available_width(),
            max_height,
        );
        let displayed = Extent::new(display_size.x, display_size.y);
        state.set_displayed_size(displayed);

        let (image_rect, response) = ui.allocate_exact_size(display_size, egui::Sense::drag());
        let painter = ui.painter_at(image_rect.expand(HANDLE_RADIUS + 1.0));

        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Pointer positions relative to the image
        let local = |pos: egui::Pos2| (pos - image_rect.min).to_pos2();

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.drag = CropDrag::begin(
                    local(pos),
                    &state.crop(),
                    state.options.locked,
                    HANDLE_TOLERANCE,
                );
            }
        }

        if response.dragged() {
            if let (Some(drag), Some(pos)) = (self.drag, response.interact_pointer_pos()) {
                state.set_crop(drag.update(local(pos), displayed));
            }
        }

        if response.drag_stopped() {
            self.drag = None;
        }

        if let Some(DragKind::Handle(handle)) = self.drag.map(|d| d.kind) {
            let icon = match handle {
                ResizeHandle::Center => egui::CursorIcon::Grabbing,
                ResizeHandle::Left | ResizeHandle::Right => egui::CursorIcon::ResizeHorizontal,
                ResizeHandle::Top | ResizeHandle::Bottom => egui::CursorIcon::ResizeVertical,
                ResizeHandle::TopLeft | ResizeHandle::BottomRight => egui::CursorIcon::ResizeNwSe,
                ResizeHandle::TopRight | ResizeHandle::BottomLeft => egui::CursorIcon::ResizeNeSw,
            };
            ui.ctx().set_cursor_icon(icon);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        let crop = state.crop();
        if !crop.has_area() {
            return;
        }

        let screen_crop_rect = egui::Rect::from_min_size(
            image_rect.min + egui::vec2(crop.x, crop.y),
            egui::vec2(crop.width, crop.height),
        );

        // Draw overlay (dimmed area outside crop)
        let overlay_color = egui::Color32::from_black_alpha(150);

        // Top
        painter.rect_filled(
            egui::Rect::from_min_max(
                image_rect.min,
                egui::pos2(image_rect.max.x, screen_crop_rect.min.y),
            ),
            0.0,
            overlay_color,
        );
        // Bottom
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(image_rect.min.x, screen_crop_rect.max.y),
                image_rect.max,
            ),
            0.0,
            overlay_color,
        );
        // Left
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(image_rect.min.x, screen_crop_rect.min.y),
                egui::pos2(screen_crop_rect.min.x, screen_crop_rect.max.y),
            ),
            0.0,
            overlay_color,
        );
        // Right
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(screen_crop_rect.max.x, screen_crop_rect.min.y),
                egui::pos2(image_rect.max.x, screen_crop_rect.max.y),
            ),
            0.0,
            overlay_color,
        );

        if state.options.rule_of_thirds {
            let grid_stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(110));
            for i in 1..3 {
                let t = i as f32 / 3.0;
                let x = screen_crop_rect.min.x + screen_crop_rect.width() * t;
                let y = screen_crop_rect.min.y + screen_crop_rect.height() * t;
                painter.line_segment(
                    [
                        egui::pos2(x, screen_crop_rect.min.y),
                        egui::pos2(x, screen_crop_rect.max.y),
                    ],
                    grid_stroke,
                );
                painter.line_segment(
                    [
                        egui::pos2(screen_crop_rect.min.x, y),
                        egui::pos2(screen_crop_rect.max.x, y),
                    ],
                    grid_stroke,
                );
            }
        }

        // Draw crop border
        painter.rect_stroke(
            screen_crop_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::WHITE),
        );

        if state.options.locked {
            return;
        }

        let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
        let handle_fill = egui::Color32::WHITE;

        let handles = [
            screen_crop_rect.min,
            screen_crop_rect.max,
            egui::pos2(screen_crop_rect.min.x, screen_crop_rect.max.y),
            egui::pos2(screen_crop_rect.max.x, screen_crop_rect.min.y),
            screen_crop_rect.center_top(),
            screen_crop_rect.center_bottom(),
            screen_crop_rect.left_center(),
            screen_crop_rect.right_center(),
        ];

        for pos in handles {
            painter.circle(pos, HANDLE_RADIUS, handle_fill, handle_stroke);
        }
    }
}
