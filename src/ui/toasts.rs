use std::time::{Duration, Instant};

use eframe::egui;

use crate::notify::{Level, Notifications};

fn fill(level: Level) -> egui::Color32 {
    match level {
        Level::Info => egui::Color32::from_rgb(43, 108, 176),
        Level::Warning => egui::Color32::from_rgb(221, 107, 32),
        Level::Error => egui::Color32::from_rgb(197, 48, 48),
    }
}

/// Draw pending toasts in the bottom-right corner. Clicking one dismisses it.
pub fn show(ctx: &egui::Context, notifications: &mut Notifications) {
    notifications.expire(Instant::now());
    if notifications.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (index, toast) in notifications.toasts().iter().enumerate() {
                let response = egui::Frame::none()
                    .fill(fill(toast.level))
                    .rounding(6.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        if let Some(title) = &toast.title {
                            ui.label(egui::RichText::new(title).strong().color(egui::Color32::WHITE));
                        }
                        ui.label(egui::RichText::new(&toast.description).color(egui::Color32::WHITE));
                    })
                    .response
                    .interact(egui::Sense::click());
                if response.clicked() {
                    dismissed = Some(index);
                }
                ui.add_space(6.0);
            }
        });

    if let Some(index) = dismissed {
        notifications.dismiss(index);
    }

    // Repaint until every toast has expired
    ctx.request_repaint_after(Duration::from_millis(250));
}
