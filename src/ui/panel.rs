use eframe::egui;

use crate::geometry::{Alignment, Size, VerticalAlignment};
use crate::ratio::RATIOS;
use crate::state::CropperState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    Save,
    NewFile,
    Close,
}

/// Presets, crop info and file actions shown under the image.
pub fn show(ui: &mut egui::Ui, state: &mut CropperState) -> Option<PanelAction> {
    let mut action = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 16.0;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical(|ui| {
                ratio_selector(ui, state);
                alignment_selector(ui, state);
                size_selector(ui, state);
            });
        });

        crop_info(ui, state);

        ui.vertical(|ui| {
            if ui
                .add_enabled(state.can_save(), egui::Button::new("Save"))
                .clicked()
            {
                action = Some(PanelAction::Save);
            }
            if ui.button("New File").clicked() {
                action = Some(PanelAction::NewFile);
            }
            if ui
                .button("Close")
                .on_hover_text("Clears the currently loaded image")
                .clicked()
            {
                action = Some(PanelAction::Close);
            }
        });
    });

    action
}

fn heading(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong().size(16.0));
}

fn ratio_selector(ui: &mut egui::Ui, state: &mut CropperState) {
    heading(ui, "Aspect Ratio");
    ui.horizontal(|ui| {
        for ratio in RATIOS {
            let selected = ratio.matches(state.selected_ratio().map(|r| r.aspect));
            if ui.selectable_label(selected, ratio.label).clicked() {
                state.toggle_ratio(ratio);
            }
        }
    });
}

fn alignment_selector(ui: &mut egui::Ui, state: &mut CropperState) {
    heading(ui, "Alignment");
    ui.horizontal(|ui| {
        for alignment in Alignment::ALL {
            if ui.button(alignment.to_string()).clicked() {
                state.align_x(alignment);
            }
        }
    });
    ui.horizontal(|ui| {
        for alignment in VerticalAlignment::ALL {
            if ui.button(alignment.to_string()).clicked() {
                state.align_y(alignment);
            }
        }
    });
}

fn size_selector(ui: &mut egui::Ui, state: &mut CropperState) {
    heading(ui, "Size");
    ui.horizontal(|ui| {
        for size in Size::ALL {
            let selected = state.selected_size() == Some(size);
            if ui.selectable_label(selected, size.to_string()).clicked() {
                state.select_size(size);
            }
        }
    });
}

fn crop_info(ui: &mut egui::Ui, state: &mut CropperState) {
    ui.vertical(|ui| {
        heading(ui, "Crop Size");
        match state.natural_crop_size() {
            Some((w, h)) => ui.label(format!("{}x{}", w, h)),
            None => ui.label("-"),
        };

        ui.horizontal(|ui| {
            let grid = if state.options.rule_of_thirds { "▦ Grid" } else { "☐ Grid" };
            if ui
                .selectable_label(state.options.rule_of_thirds, grid)
                .on_hover_text("Toggle grid")
                .clicked()
            {
                state.toggle_rule_of_thirds();
            }

            let lock = if state.options.locked { "🔒" } else { "🔓" };
            if ui
                .selectable_label(state.options.locked, lock)
                .on_hover_text("Toggle resizing")
                .clicked()
            {
                state.toggle_locked();
            }
        });
    });
}
