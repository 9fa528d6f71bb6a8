use eframe::egui;

use crate::acquire::can_fetch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropzoneAction {
    PickFile,
    FetchUrl(String),
}

/// Landing view shown while no image is loaded: a click/drop target and a
/// "From URL" box.
#[derive(Default)]
pub struct Dropzone {
    url: String,
}

impl Dropzone {
    pub fn show(&mut self, ui: &mut egui::Ui, fetching: bool) -> Option<DropzoneAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.15);

            let target = egui::Button::new(
                egui::RichText::new("🖼  Click or drag an image here")
                    .size(22.0)
                    .strong(),
            )
            .frame(false);
            if ui.add(target).clicked() {
                action = Some(DropzoneAction::PickFile);
            }

            ui.add_space(24.0);
            ui.label("From URL");
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.url)
                        .hint_text("https://example.com/image.jpg")
                        .desired_width(400.0),
                );
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let enabled = can_fetch(&self.url, fetching);
                let clicked = ui
                    .add_enabled(enabled, egui::Button::new("⬇"))
                    .on_hover_text("Load image from URL")
                    .clicked();

                if enabled && (clicked || submitted) {
                    action = Some(DropzoneAction::FetchUrl(self.url.trim().to_string()));
                }
                if fetching {
                    ui.spinner();
                }
            });
        });

        action
    }
}
