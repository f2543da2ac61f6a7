use eframe::egui;
use crate::style::ThemeMode;

mod ic_errors;
mod ic_helpers;
mod ic_main;
mod ic_state;
mod ic_tools;
mod ic_ui;

pub use ic_main::{ConverterConfig, ImageConverter};

impl ImageConverter {
    pub fn ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let theme = if ui.visuals().dark_mode { ThemeMode::Dark } else { ThemeMode::Light };

        self.handle_file_drop(ctx);
        self.poll_jobs(ctx);

        let mut actions = Vec::new();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);

                self.render_header(ui, theme);

                ui.add_space(8.0);
                self.render_format_selector(ui, theme, &mut actions);

                ui.add_space(12.0);
                self.render_image_list(ui, theme, &mut actions);

                ui.add_space(12.0);
                self.render_action_buttons(ui, theme, &mut actions);
                self.render_status(ui);

                ui.add_space(12.0);
                self.render_progress(ui, theme);

                ui.add_space(12.0);
                self.render_results(ui, theme, &mut actions);

                ui.add_space(16.0);
            });

        self.render_notice(ctx, theme, &mut actions);

        for action in actions {
            self.apply(action);
        }
    }
}
