use eframe::egui;

use super::ic_helpers::format_kb;
use super::ic_main::{ConverterAction, ImageConverter, StatusKind};
use crate::modules::image_export::TargetFormat;
use crate::style::{self, ColorPalette, ThemeMode};

impl ImageConverter {
    pub(super) fn render_header(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        ui.vertical(|ui| {
            ui.add_space(12.0);

            let title_color = if matches!(theme, ThemeMode::Dark) {
                ColorPalette::ZINC_100
            } else {
                ColorPalette::ZINC_900
            };
            ui.label(
                egui::RichText::new("Batch Image Converter")
                    .size(24.0)
                    .color(title_color)
            );

            ui.add_space(4.0);

            let subtitle_color = if matches!(theme, ThemeMode::Dark) {
                ColorPalette::ZINC_400
            } else {
                ColorPalette::ZINC_600
            };
            ui.label(
                egui::RichText::new(format!(
                    "Convert up to {} images to PNG or WebP and save them one by one or as a ZIP",
                    self.selection.max_files()
                ))
                    .size(13.0)
                    .color(subtitle_color)
            );

            ui.add_space(12.0);
        });
    }

    pub(super) fn render_format_selector(&self, ui: &mut egui::Ui, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        let (panel_bg, border_color, text_color) = panel_colors(theme);

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new("Target Format")
                        .size(14.0)
                        .color(text_color)
                );

                ui.add_space(8.0);

                ui.horizontal_wrapped(|ui| {
                    for format in TargetFormat::all() {
                        let is_selected = self.target_format == format;

                        let (bg_color, txt_color) = if is_selected {
                            (ColorPalette::BLUE_600, egui::Color32::WHITE)
                        } else if matches!(theme, ThemeMode::Dark) {
                            (ColorPalette::ZINC_700, ColorPalette::ZINC_300)
                        } else {
                            (ColorPalette::GRAY_200, ColorPalette::GRAY_800)
                        };

                        let button = egui::Button::new(
                            egui::RichText::new(format.as_str())
                                .size(13.0)
                                .color(txt_color)
                        )
                        .fill(bg_color)
                        .stroke(egui::Stroke::NONE)
                        .corner_radius(6.0)
                        .min_size(egui::vec2(70.0, 32.0));

                        if ui.add(button).clicked() && !is_selected {
                            actions.push(ConverterAction::SetFormat(format));
                        }
                    }
                });
            });
    }

    pub(super) fn render_image_list(&self, ui: &mut egui::Ui, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        let (panel_bg, border_color, text_color) = panel_colors(theme);
        let weak_color = ColorPalette::ZINC_500;

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "Images ({}/{})",
                            self.selection.len(),
                            self.selection.max_files()
                        ))
                            .size(14.0)
                            .color(text_color)
                    );

                    if !self.selection.is_empty() {
                        let mut all = self.selection.all_checked();
                        if ui.checkbox(&mut all, "Select all").changed() {
                            actions.push(ConverterAction::ToggleAll(all));
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(self.selection.can_clear(), egui::Button::new("Clear All")).clicked() {
                            actions.push(ConverterAction::ClearAll);
                        }
                        if ui.button("Add Images").clicked() {
                            actions.push(ConverterAction::PickFiles);
                        }
                    });
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if self.selection.is_empty() {
                    self.render_drop_zone(ui, theme, actions);
                    return;
                }

                if self.drag_hover {
                    ui.label(egui::RichText::new("Release to add files").color(ColorPalette::BLUE_500));
                    ui.add_space(6.0);
                }

                let item_bg = if matches!(theme, ThemeMode::Dark) {
                    ColorPalette::ZINC_900
                } else {
                    egui::Color32::WHITE
                };

                egui::ScrollArea::vertical()
                    .id_salt("selected_files")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        for (idx, file) in self.selection.files().iter().enumerate() {
                            egui::Frame::new()
                                .fill(item_bg)
                                .stroke(egui::Stroke::new(1.0, border_color))
                                .corner_radius(6.0)
                                .inner_margin(12.0)
                                .show(ui, |ui| {
                                    ui.horizontal(|ui| {
                                        let mut checked = self.selection.is_checked(idx);
                                        if ui.checkbox(&mut checked, "").changed() {
                                            actions.push(ConverterAction::ToggleOne(idx));
                                        }

                                        ui.vertical(|ui| {
                                            ui.label(
                                                egui::RichText::new(&file.name)
                                                    .color(text_color)
                                                    .size(13.0)
                                            );
                                            ui.label(
                                                egui::RichText::new(format!("{} | {}", file.mime_type, format_kb(file.byte_size)))
                                                    .color(weak_color)
                                                    .size(11.0)
                                            );
                                        });

                                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                            if ui.button("Remove").clicked() {
                                                actions.push(ConverterAction::DeleteOne(idx));
                                            }
                                        });
                                    });
                                });

                            ui.add_space(6.0);
                        }
                    });
            });
    }

    fn render_drop_zone(&self, ui: &mut egui::Ui, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        let dark = matches!(theme, ThemeMode::Dark);
        let drop_zone_bg = match (self.drag_hover, dark) {
            (true, true) => ColorPalette::ZINC_700,
            (true, false) => ColorPalette::GRAY_200,
            (false, true) => ColorPalette::ZINC_900,
            (false, false) => egui::Color32::WHITE,
        };
        let drop_zone_border = match (self.drag_hover, dark) {
            (true, _) => ColorPalette::BLUE_500,
            (false, true) => ColorPalette::ZINC_600,
            (false, false) => ColorPalette::GRAY_400,
        };

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 150.0),
            egui::Sense::click(),
        );

        ui.painter().rect_filled(rect, 6.0, drop_zone_bg);
        ui.painter().rect_stroke(
            rect,
            6.0,
            egui::Stroke::new(2.0, drop_zone_border),
            egui::StrokeKind::Outside,
        );
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop images here or click to browse",
            egui::FontId::proportional(14.0),
            ColorPalette::ZINC_500,
        );

        if response.clicked() {
            actions.push(ConverterAction::PickFiles);
        }
    }

    pub(super) fn render_action_buttons(&self, ui: &mut egui::Ui, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        ui.horizontal(|ui| {
            let label = if self.is_converting() {
                "Converting..."
            } else {
                "Convert Selected"
            };

            let convert = ui.add_enabled_ui(self.can_convert(), |ui| {
                style::primary_button(ui, label, theme)
            }).inner;
            if convert.clicked() {
                actions.push(ConverterAction::Convert);
            }

            ui.label(
                egui::RichText::new(format!(
                    "{} of {} checked",
                    self.selection.checked_count(),
                    self.selection.len()
                ))
                    .size(12.0)
                    .color(ColorPalette::ZINC_500)
            );
        });
    }

    pub(super) fn render_progress(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        let Some(run) = &self.run else {
            return;
        };
        let (completed, total) = run
            .progress
            .lock()
            .map(|p| (p.completed, p.total))
            .unwrap_or((0, 0));

        let (panel_bg, border_color, text_color) = panel_colors(theme);

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!("Converting to {}...", run.format.as_str()))
                        .size(14.0)
                        .color(text_color)
                );

                ui.add_space(8.0);

                let fraction = if total > 0 { completed as f32 / total as f32 } else { 0.0 };
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .fill(ColorPalette::BLUE_500)
                        .text(format!("{}/{}", completed, total))
                );
            });
    }

    pub(super) fn render_results(&self, ui: &mut egui::Ui, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        if self.results.is_empty() && self.results.last_failures().is_empty() {
            return;
        }

        let (panel_bg, border_color, text_color) = panel_colors(theme);
        let item_bg = if matches!(theme, ThemeMode::Dark) {
            ColorPalette::ZINC_900
        } else {
            egui::Color32::WHITE
        };

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!("Converted ({})", self.results.len()))
                        .size(14.0)
                        .color(text_color)
                );

                ui.add_space(8.0);

                for failure in self.results.last_failures() {
                    ui.label(egui::RichText::new(failure).size(12.0).color(ColorPalette::RED_500));
                }

                egui::ScrollArea::vertical()
                    .id_salt("conversion_results")
                    .max_height(320.0)
                    .show(ui, |ui| {
                        for (idx, result) in self.results.results().iter().enumerate() {
                            egui::Frame::new()
                                .fill(item_bg)
                                .stroke(egui::Stroke::new(1.0, border_color))
                                .corner_radius(6.0)
                                .inner_margin(12.0)
                                .show(ui, |ui| {
                                    ui.horizontal(|ui| {
                                        ui.vertical(|ui| {
                                            ui.label(
                                                egui::RichText::new(result.derived_file_name())
                                                    .color(text_color)
                                                    .size(13.0)
                                            );
                                            let (w, h) = result.dimensions;
                                            ui.label(
                                                egui::RichText::new(format!(
                                                    "{} → {} | {}×{}",
                                                    format_kb(result.original_size),
                                                    format_kb(result.encoded_size_estimate),
                                                    w,
                                                    h
                                                ))
                                                    .color(ColorPalette::ZINC_500)
                                                    .size(11.0)
                                            );
                                        });

                                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                            if ui.button("Download").clicked() {
                                                actions.push(ConverterAction::Download(idx));
                                            }
                                        });
                                    });
                                });

                            ui.add_space(6.0);
                        }
                    });

                if self.results.can_export_archive() {
                    ui.add_space(8.0);
                    let label = if self.is_archiving() {
                        "Building ZIP..."
                    } else {
                        "Download All (ZIP)"
                    };
                    let clicked = ui.add_enabled_ui(!self.is_archiving(), |ui| {
                        style::secondary_button(ui, label, theme)
                    }).inner.clicked();
                    if clicked {
                        actions.push(ConverterAction::DownloadAll);
                    }
                }
            });
    }

    pub(super) fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Info => ColorPalette::ZINC_500,
                StatusKind::Error => ColorPalette::RED_500,
            };
            ui.label(egui::RichText::new(&status.text).size(12.0).color(color));
        }
    }

    /// Blocking notice for a rejected intake batch.
    pub(super) fn render_notice(&self, ctx: &egui::Context, theme: ThemeMode, actions: &mut Vec<ConverterAction>) {
        let Some(message) = &self.notice else {
            return;
        };

        let (bg_color, border_color, text_color) = if matches!(theme, ThemeMode::Dark) {
            (ColorPalette::ZINC_800, ColorPalette::ZINC_700, ColorPalette::ZINC_100)
        } else {
            (egui::Color32::WHITE, ColorPalette::GRAY_300, ColorPalette::GRAY_900)
        };

        egui::Area::new(egui::Id::new("notice_overlay"))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let screen_rect = ctx.content_rect();
                ui.allocate_rect(screen_rect, egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_rgba_premultiplied(0, 0, 0, 160));
            });

        egui::Window::new("Too Many Files")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Tooltip)
            .frame(egui::Frame::new()
                .fill(bg_color)
                .stroke(egui::Stroke::new(1.0, border_color))
                .corner_radius(8.0)
                .inner_margin(24.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(message).size(15.0).color(text_color));
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("None of the dropped or picked files were added.")
                            .size(13.0)
                            .color(ColorPalette::ZINC_500)
                    );
                    ui.add_space(20.0);
                    if style::primary_button(ui, "OK", theme).clicked() {
                        actions.push(ConverterAction::DismissNotice);
                    }
                });
            });
    }
}

fn panel_colors(theme: ThemeMode) -> (egui::Color32, egui::Color32, egui::Color32) {
    if matches!(theme, ThemeMode::Dark) {
        (ColorPalette::ZINC_800, ColorPalette::ZINC_700, ColorPalette::ZINC_200)
    } else {
        (ColorPalette::GRAY_50, ColorPalette::GRAY_300, ColorPalette::GRAY_800)
    }
}
