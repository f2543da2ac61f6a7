use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::modules::image_converter::{ConverterConfig, ImageConverter};
use super::modules::image_export::TargetFormat;
use super::style::{self, ThemeMode};

const APP_DIR: &str = "batch_image_converter";

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

/// UI preferences kept between launches. The selection and the converted
/// results are never written here.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub theme_preference: ThemePreference,
    pub target_format: TargetFormat,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    fn load_from(path: &std::path::Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&Self::get_config_path());
    }

    fn save_to(&self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let written = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => debug!(path = %path.display(), "settings saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not save settings"),
        }
    }

    fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push("app_settings.json");
        path
    }
}

pub struct ConverterApp {
    converter: ImageConverter,
    theme_mode: ThemeMode,
    settings: AppSettings,
}

impl ConverterApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();

        let theme_mode = resolve_theme(settings.theme_preference, cc.egui_ctx.theme());
        style::apply_theme(&cc.egui_ctx, theme_mode);

        Self {
            converter: ImageConverter::new(ConverterConfig::default(), settings.target_format),
            theme_mode,
            settings,
        }
    }

    fn set_theme_preference(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        self.settings.theme_preference = preference;
        self.theme_mode = resolve_theme(preference, ctx.theme());
        style::apply_theme(ctx, self.theme_mode);
        self.settings.save();
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Add Images...").clicked() {
                        self.converter.pick_files();
                        ui.close();
                    }
                    if ui.add_enabled(self.converter.has_files(), egui::Button::new("Clear All")).clicked() {
                        self.converter.clear_all();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let current = self.settings.theme_preference;
                    for (preference, label) in [
                        (ThemePreference::System, "System Theme"),
                        (ThemePreference::Light, "Light Theme"),
                        (ThemePreference::Dark, "Dark Theme"),
                    ] {
                        if ui.radio(current == preference, label).clicked() {
                            self.set_theme_preference(ctx, preference);
                            ui.close();
                        }
                    }
                });

                if self.converter.is_busy() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.spinner();
                    });
                }
            });
            ui.add_space(4.0);
        });
    }
}

fn resolve_theme(preference: ThemePreference, system: egui::Theme) -> ThemeMode {
    match preference {
        ThemePreference::System => match system {
            egui::Theme::Dark => ThemeMode::Dark,
            egui::Theme::Light => ThemeMode::Light,
        },
        ThemePreference::Light => ThemeMode::Light,
        ThemePreference::Dark => ThemeMode::Dark,
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.settings.theme_preference, ThemePreference::System) {
            let system_theme = resolve_theme(ThemePreference::System, ctx.theme());
            if self.theme_mode != system_theme {
                self.theme_mode = system_theme;
                style::apply_theme(ctx, self.theme_mode);
            }
        }

        self.top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.converter.ui(ui, ctx);
        });

        if self.converter.target_format() != self.settings.target_format {
            self.settings.target_format = self.converter.target_format();
            self.settings.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_DIR).join("app_settings.json");
        let settings = AppSettings {
            theme_preference: ThemePreference::Dark,
            target_format: TargetFormat::Webp,
        };

        settings.save_to(&path);

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn missing_or_broken_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::write(&path, r#"{ "target_format": "webp" }"#).unwrap();
        let partial = AppSettings::load_from(&path);
        assert_eq!(partial.target_format, TargetFormat::Webp);
        assert_eq!(partial.theme_preference, ThemePreference::System);
    }

    #[test]
    fn explicit_theme_overrides_system() {
        assert_eq!(resolve_theme(ThemePreference::Light, egui::Theme::Dark), ThemeMode::Light);
        assert_eq!(resolve_theme(ThemePreference::System, egui::Theme::Dark), ThemeMode::Dark);
    }
}
