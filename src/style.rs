use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

pub struct ColorPalette;

impl ColorPalette {
    pub const BLUE_400: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
    pub const BLUE_500: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
    pub const BLUE_600: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

    pub const SLATE_100: egui::Color32 = egui::Color32::from_rgb(241, 245, 249);
    pub const SLATE_200: egui::Color32 = egui::Color32::from_rgb(226, 232, 240);
    pub const SLATE_300: egui::Color32 = egui::Color32::from_rgb(203, 213, 225);

    pub const GRAY_50: egui::Color32 = egui::Color32::from_rgb(249, 250, 251);
    pub const GRAY_100: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);
    pub const GRAY_200: egui::Color32 = egui::Color32::from_rgb(229, 231, 235);
    pub const GRAY_300: egui::Color32 = egui::Color32::from_rgb(209, 213, 219);
    pub const GRAY_400: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
    pub const GRAY_500: egui::Color32 = egui::Color32::from_rgb(107, 114, 128);
    pub const GRAY_700: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);
    pub const GRAY_800: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
    pub const GRAY_900: egui::Color32 = egui::Color32::from_rgb(17, 24, 39);

    pub const ZINC_100: egui::Color32 = egui::Color32::from_rgb(244, 244, 245);
    pub const ZINC_200: egui::Color32 = egui::Color32::from_rgb(228, 228, 231);
    pub const ZINC_300: egui::Color32 = egui::Color32::from_rgb(212, 212, 216);
    pub const ZINC_400: egui::Color32 = egui::Color32::from_rgb(161, 161, 170);
    pub const ZINC_500: egui::Color32 = egui::Color32::from_rgb(113, 113, 122);
    pub const ZINC_600: egui::Color32 = egui::Color32::from_rgb(82, 82, 91);
    pub const ZINC_700: egui::Color32 = egui::Color32::from_rgb(63, 63, 70);
    pub const ZINC_800: egui::Color32 = egui::Color32::from_rgb(39, 39, 42);
    pub const ZINC_900: egui::Color32 = egui::Color32::from_rgb(24, 24, 27);

    pub const RED_500: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
}

/// Fill, stroke and text color for one widget state.
type WidgetColors = (egui::Color32, egui::Color32, egui::Color32);

struct ThemeColors {
    panel: egui::Color32,
    faint: egui::Color32,
    extreme: egui::Color32,
    noninteractive: WidgetColors,
    inactive: WidgetColors,
    hovered: WidgetColors,
    active: WidgetColors,
    selection: egui::Color32,
    hyperlink: egui::Color32,
}

const DARK: ThemeColors = ThemeColors {
    panel: ColorPalette::ZINC_900,
    faint: ColorPalette::ZINC_800,
    extreme: egui::Color32::from_rgb(12, 12, 15),
    noninteractive: (ColorPalette::ZINC_800, ColorPalette::ZINC_700, ColorPalette::SLATE_300),
    inactive: (egui::Color32::from_rgb(30, 30, 35), ColorPalette::ZINC_600, ColorPalette::SLATE_200),
    hovered: (egui::Color32::from_rgb(40, 40, 48), ColorPalette::ZINC_500, ColorPalette::SLATE_100),
    active: (egui::Color32::from_rgb(50, 50, 60), ColorPalette::ZINC_400, egui::Color32::WHITE),
    selection: egui::Color32::from_rgba_premultiplied(60, 120, 240, 100),
    hyperlink: ColorPalette::BLUE_400,
};

const LIGHT: ThemeColors = ThemeColors {
    panel: ColorPalette::GRAY_50,
    faint: ColorPalette::GRAY_100,
    extreme: egui::Color32::WHITE,
    noninteractive: (egui::Color32::WHITE, ColorPalette::GRAY_300, ColorPalette::GRAY_700),
    inactive: (ColorPalette::GRAY_50, ColorPalette::GRAY_300, ColorPalette::GRAY_800),
    hovered: (ColorPalette::GRAY_100, ColorPalette::GRAY_400, ColorPalette::GRAY_900),
    active: (ColorPalette::GRAY_200, ColorPalette::GRAY_500, egui::Color32::BLACK),
    selection: egui::Color32::from_rgba_premultiplied(60, 120, 240, 80),
    hyperlink: ColorPalette::BLUE_600,
};

pub fn apply_theme(ctx: &egui::Context, theme: ThemeMode) {
    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(10);

    let colors = match theme {
        ThemeMode::Dark => &DARK,
        ThemeMode::Light => &LIGHT,
    };
    let visuals = &mut style.visuals;
    visuals.dark_mode = matches!(theme, ThemeMode::Dark);
    visuals.panel_fill = colors.panel;
    visuals.window_fill = colors.panel;
    visuals.faint_bg_color = colors.faint;
    visuals.extreme_bg_color = colors.extreme;
    visuals.selection.bg_fill = colors.selection;
    visuals.hyperlink_color = colors.hyperlink;

    let widgets = &mut visuals.widgets;
    for (w, (fill, stroke, text)) in [
        (&mut widgets.noninteractive, colors.noninteractive),
        (&mut widgets.inactive, colors.inactive),
        (&mut widgets.hovered, colors.hovered),
        (&mut widgets.active, colors.active),
    ] {
        w.corner_radius = egui::CornerRadius::same(4);
        w.bg_fill = fill;
        w.weak_bg_fill = fill;
        w.bg_stroke = egui::Stroke::new(1.0, stroke);
        w.fg_stroke = egui::Stroke::new(1.0, text);
    }

    ctx.set_style(style);
}

fn styled_button(
    ui: &mut egui::Ui,
    text: &str,
    fill: egui::Color32,
    hover_fill: egui::Color32,
    stroke: egui::Stroke,
    text_color: egui::Color32,
) -> egui::Response {
    ui.scope(|ui| {
        let widgets = &mut ui.style_mut().visuals.widgets;
        widgets.inactive.bg_fill = fill;
        widgets.inactive.weak_bg_fill = fill;
        widgets.inactive.bg_stroke = stroke;
        widgets.inactive.fg_stroke = egui::Stroke::new(1.0, text_color);

        widgets.hovered.bg_fill = hover_fill;
        widgets.hovered.weak_bg_fill = hover_fill;
        widgets.hovered.bg_stroke = stroke;
        widgets.hovered.fg_stroke = egui::Stroke::new(1.0, text_color);

        widgets.active.bg_fill = fill;
        widgets.active.bg_stroke = stroke;
        widgets.active.fg_stroke = egui::Stroke::new(1.0, text_color);

        let button = egui::Button::new(egui::RichText::new(text).size(15.0))
            .min_size(egui::vec2(160.0, 40.0))
            .corner_radius(6.0);

        ui.add(button)
    }).inner
}

pub fn primary_button(ui: &mut egui::Ui, text: &str, _theme: ThemeMode) -> egui::Response {
    styled_button(
        ui,
        text,
        ColorPalette::BLUE_600,
        ColorPalette::BLUE_500,
        egui::Stroke::NONE,
        egui::Color32::WHITE,
    )
}

pub fn secondary_button(ui: &mut egui::Ui, text: &str, theme: ThemeMode) -> egui::Response {
    match theme {
        ThemeMode::Dark => styled_button(
            ui,
            text,
            ColorPalette::ZINC_800,
            ColorPalette::ZINC_700,
            egui::Stroke::new(1.0, ColorPalette::ZINC_600),
            ColorPalette::SLATE_200,
        ),
        ThemeMode::Light => styled_button(
            ui,
            text,
            egui::Color32::WHITE,
            ColorPalette::GRAY_50,
            egui::Stroke::new(1.0, ColorPalette::GRAY_300),
            ColorPalette::GRAY_800,
        ),
    }
}
