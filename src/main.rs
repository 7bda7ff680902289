use viewership_dashboard::gui::{install_fonts, DashboardApp};
use viewership_dashboard::logging;
use viewership_dashboard::settings::Settings;

use anyhow::Context;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::path_from_env();
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("load settings from {settings_path}"))?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(path = %settings_path, api = %settings.api_base_url, "starting dashboard");

    let (w, h) = settings.window_size.unwrap_or((1440, 900));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Viewership Dashboard")
            .with_inner_size([w as f32, h as f32])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Viewership Dashboard",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            install_fonts(&cc.egui_ctx, settings.font_path.as_deref());
            Box::new(DashboardApp::new(settings, settings_path))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
