mod header;
mod sidebar;

pub use header::{connection_status, ConnectionStatus};

use crate::api::{spawn_fetch, ApiClient, FetchError};
use crate::dashboard::{
    Dashboard, DashboardContext, DashboardDataCache, DetailView, RendererRegistry, Widget,
    WidgetStore,
};
use crate::settings::Settings;
use eframe::egui;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct DashboardApp {
    store: WidgetStore,
    dashboard: Dashboard,
    detail: DetailView,
    registry: RendererRegistry,
    data_cache: DashboardDataCache,
    widgets_rx: Option<Receiver<Result<Vec<Widget>, FetchError>>>,
    settings: Settings,
    settings_path: String,
    window_size: (i32, i32),
}

impl DashboardApp {
    /// Build the app and start the startup fetches in the background.
    pub fn new(settings: Settings, settings_path: impl Into<String>) -> Self {
        let mut app = Self {
            store: WidgetStore::new(),
            dashboard: Dashboard::new(settings.grid_metrics(), settings.resize_metrics()),
            detail: DetailView::new(settings.export_dir.clone()),
            registry: RendererRegistry::with_defaults(),
            data_cache: DashboardDataCache::new(),
            widgets_rx: None,
            window_size: settings.window_size.unwrap_or((1440, 900)),
            settings_path: settings_path.into(),
            settings,
        };
        match ApiClient::new(&app.settings.api_base_url, app.settings.request_timeout()) {
            Ok(client) => app.start_fetches(Arc::new(client)),
            Err(err) => {
                app.store.finish_loading(Err(err.clone()));
                app.data_cache.set_map_points(Err(err.clone()));
                app.data_cache.set_gender_distribution(Err(err));
            }
        }
        app
    }

    fn start_fetches(&mut self, client: Arc<ApiClient>) {
        tracing::info!(base = %client.base_url(), "fetching dashboard data");
        let c = Arc::clone(&client);
        self.widgets_rx = Some(spawn_fetch("widgets", move || c.fetch_widgets()));
        let c = Arc::clone(&client);
        self.data_cache
            .watch_map_points(spawn_fetch("map-data", move || c.fetch_map_data()));
        self.data_cache.watch_gender_distribution(spawn_fetch(
            "gender-distribution",
            move || client.fetch_gender_distribution(),
        ));
    }

    /// Apply any finished fetches. Returns true if something changed.
    pub fn poll_fetches(&mut self) -> bool {
        let mut changed = self.data_cache.poll();
        if let Some(rx) = &self.widgets_rx {
            let outcome = match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(FetchError::Transport(
                    "widgets worker exited".into(),
                ))),
            };
            if let Some(result) = outcome {
                self.widgets_rx = None;
                if result.is_ok() {
                    self.data_cache.mark_widgets_fetched(chrono::Local::now());
                }
                self.store.finish_loading(result);
                changed = true;
            }
        }
        changed
    }

    pub fn is_fetching(&self) -> bool {
        self.widgets_rx.is_some() || self.data_cache.is_pending()
    }

    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    pub fn data_cache(&self) -> &DashboardDataCache {
        &self.data_cache
    }
}

/// Add the configured font as a fallback for every family so Hangul renders.
pub fn install_fonts(ctx: &egui::Context, font_path: Option<&Path>) {
    let Some(path) = font_path else {
        return;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not load font");
            return;
        }
    };
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("dashboard-extra".into(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("dashboard-extra".into());
    }
    ctx.set_fonts(fonts);
    tracing::info!(path = %path.display(), "font installed");
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        use egui::*;

        if self.poll_fetches() {
            ctx.request_repaint();
        }
        if self.is_fetching() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.window_size = (rect.width() as i32, rect.height() as i32);
        }
        let snapshot = self.data_cache.snapshot();
        let status = connection_status(&self.store);

        TopBottomPanel::top("header").show(ctx, |ui| {
            header::ui(ui, status);
        });

        SidePanel::left("restorable-widgets")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                sidebar::ui(ui, &mut self.store);
            });

        CentralPanel::default().show(ctx, |ui| {
            if self.store.is_loading() {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading widgets…");
                    });
                });
                return;
            }
            if self.store.visible().next().is_none() {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    if self.store.is_empty() {
                        ui.heading("No widgets loaded");
                    } else {
                        ui.heading("All widgets are hidden");
                    }
                    if let Some(err) = self.store.last_error() {
                        ui.colored_label(Color32::LIGHT_RED, err);
                    }
                });
                return;
            }
            ScrollArea::vertical()
                .id_source("dashboard-grid")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let grid_ctx = DashboardContext {
                        registry: &self.registry,
                        data: &snapshot,
                    };
                    self.dashboard.ui(ui, &mut self.store, &grid_ctx);
                });
        });

        self.detail
            .ui(ctx, &mut self.store, &self.registry, &snapshot);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.dashboard.teardown();
        let mut settings = self.settings.clone();
        settings.window_size = Some(self.window_size);
        if let Err(err) = settings.save(&self.settings_path) {
            tracing::warn!(path = %self.settings_path, error = %err, "could not save settings");
        }
        tracing::info!("dashboard closed");
    }
}
