use crate::dashboard::data_cache::DashboardDataSnapshot;
use crate::dashboard::export;
use crate::dashboard::model::{Widget, WidgetId, WidgetKind};
use crate::dashboard::store::WidgetStore;
use crate::dashboard::widgets::{RenderContext, RenderMode, RendererRegistry, ACCENT, MUTED};
use eframe::egui;
use std::path::{Path, PathBuf};

pub const SOURCE_LABEL: &str = "Nielsen Korea";
pub const SEGMENT_LABEL: &str = "All Ages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Unsupported,
    Failed(String),
}

impl ExportStatus {
    pub fn message(&self) -> String {
        match self {
            ExportStatus::Saved(path) => format!("Saved to {}", path.display()),
            ExportStatus::Unsupported => "This widget has no CSV export".into(),
            ExportStatus::Failed(err) => format!("Export failed: {err}"),
        }
    }
}

/// Why the modal closed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Escape,
    ClickOutside,
}

/// Modal overlay for the store's selected widget.
pub struct DetailView {
    export_dir: PathBuf,
    shown_for: Option<WidgetId>,
    status: Option<ExportStatus>,
}

impl DetailView {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            shown_for: None,
            status: None,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn status(&self) -> Option<&ExportStatus> {
        self.status.as_ref()
    }

    /// Export `widget` into the configured directory and remember the outcome
    /// for the status line. Errors never escape the modal.
    pub fn export(&mut self, widget: &Widget) -> &ExportStatus {
        let status = match export::write_export(widget, &self.export_dir) {
            Ok(Some(path)) => ExportStatus::Saved(path),
            Ok(None) => ExportStatus::Unsupported,
            Err(err) => {
                tracing::error!(widget = %widget.id, error = %format!("{err:#}"), "csv export failed");
                ExportStatus::Failed(format!("{err:#}"))
            }
        };
        self.status.insert(status)
    }

    /// Draw the modal if something is selected. Closing clears the store's
    /// selection.
    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        store: &mut WidgetStore,
        registry: &RendererRegistry,
        data: &DashboardDataSnapshot,
    ) -> Option<CloseReason> {
        let Some(widget) = store.selected().cloned() else {
            self.shown_for = None;
            self.status = None;
            return None;
        };
        let opening = self.shown_for.as_ref() != Some(&widget.id);
        if opening {
            self.shown_for = Some(widget.id.clone());
            self.status = None;
        }

        let screen = ctx.screen_rect();
        ctx.layer_painter(egui::LayerId::new(
            egui::Order::PanelResizeLine,
            egui::Id::new("widget-detail-backdrop"),
        ))
        .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(170));

        let mut close: Option<CloseReason> = None;
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            close = Some(CloseReason::Escape);
        }

        let size = screen.size() * 0.9;
        let shown = egui::Window::new(widget.title.clone())
            .id(egui::Id::new("widget-detail"))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size(size)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.heading(&widget.title);
                        ui.colored_label(MUTED, "Deep dive analysis");
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").on_hover_text("Close").clicked() {
                            close = Some(CloseReason::Button);
                        }
                        if export::is_exportable(&widget) && ui.button("⬇ Export CSV").clicked() {
                            self.export(&widget);
                        }
                    });
                });
                if let Some(status) = &self.status {
                    let color = match status {
                        ExportStatus::Saved(_) => ACCENT,
                        _ => egui::Color32::LIGHT_RED,
                    };
                    ui.colored_label(color, status.message());
                }
                ui.separator();

                let footer = widget.kind != WidgetKind::Calendar;
                let body_height = ui.available_height() - if footer { 72.0 } else { 0.0 };
                egui::ScrollArea::vertical()
                    .id_source("widget-detail-body")
                    .max_height(body_height.max(120.0))
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        registry.render(ui, &widget, &RenderContext { data }, RenderMode::Detail);
                    });

                if footer {
                    ui.separator();
                    let updated = data
                        .widgets_fetched_at
                        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".into());
                    ui.columns(3, |cols| {
                        footer_card(&mut cols[0], "Source", SOURCE_LABEL);
                        footer_card(&mut cols[1], "Segment", SEGMENT_LABEL);
                        footer_card(&mut cols[2], "Last Update", &updated);
                    });
                }
            });

        if close.is_none() && !opening {
            let window_rect = shown.as_ref().map(|s| s.response.rect);
            let clicked_outside = ctx.input(|i| {
                i.pointer.any_click()
                    && i.pointer
                        .interact_pos()
                        .zip(window_rect)
                        .is_some_and(|(pos, rect)| !rect.contains(pos))
            });
            if clicked_outside {
                close = Some(CloseReason::ClickOutside);
            }
        }

        if let Some(reason) = close {
            tracing::debug!(widget = %widget.id, ?reason, "detail view closed");
            store.clear_selection();
            self.shown_for = None;
            self.status = None;
        }
        close
    }
}

fn footer_card(ui: &mut egui::Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.small(label);
        ui.strong(value);
    });
}
