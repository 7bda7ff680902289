use super::{items, no_data, text, RenderContext, RenderMode, WidgetRenderer, ACCENT, ACCENT_WARM, MUTED};
use crate::dashboard::model::Widget;
use eframe::egui::{self, RichText};
use serde_json::Value;

pub struct ListRenderer;

impl WidgetRenderer for ListRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, _ctx: &RenderContext<'_>, _mode: RenderMode) {
        let rows = items(&widget.data, "items");
        if rows.is_empty() {
            no_data(ui);
            return;
        }
        for item in rows {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let first = item.get("rank").and_then(Value::as_i64) == Some(1);
                    let color = if first { ACCENT_WARM } else { MUTED };
                    ui.label(RichText::new(text(item, "rank")).color(color).strong());
                    ui.label(text(item, "team"));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.colored_label(ACCENT, text(item, "value"));
                    });
                });
            });
        }
    }
}
