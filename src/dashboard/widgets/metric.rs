use super::{field, flag, items, no_data, text, RenderContext, RenderMode, WidgetRenderer};
use super::{ACCENT, ACCENT_WARM, DOWN, MUTED};
use crate::dashboard::model::Widget;
use eframe::egui::{self, RichText};
use serde_json::Value;

/// Rows shown per section of the daily view while the section is collapsed.
const SECTION1_ROWS: usize = 2;
const SECTION2_ROWS: usize = 4;
const CARD_RANKINGS: usize = 5;

pub struct MetricRenderer;

impl WidgetRenderer for MetricRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, _ctx: &RenderContext<'_>, mode: RenderMode) {
        let data = &widget.data;
        if data.get("viewType").and_then(Value::as_str) == Some("season_avg") {
            season_average(ui, widget, mode);
        } else if flag(data, "isComplex") {
            daily_viewership(ui, widget, mode);
        } else {
            simple(ui, data, mode);
        }
    }
}

fn simple(ui: &mut egui::Ui, data: &Value, mode: RenderMode) {
    if field(data, "value").is_none() {
        no_data(ui);
        return;
    }
    let size = match mode {
        RenderMode::Card => 30.0,
        RenderMode::Detail => 48.0,
    };
    ui.label(RichText::new(text(data, "value")).size(size).strong());
    let up = flag(data, "trendUp");
    let (arrow, color) = if up { ("▲", ACCENT) } else { ("▼", ACCENT_WARM) };
    ui.horizontal(|ui| {
        ui.colored_label(color, format!("{arrow} {}", text(data, "trend")));
        ui.colored_label(MUTED, text(data, "label"));
    });
}

fn season_average(ui: &mut egui::Ui, widget: &Widget, mode: RenderMode) {
    let data = &widget.data;
    ui.horizontal(|ui| {
        ui.colored_label(MUTED, "시즌");
        ui.separator();
        ui.strong(text(data, "season"));
    });
    ui.add_space(6.0);

    let rankings = items(data, "topRankings");
    let shown = match mode {
        RenderMode::Card => &rankings[..rankings.len().min(CARD_RANKINGS)],
        RenderMode::Detail => rankings,
    };
    let (rate_size, trend_size) = match mode {
        RenderMode::Card => (40.0, 18.0),
        RenderMode::Detail => (64.0, 24.0),
    };

    ui.columns(if shown.is_empty() { 1 } else { 2 }, |cols| {
        cols[0].vertical_centered(|ui| {
            ui.label(RichText::new(text(data, "currentRate")).size(rate_size).strong());
            let arrow = if flag(data, "trendUp") { "↗" } else { "↘" };
            ui.label(
                RichText::new(format!("{arrow} {}", text(data, "trend")))
                    .size(trend_size)
                    .color(DOWN),
            );
            ui.colored_label(MUTED, text(data, "comparison"));
        });
        if let Some(right) = cols.get_mut(1) {
            egui::Grid::new((widget.id.as_str(), "top-rankings", mode))
                .num_columns(3)
                .spacing([12.0, if mode == RenderMode::Detail { 10.0 } else { 4.0 }])
                .show(right, |ui| {
                    for (idx, item) in shown.iter().enumerate() {
                        let color = match idx {
                            0 => ACCENT_WARM,
                            1 | 2 => ui.visuals().strong_text_color(),
                            _ => MUTED,
                        };
                        ui.label(RichText::new(format!("TOP{}", text(item, "rank"))).color(color).strong());
                        ui.colored_label(MUTED, text(item, "season"));
                        ui.label(RichText::new(text(item, "rate")).color(ACCENT).strong());
                        ui.end_row();
                    }
                });
        }
    });
}

fn daily_viewership(ui: &mut egui::Ui, widget: &Widget, mode: RenderMode) {
    let data = &widget.data;
    ui.vertical_centered(|ui| {
        ui.strong(text(data, "date"));
    });
    ui.add_space(4.0);
    egui::ScrollArea::vertical()
        .id_source((widget.id.as_str(), "daily", mode))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            section(ui, widget, "section1", SECTION1_ROWS, mode);
            ui.add_space(6.0);
            section(ui, widget, "section2", SECTION2_ROWS, mode);
        });
}

/// One titled table. In a card the title toggles between the first
/// `collapsed_rows` rows and the full list; the detail view always shows all.
fn section(ui: &mut egui::Ui, widget: &Widget, key: &str, collapsed_rows: usize, mode: RenderMode) {
    let Some(section) = field(&widget.data, key) else {
        return;
    };
    let expanded_id = egui::Id::new((widget.id.as_str(), key, "expanded"));
    let mut expanded = ui.data_mut(|d| *d.get_temp_mut_or_default::<bool>(expanded_id));
    let full = expanded || mode == RenderMode::Detail;

    let marker = if full { "▼" } else { "▶" };
    let title = ui.add(
        egui::Label::new(RichText::new(format!("{marker} {}", text(section, "title"))).color(ACCENT).strong())
            .sense(egui::Sense::click()),
    );
    if mode == RenderMode::Card {
        let title = title.on_hover_text(if expanded { "Click to Collapse" } else { "Click to Expand" });
        if title.clicked() {
            expanded = !expanded;
            ui.data_mut(|d| d.insert_temp(expanded_id, expanded));
        }
    }

    let headers = items(section, "headers");
    let rows = items(section, "rows");
    let shown = if full {
        rows
    } else {
        &rows[..rows.len().min(collapsed_rows)]
    };

    egui::Grid::new((widget.id.as_str(), key, mode))
        .num_columns(headers.len().max(1))
        .striped(true)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for h in headers {
                ui.strong(h.as_str().unwrap_or_default());
            }
            ui.end_row();
            for row in shown {
                if let Some(obj) = row.as_object() {
                    for value in obj.values() {
                        let cell = match value {
                            Value::String(s) => s.clone(),
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        ui.add(egui::Label::new(cell).truncate(true));
                    }
                }
                ui.end_row();
            }
        });
}
