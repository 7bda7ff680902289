use super::{field, items, no_data, number, text, RenderContext, RenderMode, WidgetRenderer};
use super::{ACCENT, ACCENT_WARM, MUTED};
use crate::dashboard::model::Widget;
use eframe::egui::{self, RichText};
use serde_json::Value;

const CARD_OTHERS: usize = 4;

pub struct RankingRenderer;

impl WidgetRenderer for RankingRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, _ctx: &RenderContext<'_>, mode: RenderMode) {
        let data = &widget.data;
        if data.get("viewType").and_then(Value::as_str) == Some("ranking_split") {
            split(ui, data, mode);
            return;
        }
        let list = items(data, "list");
        if list.is_empty() && field(data, "topRecord").is_none() {
            no_data(ui);
            return;
        }
        if let Some(top) = field(data, "topRecord") {
            highlight(ui, top, mode);
            ui.add_space(6.0);
        }
        egui::ScrollArea::vertical()
            .id_source((widget.id.as_str(), "ranking", mode))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (idx, item) in list.iter().enumerate() {
                    bar_row(ui, &format!("{}. {}", idx + 1, text(item, "match")), item);
                }
            });
    }
}

/// Bar fill for a rate such as `"3.40%"`: 20% of the track per rating point.
pub(crate) fn bar_fraction(rate: Option<f32>) -> f32 {
    (rate.unwrap_or(0.0) * 0.2).clamp(0.0, 1.0)
}

fn bar_row(ui: &mut egui::Ui, label: &str, item: &Value) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(text(item, "rate")).color(ACCENT).strong());
        });
    });
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 6.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 3.0, ui.visuals().extreme_bg_color);
    let fraction = bar_fraction(number(item.get("rate")));
    if fraction > 0.0 {
        let mut fill = rect;
        fill.set_width(rect.width() * fraction);
        painter.rect_filled(fill, 3.0, ACCENT);
    }
    ui.add_space(4.0);
}

fn highlight(ui: &mut egui::Ui, top: &Value, mode: RenderMode) {
    let rate_size = if mode == RenderMode::Detail { 40.0 } else { 28.0 };
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, ACCENT_WARM))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("TOP1").color(ACCENT_WARM).strong());
            ui.label(RichText::new(text(top, "rate")).size(rate_size).strong());
            ui.label(text(top, "match"));
            ui.colored_label(MUTED, text(top, "date"));
        });
}

fn split(ui: &mut egui::Ui, data: &Value, mode: RenderMode) {
    let others = items(data, "others");
    let top = field(data, "top1");
    if top.is_none() && others.is_empty() {
        no_data(ui);
        return;
    }
    let shown = match mode {
        RenderMode::Card => &others[..others.len().min(CARD_OTHERS)],
        RenderMode::Detail => others,
    };
    ui.columns(2, |cols| {
        if let Some(top) = top {
            highlight(&mut cols[0], top, mode);
        }
        for item in shown {
            let label = format!("{}. {}", text(item, "rank"), text(item, "match"));
            bar_row(&mut cols[1], &label, item);
            if mode == RenderMode::Detail {
                cols[1].colored_label(MUTED, text(item, "date"));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_is_twenty_percent_per_point() {
        assert_eq!(bar_fraction(Some(2.5)), 0.5);
        assert_eq!(bar_fraction(Some(7.0)), 1.0);
        assert_eq!(bar_fraction(Some(-1.0)), 0.0);
        assert_eq!(bar_fraction(None), 0.0);
    }
}
