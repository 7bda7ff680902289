use super::{has_day, items, no_data, number, text, RenderContext, RenderMode, WidgetRenderer};
use super::{ACCENT, MUTED, SATURDAY, SUNDAY};
use crate::dashboard::model::Widget;
use eframe::egui::{self, Color32, FontId};
use serde_json::Value;

pub const DEFAULT_MAX_RATE: f32 = 3.5;
const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const CELL_GAP: f32 = 6.0;

pub struct CalendarRenderer;

/// Fill opacity for a day's rate. Days without a rate stay transparent.
pub fn cell_intensity(rate: f32, max_rate: f32) -> f32 {
    if rate <= 0.0 {
        return 0.0;
    }
    let max_rate = if max_rate > 0.0 { max_rate } else { DEFAULT_MAX_RATE };
    (rate / max_rate).max(0.15).min(1.0)
}

impl WidgetRenderer for CalendarRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, _ctx: &RenderContext<'_>, mode: RenderMode) {
        let data = &widget.data;
        let days = items(data, "days");
        if days.is_empty() {
            no_data(ui);
            return;
        }
        let max_rate = number(data.get("maxRate")).unwrap_or(DEFAULT_MAX_RATE);
        if let Some(month) = data.get("month").and_then(Value::as_str) {
            ui.vertical_centered(|ui| ui.strong(month));
        }

        let width = ui.available_width();
        let cell = ((width - CELL_GAP * 6.0) / 7.0).max(12.0);
        let cell = match mode {
            RenderMode::Card => cell.min(48.0),
            RenderMode::Detail => cell.min(96.0),
        };
        let grid_width = cell * 7.0 + CELL_GAP * 6.0;
        let left = ui.cursor().left() + ((width - grid_width) / 2.0).max(0.0);

        let (header, _) = ui.allocate_exact_size(egui::vec2(width, 18.0), egui::Sense::hover());
        for (i, name) in WEEKDAYS.iter().enumerate() {
            let color = match i {
                0 => SUNDAY,
                6 => SATURDAY,
                _ => MUTED,
            };
            let x = left + i as f32 * (cell + CELL_GAP) + cell / 2.0;
            ui.painter().text(
                egui::pos2(x, header.center().y),
                egui::Align2::CENTER_CENTER,
                *name,
                FontId::proportional(11.0),
                color,
            );
        }

        let rows = days.len().div_ceil(7);
        let height = rows as f32 * (cell + CELL_GAP);
        let (area, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let pointer = ui.input(|i| i.pointer.hover_pos());
        let mut hovered: Option<String> = None;

        for (idx, day) in days.iter().enumerate() {
            if !has_day(day) {
                continue;
            }
            let (row, col) = (idx / 7, idx % 7);
            let min = egui::pos2(
                left + col as f32 * (cell + CELL_GAP),
                area.top() + row as f32 * (cell + CELL_GAP),
            );
            let rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
            let rate = number(day.get("r")).unwrap_or(0.0);
            let alpha = cell_intensity(rate, max_rate);
            let fill = Color32::from_rgba_unmultiplied(
                ACCENT.r(),
                ACCENT.g(),
                ACCENT.b(),
                (alpha * 255.0).round() as u8,
            );
            ui.painter().rect_filled(rect, 4.0, fill);
            let text_color = if alpha > 0.6 {
                ui.visuals().extreme_bg_color
            } else {
                Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                text(day, "d"),
                FontId::proportional(12.0),
                text_color,
            );
            if rate > 0.0 && pointer.is_some_and(|p| rect.contains(p)) {
                hovered = Some(format!("{}%", text(day, "r")));
            }
        }

        if let Some(tip) = hovered {
            let tooltip_id = egui::Id::new((widget.id.as_str(), "calendar-tip", mode));
            egui::show_tooltip_at_pointer(ui.ctx(), tooltip_id, |ui| {
                ui.label(tip);
            });
        }
    }
}
