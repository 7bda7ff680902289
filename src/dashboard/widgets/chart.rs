use super::{items, no_data, number, plot_height, RenderContext, RenderMode, WidgetRenderer};
use super::{ACCENT, ACCENT_WARM, MUTED};
use crate::dashboard::export::chart_series;
use crate::dashboard::model::Widget;
use eframe::egui::{self, Color32, FontId, Pos2, Shape, Stroke};
use serde_json::Value;

const SERIES_COLORS: [Color32; 4] = [
    ACCENT,
    ACCENT_WARM,
    Color32::from_rgb(0x60, 0xA5, 0xFA),
    Color32::from_rgb(0xC0, 0x84, 0xFC),
];
const AXIS_WIDTH: f32 = 36.0;
const LABEL_HEIGHT: f32 = 18.0;
const GRID_LINES: usize = 4;

pub struct ChartRenderer;

/// Lower and upper bound over every plotted value, padded so flat series
/// still get a visible band.
pub fn value_range(series: &[Vec<f32>]) -> Option<(f32, f32)> {
    let mut values = series.iter().flatten().copied().filter(|v| v.is_finite());
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (max - min).abs() < f32::EPSILON {
        Some((min - 1.0, max + 1.0))
    } else {
        let pad = (max - min) * 0.1;
        Some((min - pad, max + pad))
    }
}

impl WidgetRenderer for ChartRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, _ctx: &RenderContext<'_>, mode: RenderMode) {
        let data = &widget.data;
        let labels: Vec<String> = items(data, "labels")
            .iter()
            .map(|l| l.as_str().map(str::to_string).unwrap_or_else(|| l.to_string()))
            .collect();
        let series: Vec<(String, Vec<f32>)> = chart_series(data)
            .into_iter()
            .map(|(name, values)| {
                let points = values
                    .iter()
                    .map(|v| number(Some(v)).unwrap_or(f32::NAN))
                    .collect();
                (name, points)
            })
            .filter(|(_, values): &(String, Vec<f32>)| !values.is_empty())
            .collect();
        let values: Vec<Vec<f32>> = series.iter().map(|(_, v)| v.clone()).collect();
        let Some((lo, hi)) = value_range(&values) else {
            no_data(ui);
            return;
        };

        ui.horizontal(|ui| {
            for (idx, (name, _)) in series.iter().enumerate() {
                ui.colored_label(SERIES_COLORS[idx % SERIES_COLORS.len()], format!("● {name}"));
            }
            if let Some(unit) = data.get("yLabel").and_then(Value::as_str) {
                ui.colored_label(MUTED, unit);
            }
        });

        let size = egui::vec2(ui.available_width(), plot_height(ui, mode));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let plot = egui::Rect::from_min_max(
            egui::pos2(rect.left() + AXIS_WIDTH, rect.top() + 4.0),
            egui::pos2(rect.right() - 4.0, rect.bottom() - LABEL_HEIGHT),
        );
        let grid_color = ui.visuals().widgets.noninteractive.bg_stroke.color;

        for i in 0..=GRID_LINES {
            let t = i as f32 / GRID_LINES as f32;
            let y = plot.bottom() - t * plot.height();
            painter.line_segment(
                [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
                Stroke::new(0.5, grid_color),
            );
            painter.text(
                egui::pos2(plot.left() - 4.0, y),
                egui::Align2::RIGHT_CENTER,
                format!("{:.1}", lo + t * (hi - lo)),
                FontId::proportional(10.0),
                MUTED,
            );
        }

        let slots = labels
            .len()
            .max(values.iter().map(Vec::len).max().unwrap_or(0))
            .max(1);
        let x_at = |i: usize| {
            if slots == 1 {
                plot.center().x
            } else {
                plot.left() + plot.width() * i as f32 / (slots - 1) as f32
            }
        };
        let y_at = |v: f32| plot.bottom() - (v - lo) / (hi - lo) * plot.height();

        let stride = ((slots as f32 * 48.0) / plot.width().max(1.0)).ceil().max(1.0) as usize;
        for (i, label) in labels.iter().enumerate().step_by(stride) {
            painter.text(
                egui::pos2(x_at(i), plot.bottom() + 3.0),
                egui::Align2::CENTER_TOP,
                label,
                FontId::proportional(10.0),
                MUTED,
            );
        }

        for (idx, (_, points)) in series.iter().enumerate() {
            let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
            let line: Vec<Pos2> = points
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| egui::pos2(x_at(i), y_at(*v)))
                .collect();
            if idx == 0 {
                painter.add(Shape::line(line.clone(), Stroke::new(3.0, color)));
                for p in &line {
                    painter.circle(*p, 3.0, ui.visuals().extreme_bg_color, Stroke::new(2.0, color));
                }
            } else {
                painter.extend(Shape::dashed_line(&line, Stroke::new(2.0, color), 5.0, 5.0));
            }
        }

        if let Some(pos) = response.hover_pos() {
            let i = if slots == 1 {
                0
            } else {
                (((pos.x - plot.left()) / plot.width()) * (slots - 1) as f32)
                    .round()
                    .clamp(0.0, (slots - 1) as f32) as usize
            };
            painter.line_segment(
                [egui::pos2(x_at(i), plot.top()), egui::pos2(x_at(i), plot.bottom())],
                Stroke::new(1.0, MUTED),
            );
            let label = labels.get(i).cloned().unwrap_or_default();
            let lines: Vec<String> = series
                .iter()
                .filter_map(|(name, pts)| {
                    pts.get(i).filter(|v| v.is_finite()).map(|v| format!("{name}: {v}"))
                })
                .collect();
            response.on_hover_ui_at_pointer(|ui| {
                ui.strong(label);
                for line in lines {
                    ui.label(line);
                }
            });
        }
    }
}
