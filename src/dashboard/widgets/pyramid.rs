use super::{plot_height, RenderContext, RenderMode, WidgetRenderer, MUTED};
use crate::api::GenderDistribution;
use crate::dashboard::data_cache::Feed;
use crate::dashboard::model::Widget;
use eframe::egui::{self, Color32, FontId, Stroke};

const MEN: Color32 = Color32::from_rgb(0x38, 0xBD, 0xF8);
const WOMEN: Color32 = Color32::from_rgb(0xF4, 0x3F, 0x5E);
const LABEL_COLUMN: f32 = 72.0;
const AXIS_HEIGHT: f32 = 16.0;

/// Half-width of the x axis in games. Bars never touch the edge.
pub fn axis_extent(dist: &GenderDistribution) -> f32 {
    let max_abs = if dist.max_val != 0 {
        dist.max_val.unsigned_abs() as f32
    } else {
        10.0
    };
    max_abs * 1.1
}

fn translucent(c: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 153)
}

pub struct PyramidRenderer;

impl WidgetRenderer for PyramidRenderer {
    fn render(&self, ui: &mut egui::Ui, _widget: &Widget, ctx: &RenderContext<'_>, mode: RenderMode) {
        let dist = match &ctx.data.gender_distribution {
            Feed::Pending => {
                ui.colored_label(MUTED, "Loading Distribution Data...");
                return;
            }
            Feed::Failed(msg) => {
                ui.colored_label(MUTED, format!("Distribution unavailable: {msg}"));
                return;
            }
            Feed::Ready(dist) => dist,
        };
        if dist.labels.is_empty() {
            ui.colored_label(MUTED, "No data");
            return;
        }

        ui.horizontal(|ui| {
            ui.colored_label(MEN, "■ 남자부 (Men)");
            ui.colored_label(WOMEN, "■ 여자부 (Women)");
        });

        let footnote = mode == RenderMode::Card;
        let reserve = if footnote { 20.0 } else { 0.0 };
        let size = egui::vec2(ui.available_width(), (plot_height(ui, mode) - reserve).max(80.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);

        let plot = egui::Rect::from_min_max(
            egui::pos2(rect.left() + LABEL_COLUMN, rect.top()),
            egui::pos2(rect.right() - 4.0, rect.bottom() - AXIS_HEIGHT),
        );
        let extent = axis_extent(dist);
        let center_x = plot.center().x;
        let half = plot.width() / 2.0;
        let band = plot.height() / dist.labels.len() as f32;
        let bar = band * 0.8;

        let grid = ui.visuals().widgets.noninteractive.bg_stroke.color;
        for tick in [-1.0f32, -0.5, 0.0, 0.5, 1.0] {
            let x = center_x + tick * half;
            painter.line_segment(
                [egui::pos2(x, plot.top()), egui::pos2(x, plot.bottom())],
                Stroke::new(0.5, grid),
            );
            painter.text(
                egui::pos2(x, plot.bottom() + 2.0),
                egui::Align2::CENTER_TOP,
                format!("{:.0}", (tick * extent).abs()),
                FontId::proportional(10.0),
                MUTED,
            );
        }

        let hover = response.hover_pos();
        let mut tip: Option<String> = None;
        // Highest bucket on top, like a population pyramid.
        for (i, label) in dist.labels.iter().enumerate() {
            let row = dist.labels.len() - 1 - i;
            let top = plot.top() + row as f32 * band + (band - bar) / 2.0;
            let men = dist.men.get(i).copied().unwrap_or(0).unsigned_abs() as f32;
            let women = dist.women.get(i).copied().unwrap_or(0).unsigned_abs() as f32;

            let left = egui::Rect::from_min_max(
                egui::pos2(center_x - half * (men / extent), top),
                egui::pos2(center_x, top + bar),
            );
            let right = egui::Rect::from_min_max(
                egui::pos2(center_x, top),
                egui::pos2(center_x + half * (women / extent), top + bar),
            );
            painter.rect(left, 0.0, translucent(MEN), Stroke::new(1.0, MEN));
            painter.rect(right, 0.0, translucent(WOMEN), Stroke::new(1.0, WOMEN));
            painter.text(
                egui::pos2(rect.left() + LABEL_COLUMN - 6.0, top + bar / 2.0),
                egui::Align2::RIGHT_CENTER,
                label,
                FontId::proportional(11.0),
                ui.visuals().text_color(),
            );

            if let Some(p) = hover {
                if p.y >= top && p.y <= top + bar {
                    tip = Some(format!("{label}\n남자부 (Men): {men} 경기\n여자부 (Women): {women} 경기"));
                }
            }
        }

        if let Some(tip) = tip {
            response.on_hover_text_at_pointer(tip);
        }
        if footnote {
            ui.vertical_centered(|ui| {
                ui.small("* 시청률 구간별 경기 수 분포 (좌: 남자 / 우: 여자)");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_pads_the_largest_bucket() {
        let dist = GenderDistribution {
            max_val: 20,
            ..Default::default()
        };
        assert!((axis_extent(&dist) - 22.0).abs() < 1e-4);
        assert!((axis_extent(&GenderDistribution::default()) - 11.0).abs() < 1e-4);
    }
}
