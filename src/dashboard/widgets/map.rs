use super::{plot_height, RenderContext, RenderMode, WidgetRenderer, ACCENT, MUTED};
use crate::api::MapPoint;
use crate::dashboard::data_cache::Feed;
use crate::dashboard::model::Widget;
use eframe::egui::{self, Color32, FontId, Pos2, Rect, Stroke};

const HIGH: Color32 = Color32::from_rgb(0xF4, 0x3F, 0x5E);
const MARGIN: f32 = 28.0;

/// Equirectangular fit of a set of points into a screen rectangle, keeping
/// one scale for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl MapProjection {
    pub fn fit(points: &[MapPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut proj = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for p in &points[1..] {
            proj.min_lat = proj.min_lat.min(p.lat);
            proj.max_lat = proj.max_lat.max(p.lat);
            proj.min_lng = proj.min_lng.min(p.lng);
            proj.max_lng = proj.max_lng.max(p.lng);
        }
        if proj.max_lat - proj.min_lat < 1e-9 {
            proj.min_lat -= 0.5;
            proj.max_lat += 0.5;
        }
        if proj.max_lng - proj.min_lng < 1e-9 {
            proj.min_lng -= 0.5;
            proj.max_lng += 0.5;
        }
        Some(proj)
    }

    pub fn to_screen(&self, lat: f64, lng: f64, rect: Rect) -> Pos2 {
        let inner = rect.shrink(MARGIN.min(rect.width() / 4.0).min(rect.height() / 4.0));
        let mid_lat = ((self.min_lat + self.max_lat) / 2.0).to_radians();
        let lng_span = ((self.max_lng - self.min_lng) * mid_lat.cos()).max(1e-6);
        let lat_span = (self.max_lat - self.min_lat).max(1e-6);
        let scale = (inner.width() as f64 / lng_span).min(inner.height() as f64 / lat_span);
        let x_off = (inner.width() as f64 - lng_span * scale) / 2.0;
        let y_off = (inner.height() as f64 - lat_span * scale) / 2.0;
        let x = inner.left() as f64 + x_off + (lng - self.min_lng) * mid_lat.cos() * scale;
        let y = inner.top() as f64 + y_off + (self.max_lat - lat) * scale;
        egui::pos2(x as f32, y as f32)
    }
}

pub fn marker_radius(value: f64, mode: RenderMode) -> f32 {
    let r = (8.0 + value * 12.0) as f32;
    match mode {
        RenderMode::Card => (r * 0.6).clamp(4.0, 24.0),
        RenderMode::Detail => r.clamp(6.0, 40.0),
    }
}

pub struct MapRenderer;

impl WidgetRenderer for MapRenderer {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, ctx: &RenderContext<'_>, mode: RenderMode) {
        let points = match &ctx.data.map_points {
            Feed::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.colored_label(MUTED, "Loading map data…");
                });
                return;
            }
            Feed::Failed(msg) => {
                ui.colored_label(MUTED, format!("Map data unavailable: {msg}"));
                return;
            }
            Feed::Ready(points) => points,
        };
        let Some(projection) = MapProjection::fit(points) else {
            ui.colored_label(MUTED, "No map points");
            return;
        };

        let height = match mode {
            RenderMode::Card => plot_height(ui, mode),
            RenderMode::Detail => plot_height(ui, mode) * 0.65,
        };
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), height), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);

        let hover = response.hover_pos();
        let mut hovered: Option<&MapPoint> = None;
        // Largest first so small bubbles stay on top.
        let mut order: Vec<&MapPoint> = points.iter().collect();
        order.sort_by(|a, b| b.value.total_cmp(&a.value));
        for point in order {
            let center = projection.to_screen(point.lat, point.lng, rect);
            let radius = marker_radius(point.value, mode);
            let color = if point.is_high() { HIGH } else { ACCENT };
            let fill = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 150);
            painter.circle(center, radius, fill, Stroke::new(1.0, color));
            if mode == RenderMode::Detail {
                painter.text(
                    center + egui::vec2(0.0, radius + 2.0),
                    egui::Align2::CENTER_TOP,
                    &point.name,
                    FontId::proportional(11.0),
                    MUTED,
                );
            }
            if hover.is_some_and(|p| p.distance(center) <= radius) {
                hovered = Some(point);
            }
        }

        if let Some(point) = hovered {
            let text = format!(
                "{}\n{}\n평균 {}% · 최고 {}% · {}경기",
                point.name, point.stadium, point.value, point.max, point.count
            );
            response.on_hover_text_at_pointer(text);
        }

        if mode == RenderMode::Detail {
            ui.add_space(8.0);
            stadium_table(ui, widget, points);
        }
    }
}

fn stadium_table(ui: &mut egui::Ui, widget: &Widget, points: &[MapPoint]) {
    let mut ranked: Vec<&MapPoint> = points.iter().collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    egui::ScrollArea::vertical()
        .id_source((widget.id.as_str(), "stadiums"))
        .show(ui, |ui| {
            egui::Grid::new((widget.id.as_str(), "stadium-grid"))
                .striped(true)
                .num_columns(6)
                .show(ui, |ui| {
                    for h in ["Rank", "Team", "Stadium", "Avg", "Max", "Games"] {
                        ui.strong(h);
                    }
                    ui.end_row();
                    for (idx, p) in ranked.iter().enumerate() {
                        let color = if p.is_high() { HIGH } else { ACCENT };
                        ui.colored_label(color, format!("{}", idx + 1));
                        ui.label(&p.name);
                        ui.colored_label(MUTED, &p.stadium);
                        ui.label(format!("{}%", p.value));
                        ui.label(format!("{}%", p.max));
                        ui.label(p.count.to_string());
                        ui.end_row();
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, lat: f64, lng: f64) -> MapPoint {
        MapPoint {
            name: name.into(),
            lat,
            lng,
            stadium: String::new(),
            value: 1.0,
            count: 1,
            max: 1.0,
            intensity: String::new(),
        }
    }

    #[test]
    fn projection_keeps_points_inside_the_rect() {
        let pts = vec![point("a", 37.5, 126.9), point("b", 35.1, 129.0), point("c", 36.3, 127.4)];
        let proj = MapProjection::fit(&pts).unwrap();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0));
        for p in &pts {
            let s = proj.to_screen(p.lat, p.lng, rect);
            assert!(rect.contains(s), "{} projected outside: {s:?}", p.name);
        }
        let north = proj.to_screen(37.5, 126.9, rect);
        let south = proj.to_screen(35.1, 129.0, rect);
        assert!(north.y < south.y);
        assert!(north.x < south.x);
    }

    #[test]
    fn single_point_lands_in_the_middle() {
        let pts = vec![point("a", 37.0, 127.0)];
        let proj = MapProjection::fit(&pts).unwrap();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 200.0));
        let s = proj.to_screen(37.0, 127.0, rect);
        assert!((s.x - 100.0).abs() < 1.0 && (s.y - 100.0).abs() < 1.0);
        assert!(MapProjection::fit(&[]).is_none());
    }

    #[test]
    fn radius_grows_with_rating() {
        assert!(marker_radius(2.0, RenderMode::Detail) > marker_radius(0.5, RenderMode::Detail));
        assert!(marker_radius(1.0, RenderMode::Card) < marker_radius(1.0, RenderMode::Detail));
    }
}
