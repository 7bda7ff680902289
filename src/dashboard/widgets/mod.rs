use crate::dashboard::data_cache::DashboardDataSnapshot;
use crate::dashboard::model::{Widget, WidgetKind};
use eframe::egui;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

mod calendar;
mod chart;
mod list;
mod map;
mod metric;
mod pyramid;
mod ranking;

pub use calendar::CalendarRenderer;
pub use chart::ChartRenderer;
pub use list::ListRenderer;
pub use map::MapRenderer;
pub use metric::MetricRenderer;
pub use pyramid::PyramidRenderer;
pub use ranking::RankingRenderer;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x2D, 0xD4, 0xBF);
pub const ACCENT_WARM: egui::Color32 = egui::Color32::from_rgb(0xF5, 0x9E, 0x0B);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(0x94, 0xA3, 0xB8);
pub const DOWN: egui::Color32 = egui::Color32::from_rgb(0xF8, 0x71, 0x71);
pub const SUNDAY: egui::Color32 = egui::Color32::from_rgb(0xF8, 0x71, 0x71);
pub const SATURDAY: egui::Color32 = egui::Color32::from_rgb(0x60, 0xA5, 0xFA);

/// Where a renderer is drawing: inside a grid card or in the detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Card,
    Detail,
}

/// Context available to renderers at draw time.
pub struct RenderContext<'a> {
    pub data: &'a DashboardDataSnapshot,
}

/// Draws one widget kind from its opaque payload.
pub trait WidgetRenderer: Send + Sync {
    fn render(&self, ui: &mut egui::Ui, widget: &Widget, ctx: &RenderContext<'_>, mode: RenderMode);
}

/// Maps a kind tag to the renderer that draws it. Both the grid card and the
/// detail view dispatch through here.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    map: HashMap<String, Arc<dyn WidgetRenderer>>,
}

impl RendererRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        reg.register(WidgetKind::Metric.tag(), MetricRenderer);
        reg.register(WidgetKind::List.tag(), ListRenderer);
        reg.register(WidgetKind::Ranking.tag(), RankingRenderer);
        reg.register(WidgetKind::Calendar.tag(), CalendarRenderer);
        reg.register(WidgetKind::Chart.tag(), ChartRenderer);
        reg.register(WidgetKind::Map.tag(), MapRenderer);
        reg.register(WidgetKind::Pyramid.tag(), PyramidRenderer);
        reg
    }

    pub fn register(&mut self, tag: &str, renderer: impl WidgetRenderer + 'static) {
        self.map.insert(tag.to_string(), Arc::new(renderer));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.map.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.map.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Draw `widget`, or an "unsupported" placeholder for unknown kinds.
    /// Returns whether a renderer was found.
    pub fn render(
        &self,
        ui: &mut egui::Ui,
        widget: &Widget,
        ctx: &RenderContext<'_>,
        mode: RenderMode,
    ) -> bool {
        match self.map.get(widget.kind.tag()) {
            Some(renderer) => {
                renderer.render(ui, widget, ctx, mode);
                true
            }
            None => {
                ui.colored_label(
                    MUTED,
                    format!("Unsupported widget type: {}", widget.kind.tag()),
                );
                false
            }
        }
    }
}

pub(crate) fn field<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| !v.is_null())
}

/// Display form of a scalar field; empty when missing.
pub(crate) fn text(data: &Value, key: &str) -> String {
    match field(data, key) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn items<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Calendar padding cells carry a null, empty or zero `d`.
pub(crate) fn has_day(day: &Value) -> bool {
    match day.get("d") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

pub(crate) fn flag(data: &Value, key: &str) -> bool {
    data.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Numeric value of `"1.24%"`, `"3.4"` or `1.24`.
pub(crate) fn number(value: Option<&Value>) -> Option<f32> {
    match value? {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn no_data(ui: &mut egui::Ui) {
    ui.colored_label(MUTED, "No data");
}

/// Height left for a drawing area, with a floor so charts never collapse.
pub(crate) fn plot_height(ui: &egui::Ui, mode: RenderMode) -> f32 {
    match mode {
        RenderMode::Card => ui.available_height().max(120.0),
        RenderMode::Detail => ui.available_height().clamp(320.0, 560.0),
    }
}
