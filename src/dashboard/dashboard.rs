use crate::dashboard::data_cache::DashboardDataSnapshot;
use crate::dashboard::gesture::{GestureController, ResizeMetrics};
use crate::dashboard::layout::{project, CardPlacement, GridMetrics, GridProjection};
use crate::dashboard::model::{Widget, WidgetId};
use crate::dashboard::store::WidgetStore;
use crate::dashboard::widgets::{RenderContext, RenderMode, RendererRegistry, ACCENT, MUTED};
use eframe::egui;

const CARD_PADDING: f32 = 16.0;
const CARD_ROUNDING: f32 = 14.0;
const HANDLE_SIZE: f32 = 14.0;

/// Context shared with the grid at render time.
pub struct DashboardContext<'a> {
    pub registry: &'a RendererRegistry,
    pub data: &'a DashboardDataSnapshot,
}

/// Requests raised by a card's header controls, applied once the frame's
/// cards are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CardAction {
    Open(WidgetId),
    Hide(WidgetId),
}

fn title_icon(title: &str) -> &'static str {
    if title.contains("시청률") {
        "📊"
    } else if title.contains("지표") || title.contains("순위") {
        "📋"
    } else if title.contains("지도") || title.contains("지역") {
        "🗺"
    } else {
        "⚡"
    }
}

/// The widget grid: draws the store's visible widgets and turns pointer input
/// into gesture-controller calls.
pub struct Dashboard {
    metrics: GridMetrics,
    gestures: GestureController,
    last_projection: GridProjection,
}

impl Dashboard {
    pub fn new(metrics: GridMetrics, resize: ResizeMetrics) -> Self {
        Self {
            metrics,
            gestures: GestureController::new(resize),
            last_projection: GridProjection::default(),
        }
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn projection(&self) -> &GridProjection {
        &self.last_projection
    }

    /// Drop any in-flight gesture. Called when the window goes away.
    pub fn teardown(&mut self) {
        self.gestures.teardown();
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, store: &mut WidgetStore, ctx: &DashboardContext<'_>) {
        let width = ui.available_width();
        let projection = project(store.widgets(), width, &self.metrics);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(width, projection.total_height),
            egui::Sense::hover(),
        );
        let modal_open = store.selection().is_some();

        let mut actions = Vec::new();
        for placement in &projection.cards {
            let Some(widget) = store.get(&placement.id) else {
                continue;
            };
            let card_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(placement.x, placement.y),
                egui::vec2(placement.width, placement.height),
            );
            if let Some(action) = self.card(ui, widget, card_rect, modal_open, store, ctx) {
                actions.push(action);
            }
        }

        if !modal_open {
            self.track_pointer(ui, rect, &projection, store);
        }

        for action in actions {
            match action {
                CardAction::Open(id) => store.select(&id),
                CardAction::Hide(id) => store.toggle_visibility(&id),
            }
        }
        self.last_projection = projection;
    }

    fn card(
        &mut self,
        ui: &mut egui::Ui,
        widget: &Widget,
        card_rect: egui::Rect,
        modal_open: bool,
        store: &WidgetStore,
        ctx: &DashboardContext<'_>,
    ) -> Option<CardAction> {
        let id = &widget.id;
        let sense = if modal_open {
            egui::Sense::hover()
        } else {
            egui::Sense::drag()
        };
        let body = ui.interact(card_rect, egui::Id::new(("card", id.as_str())), sense);

        let visuals = ui.visuals();
        ui.painter().rect(
            card_rect,
            CARD_ROUNDING,
            visuals.faint_bg_color,
            visuals.widgets.noninteractive.bg_stroke,
        );

        let mut action = None;
        let inner = card_rect.shrink(CARD_PADDING);
        ui.allocate_ui_at_rect(inner, |ui| {
            ui.set_clip_rect(card_rect.intersect(ui.clip_rect()));
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("{} {}", title_icon(&widget.title), widget.title)).strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!modal_open, |ui| {
                        if ui.small_button("✕").on_hover_text("숨기기").clicked() {
                            action = Some(CardAction::Hide(id.clone()));
                        }
                        if ui.small_button("👁").on_hover_text("확대 보기").clicked() {
                            action = Some(CardAction::Open(id.clone()));
                        }
                    });
                });
            });
            ui.add_space(6.0);
            let body_rect = egui::Rect::from_min_max(ui.cursor().min, inner.max);
            ui.allocate_ui_at_rect(body_rect, |ui| {
                ui.set_clip_rect(body_rect.intersect(ui.clip_rect()));
                ctx.registry
                    .render(ui, widget, &RenderContext { data: ctx.data }, RenderMode::Card);
            });
        });

        if !modal_open {
            self.resize_handle(ui, id, card_rect, store);
            if body.drag_started() && self.gestures.is_idle() {
                self.gestures.drag_start(id);
            }
            if body.hovered() && self.gestures.is_idle() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }

        if self.gestures.dragged() == Some(id) {
            ui.painter().rect_filled(
                card_rect,
                CARD_ROUNDING,
                ui.visuals().panel_fill.gamma_multiply(0.5),
            );
        }
        if self.gestures.drop_target() == Some(id) && self.gestures.dragged() != Some(id) {
            dashed_outline(ui.painter(), card_rect.expand(2.0), ACCENT);
        }
        action
    }

    fn resize_handle(&mut self, ui: &mut egui::Ui, id: &WidgetId, card_rect: egui::Rect, store: &WidgetStore) {
        let handle_rect = egui::Rect::from_min_size(
            card_rect.max - egui::vec2(HANDLE_SIZE + 4.0, HANDLE_SIZE + 4.0),
            egui::vec2(HANDLE_SIZE, HANDLE_SIZE),
        );
        let handle = ui.interact(
            handle_rect,
            egui::Id::new(("resize", id.as_str())),
            egui::Sense::drag(),
        );
        let active = self.gestures.resizing() == Some(id);
        if handle.hovered() || active {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe);
            let color = if active { ACCENT } else { MUTED };
            let stroke = egui::Stroke::new(1.5, color);
            for step in [0.0, 5.0, 10.0] {
                ui.painter().line_segment(
                    [
                        egui::pos2(handle_rect.right() - step, handle_rect.bottom()),
                        egui::pos2(handle_rect.right(), handle_rect.bottom() - step),
                    ],
                    stroke,
                );
            }
        }
        if handle.drag_started() && self.gestures.is_idle() {
            if let Some(pos) = handle.interact_pointer_pos() {
                self.gestures.resize_start(id, (pos.x, pos.y), store);
            }
        }
    }

    /// Follow the pointer for whichever session is active, wherever the
    /// pointer is, and end the session on release.
    fn track_pointer(
        &mut self,
        ui: &mut egui::Ui,
        grid: egui::Rect,
        projection: &GridProjection,
        store: &mut WidgetStore,
    ) {
        let (pointer, down, released) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_down(),
                i.pointer.any_released(),
            )
        });

        if self.gestures.resizing().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe);
            if let Some(pos) = pointer {
                self.gestures.resize_move((pos.x, pos.y), grid.width(), store);
            }
            if released || !down {
                self.gestures.resize_end();
            }
            return;
        }

        if self.gestures.dragged().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            let hovered: Option<&CardPlacement> = pointer
                .filter(|pos| grid.contains(*pos))
                .and_then(|pos| projection.card_at(pos.x - grid.min.x, pos.y - grid.min.y));
            let target = self.gestures.drag_over(hovered.map(|c| &c.id)).cloned();
            if released || !down {
                match target {
                    Some(target) => {
                        self.gestures.drop(&target, store);
                    }
                    None => self.gestures.drag_cancel(),
                }
            }
        }
    }
}

fn dashed_outline(painter: &egui::Painter, rect: egui::Rect, color: egui::Color32) {
    let points = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(
        &points,
        egui::Stroke::new(2.0, color),
        8.0,
        5.0,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{ColSpan, HeightClass, WidgetKind};
    use serde_json::json;

    fn store_with(widgets: Vec<Widget>) -> WidgetStore {
        let mut store = WidgetStore::new();
        store.finish_loading(Ok(widgets));
        store
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(GridMetrics::default(), ResizeMetrics::default())
    }

    #[test]
    fn renders_every_visible_widget_without_touching_the_store() {
        let mut store = store_with(vec![
            Widget::new("a", WidgetKind::Metric, "지표")
                .with_data(json!({"value": "1.2%", "trend": "0.1", "trendUp": true, "label": "vs"})),
            Widget::new("b", WidgetKind::Other("heatmap".into()), "unknown"),
            Widget::new("c", WidgetKind::List, "list").with_layout(ColSpan::Span2, HeightClass::Tall),
        ]);
        store.toggle_visibility(&"c".into());
        let revision = store.revision();
        let registry = RendererRegistry::with_defaults();
        let data = DashboardDataSnapshot::default();
        let ctx = DashboardContext {
            registry: &registry,
            data: &data,
        };
        let mut dash = dashboard();

        egui::__run_test_ui(|ui| {
            let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 900.0));
            ui.allocate_ui_at_rect(rect, |ui| {
                dash.ui(ui, &mut store, &ctx);
            });
        });

        assert_eq!(store.revision(), revision);
        let ids: Vec<&str> = dash.projection().cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(dash.gestures().is_idle());
    }

    #[test]
    fn empty_grid_allocates_nothing() {
        let mut store = store_with(Vec::new());
        let registry = RendererRegistry::with_defaults();
        let data = DashboardDataSnapshot::default();
        let ctx = DashboardContext {
            registry: &registry,
            data: &data,
        };
        let mut dash = dashboard();
        egui::__run_test_ui(|ui| dash.ui(ui, &mut store, &ctx));
        assert!(dash.projection().cards.is_empty());
        assert_eq!(dash.projection().total_height, 0.0);
    }

    #[test]
    fn title_icons_follow_keywords() {
        assert_eq!(title_icon("일자별 시청률"), "📊");
        assert_eq!(title_icon("역대 순위"), "📋");
        assert_eq!(title_icon("지역별 분포"), "🗺");
        assert_eq!(title_icon("Other"), "⚡");
    }
}
