//! Pointer gestures that mutate the widget store: drag-to-reorder and
//! handle-driven resize. Only one session can be active at a time.

use crate::dashboard::model::{ColSpan, HeightClass, WidgetId};
use crate::dashboard::store::WidgetStore;

pub const GRID_COLUMNS: usize = 4;
pub const ROW_HEIGHT_PX: f32 = 250.0;

/// Geometry used to turn pointer deltas into grid steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMetrics {
    pub columns: usize,
    pub row_height: f32,
}

impl Default for ResizeMetrics {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            row_height: ROW_HEIGHT_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub id: WidgetId,
    pub start: (f32, f32),
    pub start_span: ColSpan,
    pub start_height: HeightClass,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureSession {
    #[default]
    Idle,
    Dragging {
        id: WidgetId,
    },
    Resizing(ResizeSession),
}

/// `Math.round` semantics: halves round toward positive infinity.
fn round_half_up(value: f32) -> i64 {
    (value + 0.5).floor() as i64
}

/// Compute the layout a resize gesture lands on for a pointer delta.
pub fn resize_target(
    start_span: ColSpan,
    start_height: HeightClass,
    delta: (f32, f32),
    column_width: f32,
    row_height: f32,
) -> (ColSpan, HeightClass) {
    let col_delta = if column_width > 0.0 {
        round_half_up(delta.0 / column_width)
    } else {
        0
    };
    let row_delta = if row_height > 0.0 {
        round_half_up(delta.1 / row_height)
    } else {
        0
    };
    let span = ColSpan::from_count((start_span.count() as i64).saturating_add(col_delta));
    let height = HeightClass::from_index((start_height.index() as i64).saturating_add(row_delta));
    (span, height)
}

/// Move the widget at `from` into `to`, where `to` is the target's index
/// before removal. The moved widget ends up at exactly `to`.
pub fn move_to_slot<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let moved = items.remove(from);
    items.insert(to, moved);
}

#[derive(Debug, Default)]
pub struct GestureController {
    session: GestureSession,
    /// Transfer channel of the reorder protocol; holds the dragged id.
    drag_payload: Option<WidgetId>,
    hover_target: Option<WidgetId>,
    metrics: ResizeMetrics,
}

impl GestureController {
    pub fn new(metrics: ResizeMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.session, GestureSession::Idle)
    }

    pub fn dragged(&self) -> Option<&WidgetId> {
        match &self.session {
            GestureSession::Dragging { id } => Some(id),
            _ => None,
        }
    }

    pub fn resizing(&self) -> Option<&WidgetId> {
        match &self.session {
            GestureSession::Resizing(session) => Some(&session.id),
            _ => None,
        }
    }

    /// Whether pointer motion anywhere in the window must be routed here.
    pub fn captures_pointer(&self) -> bool {
        matches!(self.session, GestureSession::Resizing(_))
    }

    /// Current drop highlight, if a drag hovers a card other than its source.
    pub fn drop_target(&self) -> Option<&WidgetId> {
        self.hover_target.as_ref()
    }

    pub fn drag_start(&mut self, id: &WidgetId) {
        if !self.is_idle() {
            tracing::debug!(%id, "drag start ignored: gesture already active");
            return;
        }
        tracing::debug!(%id, "drag started");
        self.drag_payload = Some(id.clone());
        self.hover_target = None;
        self.session = GestureSession::Dragging { id: id.clone() };
    }

    /// Record the card currently under a drag. Never touches the store.
    pub fn drag_over(&mut self, target: Option<&WidgetId>) -> Option<&WidgetId> {
        if self.dragged().is_none() {
            return None;
        }
        self.hover_target = match target {
            Some(t) if self.drag_payload.as_ref() != Some(t) => Some(t.clone()),
            _ => None,
        };
        self.hover_target.as_ref()
    }

    /// Finish a drag on `target`. Returns whether the store was reordered.
    pub fn drop(&mut self, target: &WidgetId, store: &mut WidgetStore) -> bool {
        if self.dragged().is_none() {
            return false;
        }
        let dragged = self.drag_payload.take();
        self.reset_drag();
        let Some(dragged) = dragged else {
            return false;
        };
        if &dragged == target {
            return false;
        }
        let shown = |id: &WidgetId| store.get(id).is_some_and(|w| w.visible);
        if !shown(&dragged) || !shown(target) {
            tracing::debug!(%dragged, %target, "drop ignored: stale widget id");
            return false;
        }
        let (Some(from), Some(to)) = (store.index_of(&dragged), store.index_of(target)) else {
            return false;
        };
        let mut order = store.widgets().to_vec();
        move_to_slot(&mut order, from, to);
        match store.reorder(order) {
            Ok(()) => {
                tracing::debug!(%dragged, %target, from, to, "widget moved");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "drop discarded");
                false
            }
        }
    }

    /// Release outside any card: end the drag without touching the store.
    pub fn drag_cancel(&mut self) {
        if self.dragged().is_some() {
            tracing::debug!("drag cancelled");
            self.drag_payload = None;
            self.reset_drag();
        }
    }

    fn reset_drag(&mut self) {
        self.hover_target = None;
        self.session = GestureSession::Idle;
    }

    pub fn resize_start(&mut self, id: &WidgetId, pointer: (f32, f32), store: &WidgetStore) {
        if !self.is_idle() {
            tracing::debug!(%id, "resize start ignored: gesture already active");
            return;
        }
        let Some(widget) = store.get(id).filter(|w| w.visible) else {
            tracing::debug!(%id, "resize start ignored: unknown or hidden widget");
            return;
        };
        tracing::debug!(%id, x = pointer.0, y = pointer.1, "resize started");
        self.session = GestureSession::Resizing(ResizeSession {
            id: id.clone(),
            start: pointer,
            start_span: widget.col_span,
            start_height: widget.height,
        });
    }

    /// Apply a pointer move to the live resize. `grid_width` is the full
    /// width of the grid in pixels.
    pub fn resize_move(&mut self, pointer: (f32, f32), grid_width: f32, store: &mut WidgetStore) {
        let GestureSession::Resizing(session) = &self.session else {
            return;
        };
        if grid_width <= 0.0 || self.metrics.columns == 0 {
            return;
        }
        let column_width = grid_width / self.metrics.columns as f32;
        let delta = (pointer.0 - session.start.0, pointer.1 - session.start.1);
        let (span, height) = resize_target(
            session.start_span,
            session.start_height,
            delta,
            column_width,
            self.metrics.row_height,
        );
        // A widget hidden mid-gesture is as stale as a removed one.
        let unchanged = store
            .get(&session.id)
            .filter(|w| w.visible)
            .map(|w| w.col_span == span && w.height == height);
        match unchanged {
            Some(false) => store.set_layout(&session.id, span, height),
            Some(true) => {}
            None => tracing::debug!(id = %session.id, "resize target vanished"),
        }
    }

    pub fn resize_end(&mut self) {
        if let GestureSession::Resizing(session) = &self.session {
            tracing::debug!(id = %session.id, "resize finished");
            self.session = GestureSession::Idle;
        }
    }

    /// Drop any in-flight session, e.g. when the dashboard goes away.
    pub fn teardown(&mut self) {
        self.session = GestureSession::Idle;
        self.drag_payload = None;
        self.hover_target = None;
    }
}
