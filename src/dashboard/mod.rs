pub mod dashboard;
pub mod data_cache;
pub mod detail;
pub mod export;
pub mod gesture;
pub mod layout;
pub mod model;
pub mod store;
pub mod widgets;

pub use dashboard::{Dashboard, DashboardContext};
pub use data_cache::{DashboardDataCache, DashboardDataSnapshot, Feed};
pub use detail::{CloseReason, DetailView, ExportStatus};
pub use gesture::{GestureController, GestureSession, ResizeMetrics};
pub use layout::{project, CardPlacement, GridMetrics, GridProjection};
pub use model::{ColSpan, HeightClass, Widget, WidgetId, WidgetKind};
pub use store::{StoreError, StoreEvent, WidgetStore};
pub use widgets::{RenderContext, RenderMode, RendererRegistry, WidgetRenderer};
