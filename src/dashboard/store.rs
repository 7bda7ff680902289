use crate::api::FetchError;
use crate::dashboard::model::{ColSpan, HeightClass, Widget, WidgetId};
use std::collections::HashSet;
use std::sync::Arc;

/// Notification emitted after every effective store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize },
    VisibilityChanged { id: WidgetId, visible: bool },
    LayoutChanged {
        id: WidgetId,
        col_span: ColSpan,
        height: HeightClass,
    },
    Reordered,
    SelectionChanged(Option<WidgetId>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("reorder rejected: new order is not a permutation of the current widgets")]
    NotAPermutation,
}

pub type StoreListener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Authoritative widget collection plus the detail selection.
pub struct WidgetStore {
    widgets: Vec<Widget>,
    selection: Option<WidgetId>,
    loading: bool,
    last_error: Option<String>,
    revision: u64,
    listener: Option<StoreListener>,
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetStore {
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
            selection: None,
            loading: true,
            last_error: None,
            revision: 0,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: StoreListener) -> Self {
        self.listener = Some(listener);
        self
    }

    fn emit(&mut self, event: StoreEvent) {
        self.revision += 1;
        if let Some(listener) = &self.listener {
            (listener)(&event);
        }
    }

    /// Replace the whole collection. Later duplicates of an id are dropped.
    pub fn load(&mut self, widgets: Vec<Widget>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(widgets.len());
        for widget in widgets {
            if seen.insert(widget.id.clone()) {
                kept.push(widget);
            } else {
                tracing::warn!(id = %widget.id, "duplicate widget id dropped on load");
            }
        }
        if let Some(sel) = &self.selection {
            if !seen.contains(sel) {
                self.selection = None;
            }
        }
        let count = kept.len();
        self.widgets = kept;
        tracing::info!(count, "widgets loaded");
        self.emit(StoreEvent::Loaded { count });
    }

    /// Apply the outcome of the startup fetch. The store is usable either way.
    pub fn finish_loading(&mut self, result: Result<Vec<Widget>, FetchError>) {
        match result {
            Ok(widgets) => {
                self.last_error = None;
                self.load(widgets);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch widgets");
                self.last_error = Some(err.to_string());
            }
        }
        self.loading = false;
    }

    pub fn toggle_visibility(&mut self, id: &WidgetId) {
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            return;
        };
        widget.visible = !widget.visible;
        let visible = widget.visible;
        self.emit(StoreEvent::VisibilityChanged {
            id: id.clone(),
            visible,
        });
    }

    /// Make every hidden widget visible again.
    pub fn show_all(&mut self) {
        let hidden: Vec<WidgetId> = self.hidden().map(|w| w.id.clone()).collect();
        for id in hidden {
            self.toggle_visibility(&id);
        }
    }

    pub fn set_layout(&mut self, id: &WidgetId, col_span: ColSpan, height: HeightClass) {
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            return;
        };
        widget.col_span = col_span;
        widget.height = height;
        self.emit(StoreEvent::LayoutChanged {
            id: id.clone(),
            col_span,
            height,
        });
    }

    /// Replace the collection with a permutation of itself.
    pub fn reorder(&mut self, new_order: Vec<Widget>) -> Result<(), StoreError> {
        if !self.is_permutation(&new_order) {
            tracing::warn!(
                expected = self.widgets.len(),
                got = new_order.len(),
                "reorder rejected"
            );
            return Err(StoreError::NotAPermutation);
        }
        self.widgets = new_order;
        self.emit(StoreEvent::Reordered);
        Ok(())
    }

    fn is_permutation(&self, candidate: &[Widget]) -> bool {
        if candidate.len() != self.widgets.len() {
            return false;
        }
        let current: HashSet<&WidgetId> = self.widgets.iter().map(|w| &w.id).collect();
        let mut seen = HashSet::with_capacity(candidate.len());
        candidate
            .iter()
            .all(|w| current.contains(&w.id) && seen.insert(&w.id))
    }

    /// Open the detail view for `id`, replacing any previous selection.
    pub fn select(&mut self, id: &WidgetId) {
        if self.get(id).is_none() || self.selection.as_ref() == Some(id) {
            return;
        }
        self.selection = Some(id.clone());
        self.emit(StoreEvent::SelectionChanged(Some(id.clone())));
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(StoreEvent::SelectionChanged(None));
        }
    }

    pub fn selected(&self) -> Option<&Widget> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }

    pub fn selection(&self) -> Option<&WidgetId> {
        self.selection.as_ref()
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    pub fn index_of(&self, id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| &w.id == id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.visible)
    }

    pub fn hidden(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| !w.visible)
    }

    pub fn ids(&self) -> Vec<WidgetId> {
        self.widgets.iter().map(|w| w.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Bumped once per effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
