use crate::dashboard::model::{Widget, WidgetId};

pub const MD_BREAKPOINT: f32 = 768.0;
pub const LG_BREAKPOINT: f32 = 1024.0;

/// Responsive grid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub max_columns: usize,
    pub gap: f32,
    pub compact_gap: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            max_columns: 4,
            gap: 24.0,
            compact_gap: 16.0,
        }
    }
}

impl GridMetrics {
    /// Number of columns the grid shows at `width`.
    pub fn columns_for(&self, width: f32) -> usize {
        let columns = if width < MD_BREAKPOINT {
            1
        } else if width < LG_BREAKPOINT {
            2
        } else {
            4
        };
        columns.min(self.max_columns.max(1))
    }

    pub fn gap_for(&self, width: f32) -> f32 {
        if width < MD_BREAKPOINT {
            self.compact_gap
        } else {
            self.gap
        }
    }
}

/// Where a card lands, relative to the grid's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlacement {
    pub id: WidgetId,
    pub row: usize,
    pub col: usize,
    pub columns: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CardPlacement {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridProjection {
    pub columns: usize,
    pub cards: Vec<CardPlacement>,
    pub total_height: f32,
}

impl GridProjection {
    pub fn card_at(&self, x: f32, y: f32) -> Option<&CardPlacement> {
        self.cards.iter().find(|c| c.contains(x, y))
    }

    pub fn get(&self, id: &WidgetId) -> Option<&CardPlacement> {
        self.cards.iter().find(|c| &c.id == id)
    }
}

/// Flow the visible widgets, in store order, into the grid.
///
/// A card that does not fit the rest of the current row starts a new one.
/// Each row is as tall as its tallest card.
pub fn project(widgets: &[Widget], width: f32, metrics: &GridMetrics) -> GridProjection {
    let width = width.max(0.0);
    let columns = metrics.columns_for(width);
    let gap = metrics.gap_for(width);
    let column_width = ((width - gap * (columns as f32 - 1.0)) / columns as f32).max(0.0);

    let mut cards = Vec::new();
    let mut row = 0usize;
    let mut col = 0usize;
    let mut row_top = 0.0f32;
    let mut row_height = 0.0f32;

    for widget in widgets.iter().filter(|w| w.visible) {
        let span = widget.col_span.count().min(columns);
        if col + span > columns {
            row += 1;
            col = 0;
            row_top += row_height + gap;
            row_height = 0.0;
        }
        let height = widget.height.pixels();
        cards.push(CardPlacement {
            id: widget.id.clone(),
            row,
            col,
            columns: span,
            x: col as f32 * (column_width + gap),
            y: row_top,
            width: column_width * span as f32 + gap * (span as f32 - 1.0),
            height,
        });
        row_height = row_height.max(height);
        col += span;
    }

    let total_height = if cards.is_empty() {
        0.0
    } else {
        row_top + row_height
    };
    GridProjection {
        columns,
        cards,
        total_height,
    }
}
