//! Property tests for the widget store and resize gesture.
//!
//! 1. Arbitrary toggle/layout/reorder/drop sequences keep the loaded id set,
//!    each id exactly once.
//! 2. Arbitrary resize pointer paths keep span in 1..=4 and height in 0..=2
//!    after every move, and never touch any other widget.

use proptest::prelude::*;
use std::collections::HashSet;
use viewership_dashboard::dashboard::{
    ColSpan, GestureController, HeightClass, ResizeMetrics, Widget, WidgetId, WidgetKind,
    WidgetStore,
};

const IDS: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize),
    Layout(usize, i64, i64),
    Rotate(usize),
    Reorder(Vec<usize>),
    Drop(usize, usize),
}

/// Index 5 names a widget that was never loaded.
fn id_at(i: usize) -> WidgetId {
    WidgetId::new(IDS.get(i).copied().unwrap_or("ghost"))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6usize).prop_map(Op::Toggle),
        (0..6usize, -2..7i64, -2..5i64).prop_map(|(i, s, h)| Op::Layout(i, s, h)),
        (0..5usize).prop_map(Op::Rotate),
        prop::collection::vec(0..6usize, 0..8).prop_map(Op::Reorder),
        (0..6usize, 0..6usize).prop_map(|(a, b)| Op::Drop(a, b)),
    ]
}

fn loaded() -> WidgetStore {
    let mut store = WidgetStore::new();
    store.finish_loading(Ok(IDS
        .iter()
        .map(|id| Widget::new(id, WidgetKind::Metric, id))
        .collect()));
    store
}

fn apply(store: &mut WidgetStore, gestures: &mut GestureController, op: Op) {
    match op {
        Op::Toggle(i) => store.toggle_visibility(&id_at(i)),
        Op::Layout(i, s, h) => {
            store.set_layout(&id_at(i), ColSpan::from_count(s), HeightClass::from_index(h))
        }
        Op::Rotate(k) => {
            let mut order = store.widgets().to_vec();
            let mid = k % order.len().max(1);
            order.rotate_left(mid);
            let _ = store.reorder(order);
        }
        Op::Reorder(picks) => {
            let current = store.widgets().to_vec();
            let order: Vec<Widget> = picks
                .iter()
                .filter_map(|i| current.get(*i).cloned())
                .collect();
            let _ = store.reorder(order);
        }
        Op::Drop(from, to) => {
            gestures.drag_start(&id_at(from));
            gestures.drag_over(Some(&id_at(to)));
            gestures.drop(&id_at(to), store);
        }
    }
}

proptest! {
    #[test]
    fn ids_stay_unique_and_complete(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = loaded();
        let mut gestures = GestureController::new(ResizeMetrics::default());
        let expected: HashSet<WidgetId> = IDS.iter().map(|id| WidgetId::new(*id)).collect();
        for op in ops {
            apply(&mut store, &mut gestures, op);
            let ids = store.ids();
            let distinct: HashSet<WidgetId> = ids.iter().cloned().collect();
            prop_assert_eq!(ids.len(), distinct.len(), "duplicate id in {:?}", ids);
            prop_assert_eq!(&distinct, &expected);
        }
    }
}

proptest! {
    #[test]
    fn resize_stays_within_bounds(
        start_span in 1..=4i64,
        start_height in 0..=2i64,
        grid_width in 1.0f32..4000.0,
        moves in prop::collection::vec((-6000.0f32..6000.0, -6000.0f32..6000.0), 1..30),
    ) {
        let mut store = loaded();
        let target = WidgetId::new("c");
        store.set_layout(
            &target,
            ColSpan::from_count(start_span),
            HeightClass::from_index(start_height),
        );
        let others: Vec<Widget> = store
            .widgets()
            .iter()
            .filter(|w| w.id != target)
            .cloned()
            .collect();
        let mut gestures = GestureController::new(ResizeMetrics::default());
        gestures.resize_start(&target, (0.0, 0.0), &store);

        for pointer in moves {
            gestures.resize_move(pointer, grid_width, &mut store);
            let w = store.get(&target).unwrap();
            prop_assert!((1..=4).contains(&w.col_span.count()));
            prop_assert!(w.height.index() <= 2);
        }
        gestures.resize_end();

        for other in &others {
            prop_assert_eq!(store.get(&other.id), Some(other));
        }
    }
}
