use crate::dashboard::widgets::{ACCENT, MUTED};
use crate::dashboard::{WidgetId, WidgetStore};
use eframe::egui::{self, RichText};

/// Hidden widgets, in store order, as `(id, title)`.
pub fn restorable(store: &WidgetStore) -> Vec<(WidgetId, String)> {
    store
        .hidden()
        .map(|w| (w.id.clone(), w.title.clone()))
        .collect()
}

pub(super) fn ui(ui: &mut egui::Ui, store: &mut WidgetStore) {
    let modal_open = store.selection().is_some();
    ui.add_enabled_ui(!modal_open, |ui| panel(ui, store));
}

fn panel(ui: &mut egui::Ui, store: &mut WidgetStore) {
    ui.add_space(12.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("K").strong().size(22.0).color(ACCENT));
        ui.vertical(|ui| {
            ui.strong("KOVO DATA");
            ui.small("Executive Suite");
        });
    });
    ui.separator();

    let hidden = restorable(store);
    if hidden.is_empty() {
        ui.colored_label(MUTED, "All widgets visible");
        return;
    }
    ui.label(RichText::new("Restorable Widgets").small().color(MUTED));
    ui.add_space(4.0);
    let mut restore: Option<WidgetId> = None;
    egui::ScrollArea::vertical()
        .id_source("restorable-widgets")
        .show(ui, |ui| {
            for (id, title) in &hidden {
                let button = egui::Button::new(format!("+ {title}")).wrap(false);
                if ui.add_sized([ui.available_width(), 28.0], button).clicked() {
                    restore = Some(id.clone());
                }
            }
        });
    ui.add_space(8.0);
    if hidden.len() > 1 && ui.button("Restore all").clicked() {
        store.show_all();
        return;
    }
    if let Some(id) = restore {
        store.toggle_visibility(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Widget, WidgetKind};

    #[test]
    fn lists_only_hidden_widgets_in_order() {
        let mut store = WidgetStore::new();
        store.load(vec![
            Widget::new("a", WidgetKind::Metric, "A"),
            Widget::new("b", WidgetKind::List, "B"),
            Widget::new("c", WidgetKind::Chart, "C"),
        ]);
        store.toggle_visibility(&"c".into());
        store.toggle_visibility(&"a".into());
        let titles: Vec<String> = restorable(&store).into_iter().map(|(_, t)| t).collect();
        assert_eq!(titles, vec!["A".to_string(), "C".to_string()]);
    }

    fn hidden_store() -> WidgetStore {
        let mut store = WidgetStore::new();
        store.load(vec![
            Widget::new("a", WidgetKind::Metric, "A"),
            Widget::new("b", WidgetKind::List, "B"),
            Widget::new("c", WidgetKind::Chart, "C"),
        ]);
        store.toggle_visibility(&"a".into());
        store.toggle_visibility(&"c".into());
        store
    }

    /// Click down the middle of the sidebar, one full press/release per row.
    fn click_sweep(store: &mut WidgetStore) {
        let ctx = egui::Context::default();
        let screen = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(300.0, 500.0));
        let mut frame = |store: &mut WidgetStore, events: Vec<egui::Event>| {
            let input = egui::RawInput {
                screen_rect: Some(screen),
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |inner| ui(inner, store));
            });
        };
        frame(store, Vec::new());
        for y in (0..500).step_by(8) {
            let pos = egui::pos2(150.0, y as f32);
            let button = |pressed| egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            };
            frame(store, vec![egui::Event::PointerMoved(pos)]);
            frame(store, vec![button(true)]);
            frame(store, vec![button(false)]);
        }
    }

    #[test]
    fn sidebar_restores_on_click() {
        let mut store = hidden_store();
        click_sweep(&mut store);
        assert!(store.hidden().count() < 2);
    }

    #[test]
    fn sidebar_is_inert_while_detail_is_open() {
        let mut store = hidden_store();
        store.select(&"b".into());
        let before = store.revision();
        click_sweep(&mut store);
        assert_eq!(store.hidden().count(), 2);
        assert_eq!(store.revision(), before);
    }
}
