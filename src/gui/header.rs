use crate::dashboard::widgets::{ACCENT, ACCENT_WARM, MUTED};
use crate::dashboard::WidgetStore;
use chrono::{Datelike, NaiveDate, Weekday};
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Loading,
    Live,
    Offline,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Loading => "Loading…",
            ConnectionStatus::Live => "Live Connected",
            ConnectionStatus::Offline => "Offline",
        }
    }
}

pub fn connection_status(store: &WidgetStore) -> ConnectionStatus {
    if store.is_loading() {
        ConnectionStatus::Loading
    } else if store.last_error().is_some() {
        ConnectionStatus::Offline
    } else {
        ConnectionStatus::Live
    }
}

fn weekday_ko(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}

/// `2026년 1월 5일 월요일`
pub fn korean_date(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 {}",
        date.year(),
        date.month(),
        date.day(),
        weekday_ko(date.weekday())
    )
}

pub(super) fn ui(ui: &mut egui::Ui, status: ConnectionStatus) {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(RichText::new("Dashboard Overview").strong());
            ui.colored_label(MUTED, korean_date(chrono::Local::now().date_naive()));
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let dot = match status {
                ConnectionStatus::Loading => ACCENT_WARM,
                ConnectionStatus::Live => ACCENT,
                ConnectionStatus::Offline => egui::Color32::LIGHT_RED,
            };
            egui::Frame::group(ui.style())
                .rounding(12.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(dot, "●");
                        ui.colored_label(MUTED, status.label());
                    });
                });
        });
    });
    ui.add_space(8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;

    #[test]
    fn formats_dates_in_korean() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(korean_date(date), "2026년 1월 5일 월요일");
    }

    #[test]
    fn status_tracks_the_startup_fetch() {
        let mut store = WidgetStore::new();
        assert_eq!(connection_status(&store), ConnectionStatus::Loading);
        store.finish_loading(Err(FetchError::Status(500)));
        assert_eq!(connection_status(&store), ConnectionStatus::Offline);
        let mut store = WidgetStore::new();
        store.finish_loading(Ok(Vec::new()));
        assert_eq!(connection_status(&store), ConnectionStatus::Live);
    }
}
