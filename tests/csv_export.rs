use serde_json::json;
use tempfile::tempdir;
use viewership_dashboard::dashboard::export::{file_name, is_exportable, to_csv, write_export, BOM};
use viewership_dashboard::dashboard::{Widget, WidgetKind};

fn lines(body: &str) -> Vec<&str> {
    body.lines().collect()
}

#[test]
fn ranking_export_starts_with_top_record() {
    let widget = Widget::new("rank", WidgetKind::Ranking, "역대 시청률 순위").with_data(json!({
        "topRecord": {"date": "2024.03.01", "match": "A vs B", "rate": "2.10%"},
        "list": [
            {"rank": 2, "date": "2024.02.01", "match": "C vs D", "rate": "1.90%"},
            {"rank": 3, "date": "2024.01.01", "match": "E vs F", "rate": "1.70%"}
        ]
    }));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(
        lines(&body),
        vec![
            "Rank,Date,Match,Rate",
            "TOP1,2024.03.01,A vs B,2.10%",
            "2,2024.02.01,C vs D,1.90%",
            "3,2024.01.01,E vs F,1.70%",
        ]
    );
}

#[test]
fn daily_viewership_tags_each_section() {
    let widget = Widget::new("daily", WidgetKind::Metric, "일자별 시청률").with_data(json!({
        "section1": {"rows": [
            {"category": "남자부", "channel": "KBSN", "match": "A-B", "total": "1.1%", "viewers": "12000"}
        ]},
        "section2": {"rows": [
            {"category": "여자부", "channel": "SBS", "match": "C-D", "total": "0.9%"}
        ]}
    }));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(
        lines(&body),
        vec![
            "Section,Category,Channel,Match,Rate,Viewers",
            "Section1,남자부,KBSN,A-B,1.1%,12000",
            "Section2,여자부,SBS,C-D,0.9%,",
        ]
    );
}

#[test]
fn season_rankings_export() {
    let widget = Widget::new("season", WidgetKind::Metric, "시즌 평균").with_data(json!({
        "value": "1.24%",
        "topRankings": [{"rank": 1, "season": "2023-24", "rate": "1.30%"}]
    }));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(lines(&body), vec!["Rank,Season,Rate", "1,2023-24,1.30%"]);
}

#[test]
fn chart_export_has_one_column_per_series() {
    let widget = Widget::new("trend", WidgetKind::Chart, "Trend").with_data(json!({
        "labels": ["1R", "2R"],
        "values": [1.1, 1.2],
        "prevValues": [0.9]
    }));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(
        lines(&body),
        vec!["Label,Current Season,Previous Season", "1R,1.1,0.9", "2R,1.2,"]
    );
}

#[test]
fn calendar_export_skips_padding_cells() {
    let widget = Widget::new("cal", WidgetKind::Calendar, "Calendar").with_data(json!({
        "days": [{"d": null}, {"d": ""}, {"d": 1, "r": 1.5}, {"d": 2, "r": 0}]
    }));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(lines(&body), vec!["Day,Rate", "1,1.5", "2,0"]);
}

#[test]
fn other_payloads_export_as_json() {
    let widget = Widget::new("m", WidgetKind::Metric, "Plain")
        .with_data(json!({"value": "1.24%", "label": "avg"}));
    let body = to_csv(&widget).unwrap().unwrap();
    assert_eq!(
        lines(&body),
        vec![r#""{""value"":""1.24%"",""label"":""avg""}""#]
    );
}

#[test]
fn map_widgets_cannot_be_exported() {
    let widget = Widget::new("map", WidgetKind::Map, "Map");
    assert!(!is_exportable(&widget));
    let dir = tempdir().unwrap();
    assert_eq!(write_export(&widget, dir.path()).unwrap(), None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn written_file_is_bom_prefixed_and_named_after_title() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("nested");
    let widget = Widget::new("season", WidgetKind::Metric, "Season  Avg Rate").with_data(json!({
        "topRankings": [{"rank": 1, "season": "2023-24", "rate": "1.30%"}]
    }));
    let path = write_export(&widget, &target).unwrap().unwrap();
    assert_eq!(path, target.join("Season_Avg_Rate_data.csv"));
    assert_eq!(file_name("Season  Avg Rate"), "Season_Avg_Rate_data.csv");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(BOM));
    assert!(contents.trim_start_matches(BOM).starts_with("Rank,Season,Rate"));
}
