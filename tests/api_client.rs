use httpmock::prelude::*;
use std::time::{Duration, Instant};
use viewership_dashboard::api::{ApiClient, FetchError, GENDER_DISTRIBUTION_PATH, MAP_DATA_PATH, WIDGETS_PATH};
use viewership_dashboard::dashboard::{ColSpan, Feed, HeightClass, WidgetKind};
use viewership_dashboard::gui::{connection_status, ConnectionStatus, DashboardApp};
use viewership_dashboard::settings::Settings;

const WIDGETS: &str = r#"[
    {"id": "avg", "type": "metric", "title": "시즌 평균 시청률", "data": {"value": "1.24%"},
     "colSpan": "lg:col-span-2 md:col-span-2", "height": "h-96"},
    {"id": "cal", "type": "calendar", "title": "월간 캘린더", "data": {"days": []}},
    {"id": "new", "type": "gauge", "title": "Unknown", "data": {}}
]"#;

const MAP: &str = r#"[
    {"name": "Suwon", "lat": 37.29, "lng": 127.01, "stadium": "Suwon Gym",
     "value": 1.4, "count": 12, "max": 2.1, "intensity": "high"}
]"#;

const GENDER: &str = r#"{"labels": ["20s", "30s"], "men": [-10, -20], "women": [15, 25], "maxVal": 25}"#;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[test]
fn fetches_and_decodes_widgets() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(WIDGETS_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(WIDGETS);
    });

    let widgets = client(&server).fetch_widgets().unwrap();
    mock.assert();
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[0].kind, WidgetKind::Metric);
    assert_eq!(widgets[0].col_span, ColSpan::Span2);
    assert_eq!(widgets[0].height, HeightClass::Tall);
    assert_eq!(widgets[1].col_span, ColSpan::Span1);
    assert_eq!(widgets[1].height, HeightClass::Compact);
    assert!(widgets[1].visible);
    assert_eq!(widgets[2].kind, WidgetKind::Other("gauge".into()));
}

#[test]
fn fetches_auxiliary_feeds() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(MAP_DATA_PATH);
        then.status(200).body(MAP);
    });
    server.mock(|when, then| {
        when.method(GET).path(GENDER_DISTRIBUTION_PATH);
        then.status(200).body(GENDER);
    });

    let api = client(&server);
    let points = api.fetch_map_data().unwrap();
    assert_eq!(points.len(), 1);
    assert!(points[0].is_high());
    let gender = api.fetch_gender_distribution().unwrap();
    assert_eq!(gender.men, vec![-10, -20]);
    assert_eq!(gender.max_val, 25);
}

#[test]
fn error_envelope_becomes_backend_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(MAP_DATA_PATH);
        then.status(200).body(r#"{"error": "Data file not found"}"#);
    });

    let err = client(&server).fetch_map_data().unwrap_err();
    assert_eq!(err, FetchError::Backend("Data file not found".into()));
}

#[test]
fn non_success_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(WIDGETS_PATH);
        then.status(503);
    });

    let err = client(&server).fetch_widgets().unwrap_err();
    assert_eq!(err, FetchError::Status(503));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ApiClient::new("not a url", Duration::from_secs(1)).err();
    assert!(matches!(err, Some(FetchError::InvalidUrl(_))));
}

fn wait_for(app: &mut DashboardApp) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.is_fetching() && Instant::now() < deadline {
        app.poll_fetches();
        std::thread::sleep(Duration::from_millis(20));
    }
    app.poll_fetches();
}

#[test]
fn app_loads_everything_in_the_background() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(WIDGETS_PATH);
        then.status(200).body(WIDGETS);
    });
    server.mock(|when, then| {
        when.method(GET).path(MAP_DATA_PATH);
        then.status(200).body(MAP);
    });
    server.mock(|when, then| {
        when.method(GET).path(GENDER_DISTRIBUTION_PATH);
        then.status(200).body(GENDER);
    });

    let settings = Settings {
        api_base_url: server.base_url(),
        ..Settings::default()
    };
    let mut app = DashboardApp::new(settings, "unused-settings.json");
    wait_for(&mut app);

    assert!(!app.store().is_loading());
    assert_eq!(app.store().widgets().len(), 3);
    assert_eq!(connection_status(app.store()), ConnectionStatus::Live);
    let snapshot = app.data_cache().snapshot();
    assert!(snapshot.map_points.ready().is_some());
    assert!(snapshot.gender_distribution.ready().is_some());
    assert!(snapshot.widgets_fetched_at.is_some());
}

#[test]
fn failed_startup_fetch_leaves_an_empty_dashboard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(WIDGETS_PATH);
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path(MAP_DATA_PATH);
        then.status(200).body(r#"{"error": "Data file not found"}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path(GENDER_DISTRIBUTION_PATH);
        then.status(404);
    });

    let settings = Settings {
        api_base_url: server.base_url(),
        ..Settings::default()
    };
    let mut app = DashboardApp::new(settings, "unused-settings.json");
    wait_for(&mut app);

    assert!(!app.store().is_loading());
    assert!(app.store().is_empty());
    assert_eq!(connection_status(app.store()), ConnectionStatus::Offline);
    let snapshot = app.data_cache().snapshot();
    assert!(matches!(snapshot.map_points, Feed::Failed(_)));
    assert!(matches!(snapshot.gender_distribution, Feed::Failed(_)));
    assert!(snapshot.widgets_fetched_at.is_none());
}
