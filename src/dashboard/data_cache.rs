use crate::api::{FetchError, GenderDistribution, MapPoint};
use chrono::{DateTime, Local};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

/// State of one auxiliary feed consumed directly by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed<T> {
    Pending,
    Ready(Arc<T>),
    Failed(String),
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Feed::Pending
    }
}

impl<T> Feed<T> {
    fn from_result(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Feed::Ready(Arc::new(value)),
            Err(err) => Feed::Failed(err.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Feed::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Default)]
pub struct DashboardDataSnapshot {
    pub map_points: Feed<Vec<MapPoint>>,
    pub gender_distribution: Feed<GenderDistribution>,
    pub widgets_fetched_at: Option<DateTime<Local>>,
}

impl DashboardDataSnapshot {
    fn with_map_points(&self, map_points: Feed<Vec<MapPoint>>) -> Self {
        Self {
            map_points,
            gender_distribution: self.gender_distribution.clone(),
            widgets_fetched_at: self.widgets_fetched_at,
        }
    }

    fn with_gender_distribution(&self, gender_distribution: Feed<GenderDistribution>) -> Self {
        Self {
            map_points: self.map_points.clone(),
            gender_distribution,
            widgets_fetched_at: self.widgets_fetched_at,
        }
    }

    fn with_widgets_fetched_at(&self, at: DateTime<Local>) -> Self {
        Self {
            map_points: self.map_points.clone(),
            gender_distribution: self.gender_distribution.clone(),
            widgets_fetched_at: Some(at),
        }
    }
}

struct DashboardDataState {
    snapshot: Arc<DashboardDataSnapshot>,
    map_rx: Option<Receiver<Result<Vec<MapPoint>, FetchError>>>,
    gender_rx: Option<Receiver<Result<GenderDistribution, FetchError>>>,
}

/// Data for renderers that read their own endpoints instead of the store.
pub struct DashboardDataCache {
    state: Mutex<DashboardDataState>,
}

impl DashboardDataCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DashboardDataState {
                snapshot: Arc::new(DashboardDataSnapshot::default()),
                map_rx: None,
                gender_rx: None,
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<DashboardDataSnapshot> {
        self.state
            .lock()
            .map(|state| Arc::clone(&state.snapshot))
            .unwrap_or_else(|_| Arc::new(DashboardDataSnapshot::default()))
    }

    pub fn watch_map_points(&self, rx: Receiver<Result<Vec<MapPoint>, FetchError>>) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(state.snapshot.with_map_points(Feed::Pending));
            state.map_rx = Some(rx);
        }
    }

    pub fn watch_gender_distribution(
        &self,
        rx: Receiver<Result<GenderDistribution, FetchError>>,
    ) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(state.snapshot.with_gender_distribution(Feed::Pending));
            state.gender_rx = Some(rx);
        }
    }

    pub fn set_map_points(&self, result: Result<Vec<MapPoint>, FetchError>) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(state.snapshot.with_map_points(Feed::from_result(result)));
        }
    }

    pub fn set_gender_distribution(&self, result: Result<GenderDistribution, FetchError>) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(
                state
                    .snapshot
                    .with_gender_distribution(Feed::from_result(result)),
            );
        }
    }

    pub fn mark_widgets_fetched(&self, at: DateTime<Local>) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(state.snapshot.with_widgets_fetched_at(at));
        }
    }

    /// Drain finished background fetches. Returns true if anything changed.
    pub fn poll(&self) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        let mut changed = false;
        if let Some(result) = take_ready(&mut state.map_rx, "map-data") {
            state.snapshot = Arc::new(state.snapshot.with_map_points(Feed::from_result(result)));
            changed = true;
        }
        if let Some(result) = take_ready(&mut state.gender_rx, "gender-distribution") {
            state.snapshot = Arc::new(
                state
                    .snapshot
                    .with_gender_distribution(Feed::from_result(result)),
            );
            changed = true;
        }
        changed
    }

    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.map_rx.is_some() || state.gender_rx.is_some())
            .unwrap_or(false)
    }
}

fn take_ready<T>(
    slot: &mut Option<Receiver<Result<T, FetchError>>>,
    label: &str,
) -> Option<Result<T, FetchError>> {
    let rx = slot.as_ref()?;
    match rx.try_recv() {
        Ok(result) => {
            *slot = None;
            Some(result)
        }
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            *slot = None;
            tracing::warn!(label, "fetch worker exited without a result");
            Some(Err(FetchError::Transport(format!("{label} worker exited"))))
        }
    }
}

impl Default for DashboardDataCache {
    fn default() -> Self {
        Self::new()
    }
}
