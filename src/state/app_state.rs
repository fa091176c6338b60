//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use super::ViewerError;
use crate::{
    store::{ChangeEvent, MatchStore, StoreError, TimerPush},
    tasks::MatchViewer,
    timer::{Clock, MatchClockDisplay},
};

/// Main application state: the store, the clock, and every mounted viewer
pub struct AppState {
    /// Backing store mirror and its change feed
    pub store: Arc<dyn MatchStore>,
    /// Consumer wall clock used as the projection baseline
    pub clock: Arc<dyn Clock>,
    /// Period of the display recompute while a timer is ticking
    pub tick_interval: Duration,
    /// Mounted viewers keyed by match id
    viewers: Mutex<HashMap<String, MatchViewer>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MatchStore>,
        clock: Arc<dyn Clock>,
        port: u16,
        host: String,
        tick_interval: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            tick_interval,
            viewers: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Mount a viewer for `match_id`, or return the display of the one
    /// already mounted.
    pub fn mount_viewer(&self, match_id: &str) -> Result<MatchClockDisplay, ViewerError> {
        let mut viewers = self.viewers.lock().map_err(|_| ViewerError::LockPoisoned)?;

        if let Some(viewer) = viewers.get(match_id) {
            return Ok(viewer.display());
        }

        let viewer = MatchViewer::mount(
            match_id,
            self.store.as_ref(),
            Arc::clone(&self.clock),
            self.tick_interval,
        )?;
        let display = viewer.display();
        viewers.insert(match_id.to_string(), viewer);
        drop(viewers);

        info!("Mounted viewer for match {}", match_id);
        self.record_action(format!("mount {}", match_id));
        Ok(display)
    }

    /// Tear down the viewer for `match_id`
    pub async fn unmount_viewer(&self, match_id: &str) -> Result<(), ViewerError> {
        let viewer = {
            let mut viewers = self.viewers.lock().map_err(|_| ViewerError::LockPoisoned)?;
            viewers.remove(match_id)
        };

        match viewer {
            Some(viewer) => {
                viewer.teardown().await;
                info!("Unmounted viewer for match {}", match_id);
                self.record_action(format!("unmount {}", match_id));
                Ok(())
            }
            None => Err(ViewerError::NotMounted(match_id.to_string())),
        }
    }

    /// Tear down every mounted viewer
    pub async fn shutdown(&self) {
        let viewers: Vec<MatchViewer> = match self.viewers.lock() {
            Ok(mut viewers) => viewers.drain().map(|(_, viewer)| viewer).collect(),
            Err(poisoned) => poisoned.into_inner().drain().map(|(_, viewer)| viewer).collect(),
        };

        info!("Tearing down {} viewers", viewers.len());
        for viewer in viewers {
            viewer.teardown().await;
        }
    }

    /// Current display for a mounted match
    pub fn get_display(&self, match_id: &str) -> Result<MatchClockDisplay, ViewerError> {
        let viewers = self.viewers.lock().map_err(|_| ViewerError::LockPoisoned)?;
        viewers
            .get(match_id)
            .map(MatchViewer::display)
            .ok_or_else(|| ViewerError::NotMounted(match_id.to_string()))
    }

    /// Receiver notified whenever a mounted match's display is recomputed
    pub fn watch_display(&self, match_id: &str) -> Result<watch::Receiver<MatchClockDisplay>, ViewerError> {
        let viewers = self.viewers.lock().map_err(|_| ViewerError::LockPoisoned)?;
        viewers
            .get(match_id)
            .map(MatchViewer::watch)
            .ok_or_else(|| ViewerError::NotMounted(match_id.to_string()))
    }

    /// Ids of all mounted matches, sorted
    pub fn mounted_matches(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .viewers
            .lock()
            .map(|viewers| viewers.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Hand a backend change notification to the store, which fans it out
    /// to the mounted viewers
    pub fn ingest_change(&self, event: ChangeEvent) -> Result<TimerPush, StoreError> {
        let kind = event.event_type;
        let push = self.store.ingest(event)?;
        self.record_action(format!("{:?} {}", kind, push.match_id).to_lowercase());
        Ok(push)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: String) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
