//! Match viewer background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    state::{ViewerError, ViewerState},
    store::{ChangeSubscription, MatchStore},
    timer::{Clock, MatchClockDisplay},
};

/// Handle to a mounted viewer for one match.
///
/// The display is published on a watch channel. Dropping the handle or
/// calling [`MatchViewer::teardown`] stops the task, which unsubscribes from
/// the change feed and cancels the tick.
#[derive(Debug)]
pub struct MatchViewer {
    match_id: String,
    display_rx: watch::Receiver<MatchClockDisplay>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MatchViewer {
    /// Subscribe to the match's changes, read its row once, and start the
    /// viewer task. Must be called from within a tokio runtime.
    ///
    /// A failed or empty read leaves the viewer uninitialized; it starts
    /// showing a timer on the first pushed update.
    pub fn mount(
        match_id: &str,
        store: &dyn MatchStore,
        clock: Arc<dyn Clock>,
        tick_period: Duration,
    ) -> Result<Self, ViewerError> {
        // subscribe before reading so no update falls between the two
        let subscription = store.subscribe(match_id)?;

        let state = match store.fetch_row(match_id) {
            Ok(Some(row)) => ViewerState::from_row(&row, clock.now()),
            Ok(None) => {
                warn!("No timer row for match {}, waiting for first update", match_id);
                ViewerState::uninitialized()
            }
            Err(e) => {
                warn!("Initial timer fetch for match {} failed: {}, waiting for first update", match_id, e);
                ViewerState::uninitialized()
            }
        };

        let (display_tx, display_rx) = watch::channel(state.render(clock.now()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(match_viewer_task(
            match_id.to_string(),
            state,
            subscription,
            clock,
            tick_period,
            display_tx,
            shutdown_rx,
        ));

        Ok(Self {
            match_id: match_id.to_string(),
            display_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Latest rendered display
    pub fn display(&self) -> MatchClockDisplay {
        self.display_rx.borrow().clone()
    }

    /// Receiver notified on every recompute
    pub fn watch(&self) -> watch::Receiver<MatchClockDisplay> {
        self.display_rx.clone()
    }

    /// Stop the viewer task and wait for it to finish
    pub async fn teardown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Viewer task for match {} ended abnormally: {}", self.match_id, e);
            }
        }
    }
}

/// Recompute loop for one match: immediately on each pushed snapshot, and
/// once per tick while the timer is running or on a break. Every applied
/// push restarts the tick schedule from its receipt time.
async fn match_viewer_task(
    match_id: String,
    mut state: ViewerState,
    mut subscription: ChangeSubscription,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
    display_tx: watch::Sender<MatchClockDisplay>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    info!("Viewer for match {} started (status: {:?})", match_id, state.status());

    let mut ticker = ticker_for(&state, tick_period);
    let mut feed_open = true;

    loop {
        tokio::select! {
            // explicit teardown or dropped handle
            _ = &mut shutdown_rx => break,

            _ = next_tick(&mut ticker) => {
                let rendered = state.render(clock.now());
                debug!("Match {} tick: {}", match_id, rendered.formatted);
                display_tx.send_replace(rendered);
            }

            push = subscription.next(), if feed_open => {
                match push {
                    Some(push) => {
                        let now = clock.now();
                        state.apply_push(&push, now);

                        let rendered = state.render(now);
                        debug!("Match {} update: {} {}", match_id, rendered.label, rendered.formatted);
                        display_tx.send_replace(rendered);

                        // restart in phase with the new baseline, or cancel
                        ticker = ticker_for(&state, tick_period);
                    }
                    None => {
                        warn!("Change feed closed for match {}, holding last snapshot", match_id);
                        feed_open = false;
                    }
                }
            }
        }
    }

    drop(subscription);
    info!("Viewer for match {} torn down", match_id);
}

/// A fresh tick schedule when the status needs one, first tick one period out
fn ticker_for(state: &ViewerState, period: Duration) -> Option<Interval> {
    if !state.is_ticking() {
        return None;
    }
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
