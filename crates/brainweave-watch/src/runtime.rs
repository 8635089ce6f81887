//! Tokio driver for the rebuild scheduler.
//!
//! Raw filesystem notifications come in through a `notify` debouncer,
//! get translated into [`SchedulerEvent`]s and flow through the pure
//! [`Scheduler`]. The runtime owns the two one-shot timers (debounce and
//! periodic refresh) as abortable tasks so rearming is just abort-and-spawn.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brainweave_core::config::BrainConfig;
use notify::{EventKind, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::state::{Effect, Scheduler, SchedulerEvent};

/// How long the notify debouncer coalesces raw OS events before handing
/// them over. The scheduler's own debounce window sits on top of this.
const NOTIFY_COALESCE: Duration = Duration::from_millis(100);

/// Performs full rebuilds on the scheduler's behalf.
#[async_trait]
pub trait RebuildDriver: Send + Sync + 'static {
    /// Rebuild the graph. `refetch` forces fresh federation maps instead
    /// of the cached ones.
    async fn rebuild(&self, refetch: bool) -> anyhow::Result<usize>;
}

/// Event loop wiring the scheduler to timers and a rebuild driver.
pub struct WatchRuntime<D> {
    driver: Arc<D>,
    scheduler: Scheduler,
    debounce: Duration,
    refresh: Option<Duration>,
    events_tx: mpsc::UnboundedSender<SchedulerEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SchedulerEvent>>,
    debounce_timer: Option<JoinHandle<()>>,
    refresh_timer: Option<JoinHandle<()>>,
}

impl<D: RebuildDriver> WatchRuntime<D> {
    pub fn new(driver: Arc<D>, debounce: Duration, refresh: Option<Duration>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            driver,
            scheduler: Scheduler::new(),
            debounce,
            refresh,
            events_tx,
            events_rx: Some(events_rx),
            debounce_timer: None,
            refresh_timer: None,
        }
    }

    /// A sender for feeding events into the loop. Cloneable; the watcher
    /// callback and ctrl-c handler each hold one.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SchedulerEvent> {
        self.events_tx.clone()
    }

    /// Drains events until [`SchedulerEvent::Shutdown`] arrives.
    pub async fn run(mut self) -> Result<()> {
        let mut events_rx = self.events_rx.take().ok_or(Error::ChannelClosed)?;
        while let Some(event) = events_rx.recv().await {
            let stop = matches!(event, SchedulerEvent::Shutdown);
            for effect in self.scheduler.handle(event) {
                self.apply(effect).await;
            }
            if stop {
                break;
            }
        }
        if let Some(handle) = self.debounce_timer.take() {
            handle.abort();
        }
        if let Some(handle) = self.refresh_timer.take() {
            handle.abort();
        }
        Ok(())
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::RunRebuild { refetch } => {
                match self.driver.rebuild(refetch).await {
                    Ok(count) => debug!(notes = count, refetch, "rebuild effect done"),
                    // A failed rebuild must not kill the watch loop; the
                    // next change will try again.
                    Err(err) => error!(error = %err, "rebuild failed"),
                }
            }
            Effect::ArmDebounce => {
                if let Some(handle) = self.debounce_timer.take() {
                    handle.abort();
                }
                let events_tx = self.events_tx.clone();
                let delay = self.debounce;
                self.debounce_timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events_tx.send(SchedulerEvent::DebounceElapsed);
                }));
            }
            Effect::RearmRefreshTimer => {
                if let Some(handle) = self.refresh_timer.take() {
                    handle.abort();
                }
                if let Some(delay) = self.refresh {
                    let events_tx = self.events_tx.clone();
                    self.refresh_timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = events_tx.send(SchedulerEvent::RefreshTimerFired);
                    }));
                }
            }
        }
    }
}

/// Watches the configured notes directory and rebuilds on changes until
/// interrupted.
///
/// Bootstrap order matters: the watcher is installed *before* the initial
/// rebuild, so edits made during that rebuild queue up in the scheduler
/// and are covered by one catch-up rebuild when the loop opens.
pub async fn run_watch<D: RebuildDriver>(driver: Arc<D>, config: &BrainConfig) -> Result<()> {
    std::fs::create_dir_all(&config.notes_directory).map_err(|source| Error::Io {
        path: config.notes_directory.clone(),
        source,
    })?;

    let runtime = WatchRuntime::new(driver.clone(), config.debounce(), config.refresh_interval());
    let events_tx = runtime.event_sender();

    let watch_tx = events_tx.clone();
    let watch_config = config.clone();
    let mut debouncer = new_debouncer(
        NOTIFY_COALESCE,
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                for event in events {
                    let scheduler_event = match event.event.kind {
                        EventKind::Create(_) | EventKind::Modify(_) => SchedulerEvent::NoteUpserted,
                        EventKind::Remove(_) => SchedulerEvent::NoteRemoved,
                        _ => continue,
                    };
                    for path in &event.event.paths {
                        let name = match path.file_name().and_then(|n| n.to_str()) {
                            Some(name) => name,
                            None => continue,
                        };
                        if !watch_config.matches_extension(name) {
                            continue;
                        }
                        if watch_tx.send(scheduler_event(path.clone())).is_err() {
                            return;
                        }
                    }
                }
            }
            Err(errors) => {
                for err in errors {
                    warn!(error = %err, "filesystem watch error");
                }
            }
        },
    )?;
    debouncer.watch(&config.notes_directory, RecursiveMode::Recursive)?;
    info!(dir = %config.notes_directory.display(), "watching notes directory");

    // Initial full rebuild with a fresh federation fetch.
    match driver.rebuild(true).await {
        Ok(count) => info!(notes = count, "initial build complete"),
        Err(err) => error!(error = %err, "initial build failed"),
    }
    events_tx
        .send(SchedulerEvent::BootstrapFinished)
        .map_err(|_| Error::ChannelClosed)?;
    events_tx
        .send(SchedulerEvent::WatchReady)
        .map_err(|_| Error::ChannelClosed)?;

    let shutdown_tx = events_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            let _ = shutdown_tx.send(SchedulerEvent::Shutdown);
        }
    });

    runtime.run().await
}
