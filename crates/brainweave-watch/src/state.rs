//! Pure rebuild scheduler.
//!
//! The scheduler is a state machine with no clocks, channels or I/O: the
//! runtime feeds it [`SchedulerEvent`]s and executes the [`Effect`]s it
//! returns. Keeping it pure means the tricky ordering rules (events that
//! arrive before the watcher is ready, debounce coalescing, periodic
//! refresh) are all testable without a runtime.

use std::path::PathBuf;

/// Something the runtime observed and hands to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The initial full rebuild has completed.
    BootstrapFinished,
    /// The file watcher is installed and the event loop is draining.
    WatchReady,
    /// A note file was created or modified.
    NoteUpserted(PathBuf),
    /// A note file was removed.
    NoteRemoved(PathBuf),
    /// The debounce window closed with no further note changes.
    DebounceElapsed,
    /// The periodic federation refresh interval elapsed.
    RefreshTimerFired,
    /// Stop the event loop.
    Shutdown,
}

/// An action the runtime must perform on the scheduler's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a full rebuild. `refetch` forces fresh federation maps.
    RunRebuild { refetch: bool },
    /// (Re)start the debounce timer, cancelling any timer in flight.
    ArmDebounce,
    /// (Re)start the periodic refresh timer, cancelling any in flight.
    RearmRefreshTimer,
}

/// A note change observed before the watcher was ready.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingOp {
    Upsert(PathBuf),
    Delete(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Bootstrapping,
    Bootstrapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    NotReady,
    Ready,
}

/// Tracks the bootstrap and watch lifecycles and turns raw change events
/// into coalesced rebuild requests.
///
/// Changes that land while the watcher is not yet ready are queued, not
/// dropped: once [`SchedulerEvent::WatchReady`] arrives a single catch-up
/// rebuild covers all of them. After that, every change arms the debounce
/// timer and the rebuild runs only when the window closes, so a burst of
/// edits costs one rebuild.
#[derive(Debug)]
pub struct Scheduler {
    bootstrap: BootstrapState,
    watch: WatchState,
    pending: Vec<PendingOp>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            bootstrap: BootstrapState::Bootstrapping,
            watch: WatchState::NotReady,
            pending: Vec::new(),
        }
    }

    pub fn bootstrap(&self) -> BootstrapState {
        self.bootstrap
    }

    pub fn watch(&self) -> WatchState {
        self.watch
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Advances the machine and returns the effects to execute, in order.
    pub fn handle(&mut self, event: SchedulerEvent) -> Vec<Effect> {
        match event {
            SchedulerEvent::BootstrapFinished => {
                self.bootstrap = BootstrapState::Bootstrapped;
                Vec::new()
            }
            SchedulerEvent::WatchReady => {
                self.watch = WatchState::Ready;
                let mut effects = Vec::new();
                if !self.pending.is_empty() {
                    // One catch-up rebuild covers everything that queued
                    // while the watcher was being installed.
                    self.pending.clear();
                    effects.push(Effect::RunRebuild { refetch: false });
                }
                effects.push(Effect::RearmRefreshTimer);
                effects
            }
            SchedulerEvent::NoteUpserted(path) => self.note_changed(PendingOp::Upsert(path)),
            SchedulerEvent::NoteRemoved(path) => self.note_changed(PendingOp::Delete(path)),
            SchedulerEvent::DebounceElapsed => {
                vec![Effect::RunRebuild { refetch: false }]
            }
            SchedulerEvent::RefreshTimerFired => {
                vec![Effect::RunRebuild { refetch: true }, Effect::RearmRefreshTimer]
            }
            SchedulerEvent::Shutdown => Vec::new(),
        }
    }

    fn note_changed(&mut self, op: PendingOp) -> Vec<Effect> {
        match self.watch {
            WatchState::NotReady => {
                self.pending.push(op);
                Vec::new()
            }
            WatchState::Ready => {
                // Each change restarts the debounce window; the refresh
                // timer is pushed back too so a busy editing session does
                // not race a periodic refetch.
                vec![Effect::ArmDebounce, Effect::RearmRefreshTimer]
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
