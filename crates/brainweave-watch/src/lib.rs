//! Watch mode: debounced filesystem watching over the notes directory
//! plus a periodic federation refresh, driving full graph rebuilds.

pub mod error;
pub mod runtime;
pub mod state;

pub use error::{Error, Result};
pub use runtime::{run_watch, RebuildDriver, WatchRuntime};
pub use state::{Effect, Scheduler, SchedulerEvent};
