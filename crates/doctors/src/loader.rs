//! Cancellable record list load
//!
//! The fetch runs on its own task so the caller keeps handling user input while it is in
//! flight. Starting a new load aborts the previous task, and the session's ticket check drops
//! any result that still slips through.

use std::future::Future;

use doctors_core::record::{DoctorRecord, LoadError};
use doctors_core::session::{DoctorSearch, Location, LoadTicket};
use tokio::task::JoinHandle;

pub type LoadResult = Result<Vec<DoctorRecord>, LoadError>;

#[derive(Debug)]
pub struct LoadTask {
    ticket: LoadTicket,
    handle: JoinHandle<LoadResult>,
}

impl LoadTask {
    /// Register a new load with `session` and spawn `fetch` for it
    pub fn start<L, F>(
        session: &mut DoctorSearch<L>,
        previous: Option<LoadTask>,
        fetch: F,
    ) -> Self
    where
        L: Location,
        F: Future<Output = LoadResult> + Send + 'static,
    {
        if let Some(previous) = previous {
            log::debug!("Superseding load {:?}", previous.ticket);
            previous.abort();
        }

        Self {
            ticket: session.begin_load(),
            handle: tokio::spawn(fetch),
        }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the fetch to finish. An aborted or panicked task reports a network error.
    pub async fn wait(&mut self) -> LoadResult {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(LoadError::Network("load cancelled".to_string())),
            Err(e) => Err(LoadError::Network(format!("load task failed: {e}"))),
        }
    }
}

/// Wait on the pending load, if any, and hand its result to `session`
///
/// Returns whether the session accepted the result. Never resolves when nothing is pending,
/// which keeps it usable as a `tokio::select!` branch.
pub async fn complete_pending<L: Location>(
    pending: &mut Option<LoadTask>,
    session: &mut DoctorSearch<L>,
) -> bool {
    let Some(task) = pending.as_mut() else {
        return std::future::pending().await;
    };

    let result = task.wait().await;
    let ticket = task.ticket();
    *pending = None;

    session.finish_load(ticket, result)
}
