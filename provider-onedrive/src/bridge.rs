//! Async-to-sync bridge.
//!
//! Network calls run as tasks on the network runtime. Synchronous callers
//! get a [`PendingResponse`] back immediately and block on it only when they
//! need the value, which lets the paginator issue the next request before it
//! starts working on the current page.
//!
//! Each task owns the sending half of a one-shot channel. Sending consumes
//! it, so a result is delivered at most once; if the task goes away without
//! sending (runtime shut down, task aborted or panicked) the waiter gets
//! [`OneDriveError::InterruptedWait`] instead of hanging.

use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::warn;

use crate::error::{OneDriveError, Result};

/// Submits futures to the network runtime.
#[derive(Debug, Clone)]
pub struct NetworkBridge {
    handle: Handle,
}

impl NetworkBridge {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Start `future` on the network runtime without waiting for it.
    pub fn submit<T, F>(&self, label: impl Into<String>, future: F) -> PendingResponse<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            // The waiter may have given up (e.g. aborted pagination); the
            // result is simply dropped then.
            let _ = tx.send(future.await);
        });

        PendingResponse {
            label: label.into(),
            rx,
        }
    }

    /// Run `future` on the network runtime and block until it completes.
    pub fn run<T, F>(&self, label: impl Into<String>, future: F) -> Result<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.submit(label, future).wait()
    }
}

/// Handle to one in-flight network operation.
#[derive(Debug)]
pub struct PendingResponse<T> {
    label: String,
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> PendingResponse<T> {
    /// Description of the operation, e.g. `GET https://...`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Block the current thread until the operation completes.
    ///
    /// Threads inside a Tokio runtime context, including its blocking pool,
    /// are refused with [`OneDriveError::InternalConsistency`]; the wait must
    /// happen on a plain caller thread.
    pub fn wait(self) -> Result<T> {
        if Handle::try_current().is_ok() {
            warn!(operation = %self.label, "Blocking wait refused inside a Tokio runtime");
            return Err(OneDriveError::InternalConsistency(format!(
                "blocking wait for {} called from inside a Tokio runtime; \
                 call synchronous accessors from a thread outside the runtime",
                self.label
            )));
        }

        match self.rx.blocking_recv() {
            Ok(result) => result,
            Err(_) => {
                warn!(operation = %self.label, "Network task ended without a result");
                Err(OneDriveError::InterruptedWait(self.label))
            }
        }
    }
}
