use std::sync::Arc;

use tokio::sync::watch;

/// Cooperative stop flag shared by the scheduler, the fetcher and the
/// signal handler.
///
/// Setting it never cancels in-flight work: the fetcher checks it between
/// waves and the scheduler at the top of each cycle. The cooldown wakes up
/// as soon as it is set.
#[derive(Clone, Debug)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request a stop. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}
