use tokio::sync::watch;

/// Cancellation signal observed by an advisor run.
///
/// Checked while the catalog loads and between bundles.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// Triggers the paired [`Cancellation`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Create a connected handle/signal pair.
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Cancellation {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_, cancellation) = cancellation();
        cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn starts_uncancelled() {
        let (_handle, signal) = cancellation();
        assert!(!signal.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_wakes_waiters() {
        let (handle, signal) = cancellation();
        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.cancelled().await }
        });

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn never_does_not_fire() {
        let signal = Cancellation::never();
        assert!(!signal.is_cancelled());

        let timed_out = tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(timed_out.is_err());
    }

    #[tokio::test]
    async fn dropped_handle_after_cancel_still_reports_cancelled() {
        let (handle, signal) = cancellation();
        handle.cancel();
        drop(handle);

        assert!(signal.is_cancelled());
        tokio::time::timeout(Duration::from_secs(5), signal.cancelled())
            .await
            .expect("already cancelled");
    }
}
