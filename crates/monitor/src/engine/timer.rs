#![forbid(unsafe_code)]

use super::Shared;
use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// `interval_at` rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// The recurring sample timer of one monitoring run.
///
/// The task holds only a weak reference to the monitor, so dropping the last
/// monitor handle ends it. Cancelling is synchronous; a tick that already
/// waits on the monitor lock observes the cancellation and does nothing.
#[derive(Debug)]
pub(crate) struct TimerHandle {
    cancel: CancellationToken,
}

impl TimerHandle {
    pub(crate) fn spawn(runtime: &Handle, period: Duration, monitor: Weak<Shared>) -> Self {
        let period = period.max(MIN_PERIOD);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(shared) = monitor.upgrade() else {
                            break;
                        };
                        shared.tick(Some(&token));
                    }
                }
            }
            trace!("sample timer finished");
        });
        Self { cancel }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
