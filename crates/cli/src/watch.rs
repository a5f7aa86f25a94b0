use crate::error::Error;
use crate::feed::{SimulatedPlayer, drive};
use crate::signals::{SignalEvent, wait_for_signal};
use flume::bounded;
use monitor::PerformanceMonitor;
use monitor::sampler::Controller;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub controlled_by: Controller,
    pub simulate: bool,
}

/// Run the sampler until Ctrl-C or SIGTERM, logging every sample.
///
/// A user run recorded by a previous process is resumed first. Ctrl-C ends
/// the run for good; SIGTERM leaves it recorded so the next start resumes it.
pub async fn watch(monitor: &PerformanceMonitor, options: WatchOptions) -> Result<(), Error> {
    if !monitor.resume_if_needed()? && !monitor.start(options.controlled_by)? {
        debug!(run = ?monitor.run_state(), "monitoring was already running");
    }

    let subscription = monitor.subscribe(|sample| {
        info!(
            status = %sample.status,
            quality = %sample.network_quality,
            latency = sample.latency,
            bandwidth = sample.bandwidth,
            buffer = sample.buffer_health,
            errors = sample.error_count,
            retries = sample.retry_count,
            "live sample"
        );
        Ok(())
    });

    let feed = options.simulate.then(|| {
        tokio::spawn(drive(
            monitor.clone(),
            SimulatedPlayer::from_entropy(),
            monitor.config().sampler.period / 2,
        ))
    });

    let (events_tx, events_rx) = bounded(8);
    let signals = wait_for_signal(&events_tx);
    tokio::pin!(signals);

    let result = loop {
        tokio::select! {
            err = &mut signals => {
                error!(error = ?err, "Error while waiting for signal");
                break err;
            }
            res = events_rx.recv_async() => {
                let event = match res {
                    Ok(event) => event,
                    Err(err) => break Err(err.into()),
                };
                debug!(?event, "Received signal event");
                match event {
                    SignalEvent::SigUSR1 => {
                        info!(report = %monitor.text_report(), "session report");
                    }
                    SignalEvent::SigUSR2 => {
                        let stats = monitor.network_quality_stats();
                        let trends = monitor.performance_trends();
                        info!(?stats, ?trends, health = ?monitor.health(), "network quality");
                    }
                    SignalEvent::Interrupt => {
                        let outcome = monitor.stop_by_user();
                        info!(?outcome, "monitoring stopped by user");
                        break Ok(());
                    }
                    SignalEvent::Terminate => {
                        info!("shutdown requested, run state kept");
                        break Ok(());
                    }
                }
            }
        }
    };

    if let Some(feed) = feed {
        feed.abort();
    }
    subscription.unsubscribe();
    result
}
