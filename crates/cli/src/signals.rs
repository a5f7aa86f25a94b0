use crate::error::Error;
use flume::Sender;
use tokio::signal::unix::{SignalKind, signal};

/// Indefinitely listens to signals and sends signal events to the provided channel.
pub async fn wait_for_signal(signal_event: &Sender<SignalEvent>) -> Result<(), Error> {
    let mut sigusr1 = signal(SignalKind::user_defined1()).map_err(Error::SignalHandler)?;
    let mut sigusr2 = signal(SignalKind::user_defined2()).map_err(Error::SignalHandler)?;
    let mut sigint = signal(SignalKind::interrupt()).map_err(Error::SignalHandler)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(Error::SignalHandler)?;

    loop {
        tokio::select! {
            _ = sigusr1.recv() => {
                signal_event.send_async(SignalEvent::SigUSR1).await?;
            }
            _ = sigusr2.recv() => {
                signal_event.send_async(SignalEvent::SigUSR2).await?;
            }
            _ = sigint.recv() => {
                signal_event.send_async(SignalEvent::Interrupt).await?;
            }
            _ = sigterm.recv() => {
                signal_event.send_async(SignalEvent::Terminate).await?;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// Log the session report.
    SigUSR1,
    /// Log network quality stats.
    SigUSR2,
    /// Ctrl-C: the user ends monitoring.
    Interrupt,
    /// Shutdown without ending the run, so a user run resumes next start.
    Terminate,
}
