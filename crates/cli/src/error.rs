use crate::signals::SignalEvent;
use flume::{RecvError, SendError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to install signal handler: {0}")]
    SignalHandler(#[source] io::Error),

    #[error("Failed to send signal event: {0}")]
    SendSignal(#[from] SendError<SignalEvent>),

    #[error("Signal channel closed: {0}")]
    ReceiveSignal(#[from] RecvError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] monitor::Error),
}
