use std::time::Duration;

use tokio::sync::{mpsc::error::SendError, oneshot::error::RecvError};

use crate::runtime::Delivery;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Call did not complete within {0:?}")]
    Timeout(Duration),

    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    #[error("Runtime failure: {0}")]
    Runtime(String),
}

impl Error {
    /// Runtime-kind error for a route the receiving actor does not handle.
    pub fn unknown_route(route: &str) -> Self {
        Error::Runtime(format!("no handler registered for route '{route}'"))
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Error::State(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Error::Runtime(msg.into())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<SendError<Delivery>> for Error {
    fn from(_: SendError<Delivery>) -> Self {
        Error::Runtime("actor mailbox is closed".into())
    }
}

impl From<RecvError> for Error {
    fn from(_: RecvError) -> Self {
        Error::Runtime("actor terminated before responding".into())
    }
}
