use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration: {0}")]
    InvalidConfiguration(String),
    #[error("graph contains an edge with a missing endpoint: {from} -> {to}")]
    MissingEndpoint { from: String, to: String },
    #[error("no node with the id '{id}' exists")]
    NodeNotFound { id: String },
    #[error(transparent)]
    Queue(#[from] QueueError),
}

pub type Result<T> = std::result::Result<T, Error>;
