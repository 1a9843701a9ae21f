use crate::socket::SocketError;
use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the session and call layers.
///
/// Everything user-visible is also posted to the event stream as
/// `TxEvent::Error`; these values are for callers that want to branch.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No Network Connection")]
    NetworkUnavailable,
    #[error("Gateway registration has timed out")]
    GatewayRegistrationTimeout,
    #[error("client is not connected")]
    NotConnected,
    #[error("client is already connecting")]
    AlreadyConnecting,
    #[error("session is not ready: login has not completed")]
    SessionNotReady,
    #[error("unknown call: {0}")]
    UnknownCall(Uuid),
    #[error("remote error: {0}")]
    Remote(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("socket error: {0}")]
    Socket(#[from] SocketError),
    #[error("peer connection error: {0}")]
    Peer(#[from] anyhow::Error),
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),
}
