// src/socket/mod.rs
//! WebSocket transport layer.
//!
//! The transport moves whole JSON text frames; everything above it (the
//! Verto codec, the session, the calls) is transport-agnostic. A transport
//! instance is single-use: once it disconnects it is dropped and reconnect
//! allocates a fresh one through the factory.

pub mod consts;
pub mod error;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_websockets::{ClientBuilder, MaybeTlsStream, Message, WebSocketStream};

pub use error::{Result, SocketError};

type RawWs = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<RawWs, Message>;
type WsStream = SplitStream<RawWs>;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// An event produced by the transport layer.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The transport has successfully connected.
    Connected,
    /// A text frame has been received from the server.
    MessageReceived(String),
    /// The connection was lost. `error` is set when the close was abnormal
    /// and is reported at most once per transport.
    Disconnected { error: Option<String> },
}

/// Represents an active signaling connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a JSON text frame to the server.
    async fn send_text(&self, body: &str) -> Result<()>;

    /// Closes the connection. Idempotent.
    async fn disconnect(&self);

    /// Whether the underlying socket is still open for writes.
    fn is_open(&self) -> bool;
}

/// A factory responsible for creating new transport instances.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    /// Dials `host:port` and returns the transport along with its event
    /// stream. `Connected` is the first event delivered on the stream.
    async fn create_transport(
        &self,
        host: &str,
        port: u16,
    ) -> std::result::Result<(Arc<dyn Transport>, mpsc::Receiver<TransportEvent>), anyhow::Error>;
}

/// TLS WebSocket transport backed by tokio-websockets.
pub struct TlsWebSocketTransport {
    ws_sink: Mutex<Option<WsSink>>,
    open: Arc<AtomicBool>,
}

impl TlsWebSocketTransport {
    fn new(sink: WsSink, open: Arc<AtomicBool>) -> Self {
        Self {
            ws_sink: Mutex::new(Some(sink)),
            open,
        }
    }
}

#[async_trait]
impl Transport for TlsWebSocketTransport {
    async fn send_text(&self, body: &str) -> Result<()> {
        let mut sink_guard = self.ws_sink.lock().await;
        let sink = sink_guard.as_mut().ok_or(SocketError::SocketClosed)?;

        debug!(target: "Socket/Send", "--> {body}");
        sink.send(Message::text(body.to_owned())).await?;
        Ok(())
    }

    async fn disconnect(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            *self.ws_sink.lock().await = None;
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Factory for TLS WebSocket transports.
#[derive(Default)]
pub struct TlsWebSocketTransportFactory;

impl TlsWebSocketTransportFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransportFactory for TlsWebSocketTransportFactory {
    async fn create_transport(
        &self,
        host: &str,
        port: u16,
    ) -> std::result::Result<(Arc<dyn Transport>, mpsc::Receiver<TransportEvent>), anyhow::Error>
    {
        if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
            debug!(target: "Socket", "rustls crypto provider install: {e:?}");
        }

        let url = format!("wss://{host}:{port}");
        info!(target: "Socket", "Dialing {url}");
        let uri: http::Uri = url
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse URL {url}: {e}"))?;

        let (client, _response) = ClientBuilder::from_uri(uri)
            .connect()
            .await
            .map_err(|e| anyhow::anyhow!("WebSocket connect failed: {e}"))?;

        let (sink, stream) = client.split();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let open = Arc::new(AtomicBool::new(true));
        let transport = Arc::new(TlsWebSocketTransport::new(sink, open.clone()));

        tokio::task::spawn(read_pump(stream, event_tx.clone(), open));

        let _ = event_tx.send(TransportEvent::Connected).await;

        Ok((transport, event_rx))
    }
}

async fn read_pump(
    mut stream: WsStream,
    event_tx: mpsc::Sender<TransportEvent>,
    open: Arc<AtomicBool>,
) {
    let mut close_error = None;

    loop {
        match stream.next().await {
            Some(Ok(msg)) => {
                if msg.is_text() {
                    let text = msg.as_text().unwrap_or_default().to_owned();
                    debug!(target: "Socket/Recv", "<-- {text}");
                    if event_tx
                        .send(TransportEvent::MessageReceived(text))
                        .await
                        .is_err()
                    {
                        warn!(target: "Socket", "Event receiver dropped, closing read pump");
                        break;
                    }
                } else if msg.is_close() {
                    trace!(target: "Socket", "Received close frame");
                    break;
                }
                // Binary and ping/pong frames carry nothing for the codec.
            }
            Some(Err(e)) => {
                error!(target: "Socket", "Error reading from websocket: {e}");
                close_error = Some(e.to_string());
                break;
            }
            None => {
                trace!(target: "Socket", "Websocket stream ended");
                break;
            }
        }
    }

    open.store(false, Ordering::SeqCst);
    let _ = event_tx
        .send(TransportEvent::Disconnected { error: close_error })
        .await;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// A mock transport that records every sent frame.
    pub struct MockTransport {
        pub sent: StdMutex<Vec<String>>,
        open: AtomicBool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                sent: StdMutex::new(Vec::new()),
                open: AtomicBool::new(true),
            }
        }

        pub fn sent_bodies(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_text(&self, body: &str) -> Result<()> {
            if !self.is_open() {
                return Err(SocketError::SocketClosed);
            }
            self.sent.lock().unwrap().push(body.to_owned());
            Ok(())
        }

        async fn disconnect(&self) {
            self.open.store(false, Ordering::SeqCst);
        }

        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }
    }

    /// Handle to a transport created by [`MockTransportFactory`], keeping
    /// the event sender so tests can inject inbound frames.
    pub struct MockHandle {
        pub transport: Arc<MockTransport>,
        pub events: mpsc::Sender<TransportEvent>,
    }

    impl MockHandle {
        pub async fn deliver(&self, body: impl Into<String>) {
            self.events
                .send(TransportEvent::MessageReceived(body.into()))
                .await
                .expect("event receiver dropped");
        }

        pub async fn drop_connection(&self, error: Option<&str>) {
            self.events
                .send(TransportEvent::Disconnected {
                    error: error.map(str::to_owned),
                })
                .await
                .expect("event receiver dropped");
        }
    }

    /// A mock transport factory for testing.
    #[derive(Default)]
    pub struct MockTransportFactory {
        pub created: StdMutex<Vec<Arc<MockHandle>>>,
    }

    impl MockTransportFactory {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn create_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }

        pub fn latest(&self) -> Arc<MockHandle> {
            self.created
                .lock()
                .unwrap()
                .last()
                .expect("no transport created")
                .clone()
        }
    }

    #[async_trait]
    impl TransportFactory for MockTransportFactory {
        async fn create_transport(
            &self,
            _host: &str,
            _port: u16,
        ) -> std::result::Result<(Arc<dyn Transport>, mpsc::Receiver<TransportEvent>), anyhow::Error>
        {
            let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
            let transport = Arc::new(MockTransport::new());
            let handle = Arc::new(MockHandle {
                transport: transport.clone(),
                events: event_tx.clone(),
            });
            self.created.lock().unwrap().push(handle);
            let _ = event_tx.send(TransportEvent::Connected).await;
            Ok((transport, event_rx))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransportFactory;
    use super::*;

    #[tokio::test]
    async fn mock_transport_records_sends_and_refuses_after_disconnect() {
        let factory = MockTransportFactory::new();
        let (transport, mut rx) = factory.create_transport("example.com", 443).await.unwrap();

        assert!(matches!(rx.recv().await, Some(TransportEvent::Connected)));

        transport.send_text("{\"id\":1}").await.unwrap();
        assert_eq!(factory.latest().transport.sent_bodies(), vec!["{\"id\":1}"]);

        transport.disconnect().await;
        assert!(!transport.is_open());
        assert!(matches!(
            transport.send_text("{}").await,
            Err(SocketError::SocketClosed)
        ));
    }
}
