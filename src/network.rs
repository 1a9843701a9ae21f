//! Network reachability and reconnect supervision.
//!
//! The host bridges its platform's reachability callbacks into a
//! [`NetworkMonitor`]; the supervisor task watches it and drives the
//! client's reconnect pass when the network comes back.

use crate::client::TelnyxClient;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Reachability source supplied by the host.
pub trait NetworkMonitor: Send + Sync {
    /// Synchronous probe used to gate `connect`.
    fn is_available(&self) -> bool;

    /// Availability change stream for the supervisor.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// A monitor the host updates by hand as OS reachability callbacks fire.
pub struct ManualNetworkMonitor {
    tx: watch::Sender<bool>,
}

impl ManualNetworkMonitor {
    pub fn new(initially_available: bool) -> Self {
        let (tx, _) = watch::channel(initially_available);
        Self { tx }
    }

    pub fn set_available(&self, available: bool) {
        self.tx.send_replace(available);
    }
}

impl Default for ManualNetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor for ManualNetworkMonitor {
    fn is_available(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Spawns the supervisor loop. Registered at most once per client; the
/// returned handle is aborted on `disconnect`.
pub(crate) fn spawn_supervisor(client: &Arc<TelnyxClient>) -> JoinHandle<()> {
    let mut availability = client.network_monitor().subscribe();
    let weak = Arc::downgrade(client);
    tokio::spawn(async move {
        loop {
            if availability.changed().await.is_err() {
                return;
            }
            let available = *availability.borrow_and_update();
            let Some(client) = weak.upgrade() else {
                return;
            };
            if available {
                client.on_network_available().await;
            } else {
                client.on_network_unavailable();
            }
        }
    })
}
