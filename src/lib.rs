// src/lib.rs
pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod media;
pub mod network;
pub mod socket;
pub mod types;
pub mod verto;

pub use call::{Call, CallDirection, CallState, CauseCode};
pub use client::{SessionHandle, TelnyxClient};
pub use config::{CredentialConfig, LogLevel, TokenConfig, TxServerConfiguration};
pub use error::ClientError;
pub use network::{ManualNetworkMonitor, NetworkMonitor};
pub use types::{GatewayState, TxEvent};
