// src/types/mod.rs
pub mod events;
pub mod gateway;

pub use events::TxEvent;
pub use gateway::GatewayState;
