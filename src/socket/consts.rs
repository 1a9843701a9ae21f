// src/socket/consts.rs
use std::time::Duration;

pub const DEFAULT_HOST: &str = "rtc.telnyx.com";
pub const DEFAULT_PORT: u16 = 14938;

pub const DEFAULT_TURN: &str = "turn:turn.telnyx.com:3478?transport=tcp";
pub const DEFAULT_STUN: &str = "stun:stun.telnyx.com:3843";

/// Interval between gateway registration probes after `clientReady`.
pub const GATEWAY_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Registration probes re-fire this many times before the session gives up.
pub const MAX_REG_RETRIES: u32 = 2;

/// Wait after offer creation so ICE gathering can populate the local SDP.
pub const ICE_GATHER_DELAY: Duration = Duration::from_millis(300);
