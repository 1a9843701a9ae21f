//! Host-facing configuration surface.

use crate::socket::consts::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STUN, DEFAULT_TURN};

/// Where to reach the signaling gateway and which ICE servers to hand the
/// peer engine. Defaults point at production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxServerConfiguration {
    pub host: String,
    pub port: u16,
    pub turn: String,
    pub stun: String,
}

impl Default for TxServerConfiguration {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            turn: DEFAULT_TURN.to_owned(),
            stun: DEFAULT_STUN.to_owned(),
        }
    }
}

impl TxServerConfiguration {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        turn: impl Into<String>,
        stun: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            turn: turn.into(),
            stun: stun.into(),
        }
    }
}

/// SIP credential login.
#[derive(Clone, Debug)]
pub struct CredentialConfig {
    pub sip_user: String,
    pub sip_password: String,
    pub sip_caller_id_name: String,
    pub sip_caller_id_number: String,
    pub fcm_token: Option<String>,
    /// Host-resolvable ringtone asset for inbound calls.
    pub ringtone: Option<String>,
    /// Host-resolvable ringback asset for outbound calls.
    pub ringback: Option<String>,
    pub log_level: LogLevel,
}

/// JWT token login.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub sip_token: String,
    pub sip_caller_id_name: String,
    pub sip_caller_id_number: String,
    pub fcm_token: Option<String>,
    pub ringtone: Option<String>,
    pub ringback: Option<String>,
    pub log_level: LogLevel,
}

/// Verbosity requested by the host at login time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    All,
    None,
    Verto,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::All | LogLevel::Verto => log::LevelFilter::Trace,
            LogLevel::None => log::LevelFilter::Off,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let cfg = TxServerConfiguration::default();
        assert_eq!(cfg.host, "rtc.telnyx.com");
        assert_eq!(cfg.port, 14938);
        assert_eq!(cfg.turn, "turn:turn.telnyx.com:3478?transport=tcp");
        assert_eq!(cfg.stun, "stun:stun.telnyx.com:3843");
    }
}
