/// Registration states reported by the remote gateway.
///
/// `Reged` and `Noreg` are the terminal states for the post-login polling
/// loop; everything else leaves the loop running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayState {
    #[default]
    Idle,
    Trying,
    Register,
    Reged,
    Unreged,
    Unregister,
    Attached,
    Failed,
    FailWait,
    Expired,
    Noreg,
    Noauthed,
}

impl GatewayState {
    pub fn from_wire(s: &str) -> Option<Self> {
        Some(match s {
            "IDLE" => GatewayState::Idle,
            "TRYING" => GatewayState::Trying,
            "REGISTER" => GatewayState::Register,
            "REGED" => GatewayState::Reged,
            "UNREGED" => GatewayState::Unreged,
            "UNREGISTER" => GatewayState::Unregister,
            "ATTACHED" => GatewayState::Attached,
            "FAILED" => GatewayState::Failed,
            "FAIL_WAIT" => GatewayState::FailWait,
            "EXPIRED" => GatewayState::Expired,
            "NOREG" => GatewayState::Noreg,
            "NOAUTHED" => GatewayState::Noauthed,
            _ => return None,
        })
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            GatewayState::Idle => "IDLE",
            GatewayState::Trying => "TRYING",
            GatewayState::Register => "REGISTER",
            GatewayState::Reged => "REGED",
            GatewayState::Unreged => "UNREGED",
            GatewayState::Unregister => "UNREGISTER",
            GatewayState::Attached => "ATTACHED",
            GatewayState::Failed => "FAILED",
            GatewayState::FailWait => "FAIL_WAIT",
            GatewayState::Expired => "EXPIRED",
            GatewayState::Noreg => "NOREG",
            GatewayState::Noauthed => "NOAUTHED",
        }
    }
}
