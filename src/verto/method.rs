use serde::{Deserialize, Serialize};

/// The closed set of Verto methods this engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertoMethod {
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "telnyx_rtc.invite")]
    Invite,
    #[serde(rename = "telnyx_rtc.answer")]
    Answer,
    #[serde(rename = "telnyx_rtc.media")]
    Media,
    #[serde(rename = "telnyx_rtc.ringing")]
    Ringing,
    #[serde(rename = "telnyx_rtc.bye")]
    Bye,
    #[serde(rename = "telnyx_rtc.modify")]
    Modify,
    #[serde(rename = "telnyx_rtc.info")]
    Info,
    #[serde(rename = "telnyx_rtc.gatewayState")]
    GatewayState,
    #[serde(rename = "telnyx_rtc.clientReady")]
    ClientReady,
}

impl VertoMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VertoMethod::Login => "login",
            VertoMethod::Invite => "telnyx_rtc.invite",
            VertoMethod::Answer => "telnyx_rtc.answer",
            VertoMethod::Media => "telnyx_rtc.media",
            VertoMethod::Ringing => "telnyx_rtc.ringing",
            VertoMethod::Bye => "telnyx_rtc.bye",
            VertoMethod::Modify => "telnyx_rtc.modify",
            VertoMethod::Info => "telnyx_rtc.info",
            VertoMethod::GatewayState => "telnyx_rtc.gatewayState",
            VertoMethod::ClientReady => "telnyx_rtc.clientReady",
        }
    }

    pub fn from_method_str(s: &str) -> Option<Self> {
        Some(match s {
            "login" => VertoMethod::Login,
            "telnyx_rtc.invite" => VertoMethod::Invite,
            "telnyx_rtc.answer" => VertoMethod::Answer,
            "telnyx_rtc.media" => VertoMethod::Media,
            "telnyx_rtc.ringing" => VertoMethod::Ringing,
            "telnyx_rtc.bye" => VertoMethod::Bye,
            "telnyx_rtc.modify" => VertoMethod::Modify,
            "telnyx_rtc.info" => VertoMethod::Info,
            "telnyx_rtc.gatewayState" => VertoMethod::GatewayState,
            "telnyx_rtc.clientReady" => VertoMethod::ClientReady,
            _ => return None,
        })
    }

    /// True for methods whose params carry a `callID` and are routed to a
    /// single call rather than handled on the session.
    pub fn is_call_scoped(&self) -> bool {
        matches!(
            self,
            VertoMethod::Invite
                | VertoMethod::Answer
                | VertoMethod::Media
                | VertoMethod::Ringing
                | VertoMethod::Bye
        )
    }
}

impl std::fmt::Display for VertoMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
