//! Inbound envelope parsing.
//!
//! A response to one of our requests carries `result`; a server-initiated
//! notification carries `method` and `params`. Classification is by the
//! `method` field; typed views of `params` are decoded on demand so a frame
//! with extra fields never fails the whole parse.

use super::method::VertoMethod;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl InboundMessage {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn method(&self) -> Option<VertoMethod> {
        self.method.as_deref().and_then(VertoMethod::from_method_str)
    }

    /// Request/response correlation id, normalized to a string.
    pub fn id_str(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Decodes `params` into a typed view.
    pub fn params_as<T: DeserializeOwned>(&self) -> Option<T> {
        let params = self.params.clone()?;
        serde_json::from_value(params).ok()
    }

    /// The `callID` of a call-scoped frame, wherever the dialect put it.
    pub fn call_id(&self) -> Option<Uuid> {
        let from = |v: &Value| -> Option<Uuid> {
            v.get("callID")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
        };
        self.params.as_ref().and_then(&from).or_else(|| {
            self.result.as_ref().and_then(&from)
        })
    }

    /// Gateway state frames arrive either as `{result: {sessid, params:
    /// {state}}}` or as a bare notification `{params: {state}}`; merge the
    /// two shapes into one view.
    pub fn gateway_state(&self) -> GatewayStateBody {
        let mut body = GatewayStateBody::default();
        for container in [self.result.as_ref(), self.params.as_ref()]
            .into_iter()
            .flatten()
        {
            if body.sessid.is_none() {
                body.sessid = container
                    .get("sessid")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
            }
            let state = container.get("state").or_else(|| {
                container.get("params").and_then(|p| p.get("state"))
            });
            if body.state.is_none() {
                body.state = state.and_then(Value::as_str).map(str::to_owned);
            }
        }
        body
    }

    /// `sessid` from a login success result.
    pub fn login_sessid(&self) -> Option<String> {
        self.result
            .as_ref()?
            .get("sessid")
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayStateBody {
    pub sessid: Option<String>,
    pub state: Option<String>,
}

/// Typed view of an inbound `telnyx_rtc.invite` (remote offer).
#[derive(Debug, Clone, Deserialize)]
pub struct OfferParams {
    #[serde(rename = "callID")]
    pub call_id: Uuid,
    pub sdp: String,
    #[serde(default)]
    pub caller_id_name: String,
    #[serde(default)]
    pub caller_id_number: String,
    #[serde(default)]
    pub telnyx_session_id: Option<Uuid>,
    #[serde(default)]
    pub telnyx_leg_id: Option<Uuid>,
}

/// `telnyx_rtc.answer`: the SDP is absent when early media already
/// delivered one.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerParams {
    #[serde(rename = "callID")]
    pub call_id: Uuid,
    #[serde(default)]
    pub sdp: Option<String>,
}

/// `telnyx_rtc.media`: early-media SDP.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaParams {
    #[serde(rename = "callID")]
    pub call_id: Uuid,
    #[serde(default)]
    pub sdp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RingingParams {
    #[serde(rename = "callID")]
    pub call_id: Uuid,
    #[serde(default)]
    pub telnyx_session_id: Option<Uuid>,
    #[serde(default)]
    pub telnyx_leg_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedByeParams {
    #[serde(rename = "callID")]
    pub call_id: Uuid,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default, rename = "causeCode")]
    pub cause_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_gateway_state_result_shape() {
        let msg = InboundMessage::parse(
            r#"{"jsonrpc":"2.0","id":"1","method":"telnyx_rtc.gatewayState","result":{"sessid":"S1","params":{"state":"REGED"}}}"#,
        )
        .unwrap();
        assert_eq!(msg.method(), Some(VertoMethod::GatewayState));
        let body = msg.gateway_state();
        assert_eq!(body.sessid.as_deref(), Some("S1"));
        assert_eq!(body.state.as_deref(), Some("REGED"));
    }

    #[test]
    fn classifies_gateway_state_notification_shape() {
        let msg = InboundMessage::parse(
            r#"{"jsonrpc":"2.0","method":"telnyx_rtc.gatewayState","params":{"state":"TRYING"}}"#,
        )
        .unwrap();
        let body = msg.gateway_state();
        assert_eq!(body.sessid, None);
        assert_eq!(body.state.as_deref(), Some("TRYING"));
    }

    #[test]
    fn decodes_offer_params() {
        let msg = InboundMessage::parse(
            r#"{"jsonrpc":"2.0","method":"telnyx_rtc.invite","params":{
                "callID":"6c340b0e-9e28-4b10-94a3-2b6b23245d3e",
                "sdp":"v=0...",
                "caller_id_name":"Bob",
                "caller_id_number":"3000",
                "telnyx_session_id":"8e7f2a1c-0000-4000-8000-000000000001",
                "telnyx_leg_id":"8e7f2a1c-0000-4000-8000-000000000002"}}"#,
        )
        .unwrap();
        assert_eq!(msg.method(), Some(VertoMethod::Invite));
        let offer: OfferParams = msg.params_as().unwrap();
        assert_eq!(offer.caller_id_name, "Bob");
        assert_eq!(offer.sdp, "v=0...");
        assert!(offer.telnyx_leg_id.is_some());
        assert_eq!(msg.call_id(), Some(offer.call_id));
    }

    #[test]
    fn answer_without_sdp_decodes() {
        let msg = InboundMessage::parse(
            r#"{"method":"telnyx_rtc.answer","params":{"callID":"6c340b0e-9e28-4b10-94a3-2b6b23245d3e"}}"#,
        )
        .unwrap();
        let answer: AnswerParams = msg.params_as().unwrap();
        assert!(answer.sdp.is_none());
    }

    #[test]
    fn top_level_error_is_exposed() {
        let msg = InboundMessage::parse(
            r#"{"jsonrpc":"2.0","id":"9","error":{"code":-32000,"message":"Authentication Required"}}"#,
        )
        .unwrap();
        let err = msg.error.unwrap();
        assert_eq!(err.code, Some(-32000));
        assert_eq!(err.message, "Authentication Required");
    }

    #[test]
    fn malformed_frame_is_a_parse_error() {
        assert!(InboundMessage::parse("not json").is_err());
    }

    #[test]
    fn login_sessid_from_result() {
        let msg = InboundMessage::parse(
            r#"{"jsonrpc":"2.0","id":"42","result":{"sessid":"S-abc","message":"logged in"}}"#,
        )
        .unwrap();
        assert_eq!(msg.login_sessid().as_deref(), Some("S-abc"));
        assert_eq!(msg.id_str().as_deref(), Some("42"));
    }
}
