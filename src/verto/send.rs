//! Outgoing request bodies.
//!
//! Field names mirror the Verto wire dialect exactly; the serde renames are
//! the protocol, not style.

use super::method::VertoMethod;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const JSONRPC_VERSION: &str = "2.0";

/// Envelope for every request this client sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub jsonrpc: String,
    pub id: Uuid,
    pub method: VertoMethod,
    pub params: RequestParams,
}

impl RequestBody {
    /// Builds a request with a fresh random id.
    pub fn new(method: VertoMethod, params: RequestParams) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: Uuid::new_v4(),
            method,
            params,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestParams {
    Login(LoginParams),
    Call(CallParams),
    Bye(ByeParams),
    Modify(ModifyParams),
    Info(InfoParams),
    State(StateParams),
}

/// Push metadata attached to the login request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVariables {
    pub push_device_token: String,
    pub push_notification_provider: String,
}

/// Login carries either `login`/`passwd` or a `login_token`, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_token: Option<String>,
    #[serde(rename = "userVariables")]
    pub user_variables: UserVariables,
}

impl LoginParams {
    pub fn credential(
        login: impl Into<String>,
        passwd: impl Into<String>,
        user_variables: UserVariables,
    ) -> Self {
        Self {
            login: Some(login.into()),
            passwd: Some(passwd.into()),
            login_token: None,
            user_variables,
        }
    }

    pub fn token(token: impl Into<String>, user_variables: UserVariables) -> Self {
        Self {
            login: None,
            passwd: None,
            login_token: Some(token.into()),
            user_variables,
        }
    }
}

/// Params for `invite` and `answer`: the SDP plus the dialog description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallParams {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub sdp: String,
    #[serde(rename = "dialogParams")]
    pub dialog_params: DialogParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogParams {
    #[serde(rename = "callerIdName")]
    pub caller_id_name: String,
    #[serde(rename = "callerIdNumber")]
    pub caller_id_number: String,
    /// Opaque host state, base64-encoded on the wire.
    #[serde(rename = "clientState")]
    pub client_state: String,
    #[serde(rename = "callId")]
    pub call_id: Uuid,
    #[serde(rename = "destinationNumber")]
    pub destination_number: String,
}

impl DialogParams {
    pub fn new(
        caller_id_name: impl Into<String>,
        caller_id_number: impl Into<String>,
        client_state: &str,
        call_id: Uuid,
        destination_number: impl Into<String>,
    ) -> Self {
        Self {
            caller_id_name: caller_id_name.into(),
            caller_id_number: caller_id_number.into(),
            client_state: BASE64.encode(client_state),
            call_id,
            destination_number: destination_number.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByeParams {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "causeCode")]
    pub cause_code: i32,
    #[serde(rename = "causeName")]
    pub cause_name: String,
    #[serde(rename = "dialogParams")]
    pub dialog_params: ByeDialogParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByeDialogParams {
    #[serde(rename = "callId")]
    pub call_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyParams {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// `"hold"` or `"unhold"`.
    pub action: String,
    #[serde(rename = "dialogParams")]
    pub dialog_params: ByeDialogParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoParams {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub dtmf: String,
    #[serde(rename = "dialogParams")]
    pub dialog_params: ByeDialogParams,
}

/// Gateway state probe. `state` is serialized as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateParams {
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_round_trips() {
        let body = RequestBody::new(
            VertoMethod::Bye,
            RequestParams::Bye(ByeParams {
                session_id: "sess-1".into(),
                cause_code: 17,
                cause_name: "USER_BUSY".into(),
                dialog_params: ByeDialogParams {
                    call_id: Uuid::new_v4(),
                },
            }),
        );

        let json = body.to_json().unwrap();
        let back: RequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn invite_uses_wire_field_names() {
        let call_id = Uuid::new_v4();
        let body = RequestBody::new(
            VertoMethod::Invite,
            RequestParams::Call(CallParams {
                session_id: "sess-1".into(),
                sdp: "v=0".into(),
                dialog_params: DialogParams::new("Alice", "1000", "stateX", call_id, "2000"),
            }),
        );

        let value: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "telnyx_rtc.invite");
        let dialog = &value["params"]["dialogParams"];
        assert_eq!(dialog["callerIdName"], "Alice");
        assert_eq!(dialog["callerIdNumber"], "1000");
        assert_eq!(dialog["destinationNumber"], "2000");
        assert_eq!(dialog["callId"], call_id.to_string());
        // clientState is carried base64-encoded.
        assert_eq!(dialog["clientState"], "c3RhdGVY");
        assert_eq!(value["params"]["sessionId"], "sess-1");
    }

    #[test]
    fn credential_login_omits_token_field() {
        let params = LoginParams::credential(
            "user",
            "pass",
            UserVariables {
                push_device_token: String::new(),
                push_notification_provider: "android".into(),
            },
        );
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["login"], "user");
        assert_eq!(value["passwd"], "pass");
        assert!(value.get("login_token").is_none());
        assert_eq!(value["userVariables"]["push_notification_provider"], "android");
    }

    #[test]
    fn state_probe_serializes_null() {
        let body = RequestBody::new(
            VertoMethod::GatewayState,
            RequestParams::State(StateParams { state: None }),
        );
        let value: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();
        assert!(value["params"]["state"].is_null());
    }
}
