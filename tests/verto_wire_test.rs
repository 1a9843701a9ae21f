//! Wire-level checks of the Verto codec through the public API: what we
//! send must parse back structurally equal, and realistic inbound frames
//! must classify and decode.

use telnyx_rtc::verto::{
    AnswerParams, ByeDialogParams, ByeParams, CallParams, DialogParams, InboundMessage,
    InfoParams, LoginParams, ModifyParams, OfferParams, RequestBody, RequestParams, StateParams,
    UserVariables, VertoMethod,
};
use uuid::Uuid;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn user_variables() -> UserVariables {
    UserVariables {
        push_device_token: "fcm-token".into(),
        push_notification_provider: "android".into(),
    }
}

#[test]
fn outgoing_bodies_survive_encode_then_decode() {
    init();
    let call_id = Uuid::new_v4();
    let bodies = vec![
        RequestBody::new(
            VertoMethod::Login,
            RequestParams::Login(LoginParams::credential("user", "pass", user_variables())),
        ),
        RequestBody::new(
            VertoMethod::Login,
            RequestParams::Login(LoginParams::token("jwt", user_variables())),
        ),
        RequestBody::new(
            VertoMethod::Invite,
            RequestParams::Call(CallParams {
                session_id: "S1".into(),
                sdp: "v=0\r\n".into(),
                dialog_params: DialogParams::new("Alice", "1000", "stateX", call_id, "2000"),
            }),
        ),
        RequestBody::new(
            VertoMethod::Bye,
            RequestParams::Bye(ByeParams {
                session_id: "S1".into(),
                cause_code: 17,
                cause_name: "USER_BUSY".into(),
                dialog_params: ByeDialogParams { call_id },
            }),
        ),
        RequestBody::new(
            VertoMethod::Modify,
            RequestParams::Modify(ModifyParams {
                session_id: "S1".into(),
                action: "hold".into(),
                dialog_params: ByeDialogParams { call_id },
            }),
        ),
        RequestBody::new(
            VertoMethod::Info,
            RequestParams::Info(InfoParams {
                session_id: "S1".into(),
                dtmf: "#".into(),
                dialog_params: ByeDialogParams { call_id },
            }),
        ),
        RequestBody::new(
            VertoMethod::GatewayState,
            RequestParams::State(StateParams { state: None }),
        ),
    ];

    for body in bodies {
        let json = body.to_json().unwrap();
        let back: RequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body, "round-trip mismatch for {}", body.method);
    }
}

#[test]
fn every_sent_frame_is_a_valid_inbound_envelope() {
    init();
    // The server echoes our request ids; our own frames must at least
    // parse under the inbound envelope so correlation can work.
    let body = RequestBody::new(
        VertoMethod::GatewayState,
        RequestParams::State(StateParams { state: None }),
    );
    let msg = InboundMessage::parse(&body.to_json().unwrap()).unwrap();
    assert_eq!(msg.method(), Some(VertoMethod::GatewayState));
    assert_eq!(msg.id_str().as_deref(), Some(body.id.to_string().as_str()));
}

#[test]
fn inbound_offer_and_answer_decode_from_realistic_frames() {
    init();
    let offer = InboundMessage::parse(
        r#"{
            "jsonrpc": "2.0",
            "id": "b3a1",
            "method": "telnyx_rtc.invite",
            "params": {
                "callID": "5b8f9f3e-7d35-4a9c-b7a8-1a2b3c4d5e6f",
                "sdp": "v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\n",
                "caller_id_name": "Bob",
                "caller_id_number": "+15550003000",
                "telnyx_session_id": "d3b0e9a0-0000-4000-8000-00000000aaaa",
                "telnyx_leg_id": "d3b0e9a0-0000-4000-8000-00000000bbbb"
            }
        }"#,
    )
    .unwrap();
    assert_eq!(offer.method(), Some(VertoMethod::Invite));
    let params: OfferParams = offer.params_as().unwrap();
    assert_eq!(params.caller_id_number, "+15550003000");
    assert_eq!(offer.call_id(), Some(params.call_id));

    let answer = InboundMessage::parse(
        r#"{"jsonrpc":"2.0","method":"telnyx_rtc.answer","params":{"callID":"5b8f9f3e-7d35-4a9c-b7a8-1a2b3c4d5e6f","sdp":"v=0"}}"#,
    )
    .unwrap();
    let params: AnswerParams = answer.params_as().unwrap();
    assert_eq!(params.sdp.as_deref(), Some("v=0"));
}

#[test]
fn gateway_state_decodes_from_both_wire_shapes() {
    init();
    let result_shape = InboundMessage::parse(
        r#"{"jsonrpc":"2.0","id":"1","method":"telnyx_rtc.gatewayState","result":{"sessid":"S1","params":{"state":"REGED"}}}"#,
    )
    .unwrap()
    .gateway_state();
    assert_eq!(result_shape.sessid.as_deref(), Some("S1"));
    assert_eq!(result_shape.state.as_deref(), Some("REGED"));

    let notification_shape = InboundMessage::parse(
        r#"{"jsonrpc":"2.0","method":"telnyx_rtc.gatewayState","params":{"state":"FAIL_WAIT"}}"#,
    )
    .unwrap()
    .gateway_state();
    assert_eq!(notification_shape.state.as_deref(), Some("FAIL_WAIT"));
}
