// src/verto/mod.rs
pub mod method;
pub mod receive;
pub mod send;

pub use method::VertoMethod;
pub use receive::{
    AnswerParams, GatewayStateBody, InboundMessage, MediaParams, OfferParams, ReceivedByeParams,
    RingingParams, RpcError,
};
pub use send::{
    ByeDialogParams, ByeParams, CallParams, DialogParams, InfoParams, LoginParams, ModifyParams,
    RequestBody, RequestParams, StateParams, UserVariables,
};
