use uuid::Uuid;

/// The single stream of tagged results the engine emits to its host.
///
/// `Login` is always followed by `ClientReady`; subscribers may rely on
/// `ClientReady` as the readiness signal for placing calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEvent {
    /// The signaling socket is open. The host should issue a login.
    ConnectionEstablished,
    /// Login and gateway registration both succeeded; carries the session id.
    Login(String),
    /// Emitted immediately after `Login`.
    ClientReady,
    /// A remote offer arrived; the host should ring the UI.
    Invite {
        call_id: Uuid,
        sdp: String,
        caller_id_name: String,
        caller_id_number: String,
        telnyx_session_id: Option<Uuid>,
    },
    /// The remote answered one of our calls.
    Answer { call_id: Uuid, sdp: String },
    /// The remote leg is ringing.
    Ringing { call_id: Uuid },
    /// Early media arrived for the call.
    Media { call_id: Uuid },
    /// The call ended, locally or remotely.
    Bye { call_id: Uuid },
    /// A user-visible error. Message text is stable for the documented
    /// failure classes ("No Network Connection", gateway timeout).
    Error(String),
}
