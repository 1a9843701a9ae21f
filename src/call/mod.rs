// src/call/mod.rs
//! Per-call state machine.
//!
//! A [`Call`] mediates between the signaling session and one peer
//! connection. It never owns the session: everything it needs from the
//! client side (sending frames, ringtone playback, registry removal) goes
//! through the narrow [`SessionHandle`](crate::client::SessionHandle),
//! which also resolves the current transport at send time so calls survive
//! a reconnect untouched.

mod registry;
mod state;

pub(crate) use registry::CallRegistry;
pub use state::{CallDirection, CallState, CauseCode};

use crate::client::SessionHandle;
use crate::error::ClientError;
use crate::media::{PeerConnection, SdpType};
use crate::socket::consts::ICE_GATHER_DELAY;
use crate::types::TxEvent;
use crate::verto::{
    AnswerParams, ByeDialogParams, ByeParams, CallParams, DialogParams, InfoParams, MediaParams,
    ModifyParams, OfferParams, RequestBody, RequestParams, RingingParams, VertoMethod,
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{watch, Mutex};
use tokio::time::sleep;
use uuid::Uuid;

pub struct Call {
    call_id: Uuid,
    direction: CallDirection,
    session: SessionHandle,
    state_tx: watch::Sender<CallState>,
    peer: Mutex<Option<Box<dyn PeerConnection>>>,

    muted: AtomicBool,
    on_hold: AtomicBool,
    loudspeaker: AtomicBool,
    early_sdp: AtomicBool,

    telnyx_session_id: StdMutex<Option<Uuid>>,
    telnyx_leg_id: StdMutex<Option<Uuid>>,

    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("call_id", &self.call_id)
            .field("direction", &self.direction)
            .field("state", &self.state_tx.borrow())
            .field("muted", &self.muted)
            .field("on_hold", &self.on_hold)
            .field("loudspeaker", &self.loudspeaker)
            .field("early_sdp", &self.early_sdp)
            .field("telnyx_session_id", &self.telnyx_session_id)
            .field("telnyx_leg_id", &self.telnyx_leg_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Call {
    fn new(
        call_id: Uuid,
        direction: CallDirection,
        session: SessionHandle,
        peer: Box<dyn PeerConnection>,
    ) -> Arc<Self> {
        // Every call starts out ringing, whichever direction it goes.
        let (state_tx, _) = watch::channel(CallState::Ringing);
        Arc::new(Self {
            call_id,
            direction,
            session,
            state_tx,
            peer: Mutex::new(Some(peer)),
            muted: AtomicBool::new(false),
            on_hold: AtomicBool::new(false),
            loudspeaker: AtomicBool::new(false),
            early_sdp: AtomicBool::new(false),
            telnyx_session_id: StdMutex::new(None),
            telnyx_leg_id: StdMutex::new(None),
            created_at: Utc::now(),
        })
    }

    /// Places an outbound call.
    ///
    /// The offer is created immediately; the `invite` itself is sent from a
    /// spawned task after the ICE-gather delay so the local description has
    /// candidates in it.
    pub(crate) async fn start_outbound(
        session: SessionHandle,
        peer: Box<dyn PeerConnection>,
        session_id: String,
        caller_id_name: String,
        caller_id_number: String,
        destination_number: String,
        client_state: String,
    ) -> Result<Arc<Self>, ClientError> {
        let call_id = Uuid::new_v4();
        let call = Self::new(call_id, CallDirection::Outbound, session, peer);

        {
            let peer = call.peer.lock().await;
            let peer = peer.as_ref().ok_or(ClientError::NotConnected)?;
            peer.start_local_audio().await?;
            peer.create_offer().await?;
        }

        let invite_task = call.clone();
        tokio::spawn(async move {
            sleep(ICE_GATHER_DELAY).await;
            invite_task
                .send_invite(
                    session_id,
                    caller_id_name,
                    caller_id_number,
                    destination_number,
                    client_state,
                )
                .await;
        });

        Ok(call)
    }

    async fn send_invite(
        &self,
        session_id: String,
        caller_id_name: String,
        caller_id_number: String,
        destination_number: String,
        client_state: String,
    ) {
        if self.state().is_terminal() {
            debug!(target: "Call", "{} ended before the invite was sent", self.call_id);
            return;
        }
        let sdp = match self.local_sdp().await {
            Some(sdp) => sdp,
            None => {
                warn!(target: "Call", "{} has no local SDP after the gather delay, dropping invite", self.call_id);
                return;
            }
        };

        let body = RequestBody::new(
            VertoMethod::Invite,
            RequestParams::Call(CallParams {
                session_id,
                sdp,
                dialog_params: DialogParams::new(
                    caller_id_name,
                    caller_id_number,
                    &client_state,
                    self.call_id,
                    destination_number,
                ),
            }),
        );
        self.session.send(&body).await;
        self.session.play_ringback();
    }

    /// Builds a call from a remote offer.
    pub(crate) async fn from_offer(
        session: SessionHandle,
        peer: Box<dyn PeerConnection>,
        offer: OfferParams,
    ) -> Result<Arc<Self>, ClientError> {
        let call = Self::new(offer.call_id, CallDirection::Inbound, session, peer);
        *call.telnyx_session_id.lock().unwrap() = offer.telnyx_session_id;
        *call.telnyx_leg_id.lock().unwrap() = offer.telnyx_leg_id;

        {
            let peer = call.peer.lock().await;
            let peer = peer.as_ref().ok_or(ClientError::NotConnected)?;
            peer.start_local_audio().await?;
            peer.set_remote_description(SdpType::Offer, &offer.sdp).await?;
            peer.create_answer().await?;
        }

        call.session.emit(TxEvent::Invite {
            call_id: offer.call_id,
            sdp: offer.sdp,
            caller_id_name: offer.caller_id_name,
            caller_id_number: offer.caller_id_number,
            telnyx_session_id: offer.telnyx_session_id,
        });
        call.session.play_ringtone();

        Ok(call)
    }

    /// Answers an inbound call with the local SDP.
    pub async fn accept(&self) {
        let sdp = self.local_sdp().await.unwrap_or_default();
        let body = RequestBody::new(
            VertoMethod::Answer,
            RequestParams::Call(CallParams {
                session_id: self.session.session_id().unwrap_or_default(),
                sdp,
                dialog_params: DialogParams::new(
                    String::new(),
                    String::new(),
                    "",
                    self.call_id,
                    String::new(),
                ),
            }),
        );
        self.session.send(&body).await;
        self.session.stop_media();
        self.set_state(CallState::Active);
    }

    /// Ends the call locally. Teardown matches the inbound-bye path.
    pub async fn hangup(&self) {
        if self.state().is_terminal() {
            return;
        }
        let cause = CauseCode::UserBusy;
        let body = RequestBody::new(
            VertoMethod::Bye,
            RequestParams::Bye(ByeParams {
                session_id: self.session.session_id().unwrap_or_default(),
                cause_code: cause.code(),
                cause_name: cause.name().to_owned(),
                dialog_params: ByeDialogParams {
                    call_id: self.call_id,
                },
            }),
        );
        self.session.send(&body).await;
        self.session.emit(TxEvent::Bye {
            call_id: self.call_id,
        });
        self.teardown().await;
    }

    pub(crate) async fn on_answer_received(&self, params: AnswerParams) {
        match params.sdp {
            Some(sdp) => {
                if let Err(e) = self.set_remote(SdpType::Answer, &sdp).await {
                    warn!(target: "Call", "{} failed to apply remote answer: {e}", self.call_id);
                    self.teardown().await;
                    return;
                }
                self.set_state(CallState::Active);
                self.session.stop_media();
                self.session.emit(TxEvent::Answer {
                    call_id: self.call_id,
                    sdp,
                });
            }
            None if self.early_sdp.load(Ordering::SeqCst) => {
                // Early media already carried the remote SDP.
                self.set_state(CallState::Connecting);
                let sdp = self.local_sdp().await.unwrap_or_default();
                self.session.emit(TxEvent::Answer {
                    call_id: self.call_id,
                    sdp,
                });
            }
            None => {
                warn!(target: "Call", "{} answered with no SDP and no early media", self.call_id);
                self.teardown().await;
            }
        }
    }

    pub(crate) async fn on_media_received(&self, params: MediaParams) {
        match params.sdp {
            Some(sdp) => {
                if let Err(e) = self.set_remote(SdpType::Answer, &sdp).await {
                    warn!(target: "Call", "{} failed to apply early media: {e}", self.call_id);
                    self.teardown().await;
                    return;
                }
                self.early_sdp.store(true, Ordering::SeqCst);
                self.session.emit(TxEvent::Media {
                    call_id: self.call_id,
                });
            }
            None => {
                warn!(target: "Call", "{} media frame without SDP", self.call_id);
                self.teardown().await;
            }
        }
    }

    pub(crate) fn on_ringing_received(&self, params: RingingParams) {
        *self.telnyx_session_id.lock().unwrap() = params.telnyx_session_id;
        *self.telnyx_leg_id.lock().unwrap() = params.telnyx_leg_id;
        self.session.emit(TxEvent::Ringing {
            call_id: self.call_id,
        });
    }

    pub(crate) async fn on_bye_received(&self) {
        self.session.emit(TxEvent::Bye {
            call_id: self.call_id,
        });
        self.teardown().await;
    }

    /// Toggles microphone mute on both the platform route and the captured
    /// track. Returns the new muted state.
    pub async fn toggle_mute(&self) -> bool {
        let muted = !self.muted.load(Ordering::SeqCst);
        self.muted.store(muted, Ordering::SeqCst);
        self.session.set_mic_muted(muted);
        if let Some(peer) = self.peer.lock().await.as_ref() {
            peer.set_mic_enabled(!muted);
        }
        muted
    }

    /// Toggles speakerphone. Returns the new loudspeaker state.
    pub fn toggle_loudspeaker(&self) -> bool {
        let enabled = !self.loudspeaker.load(Ordering::SeqCst);
        self.loudspeaker.store(enabled, Ordering::SeqCst);
        self.session.set_loudspeaker(enabled);
        enabled
    }

    /// Toggles hold and tells the remote via `modify`.
    pub async fn toggle_hold(&self) {
        let holding = !self.on_hold.load(Ordering::SeqCst);
        self.on_hold.store(holding, Ordering::SeqCst);
        self.set_state(if holding {
            CallState::Held
        } else {
            CallState::Active
        });

        let body = RequestBody::new(
            VertoMethod::Modify,
            RequestParams::Modify(ModifyParams {
                session_id: self.session.session_id().unwrap_or_default(),
                action: if holding { "hold" } else { "unhold" }.to_owned(),
                dialog_params: ByeDialogParams {
                    call_id: self.call_id,
                },
            }),
        );
        self.session.send(&body).await;
    }

    /// Sends a DTMF tone. The remote ignores characters outside 0-9, A-D,
    /// `*` and `#`.
    pub async fn dtmf(&self, tone: &str) {
        let body = RequestBody::new(
            VertoMethod::Info,
            RequestParams::Info(InfoParams {
                session_id: self.session.session_id().unwrap_or_default(),
                dtmf: tone.to_owned(),
                dialog_params: ByeDialogParams {
                    call_id: self.call_id,
                },
            }),
        );
        self.session.send(&body).await;
    }

    async fn teardown(&self) {
        if self.state().is_terminal() {
            return;
        }
        self.set_state(CallState::Done);
        self.session.stop_media();
        self.reset_call_options();
        if let Some(peer) = self.peer.lock().await.take() {
            peer.close().await;
        }
        self.session.remove_call(self.call_id);
    }

    fn reset_call_options(&self) {
        if self.muted.swap(false, Ordering::SeqCst) {
            self.session.set_mic_muted(false);
        }
        if self.loudspeaker.swap(false, Ordering::SeqCst) {
            self.session.set_loudspeaker(false);
        }
        self.on_hold.store(false, Ordering::SeqCst);
        self.early_sdp.store(false, Ordering::SeqCst);
    }

    async fn set_remote(&self, kind: SdpType, sdp: &str) -> Result<(), anyhow::Error> {
        let peer = self.peer.lock().await;
        match peer.as_ref() {
            Some(peer) => peer.set_remote_description(kind, sdp).await,
            None => Err(anyhow::anyhow!("peer connection already closed")),
        }
    }

    async fn local_sdp(&self) -> Option<String> {
        let peer = self.peer.lock().await;
        match peer.as_ref() {
            Some(peer) => peer.local_description().await,
            None => None,
        }
    }

    fn set_state(&self, state: CallState) {
        let previous = *self.state_tx.borrow();
        if previous == state {
            return;
        }
        self.state_tx.send_replace(state);
        if state == CallState::Done {
            let duration = Utc::now().signed_duration_since(self.created_at);
            info!(
                target: "Call",
                "{} done after {}s", self.call_id, duration.num_seconds()
            );
        } else {
            debug!(target: "Call", "{} {:?} -> {:?}", self.call_id, previous, state);
        }
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn state(&self) -> CallState {
        *self.state_tx.borrow()
    }

    /// Watch the call state; the receiver sees every transition.
    pub fn subscribe_state(&self) -> watch::Receiver<CallState> {
        self.state_tx.subscribe()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn is_on_hold(&self) -> bool {
        self.on_hold.load(Ordering::SeqCst)
    }

    pub fn is_loudspeaker(&self) -> bool {
        self.loudspeaker.load(Ordering::SeqCst)
    }

    pub fn telnyx_session_id(&self) -> Option<Uuid> {
        *self.telnyx_session_id.lock().unwrap()
    }

    pub fn telnyx_leg_id(&self) -> Option<Uuid> {
        *self.telnyx_leg_id.lock().unwrap()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
