// src/client.rs
//! The signaling session.
//!
//! `TelnyxClient` owns the transport, performs the login handshake, polls
//! gateway registration until it is terminal, and routes inbound frames:
//! session-scoped frames mutate session state here, call-scoped frames are
//! fanned out to the matching [`Call`] by `callID`.

use crate::call::{Call, CallRegistry};
use crate::config::{CredentialConfig, TokenConfig, TxServerConfiguration};
use crate::error::ClientError;
use crate::media::{AudioDevice, IceConfig, MediaPlayer, PeerConnectionFactory};
use crate::network::NetworkMonitor;
use crate::socket::consts::{GATEWAY_POLL_INTERVAL, MAX_REG_RETRIES};
use crate::socket::{Transport, TransportEvent, TransportFactory};
use crate::types::{GatewayState, TxEvent};
use crate::verto::{
    InboundMessage, LoginParams, RequestBody, RequestParams, StateParams, UserVariables,
    VertoMethod,
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

const NO_NETWORK_MSG: &str = "No Network Connection";
const GATEWAY_TIMEOUT_MSG: &str = "Gateway registration has timed out";
const PUSH_NOTIFICATION_PROVIDER: &str = "android";

#[derive(Clone)]
enum SavedLogin {
    Credential(CredentialConfig),
    Token(TokenConfig),
}

pub struct TelnyxClient {
    transport_factory: Arc<dyn TransportFactory>,
    peer_factory: Arc<dyn PeerConnectionFactory>,
    media_player: Arc<dyn MediaPlayer>,
    audio: Arc<dyn AudioDevice>,
    network: Arc<dyn NetworkMonitor>,

    events_tx: mpsc::UnboundedSender<TxEvent>,

    transport: StdMutex<Option<Arc<dyn Transport>>>,
    read_task: StdMutex<Option<JoinHandle<()>>>,
    server_config: StdMutex<TxServerConfiguration>,
    saved_login: StdMutex<Option<SavedLogin>>,
    pending_login_id: StdMutex<Option<Uuid>>,
    ringtone: StdMutex<Option<String>>,
    ringback: StdMutex<Option<String>>,

    session_id: StdMutex<Option<String>>,
    gateway_state: StdMutex<GatewayState>,
    gateway_timer: StdMutex<Option<JoinHandle<()>>>,
    retry_counter: AtomicU32,
    waiting_for_reg: AtomicBool,
    logged_in: AtomicBool,
    is_connecting: AtomicBool,

    calls: CallRegistry,

    reconnecting: AtomicBool,
    reconnect_in_flight: AtomicBool,
    network_callback_registered: AtomicBool,
    supervisor_task: StdMutex<Option<JoinHandle<()>>>,
    pending_login_replay: AtomicBool,
}

impl TelnyxClient {
    /// Builds a client and hands back its event stream. Events preserve
    /// emission order; in particular `Login` always precedes `ClientReady`.
    pub fn new(
        transport_factory: Arc<dyn TransportFactory>,
        peer_factory: Arc<dyn PeerConnectionFactory>,
        media_player: Arc<dyn MediaPlayer>,
        audio: Arc<dyn AudioDevice>,
        network: Arc<dyn NetworkMonitor>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<TxEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let client = Arc::new(Self {
            transport_factory,
            peer_factory,
            media_player,
            audio,
            network,
            events_tx,
            transport: StdMutex::new(None),
            read_task: StdMutex::new(None),
            server_config: StdMutex::new(TxServerConfiguration::default()),
            saved_login: StdMutex::new(None),
            pending_login_id: StdMutex::new(None),
            ringtone: StdMutex::new(None),
            ringback: StdMutex::new(None),
            session_id: StdMutex::new(None),
            gateway_state: StdMutex::new(GatewayState::Idle),
            gateway_timer: StdMutex::new(None),
            retry_counter: AtomicU32::new(0),
            waiting_for_reg: AtomicBool::new(false),
            logged_in: AtomicBool::new(false),
            is_connecting: AtomicBool::new(false),
            calls: CallRegistry::new(),
            reconnecting: AtomicBool::new(false),
            reconnect_in_flight: AtomicBool::new(false),
            network_callback_registered: AtomicBool::new(false),
            supervisor_task: StdMutex::new(None),
            pending_login_replay: AtomicBool::new(false),
        });
        (client, events_rx)
    }

    /// Opens the signaling socket. When the reachability probe fails, no
    /// socket is opened and "No Network Connection" is posted.
    pub async fn connect(self: &Arc<Self>, config: TxServerConfiguration) -> Result<(), ClientError> {
        if !self.network.is_available() {
            warn!(target: "Client", "Connect refused: network unavailable");
            self.emit(TxEvent::Error(NO_NETWORK_MSG.to_owned()));
            return Err(ClientError::NetworkUnavailable);
        }
        if self.is_connecting.swap(true, Ordering::SeqCst) {
            warn!(target: "Client", "Connect called while a connect is in progress");
            return Err(ClientError::AlreadyConnecting);
        }
        let _guard = scopeguard::guard((), |_| {
            self.is_connecting.store(false, Ordering::Relaxed);
        });

        *self.server_config.lock().unwrap() = config.clone();
        self.retry_counter.store(0, Ordering::SeqCst);
        self.waiting_for_reg.store(true, Ordering::SeqCst);
        *self.gateway_state.lock().unwrap() = GatewayState::Idle;
        self.ensure_supervisor();

        let (transport, events) = self
            .transport_factory
            .create_transport(&config.host, config.port)
            .await
            .map_err(|e| {
                self.emit(TxEvent::Error(e.to_string()));
                ClientError::Transport(e.to_string())
            })?;
        self.install_transport(transport, events);
        Ok(())
    }

    /// Tears the session down: ends every live call, stops supervision,
    /// destroys the transport, and resets observable state.
    pub async fn disconnect(&self) {
        info!(target: "Client", "Disconnecting client intentionally");
        for call in self.calls.snapshot() {
            call.hangup().await;
        }
        self.unregister_network_callback();
        self.cancel_gateway_timer();
        self.destroy_transport().await;

        self.logged_in.store(false, Ordering::SeqCst);
        self.waiting_for_reg.store(false, Ordering::SeqCst);
        self.retry_counter.store(0, Ordering::SeqCst);
        self.reconnecting.store(false, Ordering::SeqCst);
        self.pending_login_replay.store(false, Ordering::SeqCst);
        *self.session_id.lock().unwrap() = None;
        *self.gateway_state.lock().unwrap() = GatewayState::Idle;
        *self.pending_login_id.lock().unwrap() = None;
    }

    /// Logs in with SIP credentials. The config is remembered so the
    /// supervisor can replay it after a reconnect.
    pub async fn credential_login(&self, config: CredentialConfig) {
        log::set_max_level(config.log_level.to_filter());
        *self.ringtone.lock().unwrap() = config.ringtone.clone();
        *self.ringback.lock().unwrap() = config.ringback.clone();
        *self.saved_login.lock().unwrap() = Some(SavedLogin::Credential(config));
        self.send_login().await;
    }

    /// Logs in with a JWT.
    pub async fn token_login(&self, config: TokenConfig) {
        log::set_max_level(config.log_level.to_filter());
        *self.ringtone.lock().unwrap() = config.ringtone.clone();
        *self.ringback.lock().unwrap() = config.ringback.clone();
        *self.saved_login.lock().unwrap() = Some(SavedLogin::Token(config));
        self.send_login().await;
    }

    async fn send_login(&self) {
        let saved = self.saved_login.lock().unwrap().clone();
        let Some(saved) = saved else {
            return;
        };
        let user_variables = |fcm: &Option<String>| UserVariables {
            push_device_token: fcm.clone().unwrap_or_default(),
            push_notification_provider: PUSH_NOTIFICATION_PROVIDER.to_owned(),
        };
        let params = match &saved {
            SavedLogin::Credential(c) => LoginParams::credential(
                c.sip_user.clone(),
                c.sip_password.clone(),
                user_variables(&c.fcm_token),
            ),
            SavedLogin::Token(t) => {
                LoginParams::token(t.sip_token.clone(), user_variables(&t.fcm_token))
            }
        };
        let body = RequestBody::new(VertoMethod::Login, RequestParams::Login(params));
        *self.pending_login_id.lock().unwrap() = Some(body.id);
        self.send_body(&body).await;
    }

    /// Places an outbound call. Requires a completed login.
    pub async fn new_call(
        self: &Arc<Self>,
        caller_id_name: impl Into<String>,
        caller_id_number: impl Into<String>,
        destination_number: impl Into<String>,
        client_state: impl Into<String>,
    ) -> Result<Arc<Call>, ClientError> {
        let Some(session_id) = self.session_id() else {
            self.emit(TxEvent::Error(ClientError::SessionNotReady.to_string()));
            return Err(ClientError::SessionNotReady);
        };
        let peer = self.peer_factory.create_peer_connection(&self.ice_config())?;
        let call = Call::start_outbound(
            self.handle(),
            peer,
            session_id,
            caller_id_name.into(),
            caller_id_number.into(),
            destination_number.into(),
            client_state.into(),
        )
        .await?;
        self.calls.add(call.clone());
        Ok(call)
    }

    pub async fn accept_call(&self, call_id: Uuid) -> Result<(), ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        call.accept().await;
        Ok(())
    }

    pub async fn end_call(&self, call_id: Uuid) -> Result<(), ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        call.hangup().await;
        Ok(())
    }

    pub async fn dtmf(&self, call_id: Uuid, tone: &str) -> Result<(), ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        call.dtmf(tone).await;
        Ok(())
    }

    pub async fn toggle_hold(&self, call_id: Uuid) -> Result<(), ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        call.toggle_hold().await;
        Ok(())
    }

    pub async fn toggle_mute(&self, call_id: Uuid) -> Result<bool, ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        Ok(call.toggle_mute().await)
    }

    pub fn toggle_loudspeaker(&self, call_id: Uuid) -> Result<bool, ClientError> {
        let call = self.calls.get(call_id).ok_or(ClientError::UnknownCall(call_id))?;
        Ok(call.toggle_loudspeaker())
    }

    pub fn active_call(&self, call_id: Uuid) -> Option<Arc<Call>> {
        self.calls.get(call_id)
    }

    pub fn active_calls(&self) -> Vec<Arc<Call>> {
        self.calls.snapshot()
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().unwrap().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        self.transport
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|t| t.is_open())
    }

    pub fn ongoing_call(&self) -> bool {
        self.calls.ongoing_call()
    }

    pub fn gateway_state(&self) -> GatewayState {
        *self.gateway_state.lock().unwrap()
    }

    // ---- transport plumbing -------------------------------------------------

    fn install_transport(
        self: &Arc<Self>,
        transport: Arc<dyn Transport>,
        events: mpsc::Receiver<TransportEvent>,
    ) {
        *self.transport.lock().unwrap() = Some(transport);
        let mut task = self.read_task.lock().unwrap();
        if let Some(previous) = task.take() {
            previous.abort();
        }
        *task = Some(tokio::spawn(self.clone().run_transport_events(events)));
    }

    async fn run_transport_events(
        self: Arc<Self>,
        mut events: mpsc::Receiver<TransportEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Connected => {
                    info!(target: "Client", "Connection established");
                    self.emit(TxEvent::ConnectionEstablished);
                    if self.pending_login_replay.swap(false, Ordering::SeqCst) {
                        self.send_login().await;
                    }
                }
                TransportEvent::MessageReceived(text) => self.process_message(&text).await,
                TransportEvent::Disconnected { error } => {
                    if let Some(message) = error {
                        self.emit(TxEvent::Error(message));
                    }
                    self.logged_in.store(false, Ordering::SeqCst);
                    info!(target: "Client", "Socket disconnected");
                    break;
                }
            }
        }
    }

    async fn destroy_transport(&self) {
        let transport = self.transport.lock().unwrap().take();
        if let Some(task) = self.read_task.lock().unwrap().take() {
            task.abort();
        }
        if let Some(transport) = transport {
            transport.disconnect().await;
        }
    }

    pub(crate) async fn send_body(&self, body: &RequestBody) {
        let transport = self.transport.lock().unwrap().clone();
        let Some(transport) = transport.filter(|t| t.is_open()) else {
            warn!(target: "Client/Send", "No open socket, dropping {}", body.method);
            return;
        };
        match body.to_json() {
            Ok(json) => {
                if let Err(e) = transport.send_text(&json).await {
                    warn!(target: "Client/Send", "Failed to send {}: {e}", body.method);
                }
            }
            Err(e) => warn!(target: "Client/Send", "Failed to encode {}: {e}", body.method),
        }
    }

    // ---- inbound dispatch ---------------------------------------------------

    async fn process_message(self: &Arc<Self>, text: &str) {
        let msg = match InboundMessage::parse(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(target: "Client/Recv", "Dropping malformed frame: {e}");
                return;
            }
        };

        if let Some(error) = &msg.error {
            warn!(target: "Client/Recv", "Remote error: {}", error.message);
            if self.take_pending_login(&msg) {
                debug!(target: "Client/Recv", "Login request failed");
            }
            self.emit(TxEvent::Error(error.message.clone()));
            return;
        }

        match msg.method() {
            Some(VertoMethod::ClientReady) => self.on_client_ready().await,
            Some(VertoMethod::GatewayState) => {
                self.on_gateway_state_received(&msg).await;
            }
            Some(method) if method.is_call_scoped() => self.route_to_call(method, &msg).await,
            Some(method) => {
                debug!(target: "Client/Recv", "Ignoring server-sent {method}");
            }
            None => self.on_response(&msg),
        }
    }

    fn on_response(&self, msg: &InboundMessage) {
        if let Some(sessid) = msg.login_sessid() {
            if self.take_pending_login(msg) {
                debug!(target: "Client", "Login accepted, sessid {sessid}");
                *self.session_id.lock().unwrap() = Some(sessid);
                return;
            }
        }
        debug!(target: "Client/Recv", "Unmatched response (id {:?})", msg.id_str());
    }

    /// Clears and reports the pending login correlation id when `msg`
    /// answers it.
    fn take_pending_login(&self, msg: &InboundMessage) -> bool {
        let mut pending = self.pending_login_id.lock().unwrap();
        match (&*pending, msg.id_str()) {
            (Some(expected), Some(id)) if expected.to_string() == id => {
                *pending = None;
                true
            }
            _ => false,
        }
    }

    async fn route_to_call(self: &Arc<Self>, method: VertoMethod, msg: &InboundMessage) {
        if method == VertoMethod::Invite {
            self.on_offer_received(msg).await;
            return;
        }
        let Some(call_id) = msg.call_id() else {
            warn!(target: "Client/Recv", "{method} frame without a callID, dropping");
            return;
        };
        let Some(call) = self.calls.get(call_id) else {
            warn!(target: "Client/Recv", "{method} for unknown call {call_id}, dropping");
            self.emit(TxEvent::Error(format!("Unknown call: {call_id}")));
            return;
        };
        match method {
            VertoMethod::Answer => match msg.params_as() {
                Some(params) => call.on_answer_received(params).await,
                None => warn!(target: "Client/Recv", "Malformed answer params for {call_id}"),
            },
            VertoMethod::Media => match msg.params_as() {
                Some(params) => call.on_media_received(params).await,
                None => warn!(target: "Client/Recv", "Malformed media params for {call_id}"),
            },
            VertoMethod::Ringing => match msg.params_as() {
                Some(params) => call.on_ringing_received(params),
                None => warn!(target: "Client/Recv", "Malformed ringing params for {call_id}"),
            },
            VertoMethod::Bye => {
                if let Some(params) = msg.params_as::<crate::verto::ReceivedByeParams>() {
                    if let Some(cause) = params.cause.as_deref() {
                        debug!(
                            target: "Client/Recv",
                            "Bye for {call_id}: {cause} (code {:?})", params.cause_code
                        );
                    }
                }
                call.on_bye_received().await
            }
            _ => unreachable!("non call-scoped method routed to call"),
        }
    }

    async fn on_offer_received(self: &Arc<Self>, msg: &InboundMessage) {
        let Some(offer) = msg.params_as::<crate::verto::OfferParams>() else {
            warn!(target: "Client/Recv", "Malformed invite params, dropping");
            return;
        };
        if self.session_id().is_none() {
            warn!(target: "Client/Recv", "Offer before login completed, dropping");
            self.emit(TxEvent::Error(ClientError::SessionNotReady.to_string()));
            return;
        }
        let peer = match self.peer_factory.create_peer_connection(&self.ice_config()) {
            Ok(peer) => peer,
            Err(e) => {
                self.emit(TxEvent::Error(e.to_string()));
                return;
            }
        };
        match Call::from_offer(self.handle(), peer, offer).await {
            Ok(call) => self.calls.add(call),
            Err(e) => self.emit(TxEvent::Error(e.to_string())),
        }
    }

    // ---- gateway registration ----------------------------------------------

    /// The gateway may not be registered yet when the socket login lands;
    /// poll its state until it turns terminal, re-arming a single timer
    /// between probes.
    async fn on_client_ready(self: &Arc<Self>) {
        if self.gateway_state() == GatewayState::Reged
            || !self.waiting_for_reg.load(Ordering::SeqCst)
        {
            return;
        }
        let body = RequestBody::new(
            VertoMethod::GatewayState,
            RequestParams::State(StateParams { state: None }),
        );
        self.send_body(&body).await;
        self.schedule_gateway_timer();
    }

    fn schedule_gateway_timer(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let mut timer = self.gateway_timer.lock().unwrap();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(tokio::spawn(async move {
            sleep(GATEWAY_POLL_INTERVAL).await;
            if let Some(client) = weak.upgrade() {
                client.on_gateway_timer_fired().await;
            }
        }));
    }

    fn cancel_gateway_timer(&self) {
        if let Some(timer) = self.gateway_timer.lock().unwrap().take() {
            timer.abort();
        }
    }

    async fn on_gateway_timer_fired(self: Arc<Self>) {
        if !self.waiting_for_reg.load(Ordering::SeqCst) {
            return;
        }
        let retries = self.retry_counter.load(Ordering::SeqCst);
        if retries < MAX_REG_RETRIES {
            self.retry_counter.store(retries + 1, Ordering::SeqCst);
            debug!(target: "Client", "Gateway registration retry {}", retries + 1);
            self.on_client_ready().await;
        } else {
            self.waiting_for_reg.store(false, Ordering::SeqCst);
            warn!(target: "Client", "{GATEWAY_TIMEOUT_MSG}");
            self.emit(TxEvent::Error(GATEWAY_TIMEOUT_MSG.to_owned()));
        }
    }

    async fn on_gateway_state_received(self: &Arc<Self>, msg: &InboundMessage) {
        let body = msg.gateway_state();
        let Some(state_str) = body.state.as_deref() else {
            warn!(target: "Client/Recv", "gatewayState frame without a state, dropping");
            return;
        };
        let Some(state) = GatewayState::from_wire(state_str) else {
            warn!(target: "Client/Recv", "Unknown gateway state {state_str:?}, dropping");
            return;
        };
        *self.gateway_state.lock().unwrap() = state;

        match state {
            GatewayState::Reged => {
                self.cancel_gateway_timer();
                self.waiting_for_reg.store(false, Ordering::SeqCst);
                match body.sessid.or_else(|| self.session_id()) {
                    Some(sessid) => self.on_login_successful(sessid),
                    None => warn!(target: "Client", "REGED without a session id"),
                }
            }
            GatewayState::Noreg => {
                self.cancel_gateway_timer();
                self.waiting_for_reg.store(false, Ordering::SeqCst);
                warn!(target: "Client", "{GATEWAY_TIMEOUT_MSG}");
                self.emit(TxEvent::Error(GATEWAY_TIMEOUT_MSG.to_owned()));
            }
            other => {
                debug!(target: "Client", "Gateway state {}", other.as_wire());
            }
        }
    }

    fn on_login_successful(&self, sessid: String) {
        info!(target: "Client", "Logged in, session {sessid}");
        *self.session_id.lock().unwrap() = Some(sessid.clone());
        self.logged_in.store(true, Ordering::SeqCst);
        // Subscribers rely on ClientReady following Login.
        self.emit(TxEvent::Login(sessid));
        self.emit(TxEvent::ClientReady);
    }

    // ---- reconnect supervision ---------------------------------------------

    pub(crate) fn on_network_unavailable(&self) {
        warn!(target: "Client", "Network unavailable");
        self.reconnecting.store(true, Ordering::SeqCst);
        self.emit(TxEvent::Error(NO_NETWORK_MSG.to_owned()));
    }

    pub(crate) async fn on_network_available(self: &Arc<Self>) {
        let has_login = self.saved_login.lock().unwrap().is_some();
        if self.reconnecting.load(Ordering::SeqCst) && has_login {
            self.reconnect().await;
        }
    }

    /// One reconnect pass: fresh transport, old one destroyed, login
    /// replayed once the new socket reports `Connected`. Repeated flaps
    /// collapse into a single in-flight pass.
    async fn reconnect(self: &Arc<Self>) {
        if self.reconnect_in_flight.swap(true, Ordering::SeqCst) {
            return;
        }
        let _guard = scopeguard::guard((), |_| {
            self.reconnect_in_flight.store(false, Ordering::Relaxed);
        });

        let config = self.server_config.lock().unwrap().clone();
        info!(target: "Client", "Reconnecting to {}:{}", config.host, config.port);
        match self
            .transport_factory
            .create_transport(&config.host, config.port)
            .await
        {
            Ok((transport, events)) => {
                self.destroy_transport().await;
                self.retry_counter.store(0, Ordering::SeqCst);
                self.waiting_for_reg.store(true, Ordering::SeqCst);
                *self.gateway_state.lock().unwrap() = GatewayState::Idle;
                self.pending_login_replay.store(true, Ordering::SeqCst);
                self.install_transport(transport, events);
                self.reconnecting.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                // Stay in reconnecting; the next availability event retries.
                warn!(target: "Client", "Reconnect failed: {e}");
                self.emit(TxEvent::Error(e.to_string()));
            }
        }
    }

    fn ensure_supervisor(self: &Arc<Self>) {
        if self.network_callback_registered.swap(true, Ordering::SeqCst) {
            return;
        }
        let handle = crate::network::spawn_supervisor(self);
        *self.supervisor_task.lock().unwrap() = Some(handle);
    }

    fn unregister_network_callback(&self) {
        if self.network_callback_registered.swap(false, Ordering::SeqCst) {
            if let Some(task) = self.supervisor_task.lock().unwrap().take() {
                task.abort();
            }
        }
    }

    // ---- shared plumbing ----------------------------------------------------

    pub(crate) fn network_monitor(&self) -> &Arc<dyn NetworkMonitor> {
        &self.network
    }

    fn ice_config(&self) -> IceConfig {
        let config = self.server_config.lock().unwrap();
        IceConfig {
            turn: config.turn.clone(),
            stun: config.stun.clone(),
        }
    }

    fn handle(self: &Arc<Self>) -> SessionHandle {
        SessionHandle {
            client: Arc::downgrade(self),
        }
    }

    fn emit(&self, event: TxEvent) {
        let _ = self.events_tx.send(event);
    }

    #[cfg(test)]
    fn has_pending_gateway_timer(&self) -> bool {
        self.gateway_timer.lock().unwrap().is_some()
    }
}

/// The narrow, non-owning interface a [`Call`] gets to its session.
///
/// Sends resolve the current transport at call time, so calls keep
/// signaling across a reconnect without holding a socket themselves.
#[derive(Clone)]
pub struct SessionHandle {
    client: Weak<TelnyxClient>,
}

impl SessionHandle {
    pub(crate) async fn send(&self, body: &RequestBody) {
        if let Some(client) = self.client.upgrade() {
            client.send_body(body).await;
        }
    }

    pub(crate) fn session_id(&self) -> Option<String> {
        self.client.upgrade().and_then(|c| c.session_id())
    }

    pub(crate) fn emit(&self, event: TxEvent) {
        if let Some(client) = self.client.upgrade() {
            client.emit(event);
        }
    }

    pub(crate) fn remove_call(&self, call_id: Uuid) {
        if let Some(client) = self.client.upgrade() {
            client.calls.remove(call_id);
        }
    }

    pub(crate) fn play_ringtone(&self) {
        if let Some(client) = self.client.upgrade() {
            if let Some(asset) = client.ringtone.lock().unwrap().clone() {
                client.media_player.play(&asset);
            }
        }
    }

    pub(crate) fn play_ringback(&self) {
        if let Some(client) = self.client.upgrade() {
            if let Some(asset) = client.ringback.lock().unwrap().clone() {
                client.media_player.play(&asset);
            }
        }
    }

    pub(crate) fn stop_media(&self) {
        if let Some(client) = self.client.upgrade() {
            client.media_player.stop();
        }
    }

    pub(crate) fn set_mic_muted(&self, muted: bool) {
        if let Some(client) = self.client.upgrade() {
            client.audio.set_mic_muted(muted);
        }
    }

    pub(crate) fn set_loudspeaker(&self, enabled: bool) {
        if let Some(client) = self.client.upgrade() {
            client.audio.set_loudspeaker(enabled);
        }
    }
}
