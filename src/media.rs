//! Platform seams supplied by the host.
//!
//! The engine drives signaling only. SDP generation, ICE, audio capture and
//! routing, and ringtone playback all live behind these traits; the host
//! wires in its WebRTC engine and OS audio the same way a transport factory
//! is wired in.

use async_trait::async_trait;

/// Which side of the offer/answer exchange a remote description is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpType {
    Offer,
    Answer,
}

/// ICE servers handed to the peer engine at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceConfig {
    pub turn: String,
    pub stun: String,
}

/// One WebRTC peer connection, owned by a single call.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Starts local audio capture and attaches it to the connection.
    async fn start_local_audio(&self) -> Result<(), anyhow::Error>;

    /// Kicks off local offer generation. The result lands in
    /// [`local_description`](Self::local_description) once ICE gathering
    /// has produced candidates.
    async fn create_offer(&self) -> Result<(), anyhow::Error>;

    /// Kicks off local answer generation against the current remote offer.
    async fn create_answer(&self) -> Result<(), anyhow::Error>;

    async fn set_remote_description(&self, kind: SdpType, sdp: &str) -> Result<(), anyhow::Error>;

    /// The current local SDP, if generation has completed.
    async fn local_description(&self) -> Option<String>;

    /// Mutes or unmutes the captured microphone track.
    fn set_mic_enabled(&self, enabled: bool);

    /// Tears the connection down. Idempotent.
    async fn close(&self);
}

/// Builds peer connections for new calls.
pub trait PeerConnectionFactory: Send + Sync {
    fn create_peer_connection(
        &self,
        ice: &IceConfig,
    ) -> Result<Box<dyn PeerConnection>, anyhow::Error>;
}

/// Thin wrapper over the host's media player for ringtone/ringback assets.
pub trait MediaPlayer: Send + Sync {
    /// Starts looping playback of a host-resolvable asset.
    fn play(&self, media: &str);
    fn stop(&self);
}

/// OS audio routing: microphone mute and speakerphone.
pub trait AudioDevice: Send + Sync {
    fn set_mic_muted(&self, muted: bool);
    fn set_loudspeaker(&self, enabled: bool);
}

/// A media player for hosts without ringtone support.
#[derive(Default)]
pub struct NoopMediaPlayer;

impl MediaPlayer for NoopMediaPlayer {
    fn play(&self, _media: &str) {}
    fn stop(&self) {}
}

/// An audio device for hosts that route audio elsewhere.
#[derive(Default)]
pub struct NoopAudioDevice;

impl AudioDevice for NoopAudioDevice {
    fn set_mic_muted(&self, _muted: bool) {}
    fn set_loudspeaker(&self, _enabled: bool) {}
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Peer connection stub that serves canned SDP and records operations.
    pub struct MockPeerConnection {
        pub local_sdp: &'static str,
        local_ready: AtomicBool,
        pub remote: Mutex<Vec<(SdpType, String)>>,
        pub mic_enabled: AtomicBool,
        pub closed: AtomicBool,
    }

    impl MockPeerConnection {
        pub fn new(local_sdp: &'static str) -> Self {
            Self {
                local_sdp,
                local_ready: AtomicBool::new(false),
                remote: Mutex::new(Vec::new()),
                mic_enabled: AtomicBool::new(true),
                closed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl PeerConnection for MockPeerConnection {
        async fn start_local_audio(&self) -> Result<(), anyhow::Error> {
            Ok(())
        }

        async fn create_offer(&self) -> Result<(), anyhow::Error> {
            self.local_ready.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn create_answer(&self) -> Result<(), anyhow::Error> {
            self.local_ready.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn set_remote_description(
            &self,
            kind: SdpType,
            sdp: &str,
        ) -> Result<(), anyhow::Error> {
            self.remote.lock().unwrap().push((kind, sdp.to_owned()));
            Ok(())
        }

        async fn local_description(&self) -> Option<String> {
            self.local_ready
                .load(Ordering::SeqCst)
                .then(|| self.local_sdp.to_owned())
        }

        fn set_mic_enabled(&self, enabled: bool) {
            self.mic_enabled.store(enabled, Ordering::SeqCst);
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    pub struct MockPeerFactory {
        pub ice_seen: Mutex<Vec<IceConfig>>,
    }

    impl PeerConnectionFactory for MockPeerFactory {
        fn create_peer_connection(
            &self,
            ice: &IceConfig,
        ) -> Result<Box<dyn PeerConnection>, anyhow::Error> {
            self.ice_seen.lock().unwrap().push(ice.clone());
            Ok(Box::new(MockPeerConnection::new(
                "v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\ns=mock\r\n",
            )))
        }
    }

    /// Records play/stop calls so tests can assert ringtone behaviour.
    #[derive(Default)]
    pub struct RecordingMediaPlayer {
        pub played: Mutex<Vec<String>>,
        pub stops: AtomicBool,
    }

    impl MediaPlayer for RecordingMediaPlayer {
        fn play(&self, media: &str) {
            self.played.lock().unwrap().push(media.to_owned());
        }

        fn stop(&self) {
            self.stops.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    pub struct RecordingAudioDevice {
        pub mic_muted: AtomicBool,
        pub loudspeaker: AtomicBool,
    }

    impl AudioDevice for RecordingAudioDevice {
        fn set_mic_muted(&self, muted: bool) {
            self.mic_muted.store(muted, Ordering::SeqCst);
        }

        fn set_loudspeaker(&self, enabled: bool) {
            self.loudspeaker.store(enabled, Ordering::SeqCst);
        }
    }
}
