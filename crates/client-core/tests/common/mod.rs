//! Shared mock boundary implementations for integration tests
//!
//! Every external collaborator (credential endpoint, transport provider,
//! capture device, noise filter, audio output) gets a mock with call
//! counters and failure injection flags so tests can assert exactly which
//! boundary calls happened.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, mpsc};

use clearcall_client_core::audio::capture::{AudioCaptureDevice, MicrophoneSource};
use clearcall_client_core::audio::CaptureConstraints;
use clearcall_client_core::audio::pipeline::LocalTrackHandle;
use clearcall_client_core::credential::{Credential, CredentialProvider};
use clearcall_client_core::error::{ClientError, ClientResult};
use clearcall_client_core::events::ClientEvent;
use clearcall_client_core::filter::{FilterOptions, NoiseFilter, NoiseFilterFactory, SuppressionLevel};
use clearcall_client_core::participants::RemoteParticipant;
use clearcall_client_core::playback::{AudioOutput, AudioOutputFactory};
use clearcall_client_core::transport::{
    RemoteAudioStream, RemotePeer, RoomConnection, RoomTransport, TransportEvent, TransportEvents,
};
use clearcall_client_core::{CallClient, ClientConfig};

pub const LOCAL_IDENTITY: &str = "local-user";
pub const ROOM_NAME: &str = "test-room";

// ===== credential endpoint =====

#[derive(Debug, Default)]
pub struct MockCredentials {
    pub fetches: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    async fn fetch_credential(&self) -> ClientResult<Credential> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::credential("credential endpoint offline"));
        }
        Ok(Credential {
            token: "test-token".to_string(),
            participant_name: LOCAL_IDENTITY.to_string(),
            room_name: ROOM_NAME.to_string(),
            issued_at: Utc::now(),
        })
    }
}

// ===== transport provider =====

#[derive(Debug, Default)]
pub struct MockRoomState {
    pub peers: Mutex<Vec<RemotePeer>>,
    pub mic_calls: AtomicUsize,
    pub fail_mic: AtomicBool,
    pub fail_publish: AtomicBool,
    pub fail_close: AtomicBool,
    pub published: AtomicBool,
    pub closes: AtomicUsize,
    pub event_tx: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
    /// Events injected while `publish_track` runs, to prove subscription
    /// wiring is in place before publication completes
    pub publish_emits: Mutex<Vec<TransportEvent>>,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub connects: AtomicUsize,
    pub fail_connect: AtomicBool,
    pub state: Arc<MockRoomState>,
}

impl MockTransport {
    pub fn set_peers(&self, peers: Vec<RemotePeer>) {
        *self.state.peers.lock().unwrap() = peers;
    }

    /// Deliver a transport event to the connected session
    pub fn push_event(&self, event: TransportEvent) {
        let guard = self.state.event_tx.lock().unwrap();
        let tx = guard.as_ref().expect("no session connected");
        tx.send(event).expect("event receiver dropped");
    }
}

#[async_trait]
impl RoomTransport for MockTransport {
    async fn connect(
        &self,
        _url: &str,
        _token: &str,
    ) -> ClientResult<(Box<dyn RoomConnection>, TransportEvents)> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(ClientError::transport_connect("connection refused"));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.state.event_tx.lock().unwrap() = Some(tx);
        let connection = MockConnection {
            state: Arc::clone(&self.state),
        };
        Ok((Box::new(connection), rx))
    }
}

#[derive(Debug)]
struct MockConnection {
    state: Arc<MockRoomState>,
}

#[async_trait]
impl RoomConnection for MockConnection {
    fn local_identity(&self) -> String {
        LOCAL_IDENTITY.to_string()
    }

    fn room_name(&self) -> String {
        ROOM_NAME.to_string()
    }

    async fn publish_track(&self, _track: &LocalTrackHandle) -> ClientResult<()> {
        if self.state.fail_publish.load(Ordering::SeqCst) {
            return Err(ClientError::publish("track rejected by server"));
        }
        let queued: Vec<TransportEvent> = self.state.publish_emits.lock().unwrap().drain(..).collect();
        if !queued.is_empty() {
            let guard = self.state.event_tx.lock().unwrap();
            let tx = guard.as_ref().expect("events not wired before publish");
            for event in queued {
                tx.send(event).expect("event receiver dropped before publish");
            }
        }
        self.state.published.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn set_microphone_enabled(&self, _enabled: bool) -> ClientResult<()> {
        self.state.mic_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_mic.load(Ordering::SeqCst) {
            return Err(ClientError::internal("transport rejected microphone change"));
        }
        Ok(())
    }

    fn remote_peers(&self) -> Vec<RemotePeer> {
        self.state.peers.lock().unwrap().clone()
    }

    async fn close(&self) -> ClientResult<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(ClientError::internal("close failed"));
        }
        Ok(())
    }
}

// ===== microphone capture =====

#[derive(Debug, Default)]
pub struct MockCapture {
    pub opens: AtomicUsize,
    pub fail: AtomicBool,
    pub stops: Arc<AtomicUsize>,
    pub fail_stop: Arc<AtomicBool>,
}

#[derive(Debug)]
struct MockMicrophone {
    stops: Arc<AtomicUsize>,
    fail_stop: Arc<AtomicBool>,
}

#[async_trait]
impl MicrophoneSource for MockMicrophone {
    fn id(&self) -> &str {
        "mock-mic"
    }

    async fn stop(&self) -> ClientResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(ClientError::internal("capture stop failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioCaptureDevice for MockCapture {
    async fn open(&self, _constraints: &CaptureConstraints) -> ClientResult<Box<dyn MicrophoneSource>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::device("microphone permission denied"));
        }
        Ok(Box::new(MockMicrophone {
            stops: Arc::clone(&self.stops),
            fail_stop: Arc::clone(&self.fail_stop),
        }))
    }
}

// ===== noise filter =====

#[derive(Debug, Default)]
pub struct MockFilterFactory {
    pub creates: AtomicUsize,
    pub fail: AtomicBool,
    /// Every intensity value any created filter observed, in order
    pub levels: Arc<Mutex<Vec<u8>>>,
    pub destroys: Arc<AtomicUsize>,
    pub fail_destroy: Arc<AtomicBool>,
}

#[derive(Debug)]
struct MockFilter {
    levels: Arc<Mutex<Vec<u8>>>,
    destroys: Arc<AtomicUsize>,
    fail_destroy: Arc<AtomicBool>,
}

#[async_trait]
impl NoiseFilter for MockFilter {
    fn set_suppression_level(&self, level: SuppressionLevel) {
        self.levels.lock().unwrap().push(level.value());
    }

    async fn destroy(&self) -> ClientResult<()> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(ClientError::internal("filter worklet teardown failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl NoiseFilterFactory for MockFilterFactory {
    async fn create(&self, _options: FilterOptions) -> ClientResult<Box<dyn NoiseFilter>> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::internal("filter construction failed"));
        }
        Ok(Box::new(MockFilter {
            levels: Arc::clone(&self.levels),
            destroys: Arc::clone(&self.destroys),
            fail_destroy: Arc::clone(&self.fail_destroy),
        }))
    }
}

// ===== audio output =====

#[derive(Debug, Default)]
pub struct MockOutputFactory {
    pub creates: AtomicUsize,
    pub fail: AtomicBool,
    /// Stream ids bound to any created output, in order
    pub streams: Arc<Mutex<Vec<String>>>,
    pub closes: Arc<AtomicUsize>,
    pub fail_close: Arc<AtomicBool>,
}

#[derive(Debug)]
struct MockOutput {
    streams: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
    fail_close: Arc<AtomicBool>,
}

#[async_trait]
impl AudioOutput for MockOutput {
    async fn play(&self, stream: &RemoteAudioStream) -> ClientResult<()> {
        self.streams.lock().unwrap().push(stream.id.clone());
        Ok(())
    }

    async fn close(&self) -> ClientResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(ClientError::internal("output removal failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioOutputFactory for MockOutputFactory {
    async fn create(&self) -> ClientResult<Box<dyn AudioOutput>> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::internal("output allocation failed"));
        }
        Ok(Box::new(MockOutput {
            streams: Arc::clone(&self.streams),
            closes: Arc::clone(&self.closes),
            fail_close: Arc::clone(&self.fail_close),
        }))
    }
}

// ===== harness =====

pub struct TestHarness {
    pub credentials: Arc<MockCredentials>,
    pub transport: Arc<MockTransport>,
    pub capture: Arc<MockCapture>,
    pub filters: Arc<MockFilterFactory>,
    pub outputs: Arc<MockOutputFactory>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            credentials: Arc::new(MockCredentials::default()),
            transport: Arc::new(MockTransport::default()),
            capture: Arc::new(MockCapture::default()),
            filters: Arc::new(MockFilterFactory::default()),
            outputs: Arc::new(MockOutputFactory::default()),
        }
    }

    pub fn client(&self) -> CallClient {
        self.client_with_config(ClientConfig::new())
    }

    pub fn client_with_config(&self, config: ClientConfig) -> CallClient {
        CallClient::new(
            config,
            self.credentials.clone() as Arc<_>,
            self.transport.clone() as Arc<_>,
            self.capture.clone() as Arc<_>,
            self.filters.clone() as Arc<_>,
            self.outputs.clone() as Arc<_>,
        )
    }
}

pub fn peer(identity: &str, is_speaking: bool, audio_level: f32) -> RemotePeer {
    RemotePeer {
        identity: identity.to_string(),
        is_speaking,
        audio_level,
    }
}

/// Wait for the next roster broadcast, skipping unrelated events
pub async fn next_roster(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<RemoteParticipant> {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(ClientEvent::ParticipantsChanged { participants }) => return participants,
                Ok(_) => continue,
                Err(e) => panic!("event channel closed: {}", e),
            }
        }
    })
    .await
    .expect("timed out waiting for roster event")
}

/// Poll until the condition holds or a short deadline passes
pub async fn wait_until(description: &str, condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within deadline: {}", description);
}
