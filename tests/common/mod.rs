// Shared test support: scriptable capability providers driven over channels
//
// Tests hold the sending half of each provider's event stream, so chunk and
// recognition timelines are scripted explicitly per scenario. Probes expose
// what the recorder did to each handle.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use voice_memos::capture::{
    CaptureConstraints, CaptureDevice, CaptureError, CaptureEvent, CaptureHandle,
};
use voice_memos::recognition::{
    RecognitionConfig, RecognitionEntry, RecognitionEvent, RecognitionHandle, RecognitionUpdate,
    SpeechEngine,
};
use voice_memos::recorder::{Capabilities, Recorder, RecorderConfig, RecorderSnapshot};

// ============================================================================
// Capture fake
// ============================================================================

/// Observable flags for one fake capture handle
#[derive(Default)]
pub struct CaptureProbe {
    pub stopped: AtomicBool,
    pub released: AtomicBool,
    pub stop_calls: AtomicUsize,
}

impl CaptureProbe {
    pub fn was_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

/// Drives the event stream of one programmed capture session
pub struct CaptureFeed {
    tx: mpsc::Sender<CaptureEvent>,
}

impl CaptureFeed {
    pub async fn chunk(&self, data: &[u8]) {
        let _ = self.tx.send(CaptureEvent::Chunk(data.to_vec())).await;
    }

    pub async fn ended(&self) {
        let _ = self.tx.send(CaptureEvent::StreamEnded).await;
    }
}

struct PreparedCapture {
    rx: mpsc::Receiver<CaptureEvent>,
    probe: Arc<CaptureProbe>,
}

/// Capture device whose acquisitions are programmed per test
pub struct FakeCaptureDevice {
    queue: Mutex<VecDeque<Result<PreparedCapture, CaptureError>>>,
}

impl FakeCaptureDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
        })
    }

    /// Program the next acquisition to succeed; the returned feed drives the
    /// stream and the probe records handle calls
    pub fn prepare_session(&self) -> (CaptureFeed, Arc<CaptureProbe>) {
        let (tx, rx) = mpsc::channel(64);
        let probe = Arc::new(CaptureProbe::default());
        self.queue.lock().unwrap().push_back(Ok(PreparedCapture {
            rx,
            probe: Arc::clone(&probe),
        }));
        (CaptureFeed { tx }, probe)
    }

    /// Program the next acquisition to fail
    pub fn prepare_failure(&self, error: CaptureError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl CaptureDevice for FakeCaptureDevice {
    async fn acquire(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        match self.queue.lock().unwrap().pop_front() {
            Some(Ok(prepared)) => Ok(Box::new(FakeCaptureHandle {
                rx: Some(prepared.rx),
                probe: prepared.probe,
            })),
            Some(Err(e)) => Err(e),
            None => Err(CaptureError::Device("no session programmed".to_string())),
        }
    }

    fn name(&self) -> &str {
        "fake-capture"
    }
}

struct FakeCaptureHandle {
    rx: Option<mpsc::Receiver<CaptureEvent>>,
    probe: Arc<CaptureProbe>,
}

#[async_trait]
impl CaptureHandle for FakeCaptureHandle {
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        self.rx
            .take()
            .ok_or_else(|| CaptureError::Device("capture already started".to_string()))
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.probe.stopped.store(true, Ordering::SeqCst);
        self.probe.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release_tracks(&mut self) {
        self.probe.released.store(true, Ordering::SeqCst);
    }

    fn mime_type(&self) -> &str {
        "audio/wav"
    }
}

// ============================================================================
// Recognition fake
// ============================================================================

/// Observable flags for one fake recognition handle
#[derive(Default)]
pub struct RecognitionProbe {
    pub stop_calls: AtomicUsize,
}

impl RecognitionProbe {
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

/// Drives the event stream of one programmed recognition session
pub struct RecognitionFeed {
    tx: mpsc::Sender<RecognitionEvent>,
}

impl RecognitionFeed {
    pub async fn results(&self, resume_index: usize, entries: &[(bool, &str)]) {
        let update = RecognitionUpdate {
            resume_index,
            entries: entries
                .iter()
                .map(|(is_final, text)| RecognitionEntry {
                    is_final: *is_final,
                    text: (*text).to_string(),
                })
                .collect(),
        };
        let _ = self.tx.send(RecognitionEvent::Results(update)).await;
    }

    pub async fn interim(&self, text: &str) {
        self.results(0, &[(false, text)]).await;
    }

    pub async fn final_result(&self, text: &str) {
        self.results(0, &[(true, text)]).await;
    }

    pub async fn error(&self, code: &str) {
        let _ = self
            .tx
            .send(RecognitionEvent::Error {
                code: code.to_string(),
            })
            .await;
    }

    pub async fn ended(&self) {
        let _ = self.tx.send(RecognitionEvent::Ended).await;
    }
}

struct PreparedRecognition {
    rx: mpsc::Receiver<RecognitionEvent>,
    probe: Arc<RecognitionProbe>,
}

/// Speech engine whose streams are programmed per test
pub struct FakeSpeechEngine {
    queue: Mutex<VecDeque<PreparedRecognition>>,
    created: Mutex<Vec<RecognitionConfig>>,
}

impl FakeSpeechEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn prepare_stream(&self) -> (RecognitionFeed, Arc<RecognitionProbe>) {
        let (tx, rx) = mpsc::channel(64);
        let probe = Arc::new(RecognitionProbe::default());
        self.queue.lock().unwrap().push_back(PreparedRecognition {
            rx,
            probe: Arc::clone(&probe),
        });
        (RecognitionFeed { tx }, probe)
    }

    /// Configs the recorder created streams with, in order
    pub fn created_configs(&self) -> Vec<RecognitionConfig> {
        self.created.lock().unwrap().clone()
    }
}

impl SpeechEngine for FakeSpeechEngine {
    fn create(&self, config: &RecognitionConfig) -> Box<dyn RecognitionHandle> {
        self.created.lock().unwrap().push(config.clone());
        let prepared = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .expect("no recognition stream programmed");
        Box::new(FakeRecognitionHandle {
            rx: Some(prepared.rx),
            probe: prepared.probe,
        })
    }

    fn name(&self) -> &str {
        "fake-speech"
    }
}

struct FakeRecognitionHandle {
    rx: Option<mpsc::Receiver<RecognitionEvent>>,
    probe: Arc<RecognitionProbe>,
}

#[async_trait]
impl RecognitionHandle for FakeRecognitionHandle {
    async fn start(&mut self) -> mpsc::Receiver<RecognitionEvent> {
        self.rx.take().expect("recognition already started")
    }

    async fn stop(&mut self) {
        self.probe.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Recorder wired to fake providers with a short settle delay
pub fn recorder_with(
    capture: &Arc<FakeCaptureDevice>,
    speech: Option<&Arc<FakeSpeechEngine>>,
    settle_delay: Duration,
) -> Recorder {
    Recorder::new(
        Capabilities {
            capture: Arc::clone(capture) as Arc<dyn CaptureDevice>,
            speech: speech.map(|s| Arc::clone(s) as Arc<dyn SpeechEngine>),
        },
        RecorderConfig {
            settle_delay,
            ..RecorderConfig::default()
        },
    )
}

/// Wait until the recorder's snapshot satisfies a predicate
pub async fn wait_for_snapshot(
    recorder: &Recorder,
    predicate: impl Fn(&RecorderSnapshot) -> bool,
) -> RecorderSnapshot {
    let mut rx = recorder.subscribe();
    timeout(Duration::from_secs(2), async {
        loop {
            {
                let snapshot = rx.borrow_and_update().clone();
                if predicate(&snapshot) {
                    return snapshot;
                }
            }
            rx.changed().await.expect("recorder dropped");
        }
    })
    .await
    .expect("snapshot condition not reached in time")
}
