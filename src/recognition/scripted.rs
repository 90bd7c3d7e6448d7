use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::engine::{
    RecognitionConfig, RecognitionEntry, RecognitionEvent, RecognitionHandle, RecognitionUpdate,
    SpeechEngine,
};

/// Deterministic speech engine that replays configured utterances
///
/// Each utterance is delivered as a growing word-by-word interim preview and
/// then finalized, matching how live engines re-send the whole in-progress
/// phrase on every update. Lets the full recording pipeline run in
/// environments with no real speech service.
pub struct ScriptedRecognition {
    utterances: Vec<String>,
    step: Duration,
}

impl ScriptedRecognition {
    /// One update per `step`, finals in utterance order
    pub fn new(utterances: Vec<String>, step: Duration) -> Self {
        Self { utterances, step }
    }
}

impl SpeechEngine for ScriptedRecognition {
    fn create(&self, config: &RecognitionConfig) -> Box<dyn RecognitionHandle> {
        Box::new(ScriptedHandle {
            utterances: self.utterances.clone(),
            interim: config.interim_results,
            step: self.step,
            cancel: CancellationToken::new(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedHandle {
    utterances: Vec<String>,
    interim: bool,
    step: Duration,
    cancel: CancellationToken,
}

// Utterances after the first lead with a space so concatenated finals read
// as prose, the same shape live engines give their segments.
fn spaced(index: usize, text: &str) -> String {
    if index == 0 {
        text.to_string()
    } else {
        format!(" {}", text)
    }
}

#[async_trait]
impl RecognitionHandle for ScriptedHandle {
    async fn start(&mut self) -> mpsc::Receiver<RecognitionEvent> {
        let (tx, rx) = mpsc::channel(64);
        let utterances = std::mem::take(&mut self.utterances);
        let interim = self.interim;
        let step = self.step;
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            'script: for (index, utterance) in utterances.into_iter().enumerate() {
                let words: Vec<String> =
                    utterance.split_whitespace().map(str::to_string).collect();

                if interim {
                    for n in 1..words.len() {
                        tokio::select! {
                            _ = cancel.cancelled() => break 'script,
                            _ = tokio::time::sleep(step) => {}
                        }
                        let update = RecognitionUpdate {
                            resume_index: index,
                            entries: vec![RecognitionEntry {
                                is_final: false,
                                text: spaced(index, &words[..n].join(" ")),
                            }],
                        };
                        if tx.send(RecognitionEvent::Results(update)).await.is_err() {
                            return;
                        }
                    }
                }

                tokio::select! {
                    _ = cancel.cancelled() => break 'script,
                    _ = tokio::time::sleep(step) => {}
                }
                let update = RecognitionUpdate {
                    resume_index: index,
                    entries: vec![RecognitionEntry {
                        is_final: true,
                        text: spaced(index, &utterance),
                    }],
                };
                if tx.send(RecognitionEvent::Results(update)).await.is_err() {
                    return;
                }
            }

            debug!("Scripted recognition finished");
            let _ = tx.send(RecognitionEvent::Ended).await;
        });

        rx
    }

    async fn stop(&mut self) {
        self.cancel.cancel();
    }
}
