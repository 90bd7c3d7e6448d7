use std::sync::Arc;

use crate::memos::MemoService;
use crate::recorder::Recorder;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<Recorder>,
    pub memos: Arc<MemoService>,
}

impl AppState {
    pub fn new(recorder: Arc<Recorder>, memos: Arc<MemoService>) -> Self {
        Self { recorder, memos }
    }
}
