/// Development mode guide backend
///
/// When no Gemini key is available, or in tests, use this module to answer
/// guide questions from a script instead of the live endpoint.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::guide::{GuideBackend, GuideRequest};
use crate::model::GuideError;

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    Reply(String),
    Fail,
}

/// Scripted stand-in for the Gemini client.
///
/// Outcomes are consumed in order. Once the script runs out, every call gets
/// a canned reply that echoes the prompt, so `--dev` sessions never stall.
pub struct DevGuide {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
}

impl Default for DevGuide {
    fn default() -> Self {
        Self::new()
    }
}

impl DevGuide {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A backend whose every call fails like an unreachable endpoint.
    pub fn failing(times: usize) -> Self {
        Self::with_script(vec![Scripted::Fail; times])
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_scripted(&self) -> Option<Scripted> {
        self.script.lock().ok().and_then(|mut q| q.pop_front())
    }
}

impl GuideBackend for DevGuide {
    fn generate(&self, request: &GuideRequest) -> Result<String, GuideError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.next_scripted() {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail) => Err(GuideError::Transport("dev mode: scripted failure".to_string())),
            None => Ok(format!("[وضع التطوير] استلمت سؤالك: {}", request.prompt)),
        }
    }
}
