//! Test doubles for the detector, translator and reply sink seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::detect::Detector;
use crate::platform::ReplySink;
use crate::translate::Translator;

pub struct StubDetector {
    code: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubDetector {
    pub fn returning(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            code: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for StubDetector {
    async fn detect(&self, _text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.code
            .clone()
            .ok_or_else(|| anyhow::anyhow!("stub detector failure"))
    }
}

pub enum StubBehavior {
    Reply(String),
    Fail,
    Panic,
}

pub struct StubTranslator {
    behavior: StubBehavior,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, String, String)>>,
}

impl StubTranslator {
    pub fn replying(text: &str) -> Self {
        Self::new(StubBehavior::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(StubBehavior::Fail)
    }

    pub fn panicking() -> Self {
        Self::new(StubBehavior::Panic)
    }

    fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// (text, source, target) of every call so far
    pub fn requests(&self) -> Vec<(String, String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        self.requests.lock().unwrap().push((
            text.to_string(),
            source.to_string(),
            target.to_string(),
        ));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behavior {
            StubBehavior::Reply(text) => Ok(text.clone()),
            StubBehavior::Fail => anyhow::bail!("stub translator failure"),
            StubBehavior::Panic => panic!("stub translator panic"),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt, then reports a send error.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send_reply(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            anyhow::bail!("stub sink failure");
        }
        Ok(())
    }
}
