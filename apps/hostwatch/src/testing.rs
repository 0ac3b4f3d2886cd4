//! In-memory stand-ins for the chat platform, the console and the prober.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::chat::{ChannelHandle, ChatClient, ChatError, CurrentUser};
use crate::monitoring::{ProbeOutcome, Prober};
use crate::notifier::Console;

#[derive(Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Chat client that knows a fixed set of channels and records every send.
#[derive(Default)]
pub struct RecordingChat {
    channels: Mutex<HashSet<u64>>,
    sent: Mutex<Vec<(u64, String)>>,
    resolve_calls: AtomicUsize,
    fail_sends: AtomicBool,
}

impl RecordingChat {
    pub fn with_channels(ids: &[u64]) -> Self {
        let chat = Self::default();
        chat.channels.lock().unwrap().extend(ids.iter().copied());
        chat
    }

    pub fn user() -> CurrentUser {
        CurrentUser { id: 99, username: "pingbot".into(), discriminator: "1234".into() }
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ChatClient for RecordingChat {
    async fn current_user(&self) -> Result<CurrentUser, ChatError> {
        Ok(Self::user())
    }

    async fn resolve_channel(&self, id: u64) -> Result<Option<ChannelHandle>, ChatError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.channels.lock().unwrap().contains(&id).then(|| ChannelHandle::new(id)))
    }

    async fn send_message(&self, channel: &ChannelHandle, content: &str) -> Result<(), ChatError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ChatError::Status { status: 500, body: "send rejected".into() });
        }
        self.sent.lock().unwrap().push((channel.id, content.to_string()));
        Ok(())
    }
}

/// Prober answering from a per-address table and counting probes.
#[derive(Default)]
pub struct ScriptedProber {
    outcomes: HashMap<String, ProbeOutcome>,
    probes: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn with(mut self, address: &str, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(address.to_string(), outcome);
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        self.probes.lock().unwrap().push(address.to_string());
        self.outcomes
            .get(address)
            .cloned()
            .unwrap_or_else(|| ProbeOutcome::success(1))
    }
}
