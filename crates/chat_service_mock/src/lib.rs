//! Deterministic in-memory implementation of the `chat_service` contract.
//!
//! This crate contains no transport logic and is intended for local
//! development and integration testing of history synchronization.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chat_service::{ChannelId, ChatService, ChatServiceError, FetchRequest, Message};

#[derive(Debug, Default)]
struct MockState {
    scripted: HashMap<ChannelId, VecDeque<Result<Vec<Message>, ChatServiceError>>>,
    calls: Vec<FetchRequest>,
}

/// Mock chat service replaying scripted responses per channel.
///
/// Each fetch pops the next scripted response for its channel. A channel with
/// nothing scripted yields an empty batch.
#[derive(Debug, Default)]
pub struct MockChatService {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockChatService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artificial latency to every fetch.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a batch (newest first) for the next fetch of `channel_id`.
    pub fn push_batch(&self, channel_id: impl Into<ChannelId>, batch: Vec<Message>) {
        self.lock_state()
            .scripted
            .entry(channel_id.into())
            .or_default()
            .push_back(Ok(batch));
    }

    /// Queues a failure for the next fetch of `channel_id`.
    pub fn push_error(&self, channel_id: impl Into<ChannelId>, error: ChatServiceError) {
        self.lock_state()
            .scripted
            .entry(channel_id.into())
            .or_default()
            .push_back(Err(error));
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<FetchRequest> {
        self.lock_state().calls.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ChatService for MockChatService {
    fn fetch_messages(&self, request: &FetchRequest) -> Result<Vec<Message>, ChatServiceError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let mut state = self.lock_state();
        state.calls.push(request.clone());
        let next = state
            .scripted
            .get_mut(&request.channel_id)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(mut batch)) => {
                batch.truncate(request.limit);
                Ok(batch)
            }
            Some(Err(error)) => Err(error),
            None => Ok(Vec::new()),
        }
    }
}
