//! Registry of channels the client is listening to.

use std::sync::Arc;
use std::thread::JoinHandle;

use chat_service::{ChannelId, FetchRequest};
use tracing::{debug, warn};

use crate::chat::history::HistorySync;

/// Result of [`ListeningChannels::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Set of listened channel ids.
///
/// Adding a channel schedules an initial history fetch on a worker thread.
/// `add`/`remove`/`toggle` never block on the network. In-flight fetches are
/// not cancelled when a channel is removed; their results still land in the
/// channel's cache.
pub struct ListeningChannels {
    channels: Vec<ChannelId>,
    history: Arc<HistorySync>,
    fetch_limit: usize,
    pending: Vec<JoinHandle<()>>,
}

impl ListeningChannels {
    pub fn new(history: Arc<HistorySync>, fetch_limit: usize) -> Self {
        Self {
            channels: Vec::new(),
            history,
            fetch_limit,
            pending: Vec::new(),
        }
    }

    /// Returns false if `channel_id` was already present.
    pub fn add(&mut self, channel_id: &str) -> bool {
        if self.contains(channel_id) {
            return false;
        }
        self.channels.push(channel_id.to_string());
        debug!(channel_id, "listening to channel");

        self.schedule(FetchRequest::latest(channel_id, self.fetch_limit));
        true
    }

    /// Runs `request` on a worker thread tracked by [`Self::join_pending_fetches`].
    ///
    /// Returns false if the worker could not be spawned.
    pub fn schedule(&mut self, request: FetchRequest) -> bool {
        let channel_id = request.channel_id.clone();
        match self.history.spawn_fetch(request) {
            Ok(handle) => {
                self.pending.retain(|handle| !handle.is_finished());
                self.pending.push(handle);
                true
            }
            Err(error) => {
                warn!(%channel_id, %error, "failed to spawn history fetch");
                false
            }
        }
    }

    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }

    /// Returns whether `channel_id` was present. Remaining ids keep their order.
    pub fn remove(&mut self, channel_id: &str) -> bool {
        let Some(index) = self.channels.iter().position(|id| id == channel_id) else {
            return false;
        };
        self.channels.remove(index);
        debug!(channel_id, "stopped listening to channel");
        true
    }

    pub fn toggle(&mut self, channel_id: &str) -> Toggled {
        if self.add(channel_id) {
            Toggled::Added
        } else {
            self.remove(channel_id);
            Toggled::Removed
        }
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.channels.iter().any(|id| id == channel_id)
    }

    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn history(&self) -> &Arc<HistorySync> {
        &self.history
    }

    /// Blocks until every scheduled fetch has finished.
    pub fn join_pending_fetches(&mut self) {
        for handle in self.pending.drain(..) {
            if handle.join().is_err() {
                warn!("history fetch worker panicked");
            }
        }
    }
}
