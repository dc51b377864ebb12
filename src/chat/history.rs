//! Channel message caches and reconciliation of fetched history.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use chat_service::{ChannelId, ChatService, FetchRequest, Message};
use tracing::{debug, info, warn};

use crate::lock_unpoisoned;

enum Take {
    Fetched,
    Existing,
    Both,
}

/// Merges a fetched `batch` (newest first) into `cached` (oldest first).
///
/// Both inputs are walked from their oldest end. Matching ids at the two
/// heads are emitted once; otherwise the earlier timestamp is emitted, with
/// the cached message winning ties. The result is oldest first and holds each
/// id at most once.
pub fn merge_history(cached: &[Message], batch: &[Message]) -> Vec<Message> {
    if batch.is_empty() {
        return cached.to_vec();
    }
    if cached.is_empty() {
        return batch.iter().rev().cloned().collect();
    }

    let mut merged = Vec::with_capacity(cached.len() + batch.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(cached.len() + batch.len());
    let mut fetched = batch.iter().rev().peekable();
    let mut existing = cached.iter().peekable();

    loop {
        let take = match (fetched.peek(), existing.peek()) {
            (None, None) => break,
            (Some(_), None) => Take::Fetched,
            (None, Some(_)) => Take::Existing,
            (Some(new), Some(old)) if new.id == old.id => Take::Both,
            (Some(new), Some(old)) => {
                if new.sort_instant() < old.sort_instant() {
                    Take::Fetched
                } else {
                    Take::Existing
                }
            }
        };

        let next = match take {
            Take::Fetched => fetched.next(),
            Take::Existing => existing.next(),
            Take::Both => {
                existing.next();
                fetched.next()
            }
        };

        if let Some(message) = next {
            if seen.insert(message.id.as_str()) {
                merged.push(message.clone());
            }
        }
    }

    merged
}

/// Oldest-first message sequence for one channel.
pub type SharedChannelCache = Arc<Mutex<Vec<Message>>>;

/// Per-channel caches, each behind its own lock.
///
/// Readers and the merge step take the same channel lock, so a reader never
/// observes a half-rebuilt sequence.
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    channels: Arc<Mutex<HashMap<ChannelId, SharedChannelCache>>>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache for `channel_id`, created empty on first use.
    pub fn channel(&self, channel_id: &str) -> SharedChannelCache {
        let mut channels = lock_unpoisoned(&self.channels);
        Arc::clone(channels.entry(channel_id.to_string()).or_default())
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        lock_unpoisoned(&self.channels).contains_key(channel_id)
    }

    fn lookup(&self, channel_id: &str) -> Option<SharedChannelCache> {
        lock_unpoisoned(&self.channels).get(channel_id).map(Arc::clone)
    }

    /// Runs `f` over the cached messages while holding the channel lock.
    ///
    /// An unknown channel reads as empty and is not created.
    pub fn with_messages<R>(&self, channel_id: &str, f: impl FnOnce(&[Message]) -> R) -> R {
        let Some(cache) = self.lookup(channel_id) else {
            return f(&[]);
        };
        let messages = lock_unpoisoned(&cache);
        f(&messages)
    }

    pub fn snapshot(&self, channel_id: &str) -> Vec<Message> {
        self.with_messages(channel_id, <[Message]>::to_vec)
    }

    /// Merges `batch` into the channel's cache under its lock. Returns the new length.
    pub fn merge_batch(&self, channel_id: &str, batch: &[Message]) -> usize {
        let cache = self.channel(channel_id);
        let mut messages = lock_unpoisoned(&cache);
        let merged = merge_history(&messages, batch);
        *messages = merged;
        messages.len()
    }
}

/// Fetches channel history from the service and merges it into the store.
pub struct HistorySync {
    service: Arc<dyn ChatService>,
    store: ChannelStore,
}

impl HistorySync {
    pub fn new(service: Arc<dyn ChatService>, store: ChannelStore) -> Arc<Self> {
        Arc::new(Self { service, store })
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    /// Fetches one page and merges it. A failed fetch is logged, leaves the
    /// cache untouched and returns false.
    pub fn fetch_and_merge(&self, request: &FetchRequest) -> bool {
        let batch = match self.service.fetch_messages(request) {
            Ok(batch) => batch,
            Err(error) => {
                warn!(channel_id = %request.channel_id, %error, "history fetch failed");
                return false;
            }
        };

        if batch.is_empty() {
            debug!(channel_id = %request.channel_id, "history fetch returned no messages");
            return true;
        }

        let fetched = batch.len();
        let cached = self.store.merge_batch(&request.channel_id, &batch);
        info!(channel_id = %request.channel_id, fetched, cached, "history merged");
        true
    }

    /// Runs [`HistorySync::fetch_and_merge`] on a detached worker thread.
    pub fn spawn_fetch(self: &Arc<Self>, request: FetchRequest) -> io::Result<JoinHandle<()>> {
        let sync = Arc::clone(self);
        thread::Builder::new()
            .name(format!("history-fetch-{}", request.channel_id))
            .spawn(move || {
                sync.fetch_and_merge(&request);
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_service::{ChatServiceError, FetchRequest, Message};
    use chat_service_mock::MockChatService;
    use pretty_assertions::assert_eq;

    use super::{merge_history, ChannelStore, HistorySync};

    fn msg(id: &str, second: u32) -> Message {
        Message::new(id, "c1", format!("2016-01-01T10:00:{second:02}+00:00"))
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn empty_cache_takes_reversed_batch() {
        let batch = vec![msg("m3", 3), msg("m2", 2), msg("m1", 1)];
        assert_eq!(ids(&merge_history(&[], &batch)), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn empty_batch_leaves_cache_unchanged() {
        let cached = vec![msg("m1", 1), msg("m2", 2)];
        assert_eq!(merge_history(&cached, &[]), cached);
    }

    #[test]
    fn interleaves_by_timestamp_and_collapses_duplicates() {
        let cached = vec![msg("a", 1), msg("c", 3), msg("e", 5)];
        let batch = vec![msg("f", 6), msg("e", 5), msg("d", 4), msg("b", 2)];
        let merged = merge_history(&cached, &batch);
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn older_page_is_prepended() {
        let cached = vec![msg("m4", 4), msg("m5", 5)];
        let batch = vec![msg("m3", 3), msg("m2", 2), msg("m1", 1)];
        assert_eq!(
            ids(&merge_history(&cached, &batch)),
            vec!["m1", "m2", "m3", "m4", "m5"]
        );
    }

    #[test]
    fn equal_timestamps_emit_cached_first() {
        let cached = vec![msg("old", 1)];
        let batch = vec![msg("new", 1)];
        assert_eq!(ids(&merge_history(&cached, &batch)), vec!["old", "new"]);
    }

    #[test]
    fn merge_is_idempotent_for_same_batch() {
        let cached = vec![msg("a", 1), msg("c", 3), msg("x", 9)];
        let batch = vec![msg("d", 4), msg("c", 3), msg("b", 2)];
        let once = merge_history(&cached, &batch);
        let twice = merge_history(&once, &batch);
        assert_eq!(once, twice);
    }

    #[test]
    fn misaligned_duplicates_are_still_collapsed() {
        let cached = vec![msg("a", 1), msg("b", 1)];
        let batch = vec![msg("a", 1), msg("b", 1)];
        let merged = merge_history(&cached, &batch);
        let mut sorted = ids(&merged);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b"]);
    }

    #[test]
    fn store_merges_under_channel_lock_and_snapshots() {
        let store = ChannelStore::new();
        assert!(!store.contains("c1"));
        assert_eq!(store.merge_batch("c1", &[msg("m2", 2), msg("m1", 1)]), 2);
        assert!(store.contains("c1"));
        assert_eq!(store.merge_batch("c1", &[msg("m3", 3), msg("m2", 2)]), 3);
        assert_eq!(ids(&store.snapshot("c1")), vec!["m1", "m2", "m3"]);
        assert_eq!(store.with_messages("c1", <[Message]>::len), 3);
    }

    #[test]
    fn reading_an_unknown_channel_does_not_create_it() {
        let store = ChannelStore::new();
        assert!(store.snapshot("ghost").is_empty());
        assert_eq!(store.with_messages("ghost", <[Message]>::len), 0);
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn failed_fetch_leaves_cache_unchanged() {
        let service = Arc::new(MockChatService::new());
        service.push_error("c1", ChatServiceError::transport("c1", "timeout"));
        let store = ChannelStore::new();
        store.merge_batch("c1", &[msg("m1", 1)]);

        let sync = HistorySync::new(service, store.clone());
        assert!(!sync.fetch_and_merge(&FetchRequest::latest("c1", 50)));
        assert_eq!(ids(&store.snapshot("c1")), vec!["m1"]);
    }

    #[test]
    fn spawned_fetch_merges_in_background() {
        let service = Arc::new(MockChatService::new());
        service.push_batch("c1", vec![msg("m2", 2), msg("m1", 1)]);
        let sync = HistorySync::new(service.clone(), ChannelStore::new());

        let handle = sync
            .spawn_fetch(FetchRequest::latest("c1", 50))
            .expect("worker should spawn");
        handle.join().expect("worker should not panic");

        assert_eq!(ids(&sync.store().snapshot("c1")), vec!["m1", "m2"]);
        assert_eq!(service.calls(), vec![FetchRequest::latest("c1", 50)]);
    }
}
