//! Per-process client state, created at startup and dropped at teardown.

use std::sync::Arc;

use chat_service::{ChatService, FetchRequest, Message};
use tracing::{debug, info};

use crate::chat::{ChannelStore, HistorySync, ListeningChannels};
use crate::command::{CommandDispatcher, CommandExecWindow, CommandRegistry};
use crate::config::EnvConfig;
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{default_keybindings_handle, KeybindingsHandle};
use crate::widgets::{ChannelList, ChannelListOutcome, TextInput};

pub struct Session {
    config: EnvConfig,
    keybindings: KeybindingsHandle,
    listening: ListeningChannels,
    store: ChannelStore,
    commands: CommandRegistry,
}

impl Session {
    pub fn new(config: EnvConfig, service: Arc<dyn ChatService>) -> Self {
        let store = ChannelStore::new();
        let history = HistorySync::new(service, store.clone());
        let listening = ListeningChannels::new(history, config.history_limit);
        info!(history_limit = config.history_limit, "session started");
        Self {
            config,
            keybindings: default_keybindings_handle(),
            listening,
            store,
            commands: CommandRegistry::new(),
        }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn keybindings(&self) -> &KeybindingsHandle {
        &self.keybindings
    }

    pub fn listening(&self) -> &ListeningChannels {
        &self.listening
    }

    pub fn listening_mut(&mut self) -> &mut ListeningChannels {
        &mut self.listening
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    pub fn messages(&self, channel_id: &str) -> Vec<Message> {
        self.store.snapshot(channel_id)
    }

    /// Free-form text entry using the configured prompt.
    pub fn text_input(&self) -> TextInput {
        let mut input = TextInput::new(self.keybindings.clone());
        input.set_prompt(self.config.prompt.clone());
        input
    }

    pub fn channel_list(&self, channels: Vec<String>) -> ChannelList {
        ChannelList::new(channels, self.keybindings.clone())
    }

    /// Routes an event to `list`, toggling channels in this session's listening set.
    pub fn handle_channel_event(
        &mut self,
        list: &mut ChannelList,
        event: &InputEvent,
    ) -> ChannelListOutcome {
        list.handle_event(event, &mut self.listening)
    }

    /// Opens an argument window for the registered command `name`.
    pub fn open_command(
        &self,
        name: &str,
        dispatcher: impl CommandDispatcher + 'static,
    ) -> Option<CommandExecWindow> {
        let Some(command) = self.commands.get(name) else {
            debug!(command = name, "unknown command");
            return None;
        };
        Some(CommandExecWindow::new(
            command.clone(),
            self.keybindings.clone(),
            Box::new(dispatcher),
        ))
    }

    /// Schedules a fetch of the page preceding the oldest cached message.
    ///
    /// With an empty cache this is the same as the initial fetch. The worker
    /// is joined when the session is dropped. Returns false if it could not
    /// be spawned.
    pub fn fetch_older(&mut self, channel_id: &str) -> bool {
        let mut request = FetchRequest::latest(channel_id, self.listening.fetch_limit());
        if let Some(oldest) = self
            .store
            .with_messages(channel_id, |messages| messages.first().map(|m| m.id.clone()))
        {
            request = request.before(oldest);
        }
        self.listening.schedule(request)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.listening.join_pending_fetches();
        debug!("session closed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chat_service::{FetchRequest, Message};
    use chat_service_mock::MockChatService;
    use pretty_assertions::assert_eq;

    use super::Session;
    use crate::command::{Arguments, Command, CommandArg, DataType};
    use crate::config::EnvConfig;

    fn msg(id: &str, second: u32) -> Message {
        Message::new(id, "c1", format!("2016-01-01T10:00:{second:02}+00:00"))
    }

    #[test]
    fn text_input_uses_configured_prompt() {
        let config = EnvConfig {
            prompt: "$ ".to_string(),
            ..EnvConfig::default()
        };
        let session = Session::new(config, Arc::new(MockChatService::new()));
        let mut input = session.text_input();
        let line = crate::core::component::Component::render(&mut input, 20);
        assert!(line[0].starts_with("$ "));
    }

    #[test]
    fn fetch_older_requests_page_before_oldest_cached_message() {
        let service = Arc::new(MockChatService::new());
        service.push_batch("c1", vec![msg("m4", 4), msg("m3", 3)]);
        service.push_batch("c1", vec![msg("m2", 2), msg("m1", 1)]);
        let mut session = Session::new(EnvConfig::default(), service.clone());

        session.listening_mut().add("c1");
        session.listening_mut().join_pending_fetches();
        assert!(session.fetch_older("c1"));
        session.listening_mut().join_pending_fetches();

        let ids: Vec<String> = session.messages("c1").into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3", "m4"]);
        assert_eq!(
            service.calls(),
            vec![
                FetchRequest::latest("c1", 50),
                FetchRequest::latest("c1", 50).before("m3"),
            ]
        );
    }

    #[test]
    fn dropping_session_waits_for_older_page_fetch() {
        let service = Arc::new(MockChatService::new().with_delay(Duration::from_millis(300)));
        service.push_batch("c1", vec![msg("m2", 2), msg("m1", 1)]);
        let mut session = Session::new(EnvConfig::default(), service);
        let store = session.store().clone();

        assert!(session.fetch_older("c1"));
        drop(session);

        let ids: Vec<String> = store.snapshot("c1").into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn open_command_looks_up_registry() {
        let mut session = Session::new(EnvConfig::default(), Arc::new(MockChatService::new()));
        session
            .commands_mut()
            .register(Command::new("kick", "").with_arg(CommandArg::new("user", "", DataType::String)));

        assert!(session.open_command("missing", |_: &Command, _: Arguments| {}).is_none());
        let window = session
            .open_command("kick", |_: &Command, _: Arguments| {})
            .expect("registered command");
        assert_eq!(window.command().name, "kick");
    }
}
