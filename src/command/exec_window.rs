//! Window collecting a command's arguments and executing it once.

use tracing::{debug, info};

use crate::command::{coerce, Arguments, Command, CommandDispatcher};
use crate::core::component::{Component, CursorPos};
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{lock_keybindings, EditorAction, KeybindingsHandle};
use crate::widgets::menu::{MenuItem, MenuList, MenuWindow};

/// Name of the terminal entry that triggers execution.
pub const EXECUTE_ITEM_NAME: &str = "Execute";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Building,
    Executing,
    Destroyed,
}

/// Presents each parameter of a [`Command`] as a label plus an input field,
/// followed by an `Execute` entry.
///
/// Activating `Execute` coerces every field, dispatches the command exactly
/// once and destroys the window. The outcome of the dispatch is not observed.
pub struct CommandExecWindow<M: MenuWindow = MenuList> {
    menu: M,
    command: Command,
    state: ExecState,
    keybindings: KeybindingsHandle,
    dispatcher: Box<dyn CommandDispatcher>,
    on_destroy: Option<Box<dyn FnOnce()>>,
}

impl CommandExecWindow<MenuList> {
    pub fn new(
        command: Command,
        keybindings: KeybindingsHandle,
        dispatcher: Box<dyn CommandDispatcher>,
    ) -> Self {
        let menu = MenuList::new("Execute command", keybindings.clone());
        Self::with_menu(menu, command, keybindings, dispatcher)
    }
}

impl<M: MenuWindow> CommandExecWindow<M> {
    pub fn with_menu(
        menu: M,
        command: Command,
        keybindings: KeybindingsHandle,
        dispatcher: Box<dyn CommandDispatcher>,
    ) -> Self {
        let mut window = Self {
            menu,
            command,
            state: ExecState::Building,
            keybindings,
            dispatcher,
            on_destroy: None,
        };
        window.gen_menu();
        window
    }

    /// Called once when the window detaches itself from its parent.
    pub fn set_on_destroy(&mut self, handler: Option<Box<dyn FnOnce()>>) {
        self.on_destroy = handler;
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut M {
        &mut self.menu
    }

    fn gen_menu(&mut self) {
        let mut items = Vec::with_capacity(self.command.args.len() * 2 + 1);
        for arg in &self.command.args {
            let mut helper = MenuItem::new(arg.name.clone(), arg.description.clone());
            helper.user_data = Some(arg.clone());
            items.push(helper);
            items.push(MenuItem::input_for(arg));
        }
        items.push(MenuItem::new(
            EXECUTE_ITEM_NAME,
            "Execute the command with the specified arguments",
        ));
        self.menu.set_options(items);
    }

    /// Handles the "activate" action on the highlighted entry.
    ///
    /// Nothing highlighted is a no-op; a category is handed to the menu.
    pub fn activate(&mut self) {
        if self.state != ExecState::Building {
            return;
        }
        let Some(item) = self.menu.highlighted() else {
            return;
        };
        if item.is_category {
            self.menu.select();
            return;
        }
        if is_execute_item(item) {
            self.execute();
        }
    }

    fn execute(&mut self) {
        self.state = ExecState::Executing;

        let mut args = Arguments::new();
        for item in self.menu.options() {
            if !item.is_input {
                continue;
            }
            let Some(datatype) = item.input_type else {
                continue;
            };
            args.insert(item.name.clone(), coerce(item.input.as_str(), datatype));
        }

        info!(command = %self.command.name, args = args.len(), "executing command");
        self.dispatcher.run(&self.command, args);
        self.destroy();
    }

    /// Tears the window down. Idempotent.
    pub fn destroy(&mut self) {
        if self.state == ExecState::Destroyed {
            return;
        }
        debug!(command = %self.command.name, "destroying command window");
        self.state = ExecState::Destroyed;
        if let Some(handler) = self.on_destroy.take() {
            handler();
        }
    }
}

fn is_execute_item(item: &MenuItem) -> bool {
    !item.is_input && item.user_data.is_none() && item.name == EXECUTE_ITEM_NAME
}

impl<M: MenuWindow> Component for CommandExecWindow<M> {
    fn render(&mut self, width: usize) -> Vec<String> {
        if self.state == ExecState::Destroyed {
            return Vec::new();
        }
        self.menu.render(width)
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        self.menu.cursor_pos()
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if self.state != ExecState::Building {
            return;
        }

        let (confirm, cancel) = match event {
            InputEvent::Key { key_id, .. } => {
                let kb = lock_keybindings(&self.keybindings);
                (
                    kb.matches(key_id, EditorAction::SelectConfirm),
                    kb.matches(key_id, EditorAction::SelectCancel),
                )
            }
            _ => (false, false),
        };

        if confirm {
            self.activate();
        } else if cancel {
            if !self.menu.back() {
                self.destroy();
            }
        } else {
            self.menu.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::{CommandExecWindow, ExecState, EXECUTE_ITEM_NAME};
    use crate::command::{ArgValue, Arguments, Command, CommandArg, DataType};
    use crate::core::component::Component;
    use crate::core::input_event::{parse_input_events, InputEvent};
    use crate::core::keybindings::default_keybindings_handle;
    use crate::widgets::menu::{MenuItem, MenuWindow};

    type Calls = Rc<RefCell<Vec<(String, Arguments)>>>;

    fn window_for(command: Command) -> (CommandExecWindow, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let calls_ref = Rc::clone(&calls);
        let window = CommandExecWindow::new(
            command,
            default_keybindings_handle(),
            Box::new(move |command: &Command, args: Arguments| {
                calls_ref.borrow_mut().push((command.name.clone(), args));
            }),
        );
        (window, calls)
    }

    fn send(window: &mut CommandExecWindow, data: &str) {
        for event in parse_input_events(data) {
            window.handle_event(&event);
        }
    }

    fn down(window: &mut CommandExecWindow, times: usize) {
        for _ in 0..times {
            send(window, "\x1b[B");
        }
    }

    fn sample_command() -> Command {
        Command::new("ban", "Ban a user")
            .with_arg(CommandArg::new("user", "User to ban", DataType::String))
            .with_arg(CommandArg::new("days", "Days of messages to purge", DataType::Int))
            .with_arg(CommandArg::new("notify", "Send a DM", DataType::Bool))
    }

    #[test]
    fn menu_lists_helper_and_input_per_arg_then_execute() {
        let (window, _) = window_for(sample_command());
        let options = window.menu().options();
        assert_eq!(options.len(), 7);

        let shape: Vec<(&str, bool)> = options.iter().map(|i| (i.name.as_str(), i.is_input)).collect();
        assert_eq!(
            shape,
            vec![
                ("user", false),
                ("user", true),
                ("days", false),
                ("days", true),
                ("notify", false),
                ("notify", true),
                (EXECUTE_ITEM_NAME, false),
            ]
        );
        assert_eq!(options[3].input_type, Some(DataType::Int));
        assert_eq!(window.state(), ExecState::Building);
    }

    #[test]
    fn execute_coerces_fields_dispatches_once_and_destroys() {
        let (mut window, calls) = window_for(sample_command());
        let destroyed = Rc::new(Cell::new(0));
        let destroyed_ref = Rc::clone(&destroyed);
        window.set_on_destroy(Some(Box::new(move || destroyed_ref.set(destroyed_ref.get() + 1))));

        send(&mut window, "\x1b[B");
        send(&mut window, "mallory");
        down(&mut window, 2);
        send(&mut window, "seven");
        down(&mut window, 2);
        send(&mut window, "TRUE");
        send(&mut window, "\x1b[B");
        send(&mut window, "\r");

        assert_eq!(window.state(), ExecState::Destroyed);
        assert_eq!(destroyed.get(), 1);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        let (name, args) = &calls[0];
        assert_eq!(name, "ban");
        assert_eq!(args.get("user"), Some(&ArgValue::String("mallory".to_string())));
        assert_eq!(args.get("days"), Some(&ArgValue::Int(0)));
        assert_eq!(args.get("notify"), Some(&ArgValue::Bool(true)));

        drop(calls);
        send(&mut window, "\r");
        window.activate();
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn confirm_on_non_execute_entry_does_nothing() {
        let (mut window, calls) = window_for(sample_command());
        send(&mut window, "\r");
        send(&mut window, "\x1b[B");
        send(&mut window, "\r");
        assert_eq!(window.state(), ExecState::Building);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn parameter_named_execute_does_not_trigger_execution() {
        let command = Command::new("odd", "")
            .with_arg(CommandArg::new(EXECUTE_ITEM_NAME, "Confusing name", DataType::Float));
        let (mut window, calls) = window_for(command);
        send(&mut window, "\r");
        assert!(calls.borrow().is_empty());

        send(&mut window, "\x1b[B");
        send(&mut window, "2.5");
        send(&mut window, "\x1b[B");
        send(&mut window, "\r");
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.get_float(EXECUTE_ITEM_NAME), Some(2.5));
    }

    #[test]
    fn command_without_args_executes_with_empty_map() {
        let (mut window, calls) = window_for(Command::new("ping", "Ping the server"));
        assert_eq!(window.menu().options().len(), 1);
        window.activate();
        assert_eq!(calls.borrow().len(), 1);
        assert!(calls.borrow()[0].1.is_empty());
    }

    struct EmptyMenu {
        options: Vec<MenuItem>,
        selects: usize,
    }

    impl Component for EmptyMenu {
        fn render(&mut self, _width: usize) -> Vec<String> {
            Vec::new()
        }
    }

    impl MenuWindow for EmptyMenu {
        fn set_options(&mut self, items: Vec<MenuItem>) {
            self.options = items;
        }

        fn options(&self) -> &[MenuItem] {
            &self.options
        }

        fn highlighted(&self) -> Option<&MenuItem> {
            None
        }

        fn select(&mut self) {
            self.selects += 1;
        }

        fn back(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn activate_with_nothing_highlighted_is_a_no_op() {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let calls_ref = Rc::clone(&calls);
        let menu = EmptyMenu {
            options: Vec::new(),
            selects: 0,
        };
        let mut window = CommandExecWindow::with_menu(
            menu,
            Command::new("ping", ""),
            default_keybindings_handle(),
            Box::new(move |command: &Command, args: Arguments| {
                calls_ref.borrow_mut().push((command.name.clone(), args));
            }),
        );

        window.activate();
        window.handle_event(&InputEvent::key("enter"));

        assert_eq!(window.state(), ExecState::Building);
        assert_eq!(window.menu().selects, 0);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn activate_on_category_descends_without_dispatch() {
        let (mut window, calls) = window_for(sample_command());
        window.menu_mut().set_options(vec![MenuItem::category(
            "advanced",
            "More options",
            vec![MenuItem::new(EXECUTE_ITEM_NAME, "")],
        )]);

        window.activate();

        assert_eq!(window.menu().depth(), 1);
        assert_eq!(window.state(), ExecState::Building);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn cancel_at_top_level_destroys_without_dispatch() {
        let (mut window, calls) = window_for(sample_command());
        window.handle_event(&InputEvent::key("escape"));
        assert_eq!(window.state(), ExecState::Destroyed);
        assert!(calls.borrow().is_empty());
        assert!(window.render(40).is_empty());
    }
}
