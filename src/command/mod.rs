//! Command descriptors, argument coercion and the execution window.

pub mod args;
pub mod exec_window;

pub use args::{coerce, ArgValue, Arguments, DataType};
pub use exec_window::{CommandExecWindow, ExecState, EXECUTE_ITEM_NAME};

/// One declared command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    pub name: String,
    pub description: String,
    pub datatype: DataType,
}

impl CommandArg {
    pub fn new(name: impl Into<String>, description: impl Into<String>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            datatype,
        }
    }
}

/// Immutable command identity plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub args: Vec<CommandArg>,
}

impl Command {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: CommandArg) -> Self {
        self.args.push(arg);
        self
    }
}

/// Runs a command with its coerced arguments.
///
/// Callers do not wait on or inspect the outcome.
pub trait CommandDispatcher {
    fn run(&mut self, command: &Command, args: Arguments);
}

impl<F> CommandDispatcher for F
where
    F: FnMut(&Command, Arguments),
{
    fn run(&mut self, command: &Command, args: Arguments) {
        self(command, args)
    }
}

/// Ordered set of commands available to the user.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command`, replacing any command with the same name in place.
    pub fn register(&mut self, command: Command) {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}
