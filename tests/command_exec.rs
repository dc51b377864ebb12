use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chat_service_mock::MockChatService;
use chatterm::{
    parse_input_events, ArgValue, Arguments, Command, CommandArg, Component, DataType, EnvConfig,
    ExecState, Session,
};
use pretty_assertions::assert_eq;

fn send(window: &mut impl Component, data: &str) {
    for event in parse_input_events(data) {
        window.handle_event(&event);
    }
}

#[test]
fn registered_command_collects_typed_args_and_dispatches_once() {
    let mut session = Session::new(EnvConfig::default(), Arc::new(MockChatService::new()));
    session.commands_mut().register(
        Command::new("slowmode", "Set channel slowmode")
            .with_arg(CommandArg::new("seconds", "Delay between messages", DataType::Int))
            .with_arg(CommandArg::new("ratio", "Burst ratio", DataType::Float)),
    );

    let received: Rc<RefCell<Vec<Arguments>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let mut window = session
        .open_command("slowmode", move |_: &Command, args: Arguments| {
            sink.borrow_mut().push(args);
        })
        .expect("registered");

    // helper, input, helper, input, Execute
    send(&mut window, "\x1b[B");
    send(&mut window, "30");
    send(&mut window, "\x1b[B");
    send(&mut window, "\x1b[B");
    send(&mut window, "0.5");
    send(&mut window, "\x1b[B");
    send(&mut window, "\r");

    assert_eq!(window.state(), ExecState::Destroyed);
    let received = received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].get("seconds"), Some(&ArgValue::Int(30)));
    assert_eq!(received[0].get("ratio"), Some(&ArgValue::Float(0.5)));
}

#[test]
fn untouched_fields_coerce_to_zero_values() {
    let mut session = Session::new(EnvConfig::default(), Arc::new(MockChatService::new()));
    session.commands_mut().register(
        Command::new("announce", "")
            .with_arg(CommandArg::new("text", "", DataType::String))
            .with_arg(CommandArg::new("pin", "", DataType::Bool)),
    );

    let received: Rc<RefCell<Vec<Arguments>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let mut window = session
        .open_command("announce", move |_: &Command, args: Arguments| {
            sink.borrow_mut().push(args);
        })
        .expect("registered");
    // Wraps from the first entry to Execute.
    send(&mut window, "\x1b[A");
    send(&mut window, "\r");

    let received = received.borrow();
    assert_eq!(received[0].get("text"), Some(&ArgValue::String(String::new())));
    assert_eq!(received[0].get("pin"), Some(&ArgValue::Bool(false)));
}
