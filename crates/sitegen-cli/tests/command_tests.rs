use sitegen_cli::commands::{handle_command, CommandResult};

#[test]
fn test_help_command() {
    let result = handle_command("/help");
    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("sitegen commands"));
        assert!(msg.contains("/generate"));
    } else {
        panic!("expected help message");
    }
}

#[test]
fn test_quit_aliases() {
    for cmd in ["/exit", "/quit", "/q"] {
        assert_eq!(handle_command(cmd), CommandResult::Quit);
    }
}

#[test]
fn test_generate_and_reset() {
    assert_eq!(handle_command("/generate"), CommandResult::Generate);
    assert_eq!(handle_command("/g"), CommandResult::Generate);
    assert_eq!(handle_command("  /reset  "), CommandResult::Reset);
    assert_eq!(handle_command("/status"), CommandResult::ShowStatus);
}

#[test]
fn test_save_default_and_custom_path() {
    assert_eq!(handle_command("/save"), CommandResult::Save("index.html".into()));
    assert_eq!(handle_command("/save site/out.html"), CommandResult::Save("site/out.html".into()));
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(handle_command("I want a blue header"), CommandResult::NotACommand);
}

#[test]
fn test_unknown_command() {
    match handle_command("/deploy") {
        CommandResult::Message(msg) => assert!(msg.contains("Unknown command: /deploy")),
        other => panic!("unexpected {other:?}"),
    }
}
