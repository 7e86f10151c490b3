/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Generate the website from the conversation so far.
    Generate,
    /// Discard the conversation, artifact and company details.
    Reset,
    /// Show session status.
    ShowStatus,
    /// Write the current artifact to a file.
    Save(String),
    /// Quit the application.
    Quit,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return CommandResult::NotACommand;
    }

    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/generate" | "/g" => CommandResult::Generate,
        "/reset" => CommandResult::Reset,
        "/status" => CommandResult::ShowStatus,
        "/save" => {
            if arg.is_empty() {
                CommandResult::Save("index.html".to_string())
            } else {
                CommandResult::Save(arg.to_string())
            }
        }
        other => CommandResult::Message(format!("Unknown command: {other}. Type /help for commands.")),
    }
}

fn show_help() -> CommandResult {
    CommandResult::Message(
        "sitegen commands:\n  \
         /generate, /g    Generate the website from the conversation\n  \
         /save [path]     Write the current website (default: index.html)\n  \
         /status          Show company, turn count and artifact status\n  \
         /reset           Start over: clears conversation, website and company\n  \
         /help, /h        Show this help\n  \
         /quit, /q        Exit"
            .to_string(),
    )
}
