use deepchat_core::PromptTemplate;

/// Result of processing one line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Clear the screen. History is kept.
    ClearScreen,
    /// Show how much history is stored and where.
    ShowHistory,
    /// Print the most recent stored exchange.
    ShowLast,
    /// Switch the instructional template for later questions.
    TemplateChanged(PromptTemplate),
    /// Blank line; ask again.
    Empty,
    /// Not a command - treat as a question.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::Empty;
    }

    // Bare words work without the slash.
    match input.to_lowercase().as_str() {
        "exit" | "quit" => return CommandResult::Quit,
        "clear" => return CommandResult::ClearScreen,
        _ => {}
    }

    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" => CommandResult::ClearScreen,
        "/history" => CommandResult::ShowHistory,
        "/last" => CommandResult::ShowLast,
        "/template" => {
            if arg.is_empty() {
                let names: Vec<&str> = PromptTemplate::all().iter().map(|t| t.name()).collect();
                CommandResult::Message(format!(
                    "Available templates: {}\nUsage: /template <name>",
                    names.join(", ")
                ))
            } else {
                match arg.parse::<PromptTemplate>() {
                    Ok(template) => CommandResult::TemplateChanged(template),
                    Err(e) => CommandResult::Message(e),
                }
            }
        }
        "/version" => CommandResult::Message(format!("deepchat v{}", env!("CARGO_PKG_VERSION"))),

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
deepchat commands

  exit, quit, /exit, /q     Leave the session
  clear, /clear             Clear the screen (history is kept)
  /history                  Show how many exchanges are stored
  /last                     Show the most recent stored exchange
  /template <name>          Switch template (general, coding)
  /version                  Show version information
  /help, /h                 Show this help message

Anything else is sent to the model as a question.";

    CommandResult::Message(help_text.into())
}
