// Library interface for deepchat-cli.
// The binary and the integration tests both go through here.

pub mod app;
pub mod args;
pub mod commands;
pub mod render;
pub mod theme;

// Re-export commonly used items for easier testing
pub use args::Cli;
pub use commands::{handle_command, CommandResult};
pub use theme::Theme;
