use anyhow::Result;
use clap::Parser;
use deepchat_cli::{app, Cli, Theme};
use deepchat_core::DeepChatError;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let mut session = match app::build_session(&settings, !cli.no_stream) {
        Ok(session) => session,
        Err(DeepChatError::Config(msg)) => {
            eprintln!("Configuration error: {msg}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let theme = Theme::by_name(&cli.theme);
    let mut stdout = std::io::stdout();

    if !cli.no_model_info {
        app::show_model_info(&session, &theme, &mut stdout).await;
    }

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&mut session, &theme, &prompt, &mut stdout).await?;
    } else {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        app::run_interactive(&mut session, &theme, stdin, &mut stdout).await?;
    }

    Ok(())
}
