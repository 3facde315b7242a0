use anyhow::Result;
use deepchat_core::{ChatSession, Settings};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{self, CommandResult};
use crate::render;
use crate::theme::Theme;

/// Build a session from settings. Fails with a configuration error, before
/// any network traffic, when the credential or endpoint is missing.
pub fn build_session(settings: &Settings, streaming: bool) -> deepchat_core::error::Result<ChatSession> {
    let llm = settings.build_llm_client()?;
    let store = settings.build_store()?;

    Ok(ChatSession::new(Box::new(llm), store)
        .with_template(settings.template)
        .with_params(settings.chat_params())
        .with_retry(settings.retry_policy())
        .with_streaming(streaming))
}

pub async fn show_model_info<W: Write>(session: &ChatSession, theme: &Theme, out: &mut W) {
    match session.model_info().await {
        Ok(info) => {
            let _ = render::model_info(out, theme, &info);
        }
        Err(e) => tracing::warn!("Could not get model info: {e}"),
    }
}

// ── Single turn ─────────────────────────────────────────────────────────

/// Ask one question: echo the reply as it streams, then show the thinking
/// and answer sections and the token usage.
pub async fn run_turn<W: Write>(
    session: &mut ChatSession,
    theme: &Theme,
    question: &str,
    out: &mut W,
) -> Result<()> {
    let outcome = session
        .ask(question, |fragment| {
            let _ = render::fragment(&mut *out, fragment);
        })
        .await?;

    writeln!(out)?;
    render::response(out, theme, &outcome.response)?;
    render::usage(out, theme, outcome.usage.as_ref())?;
    Ok(())
}

pub async fn run_single_prompt<W: Write>(
    session: &mut ChatSession,
    theme: &Theme,
    prompt: &str,
    out: &mut W,
) -> Result<()> {
    run_turn(session, theme, prompt, out).await
}

// ── Interactive loop ────────────────────────────────────────────────────

/// Read questions line by line until `exit`, end of input, or Ctrl-C.
///
/// A failed turn is reported and the loop moves on; Ctrl-C during a turn
/// abandons it without touching the history.
pub async fn run_interactive<R, W>(
    session: &mut ChatSession,
    theme: &Theme,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    render::banner(out, theme)?;
    let mut lines = input.lines();

    loop {
        write!(out, "\nQuestion: ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                render::message(out, "\nExiting...")?;
                break;
            }
        };
        let Some(line) = line else {
            render::message(out, "\nGoodbye!")?;
            break;
        };

        match commands::handle_command(&line) {
            CommandResult::Quit => {
                render::message(out, "\nGoodbye!")?;
                break;
            }
            CommandResult::Empty => continue,
            CommandResult::ClearScreen => render::clear_screen(out)?,
            CommandResult::Message(msg) => render::message(out, &msg)?,
            CommandResult::ShowHistory => {
                let store = session.store();
                let location = match store.path() {
                    Some(path) => path.display().to_string(),
                    None => "memory only".to_string(),
                };
                render::message(
                    out,
                    &format!(
                        "{} of {} exchanges stored ({}, ~{} tokens)",
                        store.log().len(),
                        store.max_history(),
                        location,
                        store.log().estimate_tokens()
                    ),
                )?;
            }
            CommandResult::ShowLast => match session.store().log().last() {
                Some(exchange) => render::exchange(out, theme, exchange)?,
                None => render::message(out, "No exchanges stored yet.")?,
            },
            CommandResult::TemplateChanged(template) => {
                session.set_template(template);
                render::message(out, &format!("Template set to {template}"))?;
            }
            CommandResult::NotACommand => {
                let result = tokio::select! {
                    result = run_turn(session, theme, &line, out) => result,
                    _ = tokio::signal::ctrl_c() => {
                        render::message(out, "\n[interrupted]")?;
                        continue;
                    }
                };
                if let Err(e) = result {
                    tracing::debug!("turn failed: {e:?}");
                    render::error(&mut std::io::stderr(), theme, &e.to_string())?;
                }
            }
        }
    }

    Ok(())
}
