use std::io::Write;

use interview_chat::{ChatError, InputAffordance, InterviewController};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::CliResult;
use crate::handlers::command::{ReplCommand, HELP};
use crate::render::{render_affordance, render_error, render_message, render_status};

/// Run the interview REPL until the input ends, the user quits, or the interview completes
pub async fn run_chat<R, W>(controller: &mut InterviewController, input: R, out: &mut W) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Err(e) = controller.start().await {
        tracing::warn!("Failed to start interview: {}", e);
    }
    if let Some(session_id) = controller.session_id() {
        writeln!(out, "Session {}", session_id)?;
    }

    let mut shown = print_new_messages(controller, 0, out)?;
    print_error(controller, out)?;

    let mut lines = input.lines();
    loop {
        if controller.is_complete() {
            writeln!(out, "Interview complete.")?;
            if let Ok(preview) = controller.job_preview().await {
                writeln!(out, "\n{}", preview)?;
            }
            break;
        }

        print_prompt(controller, out)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ReplCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        let revisits = matches!(
            command,
            ReplCommand::Back | ReplCommand::Forward | ReplCommand::Goto(_)
        );

        let result = match command {
            ReplCommand::Answer(text) => answer(controller, &text).await,
            ReplCommand::Back => controller.go_back().await,
            ReplCommand::Forward => controller.go_forward().await,
            ReplCommand::Goto(index) => controller.navigate_to(index).await,
            ReplCommand::Accept(index) => controller.accept_suggestion(index).await,
            ReplCommand::Keep => controller.keep_original().await,
            ReplCommand::Retry => controller.retry().await,
            ReplCommand::Preview => match controller.job_preview().await {
                Ok(preview) => {
                    writeln!(out, "{}", preview)?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ReplCommand::Turns => match controller.turns_summary().await {
                Ok(summary) => {
                    for turn in &summary.turns {
                        let marker = if turn.index == summary.current_index { '>' } else { ' ' };
                        writeln!(
                            out,
                            "{} {}. {} {}",
                            marker,
                            turn.index + 1,
                            turn.question.as_deref().or(turn.field.as_deref()).unwrap_or("(question)"),
                            turn.answer_preview.as_deref().map(|a| format!("→ {}", a)).unwrap_or_default()
                        )?;
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ReplCommand::Schema => match controller.schema().await {
                Ok(schema) => {
                    for field in &schema.fields {
                        let required = if field.required { "*" } else { "" };
                        writeln!(out, "{}{} {}", field.id, required, field.label.as_deref().unwrap_or(""))?;
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ReplCommand::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            ReplCommand::Quit => break,
        };

        match result {
            // Backend failures land in the controller's error banner
            Err(ChatError::Api(_)) => {}
            Err(e) => writeln!(out, "{}", e)?,
            Ok(()) if revisits => {
                if let Some(question) = controller.current_question() {
                    writeln!(out, "Interviewer: {}", question)?;
                }
            }
            Ok(()) => {}
        }

        shown = print_new_messages(controller, shown, out)?;
        print_error(controller, out)?;
    }

    out.flush()?;
    Ok(())
}

/// Send `text` through the current widget when there is one
async fn answer(controller: &mut InterviewController, text: &str) -> interview_chat::Result<()> {
    match controller.input_affordance() {
        InputAffordance::Tool(tool) => {
            let value = tool.parse_input(text)?;
            controller.send_ui_response(value).await
        }
        _ => controller.send_text(text).await,
    }
}

fn print_new_messages<W: Write>(controller: &InterviewController, shown: usize, out: &mut W) -> CliResult<usize> {
    let messages = controller.messages();
    // The transcript can shrink when a failed echo is withdrawn
    let start = shown.min(messages.len());
    for message in &messages[start..] {
        writeln!(out, "{}", render_message(message))?;
    }
    Ok(messages.len())
}

fn print_error<W: Write>(controller: &mut InterviewController, out: &mut W) -> CliResult<()> {
    if let Some(banner) = render_error(controller) {
        writeln!(out, "{}", banner)?;
        controller.clear_error();
    }
    Ok(())
}

fn print_prompt<W: Write>(controller: &InterviewController, out: &mut W) -> CliResult<()> {
    writeln!(out, "{}", render_status(controller))?;
    let hint = render_affordance(&controller.input_affordance());
    if !hint.is_empty() {
        writeln!(out, "{}", hint)?;
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
