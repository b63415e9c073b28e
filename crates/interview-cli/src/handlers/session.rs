use std::io::Write;

use interview_persist::{cache_key, with_session_param};
use interview_preview::JobPreview;

use crate::error::{CliError, CliResult};
use crate::state::AppState;

/// Print the collected job posting for a session
pub async fn print_status<W: Write>(state: &AppState, session: Option<&str>, out: &mut W) -> CliResult<()> {
    let session_id = state.resolve_session(session).ok_or(CliError::NoSession)?;
    let status = state.api.get_session_status(&session_id).await?;

    let activity = match (status.is_active, status.is_complete) {
        (_, true) => "complete",
        (true, false) => "active",
        (false, false) => "inactive",
    };
    writeln!(out, "Session {} ({})", status.session_id, activity)?;
    if let (Some(app_url), true) = (&state.config.app.url, status.is_active) {
        match with_session_param(app_url, Some(&status.session_id)) {
            Ok(link) => writeln!(out, "Continue at {}", link)?,
            Err(e) => tracing::warn!("Invalid app.url {}: {}", app_url, e),
        }
    }

    let preview = JobPreview::from_status(&status);
    if preview.is_empty() {
        writeln!(out, "Nothing collected yet")?;
    } else {
        writeln!(out, "{}", preview)?;
    }
    Ok(())
}

pub async fn print_schema<W: Write>(state: &AppState, out: &mut W) -> CliResult<()> {
    let schema = state.api.get_schema().await?;
    for field in &schema.fields {
        let required = if field.required { " (required)" } else { "" };
        writeln!(out, "{}{}", field.label.as_deref().unwrap_or(&field.id), required)?;
        if let Some(description) = &field.description {
            writeln!(out, "  {}", description)?;
        }
    }
    Ok(())
}

/// Forget the remembered session and its cached transcript
pub fn reset<W: Write>(state: &AppState, out: &mut W) -> CliResult<()> {
    match state.persist.sessions().recall() {
        Some(session_id) => {
            state.persist.conversations().clear(&cache_key(&session_id));
            state.persist.sessions().forget();
            writeln!(out, "Forgot session {}", session_id)?;
        }
        None => writeln!(out, "No remembered session")?,
    }
    Ok(())
}
