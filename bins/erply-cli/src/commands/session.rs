//! Session command - show the current session key's user and lifetime

use crate::output;
use anyhow::{Context, Result};
use chrono::DateTime;
use erply_api_client::endpoints::auth::{SessionKeyInfo, SessionKeyUser};
use erply_api_client::ErplyClient;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output for the session command
#[derive(Debug, Serialize)]
struct JsonSessionOutput {
    user: Option<SessionKeyUser>,
    info: Option<SessionKeyInfo>,
}

/// Run session command
pub async fn run(format: &str) -> Result<()> {
    let client = ErplyClient::new()?;
    if client.config().session_key.is_none() {
        anyhow::bail!("ERPLY_SESSION_KEY is not set");
    }

    let auth = client.auth();
    let user = auth
        .get_session_key_user()
        .await
        .context("failed to load session user")?;
    let info = auth
        .get_session_key_info()
        .await
        .context("failed to load session info")?;

    if format == "json" {
        return output::json(&JsonSessionOutput { user, info });
    }

    output::header("Session");

    match &user {
        Some(user) => {
            println!("  {:<14} {} ({})", "User".dimmed(), user.user_name.bold(), user.user_id);
            println!("  {:<14} {}", "Employee".dimmed(), output::or_dash(&user.employee_name));
            println!("  {:<14} {}", "Group".dimmed(), output::or_dash(&user.group_name));
        }
        None => println!("  {}", "Session key is not bound to a user".yellow()),
    }

    if let Some(info) = &info {
        println!("  {:<14} {}", "Created".dimmed(), format_unix(&info.creation_unix_time));
        println!("  {:<14} {}", "Expires".dimmed(), format_unix(&info.expire_unix_time));
    }
    println!();

    Ok(())
}

/// Render a Unix timestamp string as UTC, or as given when it doesn't parse
fn format_unix(value: &str) -> String {
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || output::or_dash(value),
            |time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}
