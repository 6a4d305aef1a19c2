//! Login command implementation.

use anyhow::{Context as _, Result};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{info, instrument};

use crate::config::{Config, ServerOverrides};
use crate::context::connect;
use crate::output::Output;

/// Ask for the instance URL and an access token, check them against the
/// instance and save them.
#[instrument(skip_all, name = "login")]
pub async fn run_login(config: &mut Config, overrides: ServerOverrides<'_>) -> Result<()> {
    let out = Output::new();

    out.header("Login to a video platform instance");
    out.newline();

    let url = match overrides.url {
        Some(url) => url.to_owned(),
        None => {
            let mut prompt = Text::new("Instance URL:")
                .with_help_message("e.g. https://videos.example.org");
            if let Some(saved) = config.server.url.as_deref() {
                prompt = prompt.with_default(saved);
            }
            prompt.prompt().context("Failed to read instance URL")?
        }
    };

    let token = match overrides.token {
        Some(token) => token.to_owned(),
        None => Password::new("Access token:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_help_message("OAuth access token of an administrator or moderator")
            .prompt()
            .context("Failed to read access token")?,
    };

    let business = config.business_config(ServerOverrides {
        url: Some(url.trim()),
        token: Some(token.trim()),
        ..overrides
    })?;
    let ctx = connect(&business).await?;
    info!(username = %ctx.operator.username, "Logged in");

    config.set_server(url.trim(), token.trim());
    config.save()?;

    out.newline();
    out.success(format!(
        "Logged in as {} ({})",
        ctx.operator.username,
        ctx.operator.role().label()
    ));
    out.dim(format!(
        "Saved to {}",
        Config::config_path()?.display()
    ));
    Ok(())
}
