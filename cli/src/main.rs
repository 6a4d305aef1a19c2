//! `tube-admin`: moderate the users of a video platform instance from the
//! terminal.

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod prompts;
mod render;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use tracing::error;
use tube_admin_business::users::BulkActionKind;

use crate::cli::{Cli, Commands, UsersCommand};
use crate::config::{Config, ServerOverrides};
use crate::context::connect;
use crate::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            Output::stderr().error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        command,
        url,
        token,
        timeout_secs,
        ..
    } = cli;
    let overrides = ServerOverrides {
        url: url.as_deref(),
        token: token.as_deref(),
        timeout_secs,
    };

    let mut config = Config::load()?;

    match command {
        Commands::Completions { shell } => {
            commands::generate_completions(shell)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Login => {
            commands::run_login(&mut config, overrides).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Notifications { unread, count } => {
            let business = config.business_config(overrides)?;
            let ctx = connect(&business).await?;
            commands::run_notifications(&ctx, unread, count).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Live { video_id } => {
            let business = config.business_config(overrides)?;
            let ctx = connect(&business).await?;
            commands::run_live(&ctx, &video_id).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Users { command } => {
            let business = config.business_config(overrides)?;
            let ctx = connect(&business).await?;
            match command {
                UsersCommand::List(args) => commands::run_list(&ctx, &mut config, args).await,
                UsersCommand::Delete(args) => {
                    commands::run_bulk(&ctx, &config, BulkActionKind::Delete, args).await
                }
                UsersCommand::Ban(args) => {
                    commands::run_bulk(&ctx, &config, BulkActionKind::Ban, args).await
                }
                UsersCommand::Unban(args) => {
                    commands::run_bulk(&ctx, &config, BulkActionKind::Unban, args).await
                }
                UsersCommand::VerifyEmail(args) => {
                    commands::run_bulk(&ctx, &config, BulkActionKind::SetEmailVerified, args)
                        .await
                }
            }
        }
    }
}
