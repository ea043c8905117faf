#![allow(clippy::exit)]

mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;
use tracing::{error, info};

use crate::cli::{Cli, Commands, list_query};
use crate::output::Output;

async fn run(cli: Cli, out: &Output) -> Result<()> {
    let config = context::resolve_config(cli.api_url.as_deref(), cli.token.as_deref())?;
    let mut session = context::build_session(&config)?;
    info!(api_url = %config.api_url(), "Starting");

    let result = match cli.command {
        Commands::List { page, size, sort } => {
            commands::run_list(&mut session, out, list_query(page, size, sort)).await
        }
        Commands::Get { login } => commands::run_get(&mut session, out, login).await,
        Commands::Roles => commands::run_roles(&mut session, out).await,
        Commands::Create { login, fields } => {
            commands::run_create(&mut session, out, login, fields).await
        }
        Commands::Update { login, fields } => {
            commands::run_update(&mut session, out, login, fields).await
        }
        Commands::Delete { login } => commands::run_delete(&mut session, out, login).await,
    };

    session.shutdown().await;
    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    let out = Output::new(cli.json);
    if let Err(e) = run(cli, &out).await {
        error!("{e:#}");
        out.error(format!("{e:#}"));
        std::process::exit(1);
    }
}
