//! `folio` - browse documents and translate selected paragraphs

mod cli;
mod commands;
mod config;
mod logging;
mod render;

use anyhow::{Context, Result};
use config::FileConfig;
use folio_client::ApiClient;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    logging::init(matches.get_flag("verbose"), matches.get_flag("json"));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(error = ?error, "command failed");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(matches: &clap::ArgMatches) -> Result<()> {
    let (name, args) = matches.subcommand().context("no command given")?;
    if name == "languages" {
        commands::languages();
        return Ok(());
    }

    let config = FileConfig::load(matches.get_one::<String>("config").map(Path::new))?
        .with_overrides(matches.get_one::<String>("api-url").map(String::as_str))?;
    tracing::debug!(base_url = %config.client.base_url, "using backend");
    let client = Arc::new(ApiClient::new(config.client)?);

    match name {
        "list" => commands::list(&client).await,
        "show" => commands::show(client, config.workspace, args).await,
        "translate" => commands::translate(client, config.workspace, args).await,
        "upload" => commands::upload(&client, args).await,
        "delete" => commands::delete(&client, args).await,
        "history" => commands::history(&client).await,
        "rate" => commands::rate(&client, args).await,
        other => anyhow::bail!("unknown command '{other}'"),
    }
}
