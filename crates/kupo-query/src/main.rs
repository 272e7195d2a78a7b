mod cli;
mod commands;

use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;

use kupo_client::{ClientConfig, HttpKupoClient};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // stdout carries the JSON result, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout_secs));
    let client = HttpKupoClient::with_config(&args.kupo_url, config)
        .wrap_err_with(|| format!("while configuring client for `{}`", args.kupo_url))?;

    tracing::debug!(kupo_url = %client.base_url(), command = ?args.command, "running query");

    if let Some(output) = commands::run(&client, args.command).await? {
        let rendered = serde_json::to_string_pretty(&output).wrap_err("render JSON output")?;
        println!("{rendered}");
    }

    Ok(())
}
