use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use riki_diff::{ChangeRenderer, DiffConfig, DiffEngine, EditScript, RunKind, SpanStyle};
use riki_server::{RikiServer, ServerConfig};

use crate::cli::{Cli, Command, DiffArgs, OutputFormat, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn read_version(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let old = read_version(&args.old)?;
    let new = read_version(&args.new)?;

    let engine = DiffEngine::new(DiffConfig {
        strategy: args.strategy.into(),
        ..Default::default()
    });
    let script = engine.diff(&old, &new);
    tracing::debug!(
        old = %args.old.display(),
        new = %args.new.display(),
        inserted = script.inserted(),
        deleted = script.deleted(),
        "files compared"
    );

    if script.is_identity() && args.format == OutputFormat::Text {
        println!("No changes.");
        return Ok(());
    }
    println!("{}", render(&script, args.format)?);
    Ok(())
}

fn render(script: &EditScript, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => script
            .runs()
            .into_iter()
            .map(|run| match run.kind {
                RunKind::Keep => run.text,
                RunKind::Insert => run.text.green().to_string(),
                RunKind::Delete => run.text.red().strikethrough().to_string(),
            })
            .collect(),
        OutputFormat::Html => ChangeRenderer::new(SpanStyle::html()).render(script).markup,
        OutputFormat::Json => serde_json::to_string_pretty(&script.runs())?,
    })
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }

    let data = config
        .data_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "in memory".into());
    println!(
        "Riki server on {} (history: {})",
        config.bind_addr.to_string().bold(),
        data
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(async move { RikiServer::new(config)?.serve().await })
        .context("server stopped")
}
