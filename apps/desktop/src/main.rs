mod config;
mod view;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    conversation::SUGGESTED_PROMPTS, transport::send_chat, Conversation, HazardSubmission,
    HttpTransport, ImageAsset, RouteQuery,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, normalize_api_base, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "safari", about = "Matatu route advice, road-hazard reports and transport chat")]
struct Args {
    /// Config file; missing files are skipped.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask for route advice between two places.
    Route {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Swap origin and destination before asking.
        #[arg(long)]
        swap: bool,
    },
    /// Submit a road photo for hazard analysis. Only the first file is used.
    Hazard {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Chat with the assistant.
    Chat,
    /// Check that the backend is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut settings = load_settings(&config_path)?;
    if let Some(api_base) = &args.api_base {
        settings.api_base = api_base.clone();
    }
    init_tracing(&settings.log_filter);

    let api_base = normalize_api_base(&settings.api_base)?;
    info!(%api_base, "using backend");
    let transport = HttpTransport::new(api_base);

    match args.command {
        Command::Route { from, to, swap } => run_route(&transport, from, to, swap).await,
        Command::Hazard { images } => run_hazard(&transport, images).await,
        Command::Chat => run_chat(&transport).await,
        Command::Health => run_health(&transport).await,
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_route(transport: &HttpTransport, from: String, to: String, swap: bool) -> Result<()> {
    let mut query = RouteQuery::new();
    query.set_origin(from);
    query.set_destination(to);
    if swap {
        query.swap();
    }

    if !query.submit_with(transport).await {
        bail!("both --from and --to need a place name");
    }
    println!("{}", view::render_route(&query));
    match query.error() {
        Some(_) => Err(anyhow!("route lookup failed")),
        None => Ok(()),
    }
}

async fn run_hazard(transport: &HttpTransport, images: Vec<PathBuf>) -> Result<()> {
    let mut images = images.into_iter();
    let path = images.next().context("no image given")?;
    let ignored = images.count();
    if ignored > 0 {
        warn!(ignored, "only the first image is submitted");
    }

    let asset = ImageAsset::from_path(&path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let mut hazard = HazardSubmission::new();
    if !hazard.select_with_preview(asset).await {
        println!("{}", view::render_hazard(&hazard));
        bail!("'{}' is not an image", path.display());
    }

    hazard.submit_with(transport).await;
    println!("{}", view::render_hazard(&hazard));
    match hazard.error() {
        Some(_) => Err(anyhow!("hazard analysis failed")),
        None => Ok(()),
    }
}

async fn run_chat(transport: &HttpTransport) -> Result<()> {
    let mut chat = Conversation::new();
    println!("{}", view::render_chat_banner(&chat));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();

        match command {
            "/quit" | "/exit" => break,
            "/clear" => {
                chat.clear();
                println!("(conversation cleared)");
                continue;
            }
            _ => {}
        }

        if let Some(index) = command.strip_prefix("/suggest") {
            let picked = index
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .is_some_and(|n| chat.use_suggestion(n));
            if !picked {
                println!("pick a suggestion between 1 and {}", SUGGESTED_PROMPTS.len());
                continue;
            }
        } else {
            chat.set_input(command);
        }

        let Some(request) = chat.submit_input() else {
            continue;
        };
        if let Some(turn) = chat.turns().last() {
            println!("{}", view::render_turn(turn));
        }
        println!("{}", chat.status_line());
        let result = send_chat(transport, &request).await;
        chat.complete(result);
        if let Some(turn) = chat.turns().last() {
            println!("{}", view::render_turn(turn));
        }
    }

    info!(turns = chat.turns().len(), "chat closed");
    Ok(())
}

async fn run_health(transport: &HttpTransport) -> Result<()> {
    let health = transport.health().await?;
    println!(
        "{} is {}",
        health.service.as_deref().unwrap_or("backend"),
        health.status
    );
    Ok(())
}
