//! Koma CLI - browse the catalog and resolve episodes from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use koma::catalog::{filter_episodes, filter_series, tag_counts};
use koma::config::Config;
use koma::console::Console;
use koma::resolver::EpisodeOutcome;
use koma::session::{Direction, ViewMode};
use koma::store::open_store;
use koma::Reader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Manga catalog browser and episode resolver.
#[derive(Parser, Debug)]
#[command(name = "koma")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use this config file instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List series, optionally filtered by tag or update date.
    Series {
        /// Keep series carrying this tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Keep series updated on this date.
        #[arg(long)]
        updated: Option<String>,

        /// Show at most N series.
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },

    /// List the episodes of a series.
    Episodes {
        slug: String,

        /// Episode number, label fragment, or range such as 1-12.
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// List tags and how many series carry each.
    Tags,

    /// Resolve an episode and print its pages in reading order.
    Read {
        slug: String,

        episode: String,

        /// Show one page at a time.
        #[arg(long)]
        paginated: bool,

        /// Start at page N (1-based, paginated mode).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("koma=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let console = Console::new();

    if let Err(err) = run(args, &console).await {
        console.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run(args: Args, console: &Console) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    match args.command {
        Command::Series {
            tags,
            updated,
            limit,
        } => list_series(&config, console, &tags, updated.as_deref(), limit).await,
        Command::Episodes { slug, filter } => {
            list_episodes(&config, console, &slug, &filter).await
        }
        Command::Tags => list_tags(&config, console).await,
        Command::Read {
            slug,
            episode,
            paginated,
            page,
        } => read(&config, console, &slug, &episode, paginated, page).await,
    }
}

async fn list_series(
    config: &Config,
    console: &Console,
    tags: &[String],
    updated: Option<&str>,
    limit: usize,
) -> Result<()> {
    let store = open_store(&config.store)?;
    let series = store.list_series().await.context("Failed to list series")?;

    let shown = filter_series(&series, tags, updated, limit);
    console.section(&format!("{} series", shown.len()));
    for s in shown {
        println!(
            "{}  {}  ({} episodes, {} views)",
            s.slug.trim_matches('/'),
            s.name,
            s.episodes.len(),
            s.views
        );
    }
    Ok(())
}

async fn list_episodes(config: &Config, console: &Console, slug: &str, filter: &str) -> Result<()> {
    let store = open_store(&config.store)?;
    let Some(series) = store.get_series(slug).await.context("Failed to load series")? else {
        anyhow::bail!("Series not found: {}", slug);
    };
    let episodes = store
        .list_episodes(slug)
        .await
        .context("Failed to list episodes")?;

    console.section(&series.name);
    let shown = filter_episodes(&episodes, filter);
    if shown.is_empty() {
        console.warning("No episode matches that filter");
    }
    for ep in shown {
        let pages = ep
            .declared_pages()
            .map(|n| format!("{} pages", n))
            .unwrap_or_else(|| "pages unknown".to_string());
        println!(
            "{}  {}  {}",
            console.episode(ep.label.as_str()),
            pages,
            ep.created_at.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn list_tags(config: &Config, console: &Console) -> Result<()> {
    let store = open_store(&config.store)?;
    let series = store.list_series().await.context("Failed to list series")?;

    console.section("Tags");
    for (tag, count) in tag_counts(&series) {
        println!("{}  ({})", tag, count);
    }
    Ok(())
}

async fn read(
    config: &Config,
    console: &Console,
    slug: &str,
    episode: &str,
    paginated: bool,
    page: Option<u32>,
) -> Result<()> {
    let mut reader = Reader::from_config(config)?;
    if paginated || page.is_some() {
        reader.switch_view_mode(ViewMode::Paginated { page: 0 });
    }

    let outcome = reader
        .open_episode(slug, episode)
        .await
        .context("Failed to resolve episode")?;

    let resolved = match outcome {
        EpisodeOutcome::Found(resolved) => resolved,
        EpisodeOutcome::SeriesNotFound => anyhow::bail!("Series not found: {}", slug),
        EpisodeOutcome::Exhausted { requested } => {
            anyhow::bail!("No readable episode at or below {} for {}", requested, slug)
        }
    };

    console.section(&format!(
        "{} / {}",
        resolved.series_name,
        console.episode(resolved.served.as_str())
    ));
    if resolved.fell_back() {
        console.warning(&format!(
            "Episode {} is not available, showing episode {}",
            resolved.requested, resolved.served
        ));
    }

    for _ in 1..page.unwrap_or(1) {
        reader.next_page();
    }

    let session = reader.session();
    let total = session.pages().len();
    if let Some(current) = session.current_page() {
        console.info(&format!("Paginated view, page {} of {}", current + 1, total));
    }
    for (index, url) in session.pages().iter().enumerate() {
        console.page(index, total, url, session.current_page() == Some(index));
    }

    let prev = session.adjacent_episode(Direction::Previous);
    let next = session.adjacent_episode(Direction::Next);
    println!();
    println!(
        "{}    {}",
        console.nav(
            &prev.as_ref().map_or("< prev".to_string(), |ep| format!("< episode {}", ep)),
            prev.is_some()
        ),
        console.nav(
            &next.as_ref().map_or("next >".to_string(), |ep| format!("episode {} >", ep)),
            next.is_some()
        ),
    );

    console.success(&format!("{} pages", total));
    Ok(())
}
