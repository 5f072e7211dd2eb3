mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, SavedCommand};
use fnafeed::config::Config;
use fnafeed::media::Gateway;
use fnafeed::types::MediaItem;
use fnafeed::Feed;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides; logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fnafeed=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url.clone() {
        config.database_url = Some(url);
    }

    // pure mapping; no database or network needed
    if let Commands::Url { hash } = &cli.command {
        let url = Gateway::from_config(&config)
            .resolve_media_url(Some(hash))
            .ok_or_else(|| anyhow!("empty hash"))?;
        println!("{}", url);
        return Ok(());
    }

    let feed = Feed::connect(config).await?;

    match cli.command {
        Commands::Latest { limit, category } => {
            let items = feed.latest(limit, category.as_deref()).await;
            print_items(&feed, &items, cli.json)?;
        }
        Commands::Trending { limit } => {
            let items = feed.trending(limit).await;
            print_items(&feed, &items, cli.json)?;
        }
        Commands::Search { query, limit } => {
            let items = feed.search(&query, limit).await;
            if items.is_empty() && !cli.json {
                println!("No results for \"{}\"", query);
            }
            print_items(&feed, &items, cli.json)?;
        }
        Commands::Saved { action } => match action {
            SavedCommand::List => {
                let items = feed.saved().list().await;
                if items.is_empty() && !cli.json {
                    println!("No saved videos yet.");
                }
                print_items(&feed, &items, cli.json)?;
            }
            SavedCommand::Add { id, window } => {
                if feed.save_by_id(&id, window).await? {
                    println!("Saved {}", id);
                } else {
                    println!("{} was already saved", id);
                }
            }
            SavedCommand::Remove { id } => {
                if !feed.saved().unsave(&id).await {
                    return Err(anyhow!("could not update saved videos"));
                }
                println!("Removed {}", id);
            }
            SavedCommand::Check { id } => {
                let saved = feed.saved().is_saved(&id).await;
                if cli.json {
                    println!("{}", serde_json::json!({ "id": id, "saved": saved }));
                } else {
                    println!("{}: {}", id, if saved { "saved" } else { "not saved" });
                }
            }
            SavedCommand::Clear => {
                if !feed.saved().clear().await {
                    return Err(anyhow!("could not clear saved videos"));
                }
                println!("Cleared saved videos");
            }
        },
        Commands::Url { .. } => unreachable!("handled before connecting"),
        Commands::Download { id, dir, window } => {
            let item = feed
                .find_item(&id, window)
                .await
                .ok_or_else(|| anyhow!("no item {} among the {} newest or saved", id, window))?;
            let mut last_pct = None;
            let result = feed
                .download(&item, &dir, |p| {
                    if let Some(total) = p.total.filter(|t| *t > 0) {
                        let pct = p.downloaded * 100 / total;
                        if last_pct != Some(pct) && pct % 10 == 0 {
                            eprintln!("{}%", pct);
                            last_pct = Some(pct);
                        }
                    }
                })
                .await?;
            println!("Downloaded {} ({} bytes)", result.path.display(), result.bytes);
        }
    }
    Ok(())
}

fn print_items<S, K>(feed: &Feed<S, K>, items: &[MediaItem], json: bool) -> Result<()>
where
    S: fnafeed::remote::FeedSource,
    K: fnafeed::storage::KeyValueStore,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    for item in items {
        println!("{}  {}", item.id, item.caption.as_deref().unwrap_or("(untitled)"));
        if let Some(overview) = item.overview.as_deref() {
            println!("    {}", overview);
        }
        let date = item.formatted_date();
        println!(
            "    by {} | {} | {}",
            item.uploader_or_default(),
            if date.is_empty() { "Unknown date" } else { date.as_str() },
            item.tags().join(" ")
        );
        match feed.media_url(item) {
            Some(url) => println!("    video: {}", url),
            None => println!("    thumbnail: {}", feed.thumbnail_url(item)),
        }
    }
    Ok(())
}
