use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse, search and save videos from the FNA feed
#[derive(Parser)]
#[command(name = "fnafeed")]
#[command(about = "Browse, search and save videos from the FNA feed", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Local database URL (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Newest videos, optionally for one category
    Latest {
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Newest videos in random order
    Trending {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Search caption, overview and tags of trending videos
    Search {
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Manage saved videos
    Saved {
        #[command(subcommand)]
        action: SavedCommand,
    },
    /// Print the gateway URL for a content hash
    Url {
        hash: String,
    },
    /// Download a video by id
    Download {
        id: String,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// How many recent items to look through
        #[arg(short, long, default_value_t = 50)]
        window: usize,
    },
}

#[derive(Subcommand)]
pub enum SavedCommand {
    /// List saved videos
    List,
    /// Save a video by id
    Add {
        id: String,
        /// How many recent items to look through
        #[arg(short, long, default_value_t = 50)]
        window: usize,
    },
    /// Remove a saved video
    Remove { id: String },
    /// Check whether a video is saved
    Check { id: String },
    /// Remove all saved videos
    Clear,
}
