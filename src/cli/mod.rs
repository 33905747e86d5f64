use clap::{Parser, Subcommand};

use crate::config::DEFAULT_BASE_URL;
use crate::search::{SortDirection, SortField};

#[derive(Parser)]
#[command(name = "advocate-directory", version, about = "Searchable advocate directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the directory API
    Serve(ServeOpts),
    /// Load sample advocates into the store
    Seed(SeedOpts),
    /// Query a running server
    Search(SearchOpts),
    Config(ConfigOpts),
    Version,
}

#[derive(clap::Args, Default)]
pub struct ServeOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    #[arg(short, long)]
    pub port: Option<u16>,
    #[arg(short, long)]
    pub bind: Option<String>,
    /// SQLite path or `sqlite://` URL, overriding the config file
    #[arg(short, long, env = "DATABASE_URL")]
    pub database: Option<String>,
}

#[derive(clap::Args)]
pub struct SeedOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    #[arg(short, long, env = "DATABASE_URL")]
    pub database: Option<String>,
    /// Insert even when the store already has records
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct SearchOpts {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub url: String,
    #[arg(short, long)]
    pub q: Option<String>,
    #[arg(long, value_parser = parse_sort_field)]
    pub order_by: Option<SortField>,
    #[arg(long, value_parser = parse_sort_direction)]
    pub sort: Option<SortDirection>,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Validate,
    Init,
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|e: crate::search::QueryError| e.to_string())
}

fn parse_sort_direction(s: &str) -> Result<SortDirection, String> {
    s.parse()
}
