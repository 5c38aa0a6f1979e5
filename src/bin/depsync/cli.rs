//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use depsync::ManifestFormat;

/// depsync - reconcile build manifests with a component inventory
#[derive(Parser)]
#[command(name = "depsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile a repository's dependencies with the inventory
    Sync(SyncArgs),

    /// Print the dependencies found in a manifest
    Parse(ParseArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct SyncArgs {
    /// Manifest format
    #[arg(short, long)]
    pub format: ManifestFormat,

    /// Manifest file
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Secondary manifest merged into the first
    #[arg(long)]
    pub manifest_other: Option<PathBuf>,

    /// Hosting platform name (e.g. github.com/acme)
    #[arg(long)]
    pub vcs_host: String,

    /// Code repository name
    #[arg(long)]
    pub repository: String,

    /// Application that maintains the repository
    #[arg(long)]
    pub application: Option<String>,

    /// Implementation language
    #[arg(long)]
    pub language: Option<String>,

    /// Language version
    #[arg(long, requires = "language")]
    pub language_version: Option<String>,

    /// Config file (replaces ~/.depsync/config.toml and ./depsync.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of parallel resolution threads
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Print counts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Manifest format
    #[arg(short, long)]
    pub format: ManifestFormat,

    /// Manifest file
    pub manifest: PathBuf,

    /// Secondary manifest merged into the first
    #[arg(long)]
    pub other: Option<PathBuf>,

    /// Print dependencies as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
