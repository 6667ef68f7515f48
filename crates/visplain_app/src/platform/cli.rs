//! Command line definitions for the `visplain` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "visplain",
    version,
    about = "Generate code graphs and repository summaries with a Visplain backend"
)]
pub struct Cli {
    /// RON configuration file. Defaults to `visplain.ron` when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend origin, e.g. `http://127.0.0.1:5000`.
    #[arg(long, global = true, value_name = "URL")]
    pub origin: Option<String>,

    /// Directory receiving the rendered pages and images.
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a source file or point at a repository and render its graph.
    Graph(GraphArgs),
    /// Summarize every file of a repository and render the pipeline diagram.
    Summary(RepoArgs),
}

/// Repository details. Emptiness is checked by the form, not here.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoArgs {
    /// Repository owner.
    #[arg(long)]
    pub owner: Option<String>,
    /// Repository name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Source file to upload (.py, .txt or .md).
    #[arg(long, value_name = "PATH", conflicts_with_all = ["owner", "name"])]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Zoom factor applied to the graph before the page is written.
    #[arg(long)]
    pub zoom: Option<f32>,
}
