use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod app;
mod audio;
mod config;
mod error;
mod layout;
mod library;
mod playback;
mod runtime;
mod ui;
mod visualizer;

use layout::ViewportClass;
use runtime::LayoutTarget;

#[derive(Parser, Debug)]
#[command(author, version, about = "A terminal graffiti wall where every tag plays a track", long_about = None)]
struct Cli {
    /// Catalog file (.json or .toml). Overrides `content.catalog`.
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the tag wall (default).
    Wall,
    /// Print the computed tag layout as JSON.
    Layout {
        /// Viewport class to lay out for.
        #[arg(long, value_enum, required_unless_present = "width", conflicts_with = "width")]
        viewport: Option<ViewportArg>,
        /// Viewport width in px, classified with the configured breakpoints.
        #[arg(long)]
        width: Option<u32>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ViewportArg {
    Narrow,
    Medium,
    Wide,
}

impl From<ViewportArg> for ViewportClass {
    fn from(v: ViewportArg) -> Self {
        match v {
            ViewportArg::Narrow => ViewportClass::Narrow,
            ViewportArg::Medium => ViewportClass::Medium,
            ViewportArg::Wide => ViewportClass::Wide,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref();

    match cli.command.unwrap_or(Commands::Wall) {
        Commands::Wall => runtime::run_wall(catalog),
        Commands::Layout { viewport, width } => {
            let target = match (viewport, width) {
                (Some(v), _) => LayoutTarget::Class(v.into()),
                (None, Some(px)) => LayoutTarget::Width(px),
                (None, None) => LayoutTarget::Class(ViewportClass::Wide),
            };
            runtime::run_layout(catalog, target)
        }
    }
}
