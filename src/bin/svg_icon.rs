//! svg-icon - render icons from an icon registry
//!
//! Usage:
//!   svg-icon --registry icons.json list
//!   svg-icon --registry icons.json render <id>
//!   svg-icon --registry icons.json resolve <id>
//!   svg-icon --registry icons.json preview <id> --size 64 --output icon.png

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use svg_icon_system::svg::raster;
use svg_icon_system::unique_id::DEFAULT_ID_LENGTH;
use svg_icon_system::{IconRegistry, IconRenderer};

#[derive(Parser, Debug)]
#[command(name = "svg-icon", version, about = "Render accessible inline SVG icons")]
struct Cli {
    /// Path to the JSON icon registry
    #[arg(short, long)]
    registry: PathBuf,

    /// Minimum length of generated ARIA ids
    #[arg(long, default_value_t = DEFAULT_ID_LENGTH)]
    id_length: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered icon ids
    List,
    /// Print the inline <svg> markup for an icon
    Render { icon_id: String },
    /// Print the resolved icon configuration as JSON
    Resolve { icon_id: String },
    /// Rasterize an icon to a PNG file
    Preview {
        icon_id: String,
        /// Size in pixels of the longer side
        #[arg(short, long, default_value_t = 64)]
        size: u32,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let registry = IconRegistry::from_path(&cli.registry)
        .with_context(|| format!("Failed to load icon registry {}", cli.registry.display()))?;
    let renderer = IconRenderer::new(registry).with_id_length(cli.id_length);

    match cli.command {
        Command::List => {
            for icon_id in renderer.registry().icon_ids() {
                println!("{icon_id}");
            }
        }
        Command::Render { icon_id } => {
            println!("{}", renderer.render_icon(&icon_id)?);
        }
        Command::Resolve { icon_id } => {
            let config = renderer.resolve(&icon_id)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Preview { icon_id, size, output } => {
            let markup = renderer.render_icon(&icon_id)?;
            let image = raster::rasterize(&markup, size)
                .ok_or_else(|| anyhow!("Icon '{icon_id}' could not be rasterized"))?;
            image
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!(
                "wrote {}x{} preview to {}",
                image.width(),
                image.height(),
                output.display()
            );
        }
    }

    Ok(())
}
