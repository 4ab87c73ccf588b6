//! scanbox CLI - enclosure part generator
//!
//! Emits OpenSCAD scripts for every part of the scanner enclosure and
//! optionally drives OpenSCAD to mesh them into printable STLs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scanbox::{catalog, export, EnclosureConfig};

#[derive(Parser)]
#[command(name = "scanbox")]
#[command(about = "Printable enclosure parts for a laser-scanning device", long_about = None)]
struct Cli {
    /// TOML configuration overriding the built-in enclosure dimensions
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Glyph STL stenciled into the top shells
    #[arg(long, global = true)]
    logo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every part in the catalog
    List,
    /// Write OpenSCAD scripts, and the catalog as JSON, into a directory
    Emit {
        /// Output directory (created if missing)
        #[arg(short, long, default_value = "parts")]
        out: PathBuf,
        /// Emit only the named part
        part: Option<String>,
    },
    /// Mesh parts to STL via the external renderer
    Render {
        /// Output directory (created if missing)
        #[arg(short, long, default_value = "parts")]
        out: PathBuf,
        /// Renderer binary
        #[arg(long, default_value = export::DEFAULT_RENDERER)]
        renderer: String,
        /// Render only the named part
        part: Option<String>,
    },
    /// Show tree size and bounding box of one part
    Info {
        /// Catalog name of the part
        part: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => EnclosureConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EnclosureConfig::default(),
    };
    let logo = cli.logo.as_deref();

    match cli.command {
        Commands::List => {
            for part in catalog::all(&cfg, logo) {
                println!("{}", part.name);
            }
        }
        Commands::Emit { out, part } => {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            for part in selected(&cfg, logo, part.as_deref())? {
                let path = export::write_scad(&part, &out)?;
                println!("wrote {}", path.display());
            }
            let doc_path = out.join("catalog.json");
            std::fs::write(&doc_path, catalog::to_document(&cfg, logo).to_json()?)
                .with_context(|| format!("writing {}", doc_path.display()))?;
            println!("wrote {}", doc_path.display());
        }
        Commands::Render { out, renderer, part } => {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            for part in selected(&cfg, logo, part.as_deref())? {
                let path = export::render_stl(&part, &out, &renderer)?;
                println!("rendered {}", path.display());
            }
        }
        Commands::Info { part } => {
            let Some(part) = catalog::find(&cfg, logo, &part) else {
                bail!("no part named `{part}`; see `scanbox list`");
            };
            let bb = part.solid.bounding_box();
            let size = bb.size();
            println!("{}", part.name);
            println!("  nodes: {}", part.solid.node_count());
            println!(
                "  bounds: [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
                bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z
            );
            println!("  size: {:.2} x {:.2} x {:.2} mm", size.x, size.y, size.z);
        }
    }

    Ok(())
}

fn selected(
    cfg: &EnclosureConfig,
    logo: Option<&std::path::Path>,
    name: Option<&str>,
) -> Result<Vec<catalog::NamedPart>> {
    match name {
        Some(name) => match catalog::find(cfg, logo, name) {
            Some(part) => Ok(vec![part]),
            None => bail!("no part named `{name}`; see `scanbox list`"),
        },
        None => Ok(catalog::all(cfg, logo)),
    }
}
