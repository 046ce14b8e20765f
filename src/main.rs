use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use master_controller::injection::{FileStyleSink, StyleDocument};
use master_controller::tokens::presets::{ColorPreset, TypographyPreset};
use master_controller::{load_engine_config, logging, Engine};

#[derive(Parser)]
#[command(name = "master-controller")]
#[command(about = "Compile design tokens into a fluid stylesheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the stylesheet for the stored tokens
    Render {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Export all tokens to a JSON backup
    Export { path: PathBuf },
    /// Import tokens from a JSON backup
    Import { path: PathBuf },
    /// Restore every token to its default
    Reset,
    /// List presets, or apply one
    Presets {
        #[arg(long)]
        typography: Option<String>,
        #[arg(long)]
        colors: Option<String>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = load_engine_config();
    let engine = Engine::open(config).context("failed to open token storage")?;

    match cli.command {
        Command::Render { out } => render(&engine, out)?,
        Command::Export { path } => {
            engine
                .export_to_file(&path)
                .with_context(|| format!("failed to export to {}", path.display()))?;
        }
        Command::Import { path } => {
            engine
                .import_file(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
        }
        Command::Reset => engine.stores().reset_all(),
        Command::Presets { typography, colors } => presets(&engine, typography, colors)?,
    }
    Ok(())
}

fn render(engine: &Engine, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            let scheduler = engine.scheduler(FileStyleSink::new(path.clone()));
            scheduler.mount();
            if scheduler.injection_count() == 0 {
                bail!("failed to write stylesheet to {}", path.display());
            }
        }
        None => {
            let scheduler = engine.scheduler(StyleDocument::new());
            scheduler.mount();
            let document = scheduler.sink();
            let css = document
                .style_text(scheduler.element_id())
                .context("stylesheet was not injected")?;
            println!("{css}");
        }
    }
    Ok(())
}

fn presets(engine: &Engine, typography: Option<String>, colors: Option<String>) -> Result<()> {
    if typography.is_none() && colors.is_none() {
        let typography_ids: Vec<_> = TypographyPreset::all().iter().map(|p| p.id()).collect();
        let color_ids: Vec<_> = ColorPreset::all().iter().map(|p| p.id()).collect();
        println!("typography: {}", typography_ids.join(", "));
        println!("colors: {}", color_ids.join(", "));
        return Ok(());
    }

    if let Some(id) = typography {
        let preset = TypographyPreset::from_id(&id)
            .with_context(|| format!("unknown typography preset {id:?}"))?;
        engine.stores().apply_typography_preset(preset);
    }
    if let Some(id) = colors {
        let preset =
            ColorPreset::from_id(&id).with_context(|| format!("unknown color preset {id:?}"))?;
        engine.stores().apply_color_preset(preset);
    }
    Ok(())
}
