// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe VTK CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use polyframe_vtk::cli::Reporter;
use polyframe_vtk::config::{ExportConfig, RendererKind};
use polyframe_vtk::{demos, io, VtkRenderer};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polyframe-vtk")]
#[command(about = "Export scenes to VTK PolyData, MultiBlock and time-series files", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./polyframe-vtk.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenes
    List,

    /// Render a built-in scene
    Render {
        /// Scene name, see `list`
        scene: String,

        /// Write a static snapshot when the scene finishes
        #[arg(long)]
        vtk_export: bool,

        /// Write one frame per update and a .pvd manifest
        #[arg(long)]
        vtk_time_series: bool,

        /// Renderer backend (cairo, vtk)
        #[arg(long)]
        renderer: Option<RendererKind>,

        /// Root output directory
        #[arg(long, value_name = "DIR")]
        media_dir: Option<PathBuf>,

        /// Frames per second
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Summarize a written .vtp, .vtm or .pvd file
    Inspect {
        /// File to inspect
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = ExportConfig::from_file(path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => ExportConfig::load()?,
    };

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();
    debug!("Configuration loaded: {config:?}");

    let result = match cli.command {
        Commands::List => {
            Reporter::report_demos(&demos::all());
            Ok(())
        }
        Commands::Render {
            scene,
            vtk_export,
            vtk_time_series,
            renderer,
            media_dir,
            fps,
        } => {
            let mut config = config;
            config.vtk_export |= vtk_export;
            config.vtk_time_series |= vtk_time_series;
            if let Some(renderer) = renderer {
                config.renderer = renderer;
            }
            if let Some(dir) = media_dir {
                config.media_dir = dir;
            }
            if let Some(fps) = fps {
                config.frame_rate = fps;
            }
            config.validate().and_then(|_| render_command(&scene, config))
        }
        Commands::Inspect { file } => inspect_command(&file),
        Commands::Version => {
            println!("Polyframe VTK v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = &result {
        Reporter::report_error(&format!("{e:#}"));
    }
    result
}

fn render_command(name: &str, config: ExportConfig) -> Result<()> {
    let demo = demos::find(name)?;
    if !config.exports_vtk() {
        Reporter::report_warning("No VTK output requested; the scene is only played");
    }

    let mut renderer = VtkRenderer::new(config);
    let steps = demo.steps().len() as u64;
    let progress = ProgressBar::new(steps);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    progress.set_message(demo.name);

    let start = Instant::now();
    let written = demo.run(&mut renderer, |done, _| progress.set_position(done as u64))?;
    progress.finish_and_clear();

    Reporter::report_render(demo.name, &written, start.elapsed());
    Ok(())
}

fn inspect_command(file: &Path) -> Result<()> {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        io::VTP_EXT => {
            let summary = io::read_polydata_summary(file)?;
            Reporter::report_polydata(file, &summary);
        }
        io::PVD_EXT => {
            let records = io::read_collection(file)?;
            Reporter::report_collection(file, &records);
        }
        io::VTM_EXT => {
            let base = file.parent().unwrap_or_else(|| Path::new("."));
            for block in io::read_multiblock(file)? {
                let member = base.join(&block.file);
                let summary = io::read_polydata_summary(&member)?;
                Reporter::report_polydata(&member, &summary);
            }
        }
        other => bail!("Cannot inspect '.{other}' files; expected .vtp, .vtm or .pvd"),
    }

    Reporter::success("Inspection complete");
    Ok(())
}
