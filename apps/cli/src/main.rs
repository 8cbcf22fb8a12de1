// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! planread - recognise columns, walls and beams in a CAD entity snapshot.
//!
//! # Commands
//!
//! - `planread recognize <snapshot.json>` - run a recognition session and
//!   write the export document (or only the summary)
//! - `planread match-profile <plan.json> <detail.json>` - find the pose under
//!   which an enlarged column detail reproduces a plan outline

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planread_geometry::{Point2D, Polygon};
use planread_recognition::{
    match_profile, DrawingSnapshot, MemoryDrawing, RecognitionConfig, RecognitionSession,
};
use tracing_subscriber::EnvFilter;

mod config;
mod error_log;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "planread",
    about = "Recognise structural elements in 2D CAD line work",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recognise columns, walls and beams in an entity snapshot
    Recognize {
        /// Entity snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        input: PathBuf,

        /// Recognition configuration (JSON); defaults apply when omitted
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Write the export document here instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Write the recognised elements as a drawing snapshot
        #[arg(long, value_name = "DRAWING")]
        drawing: Option<PathBuf>,

        /// Base point X for exported coordinates
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        base_x: f64,

        /// Base point Y for exported coordinates
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        base_y: f64,

        /// Print the diagnostic summary only
        #[arg(long)]
        summary_only: bool,
    },

    /// Match an enlarged column detail against a plan outline
    MatchProfile {
        /// Plan outline polygon (JSON)
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Detail outline polygon (JSON)
        #[arg(value_name = "DETAIL")]
        detail: PathBuf,

        /// Enlargement of the detail relative to the plan
        #[arg(short, long, default_value_t = 5.0)]
        multiple: f64,

        /// Vertex distance tolerance at plan scale
        #[arg(short, long, default_value_t = 5.0)]
        tolerance: f64,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Recognize { .. } => "recognize",
            Commands::MatchProfile { .. } => "match-profile",
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,planread_recognition=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let command = cli.command.name();

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(command, error = %format!("{:#}", e), "command failed");
            if let Err(log_err) = error_log::append(&config.error_log, command, &e) {
                tracing::warn!(error = %log_err, "could not write error log");
            }
            eprintln!(
                "planread {} failed; details were written to {}",
                command,
                config.error_log.display()
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Recognize {
            input,
            config: recognition_config,
            output,
            drawing,
            base_x,
            base_y,
            summary_only,
        } => recognize(
            &input,
            recognition_config.as_deref(),
            output.as_deref(),
            drawing.as_deref(),
            Point2D::new(base_x, base_y),
            summary_only,
            config,
        ),
        Commands::MatchProfile {
            plan,
            detail,
            multiple,
            tolerance,
        } => profile(&plan, &detail, multiple, tolerance),
    }
}

fn recognize(
    input: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    drawing: Option<&Path>,
    base: Point2D,
    summary_only: bool,
    config: &Config,
) -> Result<()> {
    let recognition_config = match config_path {
        Some(path) => RecognitionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecognitionConfig::default(),
    };

    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
    let snapshot = DrawingSnapshot::from_json(&json)
        .with_context(|| format!("Failed to parse snapshot {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        entities = snapshot.entities.len(),
        "Loaded entity snapshot"
    );

    let mut session = RecognitionSession::new(recognition_config).context("Invalid configuration")?;
    let result = session.run(&snapshot.entities).context("Recognition failed")?;

    println!("{}", result.report);
    if summary_only {
        return Ok(());
    }

    let document = session.export(base).to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write export {}", path.display()))?;
            tracing::info!(output = %path.display(), "Wrote export document");
        }
        None => println!("{}", document),
    }

    if let Some(path) = drawing {
        let mut sink = MemoryDrawing::starting_at(config.first_drawn_id);
        session.emit(&mut sink);
        let drawn = sink.into_snapshot();
        std::fs::write(path, drawn.to_json()?)
            .with_context(|| format!("Failed to write drawing {}", path.display()))?;
        tracing::info!(
            output = %path.display(),
            entities = drawn.entities.len(),
            "Wrote recognised drawing"
        );
    }

    Ok(())
}

fn read_polygon(path: &Path) -> Result<Polygon> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read polygon {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse polygon {}", path.display()))
}

fn profile(plan: &Path, detail: &Path, multiple: f64, tolerance: f64) -> Result<()> {
    anyhow::ensure!(multiple > 0.0, "multiple must be positive, got {}", multiple);
    let plan = read_polygon(plan)?;
    let detail = read_polygon(detail)?;

    let found = match_profile(&plan, &detail, multiple, tolerance);
    println!("{}", serde_json::to_string_pretty(&found)?);
    if found.matched {
        tracing::info!(
            mirrored = found.mirrored,
            angle_deg = found.angle.to_degrees(),
            "Detail matches plan outline"
        );
    } else {
        tracing::info!("Detail does not match plan outline");
    }
    Ok(())
}
