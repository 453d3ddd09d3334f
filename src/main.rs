// src/main.rs
mod config;
mod extractors;
mod input;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};

use crate::config::{load_config, ExtractionConfig};
use crate::extractors::{process_document, DocumentRecords};
use crate::input::archive::{find_spreadsheets, prepare_input};
use crate::input::reader::load_grid;
use crate::storage::{consolidate, write_run_metadata, write_workbook, RunEntry};
use crate::utils::logging::setup_logging;
use crate::utils::AppError;

/// Batch extractor for Korean property-registry summary exports: pulls the
/// ownership-share, ownership-event, and lien sections out of every
/// spreadsheet in a folder or zip archive and consolidates them into one
/// three-sheet workbook.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory or .zip archive containing the .xlsx exports
    input: PathBuf,

    /// Path of the consolidated output workbook
    #[arg(short, long, default_value = "등기사항_통합.xlsx")]
    output: PathBuf,

    /// JSON keyword-configuration file overriding the built-in template
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip writing the run-metadata sidecar next to the workbook
    #[arg(long)]
    no_metadata: bool,
}

fn main() -> Result<(), AppError> {
    setup_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let (input_dir, _scratch) = prepare_input(&args.input)?;
    let files = find_spreadsheets(&input_dir);
    if files.is_empty() {
        warn!("No .xlsx files found under {}", input_dir.display());
    } else {
        info!("Found {} spreadsheet(s) to process", files.len());
    }

    let mut share = Vec::new();
    let mut rights = Vec::new();
    let mut liens = Vec::new();
    let mut entries = Vec::with_capacity(files.len());

    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        match process_file(file, &config) {
            Ok(records) => {
                entries.push(RunEntry::extracted(&name, records.row_counts()));
                share.extend(records.share);
                rights.extend(records.rights);
                liens.extend(records.liens);
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                entries.push(RunEntry::skipped(&name, e.to_string()));
            }
        }
    }

    let tables = vec![
        consolidate(
            &config.sections.share.sheet_title,
            share,
            &config.id_column,
            &config.no_record,
        ),
        consolidate(
            &config.sections.rights.sheet_title,
            rights,
            &config.id_column,
            &config.no_record,
        ),
        consolidate(
            &config.sections.liens.sheet_title,
            liens,
            &config.id_column,
            &config.no_record,
        ),
    ];
    write_workbook(&tables, &args.output)?;

    if !args.no_metadata {
        match write_run_metadata(&args.output, &entries) {
            Ok(path) => info!("Run metadata written to {}", path.display()),
            Err(e) => error!("Failed to write run metadata: {}", e),
        }
    }

    let skipped = entries.iter().filter(|e| e.status == "skipped").count();
    info!(
        "Done: {} document(s) extracted, {} skipped, output at {}",
        entries.len() - skipped,
        skipped,
        args.output.display()
    );
    Ok(())
}

/// Decode and extract one document. Any per-file failure bubbles up as an
/// `AppError` and the batch keeps going.
fn process_file(path: &Path, config: &ExtractionConfig) -> Result<DocumentRecords, AppError> {
    info!("Processing {}", path.display());
    let grid = load_grid(path)?;
    let records = process_document(&grid, config)?;
    let (s, r, l) = records.row_counts();
    info!("Extracted {} share / {} rights / {} lien record(s)", s, r, l);
    Ok(records)
}
