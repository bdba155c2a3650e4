//! pdfcombine - Combine PDF and image files into a single PDF document.

mod cli;
mod output;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::output::OutputFormatter;
use pdfcombine::config::{Config, OverwriteMode};
use pdfcombine::error::PdfCombineError;
use pdfcombine::io::{PdfWriter, SourceReader};
use pdfcombine::manifest::JobManifest;
use pdfcombine::merge::Merger;
use pdfcombine::plan::build_plan;
use pdfcombine::queue::FileQueue;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pdfcombine=debug"
    } else {
        "pdfcombine=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfCombineError> {
    cli.validate()?;

    let manifest = match &cli.manifest {
        Some(path) => Some(JobManifest::load(path).await?),
        None => None,
    };

    let positional = expand_inputs(&cli.inputs)?;

    let base = manifest
        .as_ref()
        .map(|manifest| manifest.options.clone())
        .unwrap_or_default();
    let options = cli.document_options(base)?;

    let mut all_inputs: Vec<PathBuf> = manifest
        .iter()
        .flat_map(|manifest| manifest.files.iter().map(|file| file.path.clone()))
        .collect();
    all_inputs.extend(positional.iter().cloned());

    let config = cli.to_config(all_inputs, &options)?;
    let formatter = OutputFormatter::from_config(&config);

    formatter.debug(&format!("{} v{}", pdfcombine::NAME, pdfcombine::VERSION));

    let reader = SourceReader::new();
    let mut queue = match &manifest {
        Some(manifest) => manifest.load_queue(&reader).await?,
        None => FileQueue::new(),
    };
    for path in &positional {
        let mut file = reader.load_path(path).await?;
        cli.apply_file_settings(&mut file)?;
        queue.push(file);
    }

    for file in queue.iter() {
        formatter.file_summary(file);
    }

    if config.dry_run {
        let plan = build_plan(queue.as_slice(), &options);
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| PdfCombineError::other(format!("Failed to encode plan: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let writer = PdfWriter::new();
    check_output(&config, &formatter, &writer).await?;

    let result = Merger::new().merge(queue.as_slice(), &options).await?;
    formatter.plan_summary(&result.plan);

    let write_stats = writer.save(result.bytes, &config.output).await?;

    formatter.success(&format!(
        "Created {} ({})",
        config.output.display(),
        write_stats.format_file_size()
    ));

    if formatter.is_verbose() {
        formatter.section("Statistics");
        formatter.detail("Input files", &result.statistics.files_merged.to_string());
        formatter.detail("Total pages", &result.statistics.total_pages.to_string());
        formatter.detail("Blank pages", &result.statistics.blank_pages.to_string());
        formatter.detail("Image pages", &result.statistics.image_pages.to_string());
        formatter.detail("Output size", &write_stats.format_file_size());
        formatter.detail(
            "Merge time",
            &format!("{:.2}s", result.statistics.merge_time.as_secs_f64()),
        );
        formatter.detail(
            "Write time",
            &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
        );
        if !result.plan.post.metadata.is_empty() {
            formatter.detail("Metadata", "Set");
        }
    }

    Ok(())
}

/// Expand glob patterns in the positional inputs.
///
/// Matches are sorted. A pattern without matches is kept as a literal path
/// so reading it reports the missing file.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, PdfCombineError> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !is_glob(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| {
            PdfCombineError::invalid_config(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable glob match");
                    None
                }
            })
            .collect();

        if matches.is_empty() {
            tracing::warn!(pattern, "Glob pattern matched no files");
            paths.push(PathBuf::from(pattern));
        } else {
            matches.sort();
            paths.extend(matches);
        }
    }

    Ok(paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Make sure the output can be written before any merge work starts.
async fn check_output(
    config: &Config,
    formatter: &OutputFormatter,
    writer: &PdfWriter,
) -> Result<(), PdfCombineError> {
    writer.can_write(&config.output).await?;
    handle_output_overwrite(config, formatter, writer).await
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    writer: &PdfWriter,
) -> Result<(), PdfCombineError> {
    if !writer.exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfCombineError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfCombineError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfCombineError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfCombineError::Cancelled)
            }
        }
    }
}
