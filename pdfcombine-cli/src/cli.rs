//! CLI argument parsing for pdfcombine.
//!
//! This module defines the command-line interface structure using `clap`.
//! It turns arguments into a run [`Config`] plus the [`DocumentOptions`] and
//! per-file settings handed to the library.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pdfcombine::config::{
    BlankPagePolicy, Config, DocumentOptions, Metadata, NumberPosition, OverwriteMode,
    PageNumbering, Rotation,
};
use pdfcombine::error::{PdfCombineError, Result};
use pdfcombine::queue::FileDescriptor;
use pdfcombine::range::parse_page_numbers;

/// Where blank pages go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlankMode {
    /// No blank pages.
    None,
    /// After every PDF input.
    EveryFile,
    /// After every PDF input that contributes an odd number of pages.
    OddPages,
    /// After the output pages listed with --blank-after.
    After,
}

/// Combine PDF and image files into a single PDF document.
///
/// Inputs are merged in the order given. PDFs contribute the pages selected
/// by --range; PNG and JPEG images become one page each.
#[derive(Parser, Debug)]
#[command(name = "pdfcombine")]
#[command(version)]
#[command(about = "Combine PDF and image files into a single PDF document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files or glob patterns, merged in order
    ///
    /// Examples:
    ///   pdfcombine cover.png report.pdf -o out.pdf
    ///   pdfcombine 'scans/*.jpg' -o scans.pdf
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// Defaults to the manifest's output name, or merged.pdf.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Read files and options from a JSON job manifest
    ///
    /// Positional inputs are queued after the manifest's files and the
    /// flags below override the manifest's options.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Dry run - print the build plan as JSON without writing output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show details about each input and the result
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Insert blank pages
    #[arg(long, value_name = "MODE", value_enum)]
    pub blank: Option<BlankMode>,

    /// Output page numbers to insert a blank page after (with --blank after)
    ///
    /// Accepts a range list such as "2,4-6". 0 inserts a blank first page.
    #[arg(long, value_name = "PAGES")]
    pub blank_after: Option<String>,

    /// Stamp page numbers at the bottom of every page
    #[arg(long)]
    pub page_numbers: bool,

    /// Horizontal position of page numbers
    #[arg(long, value_name = "POSITION")]
    #[arg(value_parser = ["left", "center", "right"])]
    pub number_position: Option<String>,

    /// Page number template; {n} is the page and {total} the page count
    #[arg(long, value_name = "FORMAT")]
    pub number_format: Option<String>,

    /// Pages to take from each positional PDF (e.g. "1-5,10")
    ///
    /// Page numbers are 1-indexed and taken in the order written.
    #[arg(long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Rotate each positional input clockwise by this many degrees
    #[arg(long, value_name = "DEGREES")]
    #[arg(value_parser = ["0", "90", "180", "270"])]
    pub rotate: Option<String>,

    /// Scale factor for positional image inputs
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f32>,
}

impl Cli {
    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither inputs nor a manifest are given
    /// - `--blank after` is missing its page list, or the list is given
    ///   without it
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.manifest.is_none() {
            return Err(PdfCombineError::invalid_config(
                "No input files specified. Pass files or --manifest",
            ));
        }

        match (self.blank, &self.blank_after) {
            (Some(BlankMode::After), None) => Err(PdfCombineError::invalid_config(
                "--blank after requires --blank-after",
            )),
            (mode, Some(_)) if mode != Some(BlankMode::After) => Err(
                PdfCombineError::invalid_config("--blank-after requires --blank after"),
            ),
            _ => Ok(()),
        }
    }

    /// Rotation requested with `--rotate`.
    pub fn rotation(&self) -> Result<Option<Rotation>> {
        self.rotate
            .as_deref()
            .map(|degrees| {
                let degrees: u16 = degrees.parse().map_err(|_| {
                    PdfCombineError::invalid_config(format!("Invalid rotation: {degrees}"))
                })?;
                Rotation::from_degrees(degrees)
            })
            .transpose()
    }

    /// Blank page policy requested with `--blank`.
    pub fn blank_policy(&self) -> Option<BlankPagePolicy> {
        self.blank.map(|mode| match mode {
            BlankMode::None => BlankPagePolicy::None,
            BlankMode::EveryFile => BlankPagePolicy::AfterEveryFile,
            BlankMode::OddPages => BlankPagePolicy::AfterFilesWithOddPageCount,
            BlankMode::After => BlankPagePolicy::AfterOutputPages(parse_page_numbers(
                self.blank_after.as_deref().unwrap_or_default(),
            )),
        })
    }

    /// Apply the flags on top of `base`, usually the manifest's options.
    ///
    /// # Errors
    ///
    /// Returns an error if the number position is not recognised.
    pub fn document_options(&self, base: DocumentOptions) -> Result<DocumentOptions> {
        let mut options = base;

        let metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
        );
        options.metadata = options.metadata.merged_with(metadata);

        if let Some(policy) = self.blank_policy() {
            options.blank_pages = policy;
        }

        let numbering_flags = self.number_position.is_some() || self.number_format.is_some();
        if self.page_numbers || numbering_flags {
            let mut numbering = options.page_numbering.take().unwrap_or_default();
            if let Some(position) = &self.number_position {
                numbering.position = position.parse::<NumberPosition>()?;
            }
            if let Some(format) = &self.number_format {
                numbering.format = format.clone();
            }
            options.page_numbering = Some(numbering);
        }

        if let Some(output) = self.output.as_ref().and_then(|path| path.file_stem()) {
            options.output_filename = output.to_string_lossy().into_owned();
        }

        Ok(options)
    }

    /// Apply `--range`, `--rotate` and `--scale` to a positional input.
    pub fn apply_file_settings(&self, file: &mut FileDescriptor) -> Result<()> {
        if let Some(range) = &self.range {
            file.page_range = range.clone();
        }
        if let Some(rotation) = self.rotation()? {
            file.rotation = rotation;
        }
        if self.scale.is_some() {
            file.scale = self.scale;
        }
        Ok(())
    }

    /// Build the run configuration.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Every input path, manifest files included
    /// * `options` - Final document options, used for the default output name
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn to_config(&self, inputs: Vec<PathBuf>, options: &DocumentOptions) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(options.output_file_name()));

        let config = Config {
            inputs,
            output,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
        };

        config.validate().map_err(|e| {
            PdfCombineError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
