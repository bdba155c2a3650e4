//! Message formatting and display.
//!
//! User-facing status lines, with support for quiet and verbose modes.
//! Diagnostics go through `tracing` instead and end up on stderr.

use std::io::{self, IsTerminal};

use pdfcombine::config::Config;
use pdfcombine::plan::BuildPlan;
use pdfcombine::queue::{FileDescriptor, FileKind};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Debug/verbose message.
    Debug,
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var("TERM").is_ok(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only warnings).
    #[cfg(test)]
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Whether non-error output is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print a message only in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"),
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"),
            MessageLevel::Debug => ("→ ", "\x1b[36m"),
        };

        if self.colored && !color_code.is_empty() {
            println!("{color_code}{prefix}{message}\x1b[0m");
        } else {
            println!("{prefix}{message}");
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Describe a queued file in verbose mode.
    pub fn file_summary(&self, file: &FileDescriptor) {
        if self.verbose {
            self.debug(&describe_file(file));
        }
    }

    /// Summarize a plan in one line.
    pub fn plan_summary(&self, plan: &BuildPlan) {
        self.info(&describe_plan(plan));
    }
}

fn describe_file(file: &FileDescriptor) -> String {
    match file.kind {
        FileKind::Pdf => {
            let selected = file.selected_pages().len();
            format!(
                "{}: PDF, {} of {} page(s) selected, rotation {}",
                file.name(),
                selected,
                file.page_count,
                file.rotation
            )
        }
        FileKind::Image => match file.source.image {
            Some(info) => format!(
                "{}: image {}x{} px, scale {}, rotation {}",
                file.name(),
                info.width,
                info.height,
                file.effective_scale(),
                file.rotation
            ),
            None => format!("{}: image in an unsupported format, skipped", file.name()),
        },
    }
}

fn describe_plan(plan: &BuildPlan) -> String {
    let mut summary = format!("{} page(s)", plan.page_count());
    if plan.blank_pages() > 0 {
        summary.push_str(&format!(", {} blank", plan.blank_pages()));
    }
    if plan.image_pages() > 0 {
        summary.push_str(&format!(", {} from images", plan.image_pages()));
    }
    if plan.post.page_numbering.is_some() {
        summary.push_str(", numbered");
    }
    summary
}
