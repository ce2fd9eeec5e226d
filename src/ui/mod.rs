//! Progress reporting and logging sink
//!
//! The pipeline never logs through global state. Everything that wants to
//! report progress or warnings takes a [`Reporter`] by reference, so tests
//! can swallow output and the CLI can render it with progress bars.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Sink for progress and diagnostics, polled for cooperative cancellation.
pub trait Reporter {
    fn info(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    /// Announce the start of a named step (one publisher action, one
    /// touchpoint operand).
    fn begin_task(&mut self, name: &str);

    /// Whether the run was canceled. Polled between steps; a canceled run
    /// stops before the next step without rolling back completed ones.
    fn is_canceled(&self) -> bool {
        false
    }
}

/// Reporter that renders to the terminal with a progress bar per run.
pub struct ConsoleReporter {
    verbose: bool,
    bar: Option<ProgressBar>,
    cancel: Arc<AtomicBool>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        ConsoleReporter {
            verbose,
            bar: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a progress bar sized to the number of steps.
    pub fn with_steps(mut self, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        self.bar = Some(bar);
        self
    }

    /// Handle used to request cancellation from a signal handler.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&mut self, message: &str) {
        if !self.verbose {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(message.to_string()),
            None => println!("{message}"),
        }
    }

    fn warning(&mut self, message: &str) {
        let line = format!("{} {message}", style("warning:").yellow().bold());
        match &self.bar {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }

    fn begin_task(&mut self, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(name.to_string());
            bar.inc(1);
        } else if self.verbose {
            println!("{} {name}", style("->").cyan());
        }
    }

    fn is_canceled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Reporter that records messages without printing, for tests and dry runs.
#[derive(Default)]
pub struct SilentReporter {
    pub infos: Vec<String>,
    pub warnings: Vec<String>,
    pub tasks: Vec<String>,
    pub canceled: bool,
}

impl SilentReporter {
    pub fn new() -> Self {
        SilentReporter::default()
    }
}

impl Reporter for SilentReporter {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn begin_task(&mut self, name: &str) {
        self.tasks.push(name.to_string());
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }
}
