//! Application context: unified state passed to every command handler.

use std::path::PathBuf;

use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` from the global flags.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Installation directory holding state and install config.
    pub dir: PathBuf,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &OutputFlags, dir: PathBuf) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            dir,
        }
    }

    /// Reporter rendering service progress on this context's terminal.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
