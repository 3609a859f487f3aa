use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Share of non-null samples a type must reach to win the column vote
    pub majority_threshold: f64,
    /// Minimum share of the expected column count a data row must fill to be sampled.
    /// Shorter rows are dropped from type inference, never from the schema.
    pub min_row_fill: f64,
    /// Skip SSMS/SQL*Plus decoration lines (dashed separators, "(N rows affected)" footers)
    /// when collecting data rows.
    pub skip_decorations: bool,
    /// Enable debug output. When `true`, prints header scores, rejected rows and
    /// per-column vote tallies to stderr.
    pub debug: bool,
    /// Controls the verbosity level of debug output
    pub verbosity: DebugVerbosity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugVerbosity {
    /// Show classification decisions and warnings
    #[default]
    Normal,
    /// Also show per-row and per-token detail
    Verbose,
}

impl ParseConfig {
    pub fn debug(&self, args: std::fmt::Arguments) {
        if self.debug {
            anstream::eprintln!("{}", args);
        }
    }

    pub fn debug_verbose(&self, args: std::fmt::Arguments) {
        if self.debug && matches!(self.verbosity, DebugVerbosity::Verbose) {
            anstream::eprintln!("{}", args);
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            majority_threshold: 0.8,
            min_row_fill: 0.5,
            skip_decorations: true,
            debug: false,
            verbosity: DebugVerbosity::default(),
        }
    }
}

#[macro_export]
macro_rules! debug {
    ($cfg:expr, $($arg:tt)*) => {
        $cfg.debug(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_verbose {
    ($cfg:expr, $($arg:tt)*) => {
        $cfg.debug_verbose(format_args!($($arg)*))
    };
}
