//! Presentation-level configuration
//!
//! Resolved output settings: config file values with CLI flags applied on top.

use council_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show the stage progress bar
    pub show_progress: bool,
    /// Print discussion entries as they are appended
    pub live: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
            live: true,
        }
    }
}

impl OutputConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Quiet mode: no progress, no live stream
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self.live = false;
        self
    }

    /// Apply the color setting to all terminal output of this process
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }

    /// JSON output must stay machine-readable on stdout
    pub fn streams_live(&self) -> bool {
        self.live && self.format != OutputFormat::Json
    }
}
