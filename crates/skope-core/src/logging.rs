//! Log targets, timing spans, and text-tree formatting.
//!
//! Skope only emits `tracing` events; installing a subscriber is up to the
//! front end:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("skope::model=debug")
//!     .init();
//! ```

/// `tracing` targets, one per subsystem, for use in filter directives.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "skope_core::signal";
    /// Item model target (adapter queries, resets, handle management).
    pub const MODEL: &str = "skope::model";
    /// Tree view target (layout and rendering).
    pub const VIEW: &str = "skope::view";
    /// Command-line front end target.
    pub const CLI: &str = "skope_cli";
}

/// Span names used throughout Skope for tracing.
pub mod span_names {
    /// Loading and sniffing an input file.
    pub const LOAD: &str = "skope::load";
    /// Rendering a view.
    pub const RENDER: &str = "skope::render";
    /// Replacing a model's root collection.
    pub const RESET: &str = "skope::reset";
}

/// Times an operation: an entered `perf` span that closes when dropped.
///
/// Pass one of the [`span_names`] constants. With a subscriber that records
/// span close events the elapsed time shows up in the log.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(name: &'static str) -> Self {
        Self {
            _entered: tracing::info_span!(target: "skope::perf", "perf", operation = name).entered(),
        }
    }
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|`, `+--` and `` `-- `` branches.
    Ascii,
    /// Box-drawing branches.
    #[default]
    Unicode,
    /// Minimal dash markers without branch lines.
    Compact,
}

impl TreeStyle {
    /// Returns `(branch, tee, corner)` for this style.
    ///
    /// `tee` and `corner` have the same width; `branch` is padded to that
    /// width when continuing an ancestor's line.
    fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        }
    }

    /// Builds the prefix printed before an item in a text tree.
    ///
    /// `ancestors_last` holds, for each ancestor below the top level, whether
    /// that ancestor was the last child of its own parent. Top-level items
    /// (empty `ancestors_last` and `depth == 0`) get no prefix.
    pub fn prefix(self, depth: usize, ancestors_last: &[bool], is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = self.glyphs();
        let width = tee.chars().count();
        let mut prefix = String::new();

        for &last in ancestors_last.iter().take(depth - 1) {
            let glyph = if last { "" } else { branch };
            prefix.push_str(glyph);
            for _ in glyph.chars().count()..width {
                prefix.push(' ');
            }
        }

        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// Configuration for text tree output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Branch glyphs drawn before each name.
    pub style: TreeStyle,
    /// Whether to print the column header line.
    pub show_header: bool,
    /// Spaces between columns.
    pub column_gap: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_header: true,
            column_gap: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for minimal output: compact markers, no header.
    pub fn minimal() -> Self {
        Self {
            style: TreeStyle::Compact,
            show_header: false,
            ..Default::default()
        }
    }

    /// Sets the tree style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets whether the header line is printed.
    pub fn with_header(mut self, show_header: bool) -> Self {
        self.show_header = show_header;
        self
    }
}
