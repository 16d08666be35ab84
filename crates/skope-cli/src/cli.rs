use clap::{Parser, ValueEnum};
use skope_core::TreeStyle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skope", about = "Browse the structure of binary game asset files", version)]
pub struct Cli {
    /// File to open (NIF or CGF)
    pub file: PathBuf,

    /// Expand only this many levels below the blocks (0 shows blocks only)
    #[arg(long, short = 'd', value_name = "N")]
    pub depth: Option<usize>,

    /// Tree drawing style
    #[arg(long, value_enum, default_value_t = StyleArg::Unicode)]
    pub style: StyleArg,

    /// Omit the column header line
    #[arg(long)]
    pub no_header: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress log output entirely
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Ascii,
    Unicode,
    Compact,
}

impl From<StyleArg> for TreeStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Ascii => TreeStyle::Ascii,
            StyleArg::Unicode => TreeStyle::Unicode,
            StyleArg::Compact => TreeStyle::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["skope", "model.nif"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("model.nif"));
        assert_eq!(cli.depth, None);
        assert_eq!(cli.style, StyleArg::Unicode);
        assert!(!cli.no_header && !cli.verbose && !cli.quiet);
    }

    #[test]
    fn test_options() {
        let cli =
            Cli::try_parse_from(["skope", "--depth", "2", "--style", "ascii", "--no-header", "a.cgf"])
                .unwrap();
        assert_eq!(cli.depth, Some(2));
        assert_eq!(TreeStyle::from(cli.style), TreeStyle::Ascii);
        assert!(cli.no_header);
    }

    #[test]
    fn test_arity() {
        assert!(Cli::try_parse_from(["skope"]).is_err());
        assert!(Cli::try_parse_from(["skope", "a.nif", "b.nif"]).is_err());
        assert!(Cli::try_parse_from(["skope", "-v", "-q", "a.nif"]).is_err());
    }
}
