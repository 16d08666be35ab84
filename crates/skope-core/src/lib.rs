//! Runtime plumbing shared by the Skope crates.
//!
//! - [`signal`]: synchronous signals that models use to announce resets
//! - [`logging`]: `tracing` targets and span names, the [`PerfSpan`] guard,
//!   and the branch prefixes used when a tree is printed as text
//!
//! ```
//! use skope_core::{TreeFormatOptions, TreeStyle};
//!
//! let options = TreeFormatOptions::default().with_style(TreeStyle::Ascii);
//! assert_eq!(options.style.prefix(1, &[], true), "`-- ");
//! ```

pub mod logging;
pub mod signal;

pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
