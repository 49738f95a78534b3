//! Console navigation engine.
//!
//! Organized bottom-up:
//! - `signal`: navigation instructions and the cancel signal
//! - `terminal`: the owned input/output pair, cancel-token check
//! - `prompt`, `select`: blocking read-and-validate primitives
//! - `pager`: paged browsing over any [`pager::PageSource`]
//! - `navigator`: the [`navigator::Screen`] trait and the screen stack
//! - `theme`: output styles

pub mod navigator;
pub mod pager;
pub mod prompt;
pub mod select;
pub mod signal;
pub mod terminal;
pub mod theme;

pub use navigator::{Navigator, Screen};
pub use pager::{PageSource, PaginatedBrowser};
pub use select::CandidateSet;
pub use signal::{CancelSignal, NavigationInstruction, Prompted, recover};
pub use terminal::{Console, Transcript};
