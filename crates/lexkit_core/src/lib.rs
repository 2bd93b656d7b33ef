//! lexkit_core: Core types shared by the lexkit crates.
//!
//! Provides byte positions, text spans, the offset-to-line index and the
//! token key space used by the scanner and everything built on top of it.

pub mod key;
pub mod text;

// Re-export commonly used types
pub use key::{CustomKey, TokenKey};
pub use text::{text_pos, LineAndColumn, LineMap, TextPos, TextSpan};
