//! # trove-core
//!
//! Core types, traits, and abstractions for the trove organizer.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the database and API crates depend on.

pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use display::{file_size_display, text_size_display, LINK_SIZE_DISPLAY};
pub use error::{Error, Result};
pub use filter::{matches_tag_filter, ItemFilter};
pub use models::*;
pub use traits::*;
