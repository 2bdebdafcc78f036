//! Shared primitives: errors, frontmatter parsing, value coercion, field
//! contracts, configuration, logging, and terminal output.

pub mod config;
pub mod error;
pub mod fields;
pub mod frontmatter;
pub mod logging;
pub mod output;
pub mod value;
