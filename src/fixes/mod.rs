//! Fix infrastructure: rewrite engine and canonical formatter

pub mod engine;
pub mod format;

pub use engine::{screaming_case, FixError, RewriteEngine};
pub use format::CanonicalFormatter;
