//! Parsing engine: executes a compiled template against input lines.
//!
//! The engine layer owns all per-invocation mutable state. Most callers
//! go through [`Template::parse_text`](crate::template::Template::parse_text)
//! or [`Template::parse_lines`](crate::template::Template::parse_lines);
//! [`Machine`] is public for callers that want to drive line-by-line.

mod machine;
mod record;

pub use machine::Machine;
pub use record::{FieldValue, ParseResult, Record};
