//! Declarative templates: values, rules, states.
//!
//! A template is compiled once into an immutable [`Template`] and then
//! executed any number of times by the [`engine`](crate::engine).

mod compiler;
mod rule;
mod value;

pub use compiler::{START_STATE, State, Template};
pub use rule::{Capture, Directive, Rule};
pub use value::{DEFAULT_PATTERN, ValueDescriptor, ValueKind};
