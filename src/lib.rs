//! # linefsm
//!
//! Template-driven state machine for parsing CLI output into
//! structured records.
//!
//! Semi-structured command output from network devices (and log text in
//! general) is turned into ordered records by a declarative template:
//! `Value` declarations name the fields, named states hold ordered
//! rules, and each rule pairs a line pattern with a directive
//! (continue, transition, record, error). Templates are compiled once
//! and executed any number of times, including concurrently.
//!
//! ## Quick Start
//!
//! ```rust
//! use linefsm::Template;
//!
//! fn main() -> Result<(), linefsm::Error> {
//!     let template = Template::compile(
//!         "Value Required HOST (\\S+)\n\
//!          Value UPTIME (.+)\n\
//!          \n\
//!          Start\n\
//!          \x20 ^${HOST} uptime is ${UPTIME} -> Record\n",
//!     )?;
//!
//!     let result = template.parse_text("router1 uptime is 4 weeks, 2 days")?;
//!     assert_eq!(result.records()[0]["HOST"].as_str(), Some("router1"));
//!     Ok(())
//! }
//! ```
//!
//! The [`source`] module is the boundary for whatever retrieves command
//! output (SSH drivers, canned samples), and [`check`] layers the HSRP
//! active/standby validation policy on top of parsed records.

pub mod check;
pub mod engine;
pub mod error;
pub mod source;
pub mod template;

// Re-export main types for convenience
pub use engine::{FieldValue, Machine, ParseResult, Record};
pub use error::{Error, ParseError, SourceError, TemplateError};
pub use source::{FallbackSource, LineSource, StaticSource};
pub use template::{Directive, Template};
