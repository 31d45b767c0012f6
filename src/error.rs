//! Error types for linefsm.

use thiserror::Error;

/// Main error type for linefsm operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Template compilation errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Parse-time errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Line-retrieval errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Compile-time template errors.
///
/// Compilation never partially succeeds: any of these aborts the whole
/// template. Each variant carries the 1-based line number of the
/// offending template line.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A value name was declared twice
    #[error("Duplicate value '{name}' on line {line}")]
    DuplicateValue { name: String, line: usize },

    /// A value declaration line could not be parsed
    #[error("Malformed value declaration on line {line}: '{text}'")]
    MalformedValue { text: String, line: usize },

    /// An unrecognized value flag
    #[error("Unknown value flag '{flag}' on line {line}")]
    UnknownFlag { flag: String, line: usize },

    /// A value declaration appeared after the first state block
    #[error("Value declared after state definitions on line {line}")]
    ValueAfterStates { line: usize },

    /// A state declaration line was not a bare state name
    #[error("Malformed state declaration on line {line}: '{text}'")]
    MalformedState { text: String, line: usize },

    /// A state name was declared twice
    #[error("Duplicate state '{name}' on line {line}")]
    DuplicateState { name: String, line: usize },

    /// A rule appeared before any state declaration
    #[error("Rule outside of a state block on line {line}")]
    RuleOutsideState { line: usize },

    /// A rule pattern referenced a value that was never declared
    #[error("Undeclared value '${{{name}}}' referenced on line {line}")]
    UndeclaredValue { name: String, line: usize },

    /// A rule pattern did not compile as a regex
    #[error("Malformed pattern on line {line}: {source}")]
    MalformedPattern {
        line: usize,
        #[source]
        source: regex::Error,
    },

    /// A rule directive was not recognized
    #[error("Unknown directive '{directive}' on line {line}")]
    UnknownDirective { directive: String, line: usize },

    /// A `Next.<State>` directive referenced a state that does not exist
    #[error("Unknown state '{name}' referenced on line {line}")]
    UnknownState { name: String, line: usize },

    /// The template did not define the initial `Start` state
    #[error("Template has no 'Start' state")]
    MissingStart,
}

/// Run-time parse errors.
///
/// Fatal to the single parse invocation; the compiled template is
/// untouched and remains reusable.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A rule with the `Error` directive matched an input line
    #[error("Error directive hit in state '{state}' on input line: '{line}'")]
    ErrorDirective { state: String, line: String },

    /// A transition targeted a state missing from the template.
    ///
    /// Unreachable through `Template::compile`, which validates every
    /// state reference; guards against hand-built templates.
    #[error("Transition to unknown state '{name}'")]
    UnknownState { name: String },
}

/// Line-retrieval errors from a [`LineSource`](crate::source::LineSource).
#[derive(Error, Debug)]
pub enum SourceError {
    /// The upstream collaborator could not produce output
    #[error("Line retrieval failed: {message}")]
    Retrieval { message: String },
}

/// Result type alias using linefsm's Error.
pub type Result<T> = std::result::Result<T, Error>;
