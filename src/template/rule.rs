//! Rules: one line-matching pattern plus the action taken on a match.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::value::ValueDescriptor;
use crate::error::TemplateError;

/// `${NAME}` references inside rule patterns.
static CAPTURE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("capture reference regex"));

/// Action executed after a rule's pattern matches.
///
/// A plain data variant per directive keeps the state machine
/// inspectable without executing anything user-provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Stay in the current state and move to the next line (default).
    Continue,

    /// Transition to the named state.
    NextState(String),

    /// Emit the current value set as a record.
    Record,

    /// Emit a record, then transition. The record snapshots the values
    /// before the transition takes effect.
    RecordNextState(String),

    /// Abort the parse with a [`ParseError`](crate::error::ParseError).
    Error,
}

impl Directive {
    /// Parse the text after a rule's `->` marker.
    fn parse(text: &str, line: usize) -> Result<Self, TemplateError> {
        let unknown = || TemplateError::UnknownDirective {
            directive: text.to_string(),
            line,
        };

        let words: Vec<&str> = text.split_whitespace().collect();
        match words.as_slice() {
            ["Continue"] => Ok(Self::Continue),
            ["Record"] => Ok(Self::Record),
            ["Error"] => Ok(Self::Error),
            [next] => {
                let state = next.strip_prefix("Next.").ok_or_else(unknown)?;
                if state.is_empty() {
                    return Err(unknown());
                }
                Ok(Self::NextState(state.to_string()))
            }
            ["Record", next] => {
                let state = next.strip_prefix("Next.").ok_or_else(unknown)?;
                if state.is_empty() {
                    return Err(unknown());
                }
                Ok(Self::RecordNextState(state.to_string()))
            }
            _ => Err(unknown()),
        }
    }

    /// The state this directive transitions to, if any.
    pub fn target_state(&self) -> Option<&str> {
        match self {
            Self::NextState(s) | Self::RecordNextState(s) => Some(s),
            _ => None,
        }
    }
}

/// One value reference in a rule pattern, resolved at compile time to
/// its slot position so the engine never looks names up per line.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Referenced value name; also the regex capture group name.
    pub name: String,

    /// Position of the value in the declared value table.
    pub slot: usize,
}

/// One compiled rule: pattern, referenced values, directive.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Compiled line pattern with `${NAME}` references expanded to
    /// named capture groups.
    pub pattern: Regex,

    /// Values this rule captures, in pattern order.
    pub captures: Vec<Capture>,

    /// Action taken when the pattern matches.
    pub directive: Directive,

    /// 1-based template line this rule came from.
    pub line: usize,
}

impl Rule {
    /// Compile one indented rule line: `pattern [-> directive]`.
    pub fn parse(
        text: &str,
        line: usize,
        values: &IndexMap<String, ValueDescriptor>,
    ) -> Result<Self, TemplateError> {
        let text = text.trim();

        // Split on the last " -> " so literal arrows inside the
        // pattern survive.
        let (raw_pattern, directive) = match text.rfind(" -> ") {
            Some(idx) => {
                let directive = Directive::parse(text[idx + 4..].trim(), line)?;
                (text[..idx].trim_end(), directive)
            }
            None => (text, Directive::Continue),
        };

        let (expanded, captures) = expand_pattern(raw_pattern, line, values)?;
        let pattern = Regex::new(&expanded)
            .map_err(|source| TemplateError::MalformedPattern { line, source })?;

        Ok(Self {
            pattern,
            captures,
            directive,
            line,
        })
    }
}

/// Expand `${NAME}` references into `(?P<NAME>fragment)` named groups
/// and `$$` into a literal end anchor.
///
/// Returns the expanded regex text and the referenced value names.
fn expand_pattern(
    raw: &str,
    line: usize,
    values: &IndexMap<String, ValueDescriptor>,
) -> Result<(String, Vec<Capture>), TemplateError> {
    let mut expanded = String::with_capacity(raw.len());
    let mut captures = Vec::new();
    let mut last = 0;

    for caps in CAPTURE_REF.captures_iter(raw) {
        let whole = caps.get(0).expect("whole match");
        let name = &caps[1];
        let (slot, _, descriptor) =
            values
                .get_full(name)
                .ok_or_else(|| TemplateError::UndeclaredValue {
                    name: name.to_string(),
                    line,
                })?;

        expanded.push_str(&raw[last..whole.start()]);
        expanded.push_str("(?P<");
        expanded.push_str(name);
        expanded.push('>');
        expanded.push_str(&descriptor.pattern);
        expanded.push(')');
        captures.push(Capture {
            name: name.to_string(),
            slot,
        });
        last = whole.end();
    }
    expanded.push_str(&raw[last..]);

    Ok((expanded.replace("$$", "$"), captures))
}
