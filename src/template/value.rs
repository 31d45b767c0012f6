//! Value declarations for templates.
//!
//! A `Value` line declares one named slot of the records a template
//! produces. Declaration order fixes record field order.

use crate::error::TemplateError;

/// Capture fragment used when a declaration carries no regex of its own.
pub const DEFAULT_PATTERN: &str = r"(\S+)";

/// Kind of a declared value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Each capture overwrites the slot.
    Scalar,

    /// Each capture appends to an ordered list.
    List,
}

/// One declared value slot.
///
/// Parsed from a `Value [Flag[,Flag...]] NAME [(regex)]` template line.
/// Immutable once the template is compiled.
#[derive(Debug, Clone)]
pub struct ValueDescriptor {
    /// Declared name, referenced from rule patterns as `${NAME}`.
    pub name: String,

    /// Scalar or appended-list capture semantics.
    pub kind: ValueKind,

    /// Required values gate record emission and drive the implicit
    /// end-of-input record.
    pub required: bool,

    /// Filldown values survive record emission instead of being cleared.
    pub filldown: bool,

    /// Regex fragment substituted for `${NAME}` references.
    pub pattern: String,
}

impl ValueDescriptor {
    /// Parse a `Value ...` declaration line.
    ///
    /// `line` is the 1-based template line number, used for diagnostics.
    pub fn parse(text: &str, line: usize) -> Result<Self, TemplateError> {
        let malformed = || TemplateError::MalformedValue {
            text: text.trim().to_string(),
            line,
        };

        let body = text
            .trim()
            .strip_prefix("Value")
            .ok_or_else(malformed)?
            .trim_start();

        // The capture regex starts at the first '(' and runs to end of
        // line; everything before it is flags and the name.
        let (head, pattern) = match body.find('(') {
            Some(idx) => {
                let (head, tail) = body.split_at(idx);
                (head, tail.trim_end().to_string())
            }
            None => (body, DEFAULT_PATTERN.to_string()),
        };

        let words: Vec<&str> = head.split_whitespace().collect();
        let (flags, name) = match words.as_slice() {
            [name] => ("", *name),
            [flags, name] => (*flags, *name),
            _ => return Err(malformed()),
        };

        if !is_valid_name(name) {
            return Err(malformed());
        }

        let mut kind = ValueKind::Scalar;
        let mut required = false;
        let mut filldown = false;
        if !flags.is_empty() {
            for flag in flags.split(',') {
                match flag {
                    "List" => kind = ValueKind::List,
                    "Required" => required = true,
                    "Filldown" => filldown = true,
                    other => {
                        return Err(TemplateError::UnknownFlag {
                            flag: other.to_string(),
                            line,
                        });
                    }
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            kind,
            required,
            filldown,
            pattern,
        })
    }
}

/// Value and state names are identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_declaration() {
        let v = ValueDescriptor::parse("Value INTERFACE (\\S+)", 1).unwrap();
        assert_eq!(v.name, "INTERFACE");
        assert_eq!(v.kind, ValueKind::Scalar);
        assert!(!v.required);
        assert!(!v.filldown);
        assert_eq!(v.pattern, "(\\S+)");
    }

    #[test]
    fn test_default_pattern() {
        let v = ValueDescriptor::parse("Value GROUP", 1).unwrap();
        assert_eq!(v.pattern, DEFAULT_PATTERN);
    }

    #[test]
    fn test_flags() {
        let v = ValueDescriptor::parse("Value Required,List,Filldown STATE (\\w+)", 3).unwrap();
        assert_eq!(v.kind, ValueKind::List);
        assert!(v.required);
        assert!(v.filldown);
    }

    #[test]
    fn test_pattern_with_spaces() {
        let v = ValueDescriptor::parse(r"Value STATE (\w+(\s\w+)?)", 1).unwrap();
        assert_eq!(v.pattern, r"(\w+(\s\w+)?)");
    }

    #[test]
    fn test_unknown_flag() {
        let err = ValueDescriptor::parse("Value Requierd STATE (\\w+)", 7).unwrap_err();
        match err {
            TemplateError::UnknownFlag { flag, line } => {
                assert_eq!(flag, "Requierd");
                assert_eq!(line, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_declaration() {
        assert!(ValueDescriptor::parse("Value", 1).is_err());
        assert!(ValueDescriptor::parse("Value a b c", 1).is_err());
        assert!(ValueDescriptor::parse("Value 9BAD (\\S+)", 1).is_err());
    }
}
