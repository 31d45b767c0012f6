//! Template compilation: raw template text to an executable definition.

use indexmap::IndexMap;
use log::debug;

use super::rule::Rule;
use super::value::{self, ValueDescriptor};
use crate::error::TemplateError;

/// Name of the initial state every template must define.
pub const START_STATE: &str = "Start";

/// A named ordered rule group.
///
/// During parsing the machine is always in exactly one state; its rules
/// are evaluated top-to-bottom against each input line.
#[derive(Debug, Clone)]
pub struct State {
    /// State name, unique within the template.
    pub name: String,

    /// Rules in declaration order. First match wins.
    pub rules: Vec<Rule>,
}

/// A compiled template: the executable state machine definition.
///
/// Immutable after [`Template::compile`] and `Send + Sync`, so one
/// compiled template can back any number of concurrent parse
/// invocations; per-parse working storage lives in the engine.
#[derive(Debug, Clone)]
pub struct Template {
    values: IndexMap<String, ValueDescriptor>,
    states: IndexMap<String, State>,
}

impl Template {
    /// Compile raw template text.
    ///
    /// The format is line-oriented: `Value` declarations first, then
    /// state blocks opened by a bare state name at column zero, with
    /// indented rule lines. Blank lines and `#` comments are skipped.
    /// Compilation performs no I/O and never partially succeeds.
    pub fn compile(text: &str) -> Result<Self, TemplateError> {
        let mut values: IndexMap<String, ValueDescriptor> = IndexMap::new();
        let mut states: IndexMap<String, State> = IndexMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented {
                // Rule line for the open state block.
                let Some(state) = current.as_deref() else {
                    return Err(TemplateError::RuleOutsideState { line });
                };
                let rule = Rule::parse(raw, line, &values)?;
                states
                    .get_mut(state)
                    .expect("current state is registered")
                    .rules
                    .push(rule);
            } else if content.starts_with("Value ") || content == "Value" {
                if current.is_some() {
                    return Err(TemplateError::ValueAfterStates { line });
                }
                let descriptor = ValueDescriptor::parse(content, line)?;
                if values.contains_key(&descriptor.name) {
                    return Err(TemplateError::DuplicateValue {
                        name: descriptor.name,
                        line,
                    });
                }
                values.insert(descriptor.name.clone(), descriptor);
            } else {
                // State declaration: a bare name at column zero.
                if !value::is_valid_name(content) {
                    return Err(TemplateError::MalformedState {
                        text: content.to_string(),
                        line,
                    });
                }
                if states.contains_key(content) {
                    return Err(TemplateError::DuplicateState {
                        name: content.to_string(),
                        line,
                    });
                }
                states.insert(
                    content.to_string(),
                    State {
                        name: content.to_string(),
                        rules: Vec::new(),
                    },
                );
                current = Some(content.to_string());
            }
        }

        if !states.contains_key(START_STATE) {
            return Err(TemplateError::MissingStart);
        }

        // Every transition target must name a defined state.
        for state in states.values() {
            for rule in &state.rules {
                if let Some(target) = rule.directive.target_state() {
                    if !states.contains_key(target) {
                        return Err(TemplateError::UnknownState {
                            name: target.to_string(),
                            line: rule.line,
                        });
                    }
                }
            }
        }

        debug!(
            "compiled template: {} values, {} states",
            values.len(),
            states.len()
        );

        Ok(Self { values, states })
    }

    /// Declared value names, in declaration order.
    ///
    /// This is the header labelling every record's fields.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The declared value table, in declaration order.
    pub fn values(&self) -> &IndexMap<String, ValueDescriptor> {
        &self.values
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// All states, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::rule::Directive;
    use crate::template::value::ValueKind;

    const BASIC: &str = "\
Value IFACE (\\S+)
Value List ADDR (\\d+\\.\\d+\\.\\d+\\.\\d+)

# interface section
Start
  ^interface ${IFACE}
  ^\\s+ip address ${ADDR} -> Record
";

    #[test]
    fn test_compile_basic() {
        let template = Template::compile(BASIC).unwrap();
        assert_eq!(template.header().collect::<Vec<_>>(), ["IFACE", "ADDR"]);
        assert_eq!(template.values()["ADDR"].kind, ValueKind::List);

        let start = template.state("Start").unwrap();
        assert_eq!(start.rules.len(), 2);
        assert_eq!(start.rules[0].directive, Directive::Continue);
        assert_eq!(start.rules[1].directive, Directive::Record);
    }

    #[test]
    fn test_compile_is_idempotent() {
        let a = Template::compile(BASIC).unwrap();
        let b = Template::compile(BASIC).unwrap();
        assert_eq!(
            a.header().collect::<Vec<_>>(),
            b.header().collect::<Vec<_>>()
        );
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn test_missing_start() {
        let err = Template::compile("Value X (\\S+)\n\nMain\n  ^${X}\n").unwrap_err();
        assert!(matches!(err, TemplateError::MissingStart));
    }

    #[test]
    fn test_duplicate_state() {
        let text = "Value X (\\S+)\n\nStart\n  ^${X}\n\nStart\n  ^${X}\n";
        assert!(matches!(
            Template::compile(text).unwrap_err(),
            TemplateError::DuplicateState { line: 6, .. }
        ));
    }

    #[test]
    fn test_duplicate_value() {
        let text = "Value X (\\S+)\nValue X (\\d+)\n\nStart\n  ^${X}\n";
        assert!(matches!(
            Template::compile(text).unwrap_err(),
            TemplateError::DuplicateValue { line: 2, .. }
        ));
    }

    #[test]
    fn test_unknown_state_reference() {
        let text = "Value X (\\S+)\n\nStart\n  ^${X} -> Next.Missing\n";
        match Template::compile(text).unwrap_err() {
            TemplateError::UnknownState { name, line } => {
                assert_eq!(name, "Missing");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rule_outside_state() {
        let text = "Value X (\\S+)\n  ^${X}\n";
        assert!(matches!(
            Template::compile(text).unwrap_err(),
            TemplateError::RuleOutsideState { line: 2 }
        ));
    }

    #[test]
    fn test_value_after_states() {
        let text = "Start\n  ^ignored\nValue X (\\S+)\n";
        assert!(matches!(
            Template::compile(text).unwrap_err(),
            TemplateError::ValueAfterStates { line: 3 }
        ));
    }

    #[test]
    fn test_malformed_state() {
        let text = "Start again\n  ^ignored\n";
        assert!(matches!(
            Template::compile(text).unwrap_err(),
            TemplateError::MalformedState { line: 1, .. }
        ));
    }
}
