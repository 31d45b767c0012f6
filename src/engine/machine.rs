//! State machine execution against a stream of text lines.

use indexmap::IndexMap;
use log::{debug, trace};
use regex::Captures;

use super::record::{FieldValue, ParseResult, Record};
use crate::error::ParseError;
use crate::template::{Directive, Rule, START_STATE, Template, ValueKind};

/// Working storage for one value slot during a parse.
#[derive(Debug, Clone)]
enum Slot {
    Scalar(Option<String>),
    List(Vec<String>),
}

impl Slot {
    fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_none(),
            Self::List(items) => items.is_empty(),
        }
    }
}

/// One parse invocation: the explicit finite-state machine.
///
/// Borrows the compiled template and owns all mutable working storage,
/// so any number of machines can run against the same template
/// concurrently. Create one per input, drive it with [`Machine::run`].
#[derive(Debug)]
pub struct Machine<'t> {
    template: &'t Template,

    /// Name of the state the machine is currently in.
    state: String,

    /// Partially built value set, parallel to the declared value table.
    slots: Vec<Slot>,

    /// Records emitted so far, in emission order.
    records: Vec<Record>,
}

impl<'t> Machine<'t> {
    /// Create a fresh machine positioned at the `Start` state with all
    /// values unset.
    pub fn new(template: &'t Template) -> Self {
        let slots = template
            .values()
            .values()
            .map(|v| match v.kind {
                ValueKind::Scalar => Slot::Scalar(None),
                ValueKind::List => Slot::List(Vec::new()),
            })
            .collect();

        Self {
            template,
            state: START_STATE.to_string(),
            slots,
            records: Vec::new(),
        }
    }

    /// Feed every line through the machine, then flush the implicit
    /// end-of-input record.
    pub fn run<I, S>(mut self, lines: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.step(line.as_ref())?;
        }
        Ok(self.finish())
    }

    /// Evaluate one input line against the current state's rules.
    ///
    /// First match wins; a line no rule matches is silently skipped.
    pub fn step(&mut self, line: &str) -> Result<(), ParseError> {
        let template = self.template;
        let state = template
            .state(&self.state)
            .ok_or_else(|| ParseError::UnknownState {
                name: self.state.clone(),
            })?;

        for rule in &state.rules {
            if let Some(caps) = rule.pattern.captures(line) {
                trace!("state {}: rule at line {} matched", self.state, rule.line);
                return self.apply(rule, &caps, line);
            }
        }

        trace!("state {}: no rule matched, line skipped", self.state);
        Ok(())
    }

    /// Apply a matched rule: assign captures, then run its directive.
    fn apply(&mut self, rule: &Rule, caps: &Captures<'_>, line: &str) -> Result<(), ParseError> {
        for capture in &rule.captures {
            if let Some(m) = caps.name(&capture.name) {
                match &mut self.slots[capture.slot] {
                    Slot::Scalar(s) => *s = Some(m.as_str().to_string()),
                    Slot::List(items) => items.push(m.as_str().to_string()),
                }
            }
        }

        match &rule.directive {
            Directive::Continue => {}
            Directive::NextState(target) => self.transition(target)?,
            Directive::Record => self.emit(),
            Directive::RecordNextState(target) => {
                // Snapshot before the transition takes effect.
                self.emit();
                self.transition(target)?;
            }
            Directive::Error => {
                debug!("error directive hit in state {}", self.state);
                return Err(ParseError::ErrorDirective {
                    state: self.state.clone(),
                    line: line.to_string(),
                });
            }
        }
        Ok(())
    }

    fn transition(&mut self, target: &str) -> Result<(), ParseError> {
        if self.template.state(target).is_none() {
            return Err(ParseError::UnknownState {
                name: target.to_string(),
            });
        }
        trace!("transition {} -> {}", self.state, target);
        self.state = target.to_string();
        Ok(())
    }

    /// Emit the current value set as a record, then clear values
    /// without the `Filldown` flag.
    ///
    /// Emission is skipped when nothing was captured or a `Required`
    /// value is still unset; the clear happens either way.
    fn emit(&mut self) {
        let values = self.template.values();
        let any_set = self.slots.iter().any(|s| !s.is_empty());
        let required_ok = values
            .values()
            .zip(&self.slots)
            .all(|(v, s)| !v.required || !s.is_empty());

        if any_set && required_ok {
            let record = self.snapshot();
            self.records.push(record);
            trace!("record emitted ({} total)", self.records.len());
        }

        for (descriptor, slot) in values.values().zip(&mut self.slots) {
            if !descriptor.filldown {
                *slot = match descriptor.kind {
                    ValueKind::Scalar => Slot::Scalar(None),
                    ValueKind::List => Slot::List(Vec::new()),
                };
            }
        }
    }

    /// End of input: flush the trailing record if any `Required` value
    /// holds data, then hand back the result.
    ///
    /// The implicit flush covers CLI output whose last record has no
    /// trailing delimiter line.
    fn finish(mut self) -> ParseResult {
        let any_required_set = self
            .template
            .values()
            .values()
            .zip(&self.slots)
            .any(|(v, s)| v.required && !s.is_empty());
        if any_required_set {
            let record = self.snapshot();
            self.records.push(record);
        }

        debug!("parse finished: {} records", self.records.len());
        let header = self.template.header().map(str::to_string).collect();
        ParseResult::new(header, self.records)
    }

    /// Snapshot the value set in declared field order.
    fn snapshot(&self) -> Record {
        let mut fields = IndexMap::with_capacity(self.slots.len());
        for (name, slot) in self.template.values().keys().zip(&self.slots) {
            let field = match slot {
                Slot::Scalar(s) => FieldValue::Scalar(s.clone().unwrap_or_default()),
                Slot::List(items) => FieldValue::List(items.clone()),
            };
            fields.insert(name.clone(), field);
        }
        Record::new(fields)
    }
}

impl Template {
    /// Execute this template against an ordered sequence of lines.
    ///
    /// Parsing is total over any input: unmatched lines are skipped and
    /// empty input yields zero records. The only failure modes are an
    /// `Error` directive firing and the internal consistency fault of a
    /// transition to a missing state.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Machine::new(self).run(lines)
    }

    /// Execute this template against newline-delimited text.
    pub fn parse_text(&self, text: &str) -> Result<ParseResult, ParseError> {
        self.parse_lines(text.lines())
    }
}
