//! Boundary between the session front end and a language runtime.
//!
//! The session never interprets source text itself. Everything it needs from
//! the language (execution, parsing for completion, environment lookups,
//! built-in metadata) goes through the [`Runtime`] trait, and every value that
//! crosses the boundary is a [`RuntimeValue`].

use std::collections::BTreeMap;
use std::fmt;

pub mod relay;
mod value;

pub use relay::{pipe, RelayReader, RelayWriter};
pub(crate) use value::format_number;
pub use value::{RuntimeValue, ValueKind};

/// Outcome of one `run` call, delivered exactly once per evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Value produced by the last statement.
    pub output: RuntimeValue,
    /// False when evaluation failed or was cancelled.
    pub succeeded: bool,
    /// Syntax errors in source order; each may span several lines.
    pub parse_errors: Vec<String>,
    /// Text the program wrote to its standard output during this run.
    pub stdout: String,
}

impl EvaluationResult {
    /// Successful result carrying `output`.
    pub fn success(output: RuntimeValue) -> Self {
        Self {
            output,
            succeeded: true,
            parse_errors: Vec::new(),
            stdout: String::new(),
        }
    }

    /// Failed result carrying `output` (usually an error value).
    pub fn failure(output: RuntimeValue) -> Self {
        Self {
            output,
            succeeded: false,
            parse_errors: Vec::new(),
            stdout: String::new(),
        }
    }

    /// Result for source that did not parse.
    pub fn syntax_errors(parse_errors: Vec<String>) -> Self {
        Self {
            output: RuntimeValue::Null,
            succeeded: false,
            parse_errors,
            stdout: String::new(),
        }
    }

    /// Attach the text captured from the program's standard output.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    /// Synthetic "failed, no output" result used when an evaluation is cancelled.
    pub fn cancelled() -> Self {
        Self::failure(RuntimeValue::Null)
    }
}

/// The token under completion, as reported by [`Runtime::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionSubject<N> {
    /// A bare identifier such as `hel`.
    Identifier(String),
    /// A property or method access such as `subject.par`.
    Property { subject: N, partial: String },
    /// Any other trailing node; never completed.
    Other,
}

/// Parse output used by the suggestion engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<N> {
    pub errors: Vec<String>,
    pub subject: Option<CompletionSubject<N>>,
}

/// Metadata for one built-in function.
#[derive(Clone)]
pub struct BuiltinFunction {
    /// One-line documentation shown next to completion candidates.
    pub doc: String,
    /// Standalone functions cannot be called as methods (`value.fn()`).
    pub standalone: bool,
    /// Whether the function accepts `value` as its receiver.
    pub applies_to: fn(&RuntimeValue) -> bool,
}

impl BuiltinFunction {
    /// True when this function can be offered after `value.`.
    pub fn callable_on(&self, value: &RuntimeValue) -> bool {
        !self.standalone && (self.applies_to)(value)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("doc", &self.doc)
            .field("standalone", &self.standalone)
            .finish_non_exhaustive()
    }
}

/// Language runtime consumed by the session.
///
/// `run` is only ever invoked from a background blocking thread; every other
/// method is called from the UI loop and must return promptly.
pub trait Runtime: Send + Sync + 'static {
    /// Parsed sub-expression handed back to [`Runtime::evaluate_subexpression`].
    type Node: Clone + fmt::Debug + Send;

    /// Execute `source` to completion. Output written by the program travels
    /// in [`EvaluationResult::stdout`], so a discarded result drops it too.
    fn run(&self, source: &str) -> EvaluationResult;

    /// Parse `source` without executing it.
    fn parse(&self, source: &str) -> ParseOutcome<Self::Node>;

    /// Names currently bound in the environment.
    fn environment_keys(&self) -> Vec<String>;

    /// Value bound to `name`, if any.
    fn environment_get(&self, name: &str) -> Option<RuntimeValue>;

    /// Built-in functions keyed by name.
    fn builtin_functions(&self) -> BTreeMap<String, BuiltinFunction>;

    /// Evaluate a parsed sub-expression. May have side effects, but must not
    /// wait for program input.
    fn evaluate_subexpression(&self, node: &Self::Node) -> RuntimeValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_string(value: &RuntimeValue) -> bool {
        matches!(value, RuntimeValue::Str(_))
    }

    #[test]
    fn standalone_functions_are_never_methods() {
        let func = BuiltinFunction {
            doc: "reads stdin".into(),
            standalone: true,
            applies_to: |_| true,
        };
        assert!(!func.callable_on(&RuntimeValue::Null));
    }

    #[test]
    fn method_applicability_follows_predicate() {
        let func = BuiltinFunction {
            doc: "uppercase".into(),
            standalone: false,
            applies_to: any_string,
        };
        assert!(func.callable_on(&RuntimeValue::Str("a".into())));
        assert!(!func.callable_on(&RuntimeValue::Number(1.0)));
    }

    #[test]
    fn cancelled_result_is_a_silent_failure() {
        let result = EvaluationResult::cancelled();
        assert!(!result.succeeded);
        assert!(result.output.is_no_value());
        assert!(result.parse_errors.is_empty());
        assert!(result.stdout.is_empty());
    }
}
