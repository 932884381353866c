//! Core value types shared by the equation engine and the document builder.

use std::collections::HashMap;
use std::fmt;

/// Default ceiling for nested parentheses and nested variable resolution
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// The value a variable holds before evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    /// Equation text, resolved on first use
    Formula(String),
    /// Already numeric (pre-seeded values such as `vbw`/`vbh`)
    Number(f64),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Formula(s) => f.write_str(s),
            VariableValue::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<f64> for VariableValue {
    fn from(n: f64) -> Self {
        VariableValue::Number(n)
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        VariableValue::Formula(s.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        VariableValue::Formula(s)
    }
}

/// A named quantity usable inside equations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variable {
    /// `None` means declared without a value; referring to it is an error
    pub value: Option<VariableValue>,
    pub disabled: bool,
    pub comment: Option<String>,
}

impl Variable {
    /// A variable whose value is an equation
    pub fn formula(text: impl Into<String>) -> Self {
        Self {
            value: Some(VariableValue::Formula(text.into())),
            ..Self::default()
        }
    }

    /// A variable that is already numeric
    pub fn number(n: f64) -> Self {
        Self {
            value: Some(VariableValue::Number(n)),
            ..Self::default()
        }
    }

    /// A declared variable with no value
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Caller-owned variable table. The engine never adds or removes entries.
pub type Variables = HashMap<String, Variable>;

/// Per-evaluator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum nesting of parenthesized groups and of formula-valued variables
    pub max_depth: usize,
    /// Emit a debug event for every rewrite step (needs the `tracing` feature)
    pub trace: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace: false,
        }
    }
}

impl EvalOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Canonical text form of a number.
///
/// Shortest decimal that round-trips, never in exponent notation, and
/// integers print without a fractional part (`5`, not `5.0`). Every string
/// produced here for a finite value matches the `number` grammar rule.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{}", n)
}
