//! Error types with diagnostic codes using miette
//!
//! Messages depend only on the error kind and the offending name or text, so
//! two identical failures always render the same message.

use miette::Diagnostic;
use thiserror::Error;

use crate::document::PathError;

// ============================================================================
// Evaluation Errors
// ============================================================================

/// Errors that occur while evaluating an equation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("undefined variable: {name}")]
    #[diagnostic(code(svgeq::eval::undefined_variable))]
    UndefinedVariable {
        name: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("variable is disabled: {name}")]
    #[diagnostic(
        code(svgeq::eval::disabled_variable),
        help("enable the variable or stop referring to it")
    )]
    DisabledVariable { name: String },

    #[error("cyclic dependency: {chain}")]
    #[diagnostic(code(svgeq::eval::cyclic_dependency))]
    CyclicDependency { name: String, chain: String },

    #[error("mismatched parentheses in `{equation}`")]
    #[diagnostic(code(svgeq::eval::parenthesis_mismatch))]
    ParenthesisMismatch { equation: String },

    #[error("operation could not be applied to `{expression}`")]
    #[diagnostic(code(svgeq::eval::operation_failure))]
    OperationFailure { expression: String },

    #[error("empty expression")]
    #[diagnostic(code(svgeq::eval::empty_expression))]
    EmptyExpression,

    #[error("not a number: `{text}`")]
    #[diagnostic(code(svgeq::eval::parse_failure))]
    ParseFailure { text: String },

    #[error("nesting depth exceeded (max {limit})")]
    #[diagnostic(
        code(svgeq::eval::depth_exceeded),
        help("simplify the equation or raise `EvalOptions::max_depth`")
    )]
    DepthExceeded { limit: usize },

    #[error("division by zero in `{expression}`")]
    #[diagnostic(code(svgeq::eval::division_by_zero))]
    DivisionByZero { expression: String },

    #[error("result is NaN or infinite in `{expression}`")]
    #[diagnostic(code(svgeq::eval::non_finite))]
    NonFinite { expression: String },
}

impl EvalError {
    /// Short snake_case name of the error kind, matching the diagnostic code suffix
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::UndefinedVariable { .. } => "undefined_variable",
            EvalError::DisabledVariable { .. } => "disabled_variable",
            EvalError::CyclicDependency { .. } => "cyclic_dependency",
            EvalError::ParenthesisMismatch { .. } => "parenthesis_mismatch",
            EvalError::OperationFailure { .. } => "operation_failure",
            EvalError::EmptyExpression => "empty_expression",
            EvalError::ParseFailure { .. } => "parse_failure",
            EvalError::DepthExceeded { .. } => "depth_exceeded",
            EvalError::DivisionByZero { .. } => "division_by_zero",
            EvalError::NonFinite { .. } => "non_finite",
        }
    }
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that abort rendering a whole document
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("invalid document: {0}")]
    #[diagnostic(code(svgeq::render::invalid_document))]
    Json(#[from] serde_json::Error),

    #[error("failed to write SVG: {0}")]
    #[diagnostic(code(svgeq::render::xml))]
    Xml(String),

    #[error("viewBox needs 4 values, found {found}")]
    #[diagnostic(code(svgeq::render::view_box))]
    ViewBox { found: usize },

    #[error("invalid path segment {index}")]
    #[diagnostic(code(svgeq::render::path))]
    Path {
        index: usize,
        #[source]
        #[diagnostic_source]
        source: PathError,
    },

    #[error("cannot evaluate `{attribute}` on <{element}>")]
    #[diagnostic(code(svgeq::render::attribute))]
    Attribute {
        element: String,
        attribute: String,
        #[source]
        #[diagnostic_source]
        source: EvalError,
    },
}
