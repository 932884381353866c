//! Equation-driven SVG documents.
//!
//! The core is a small equation engine ([`Evaluator`]) that resolves named
//! variables, including variables whose value is itself an equation, and
//! evaluates `^ * // / % + -` with parentheses. The [`document`] module uses
//! it to turn a JSON description into SVG markup.
//!
//! ```
//! use svgeq::{Variable, Variables, evaluate};
//!
//! let mut vars = Variables::new();
//! vars.insert("w".into(), Variable::formula("40*2"));
//! assert_eq!(evaluate("(w+20)/2", &vars).unwrap(), 50.0);
//! ```

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "equation.pest"]
pub struct EquationParser;

pub mod document;
pub mod errors;
pub mod eval;
mod log;
pub mod types;

pub use document::{AttributeDiagnostic, Document, RenderOptions, Rendered, render_document};
pub use errors::{EvalError, RenderError};
pub use eval::Evaluator;
pub use types::{EvalOptions, Variable, VariableValue, Variables, format_number};

/// Evaluate one equation with a fresh evaluator.
pub fn evaluate(equation: &str, variables: &Variables) -> Result<f64, EvalError> {
    Evaluator::new(variables).evaluate(equation)
}

/// Render a JSON document to SVG.
///
/// Attributes that fail to evaluate are left out and reported in
/// [`Rendered::diagnostics`]; only an unreadable document is an error.
pub fn render_json(source: &str) -> Result<Rendered, miette::Report> {
    render_json_with(source, &RenderOptions::default())
}

/// Render a JSON document to SVG with explicit options.
pub fn render_json_with(source: &str, options: &RenderOptions) -> Result<Rendered, miette::Report> {
    let document = Document::from_json(source)?;
    Ok(render_document(&document, options)?)
}
