//! Final numeric parse

use pest::Parser;

use crate::errors::EvalError;
use crate::{EquationParser, Rule};

/// Parse fully reduced text as a number.
///
/// Blank text is an error rather than zero.
pub fn parse_value(text: &str) -> Result<f64, EvalError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let parse_failure = || EvalError::ParseFailure {
        text: trimmed.to_string(),
    };

    let pairs = EquationParser::parse(Rule::literal, text).map_err(|_| parse_failure())?;
    let number = pairs
        .flatten()
        .find(|p| p.as_rule() == Rule::number)
        .ok_or_else(parse_failure)?;

    number.as_str().parse::<f64>().map_err(|_| parse_failure())
}
