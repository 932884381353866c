//! Parenthesis resolution
//!
//! Groups are resolved in the order their opening parentheses appear. The
//! text after the first `(` is resolved recursively; that descent stops at the
//! first `)` it meets, evaluates everything before it, and hands back the
//! number followed by the untouched remainder. The opening `(` and everything
//! after it are then replaced by that hand-back and the scan starts over.

use crate::errors::EvalError;
use crate::log::step;
use crate::types::format_number;

use super::Evaluator;
use super::operators;

/// Outcome of resolving one segment
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolution {
    /// The segment contained no unmatched `)`
    Value(f64),
    /// The segment hit a `)` belonging to an enclosing call: the evaluated
    /// prefix followed by the text after that `)`
    Closed(String),
}

impl Evaluator<'_> {
    pub(super) fn resolve_parens(&self, text: &str, depth: usize) -> Result<Resolution, EvalError> {
        self.check_depth(depth)?;
        let trace = self.options.trace;
        let mut text = text.to_string();

        loop {
            let open = text.find('(');
            let close = text.find(')');

            match (open, close) {
                (None, None) => return Ok(Resolution::Value(operators::reduce(&text, trace)?)),
                (Some(_), None) => {
                    return Err(EvalError::ParenthesisMismatch { equation: text });
                }
                (None, Some(close)) => return self.close_group(&text, close, depth),
                (Some(open), Some(close)) if close < open => {
                    return self.close_group(&text, close, depth);
                }
                (Some(open), Some(_)) => {
                    let inner = match self.resolve_parens(&text[open + 1..], depth + 1)? {
                        Resolution::Closed(inner) => inner,
                        Resolution::Value(_) => {
                            return Err(EvalError::ParenthesisMismatch { equation: text });
                        }
                    };

                    let rewritten = format!("{}{}", &text[..open], inner);
                    if rewritten == text {
                        return Err(EvalError::ParenthesisMismatch { equation: text });
                    }
                    step!(trace, depth, equation = %rewritten, "resolved group");
                    text = rewritten;
                }
            }
        }
    }

    /// Evaluate everything before the `)` at `close` and hand back the rest
    fn close_group(&self, text: &str, close: usize, depth: usize) -> Result<Resolution, EvalError> {
        let trace = self.options.trace;
        let value = operators::reduce(&text[..close], trace)?;
        let rest = format!("{}{}", format_number(value), &text[close + 1..]);
        step!(trace, value, depth, rest = %rest, "closed group");
        Ok(Resolution::Closed(rest))
    }
}
