//! Variable substitution
//!
//! Replaces identifiers left to right, one at a time, with the text form of
//! their numeric value. Formula-valued variables are evaluated recursively
//! with the identifier pushed onto the dependency stack.

use pest::Parser;

use crate::errors::EvalError;
use crate::log::step;
use crate::types::{VariableValue, format_number};
use crate::{EquationParser, Rule};

use super::Evaluator;

/// Byte range of the leftmost identifier-shaped token
pub(crate) fn find_identifier(text: &str) -> Option<(usize, usize)> {
    text.char_indices()
        .filter(|(_, c)| c.is_ascii_alphabetic() || *c == '_')
        .find_map(|(offset, _)| {
            let pair = EquationParser::parse(Rule::identifier, &text[offset..])
                .ok()?
                .next()?;
            Some((offset, offset + pair.as_str().len()))
        })
}

impl Evaluator<'_> {
    pub(super) fn substitute(
        &mut self,
        equation: &str,
        dependencies: &mut Vec<String>,
        depth: usize,
    ) -> Result<String, EvalError> {
        let mut text = equation.to_string();

        while let Some((start, end)) = find_identifier(&text) {
            let name = text[start..end].to_string();
            let value = self.lookup(&name, dependencies, depth)?;

            let rewritten = format!("{}{}{}", &text[..start], format_number(value), &text[end..]);
            if rewritten == text {
                return Err(self.undefined(&name));
            }
            step!(self.options.trace, name = %name, value, depth, equation = %rewritten, "substituted variable");
            text = rewritten;
        }

        Ok(text)
    }

    /// Resolve one identifier to a finite number
    fn lookup(
        &mut self,
        name: &str,
        dependencies: &mut Vec<String>,
        depth: usize,
    ) -> Result<f64, EvalError> {
        let variables = self.variables;
        let (variable, value) = match variables.get(name) {
            Some(variable) => match &variable.value {
                Some(value) => (variable, value),
                None => return Err(self.undefined(name)),
            },
            None => return Err(self.undefined(name)),
        };

        if variable.disabled {
            return Err(EvalError::DisabledVariable {
                name: name.to_string(),
            });
        }

        if let Some(pos) = dependencies.iter().position(|d| d == name) {
            let mut chain = dependencies[pos..].to_vec();
            chain.push(name.to_string());
            return Err(EvalError::CyclicDependency {
                name: name.to_string(),
                chain: chain.join(" -> "),
            });
        }

        if let Some(cached) = self.resolved.get(name) {
            return Ok(*cached);
        }

        match value {
            VariableValue::Number(n) if n.is_finite() => Ok(*n),
            VariableValue::Number(_) => Err(EvalError::NonFinite {
                expression: name.to_string(),
            }),
            VariableValue::Formula(formula) => {
                dependencies.push(name.to_string());
                let result = self.eval_at_depth(formula, dependencies, depth + 1);
                dependencies.pop();

                let n = result?;
                step!(self.options.trace, name, value = n, depth, "resolved formula variable");
                self.resolved.insert(name.to_string(), n);
                Ok(n)
            }
        }
    }

    fn undefined(&self, name: &str) -> EvalError {
        let mut candidates: Vec<&String> = self
            .variables
            .keys()
            .filter(|k| k.as_str() != name && k.eq_ignore_ascii_case(name))
            .collect();
        candidates.sort();
        EvalError::UndefinedVariable {
            name: name.to_string(),
            suggestion: candidates
                .first()
                .map(|k| format!("did you mean `{}`?", k)),
        }
    }
}
