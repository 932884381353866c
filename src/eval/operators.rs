//! Binary operator reduction on parenthesis-free text

use pest::Parser;

use crate::errors::EvalError;
use crate::log::step;
use crate::types::format_number;
use crate::{EquationParser, Rule};

use super::value::parse_value;

/// A binary operator and the grammar rule matching `<number> op <number>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Power,
    Multiply,
    FloorDivide,
    Divide,
    Modulo,
    Add,
    Subtract,
}

/// Priority tiers, highest first. Within a tier, earlier operators win ties.
pub const TIERS: [&[Operator]; 3] = [
    &[Operator::Power],
    &[
        Operator::Multiply,
        Operator::FloorDivide,
        Operator::Divide,
        Operator::Modulo,
    ],
    &[Operator::Add, Operator::Subtract],
];

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Power => "^",
            Operator::Multiply => "*",
            Operator::FloorDivide => "//",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Add => "+",
            Operator::Subtract => "-",
        }
    }

    fn rule(self) -> Rule {
        match self {
            Operator::Power => Rule::power,
            Operator::Multiply => Rule::multiply,
            Operator::FloorDivide => Rule::floor_div,
            Operator::Divide => Rule::divide,
            Operator::Modulo => Rule::modulo,
            Operator::Add => Rule::add,
            Operator::Subtract => Rule::subtract,
        }
    }

    /// Apply to two operands; `expression` is only used for error messages
    pub fn apply(self, lhs: f64, rhs: f64, expression: &str) -> Result<f64, EvalError> {
        let divisor_is_zero = rhs == 0.0
            && matches!(
                self,
                Operator::FloorDivide | Operator::Divide | Operator::Modulo
            );
        if divisor_is_zero {
            return Err(EvalError::DivisionByZero {
                expression: expression.to_string(),
            });
        }

        let result = match self {
            Operator::Power => lhs.powf(rhs),
            Operator::Multiply => lhs * rhs,
            Operator::FloorDivide => (lhs / rhs).floor(),
            Operator::Divide => lhs / rhs,
            Operator::Modulo => lhs % rhs,
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
        };

        if !result.is_finite() {
            return Err(EvalError::NonFinite {
                expression: expression.to_string(),
            });
        }
        Ok(result)
    }
}

/// One matched `<number> op <number>` span
#[derive(Debug, Clone, PartialEq)]
struct Operation {
    start: usize,
    end: usize,
    op: Operator,
    lhs: f64,
    rhs: f64,
}

/// Whether the operand before `offset` is a number.
///
/// A `-` right after an operand is the binary operator, never a sign, and a
/// match may not start inside a number.
fn follows_operand(text: &str, offset: usize) -> bool {
    let before = &text[..offset];
    let last = if text[offset..].starts_with('-') {
        before.trim_end().chars().next_back()
    } else {
        before.chars().next_back()
    };
    last.is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn match_at(text: &str, offset: usize, op: Operator) -> Option<Operation> {
    let pair = EquationParser::parse(op.rule(), &text[offset..]).ok()?.next()?;
    let end = offset + pair.as_str().len();

    let mut operands = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::number)
        .map(|p| p.as_str().parse::<f64>());
    let lhs = operands.next()?.ok()?;
    let rhs = operands.next()?.ok()?;

    Some(Operation {
        start: offset,
        end,
        op,
        lhs,
        rhs,
    })
}

/// Leftmost operation among the operators of one tier
fn find_in_tier(text: &str, tier: &[Operator]) -> Option<Operation> {
    text.char_indices()
        .filter(|&(offset, c)| {
            (c.is_ascii_digit() || c == '-') && !follows_operand(text, offset)
        })
        .find_map(|(offset, _)| tier.iter().find_map(|&op| match_at(text, offset, op)))
}

/// Reduce a flat equation to a number.
///
/// Each step applies the leftmost operation of the highest tier that has
/// one, splices the result in and starts again from the first tier.
pub fn reduce(text: &str, trace: bool) -> Result<f64, EvalError> {
    let mut text = text.to_string();

    'reduce: loop {
        for tier in TIERS {
            let Some(operation) = find_in_tier(&text, tier) else {
                continue;
            };

            let span = &text[operation.start..operation.end];
            let value = operation.op.apply(operation.lhs, operation.rhs, span)?;
            let rewritten = format!(
                "{}{}{}",
                &text[..operation.start],
                format_number(value),
                &text[operation.end..]
            );
            if rewritten == text {
                return Err(EvalError::OperationFailure { expression: text });
            }
            step!(trace, op = operation.op.symbol(), value, equation = %rewritten, "reduced");
            text = rewritten;
            continue 'reduce;
        }

        return parse_value(&text);
    }
}
