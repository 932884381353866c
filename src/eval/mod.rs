//! Equation evaluation by iterative text rewriting.
//!
//! An equation goes through four stages:
//!
//! 1. [`substitute`] replaces every identifier with its numeric value,
//!    evaluating formula-valued variables on demand.
//! 2. [`parens`] resolves parenthesized groups, first opening first.
//! 3. [`operators`] reduces the leftmost highest-priority binary operation
//!    and restarts from the top tier until none remain.
//! 4. [`value`] turns the residual text into a number.
//!
//! Each stage rewrites text and splices numbers back in with
//! [`format_number`](crate::types::format_number).

use std::collections::HashMap;

use crate::errors::EvalError;
use crate::types::{EvalOptions, Variables};

mod operators;
mod parens;
mod substitute;
mod value;

pub use operators::{Operator, TIERS};
pub use value::parse_value;

use parens::Resolution;

/// Evaluates equations against a borrowed variable table.
///
/// Formula-valued variables are resolved at most once per evaluator and the
/// results are kept in a cache owned by the evaluator, so sibling
/// evaluations sharing one evaluator also share the memoized values. The
/// variable table itself is never modified.
#[derive(Debug)]
pub struct Evaluator<'v> {
    variables: &'v Variables,
    resolved: HashMap<String, f64>,
    options: EvalOptions,
}

impl<'v> Evaluator<'v> {
    pub fn new(variables: &'v Variables) -> Self {
        Self::with_options(variables, EvalOptions::default())
    }

    pub fn with_options(variables: &'v Variables, options: EvalOptions) -> Self {
        Self::with_cache(variables, options, HashMap::new())
    }

    /// Start from values memoized by an earlier evaluator.
    ///
    /// Every cached name must resolve to the same value in `variables`.
    pub fn with_cache(
        variables: &'v Variables,
        options: EvalOptions,
        resolved: HashMap<String, f64>,
    ) -> Self {
        Self {
            variables,
            resolved,
            options,
        }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn variables(&self) -> &'v Variables {
        self.variables
    }

    /// Evaluate an equation to a number.
    ///
    /// A single leading `=` is ignored, so `=2+3` and `2+3` are the same.
    pub fn evaluate(&mut self, equation: &str) -> Result<f64, EvalError> {
        self.evaluate_with_dependencies(equation, &[])
    }

    /// Evaluate with a pre-seeded dependency stack.
    ///
    /// Any identifier already on `dependencies` is reported as a cycle.
    pub fn evaluate_with_dependencies(
        &mut self,
        equation: &str,
        dependencies: &[String],
    ) -> Result<f64, EvalError> {
        let mut stack = dependencies.to_vec();
        self.eval_at_depth(equation, &mut stack, 0)
    }

    /// Memoized value of a formula variable, if it has been resolved
    pub fn resolved(&self, name: &str) -> Option<f64> {
        self.resolved.get(name).copied()
    }

    /// All memoized values
    pub fn cache(&self) -> &HashMap<String, f64> {
        &self.resolved
    }

    pub fn into_cache(self) -> HashMap<String, f64> {
        self.resolved
    }

    /// Drop all memoized values
    pub fn clear_cache(&mut self) {
        self.resolved.clear();
    }

    fn check_depth(&self, depth: usize) -> Result<(), EvalError> {
        if depth > self.options.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn eval_at_depth(
        &mut self,
        equation: &str,
        dependencies: &mut Vec<String>,
        depth: usize,
    ) -> Result<f64, EvalError> {
        self.check_depth(depth)?;

        let equation = equation.trim_start();
        let equation = equation.strip_prefix('=').unwrap_or(equation);

        let text = self.substitute(equation, dependencies, depth)?;
        check_balance(&text)?;

        match self.resolve_parens(&text, depth)? {
            Resolution::Value(n) => Ok(n),
            // A `)` closing a group that was never opened
            Resolution::Closed(_) => Err(EvalError::ParenthesisMismatch { equation: text }),
        }
    }
}

/// Both parenthesis kinds must occur equally often
fn check_balance(text: &str) -> Result<(), EvalError> {
    let opened = text.matches('(').count();
    let closed = text.matches(')').count();
    if opened != closed {
        return Err(EvalError::ParenthesisMismatch {
            equation: text.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variable;

    fn vars(entries: &[(&str, Variable)]) -> Variables {
        entries
            .iter()
            .map(|(name, v)| (name.to_string(), v.clone()))
            .collect()
    }

    fn eval(equation: &str) -> Result<f64, EvalError> {
        Evaluator::new(&Variables::new()).evaluate(equation)
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(eval("2+3"), Ok(5.0));
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
    }

    #[test]
    fn tier_two_operators() {
        assert_eq!(eval("2^3"), Ok(8.0));
        assert_eq!(eval("7//2"), Ok(3.0));
        assert_eq!(eval("7%2"), Ok(1.0));
        assert_eq!(eval("7/2"), Ok(3.5));
    }

    #[test]
    fn leading_equals_is_ignored() {
        assert_eq!(eval("=2+3"), eval("2+3"));
        assert_eq!(eval("  =2+3"), Ok(5.0));
    }

    #[test]
    fn only_one_leading_equals_is_stripped() {
        assert!(matches!(eval("==1"), Err(EvalError::ParseFailure { .. })));
    }

    #[test]
    fn repeated_evaluation_is_stable() {
        let empty = Variables::new();
        let mut ev = Evaluator::new(&empty);
        let first = ev.evaluate("1/3 + 2^0.5");
        let second = ev.evaluate("1/3 + 2^0.5");
        assert_eq!(first, second);
        assert!(ev.cache().is_empty());
    }

    #[test]
    fn substitutes_variables() {
        let v = vars(&[("x", Variable::formula("5"))]);
        assert_eq!(Evaluator::new(&v).evaluate("x+1"), Ok(6.0));
    }

    #[test]
    fn chained_formulas_are_memoized() {
        let v = vars(&[("a", Variable::formula("b+1")), ("b", Variable::formula("2"))]);
        let mut ev = Evaluator::new(&v);
        assert_eq!(ev.evaluate("a"), Ok(3.0));
        assert_eq!(ev.resolved("a"), Some(3.0));
        assert_eq!(ev.resolved("b"), Some(2.0));
        // The caller's table is untouched
        assert_eq!(v["a"], Variable::formula("b+1"));
    }

    #[test]
    fn memoized_values_are_shared_by_sibling_calls() {
        let v = vars(&[("w", Variable::formula("10*10"))]);
        let mut ev = Evaluator::new(&v);
        assert_eq!(ev.evaluate("w/2"), Ok(50.0));
        assert_eq!(ev.cache().len(), 1);
        assert_eq!(ev.evaluate("w-1"), Ok(99.0));
        ev.clear_cache();
        assert!(ev.resolved("w").is_none());
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let v = vars(&[("a", Variable::formula("a+1"))]);
        let err = Evaluator::new(&v).evaluate("a").unwrap_err();
        assert_eq!(
            err,
            EvalError::CyclicDependency {
                name: "a".into(),
                chain: "a -> a".into()
            }
        );
    }

    #[test]
    fn transitive_cycle_reports_chain() {
        let v = vars(&[
            ("a", Variable::formula("b")),
            ("b", Variable::formula("c*2")),
            ("c", Variable::formula("a")),
        ]);
        let err = Evaluator::new(&v).evaluate("1+a").unwrap_err();
        assert_eq!(err.to_string(), "cyclic dependency: a -> b -> c -> a");
    }

    #[test]
    fn seeded_dependencies_count_as_cycles() {
        let v = vars(&[("x", Variable::formula("1"))]);
        let err = Evaluator::new(&v)
            .evaluate_with_dependencies("x", &["x".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), "cyclic_dependency");
    }

    #[test]
    fn disabled_variable() {
        let v = vars(&[("x", Variable::formula("1").disabled())]);
        let err = Evaluator::new(&v).evaluate("x").unwrap_err();
        assert_eq!(err, EvalError::DisabledVariable { name: "x".into() });
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(matches!(eval("(2+3"), Err(EvalError::ParenthesisMismatch { .. })));
        assert!(matches!(eval("2+3)"), Err(EvalError::ParenthesisMismatch { .. })));
        // Counts agree but the first group closes before it opens
        assert!(matches!(eval("2)+(3"), Err(EvalError::ParenthesisMismatch { .. })));
    }

    #[test]
    fn blank_input_is_empty_expression() {
        assert_eq!(eval(""), Err(EvalError::EmptyExpression));
        assert_eq!(eval("   "), Err(EvalError::EmptyExpression));
        assert_eq!(eval("="), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn depth_limit_applies_to_nesting() {
        let empty = Variables::new();
        let options = EvalOptions::default().with_max_depth(3);
        let mut ev = Evaluator::with_options(&empty, options);
        assert_eq!(ev.evaluate("((1))"), Ok(1.0));
        assert_eq!(
            ev.evaluate("((((1))))"),
            Err(EvalError::DepthExceeded { limit: 3 })
        );
        // Siblings do not nest
        assert_eq!(ev.evaluate("(1)+(1)+(1)+(1)+(1)"), Ok(5.0));
    }

    #[test]
    fn depth_limit_applies_to_variable_chains() {
        let v: Variables = (0..10)
            .map(|i| (format!("v{i}"), Variable::formula(format!("v{}+1", i + 1))))
            .chain(std::iter::once(("v10".to_string(), Variable::number(0.0))))
            .collect();
        let mut ev = Evaluator::with_options(&v, EvalOptions::default().with_max_depth(4));
        assert_eq!(ev.evaluate("v0"), Err(EvalError::DepthExceeded { limit: 4 }));
        let mut ev = Evaluator::new(&v);
        assert_eq!(ev.evaluate("v0"), Ok(10.0));
    }

    #[test]
    fn tracing_does_not_change_results() {
        let v = vars(&[("w", Variable::formula("(10+2)*3")), ("h", Variable::number(4.0))]);
        let options = EvalOptions::default().with_trace(true);
        let mut ev = Evaluator::with_options(&v, options);
        assert_eq!(ev.evaluate("w/(h-1)"), Ok(12.0));
        assert_eq!(ev.evaluate("2-3^2"), Ok(-7.0));
        assert!(matches!(ev.evaluate("(w"), Err(EvalError::ParenthesisMismatch { .. })));
    }

    #[test]
    fn cache_moves_between_evaluators() {
        let v = vars(&[("a", Variable::formula("2*3"))]);
        let mut first = Evaluator::new(&v);
        assert_eq!(first.evaluate("a"), Ok(6.0));

        let second = Evaluator::with_cache(&v, EvalOptions::default(), first.into_cache());
        assert_eq!(second.resolved("a"), Some(6.0));
    }
}
