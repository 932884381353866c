//! Data-driven equation tests
//!
//! Each `.eq` file declares variables and cases:
//!
//! ```text
//! # comment
//! let w = 100          declares a formula variable
//! let! off = 1         declares a disabled variable
//! let? ghost           declares a variable with no value
//! w/2 => 50            expects a number
//! off => !disabled_variable
//! ```
//!
//! Cases run in file order against one shared evaluator, so memoized values
//! carry over between them.

use datatest_stable::Utf8Path;
use svgeq::{Evaluator, Variable, Variables};

/// Tolerance for floating-point comparisons
const FLOAT_TOLERANCE: f64 = 1e-9;

#[derive(Debug)]
enum Expected {
    Value(f64),
    Error(String),
}

#[derive(Debug)]
struct Case {
    line: usize,
    equation: String,
    expected: Expected,
}

fn parse_case_file(source: &str) -> Result<(Variables, Vec<Case>), String> {
    let mut variables = Variables::new();
    let mut cases = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if let Some(name) = text.strip_prefix("let? ") {
            variables.insert(name.trim().to_string(), Variable::unset());
            continue;
        }

        let declaration = text
            .strip_prefix("let! ")
            .map(|rest| (rest, true))
            .or_else(|| text.strip_prefix("let ").map(|rest| (rest, false)));
        if let Some((rest, disabled)) = declaration {
            let (name, value) = rest
                .split_once('=')
                .ok_or_else(|| format!("line {line}: expected `let name = value`"))?;
            let mut variable = Variable::formula(value.trim());
            if disabled {
                variable = variable.disabled();
            }
            variables.insert(name.trim().to_string(), variable);
            continue;
        }

        let (equation, expected) = text
            .rsplit_once("=>")
            .ok_or_else(|| format!("line {line}: expected `equation => result`"))?;
        let expected = expected.trim();
        let expected = match expected.strip_prefix('!') {
            Some(kind) => Expected::Error(kind.to_string()),
            None => Expected::Value(
                expected
                    .parse()
                    .map_err(|_| format!("line {line}: bad expected value `{expected}`"))?,
            ),
        };
        cases.push(Case {
            line,
            equation: equation.trim().to_string(),
            expected,
        });
    }

    Ok((variables, cases))
}

fn run_case_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let (variables, cases) = parse_case_file(&source)?;
    if cases.is_empty() {
        return Err(format!("{path}: no cases").into());
    }

    let mut evaluator = Evaluator::new(&variables);
    let mut failures = Vec::new();

    for case in &cases {
        let result = evaluator.evaluate(&case.equation);
        let ok = match (&case.expected, &result) {
            (Expected::Value(want), Ok(got)) => (want - got).abs() <= FLOAT_TOLERANCE,
            (Expected::Error(kind), Err(e)) => e.kind() == kind,
            _ => false,
        };
        if !ok {
            failures.push(format!(
                "  line {}: `{}` expected {:?}, got {:?}",
                case.line, case.equation, case.expected, result
            ));
        }
    }

    if !failures.is_empty() {
        return Err(format!("{path}: {} failing cases\n{}", failures.len(), failures.join("\n")).into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = run_case_file, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/equations"), pattern = r"\.eq$" },
}
