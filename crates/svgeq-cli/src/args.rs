//! Command-line parsing

use miette::miette;
use svgeq::{Variable, Variables};

pub const USAGE: &str = "\
usage:
  svgeq <document.json> [-o <out.svg>] [--strict] [--trace]
  svgeq eval <equation> [name=value ...] [--trace]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Render {
        input: String,
        output: Option<String>,
        strict: bool,
    },
    Eval {
        equation: String,
        variables: Variables,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
    pub trace: bool,
}

pub fn parse(args: impl IntoIterator<Item = String>) -> miette::Result<Args> {
    let mut args: Vec<String> = args.into_iter().collect();

    let trace = take_flag(&mut args, "--trace");
    if args.is_empty() || take_flag(&mut args, "--help") || take_flag(&mut args, "-h") {
        return Ok(Args {
            command: Command::Help,
            trace,
        });
    }

    let command = if args[0] == "eval" {
        let mut rest = args.into_iter().skip(1);
        let equation = rest
            .next()
            .ok_or_else(|| miette!("`eval` needs an equation"))?;
        let variables = rest.map(|a| parse_assignment(&a)).collect::<miette::Result<_>>()?;
        Command::Eval {
            equation,
            variables,
        }
    } else {
        let strict = take_flag(&mut args, "--strict");
        let output = take_option(&mut args, "-o")?;
        match args.as_slice() {
            [input] => Command::Render {
                input: input.clone(),
                output,
                strict,
            },
            _ => return Err(miette!("expected exactly one input document\n{USAGE}")),
        }
    };

    Ok(Args { command, trace })
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn take_option(args: &mut Vec<String>, name: &str) -> miette::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(miette!("`{name}` needs a value"));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

/// `name=value`, where value is an equation
fn parse_assignment(arg: &str) -> miette::Result<(String, Variable)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| miette!("expected name=value, got `{arg}`"))?;
    Ok((name.trim().to_string(), Variable::formula(value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_strs(args: &[&str]) -> miette::Result<Args> {
        parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn render_with_options() {
        let args = parse_strs(&["doc.json", "--strict", "-o", "out.svg"]).unwrap();
        assert_eq!(
            args.command,
            Command::Render {
                input: "doc.json".into(),
                output: Some("out.svg".into()),
                strict: true,
            }
        );
        assert!(!args.trace);
    }

    #[test]
    fn eval_with_variables() {
        let args = parse_strs(&["eval", "w/2", "w=10*3", "--trace"]).unwrap();
        let Command::Eval {
            equation,
            variables,
        } = args.command
        else {
            panic!("expected eval");
        };
        assert_eq!(equation, "w/2");
        assert_eq!(variables["w"], Variable::formula("10*3"));
        assert!(args.trace);
    }

    #[test]
    fn errors() {
        assert!(parse_strs(&["eval"]).is_err());
        assert!(parse_strs(&["eval", "1", "novalue"]).is_err());
        assert!(parse_strs(&["a.json", "b.json"]).is_err());
        assert!(parse_strs(&["a.json", "-o"]).is_err());
        assert_eq!(parse_strs(&[]).unwrap().command, Command::Help);
    }
}
