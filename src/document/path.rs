//! Path data segments (`d` attribute)

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use super::Scalar;
use crate::types::format_number;

/// One path command with its coordinate equations
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathSegment {
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<Scalar>,
}

/// A segment that cannot form valid path data
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("unknown path command `{cmd}`")]
    #[diagnostic(
        code(svgeq::path::unknown_command),
        help("use one of M L H V C S Q T A Z, in either case")
    )]
    UnknownCommand { cmd: String },

    #[error("path command `{cmd}` takes {expected} arguments, got {found}")]
    #[diagnostic(code(svgeq::path::arity))]
    Arity {
        cmd: char,
        expected: usize,
        found: usize,
    },
}

/// Number of arguments each command takes
pub fn arity(cmd: char) -> Option<usize> {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'C' => Some(6),
        'S' | 'Q' => Some(4),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

impl PathSegment {
    /// The command letter, checked against its argument count
    pub fn command(&self) -> Result<char, PathError> {
        let mut chars = self.cmd.trim().chars();
        let (Some(cmd), None) = (chars.next(), chars.next()) else {
            return Err(PathError::UnknownCommand {
                cmd: self.cmd.clone(),
            });
        };
        let expected = arity(cmd).ok_or_else(|| PathError::UnknownCommand {
            cmd: self.cmd.clone(),
        })?;
        if self.args.len() != expected {
            return Err(PathError::Arity {
                cmd,
                expected,
                found: self.args.len(),
            });
        }
        Ok(cmd)
    }
}

/// Format evaluated segments as `d` attribute text, e.g. `M 0 0 L 10 5 Z`
pub fn format_path(segments: &[(char, Vec<f64>)]) -> String {
    segments
        .iter()
        .map(|(cmd, args)| {
            std::iter::once(cmd.to_string())
                .chain(args.iter().map(|n| format_number(*n)))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
