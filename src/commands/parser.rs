//! Command file parser

use std::fs;
use std::path::Path;

use crate::error::{DnaDbError, Result};

use super::Command;

/// Read and parse a command file
pub fn parse_file(path: &Path) -> Result<Vec<Command>> {
    let input = fs::read_to_string(path)?;
    parse_commands(&input)
}

/// Parse command file contents
///
/// Errors name the 1-based line number of the offending command.
pub fn parse_commands(input: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    while let Some((line_no, line)) = lines.next() {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let command = match tokens.as_slice() {
            ["insert", id, length] => {
                let length = length.parse::<usize>().map_err(|_| {
                    command_error(line_no, format!("invalid length {:?}", length))
                })?;
                let (_, sequence) = lines
                    .next()
                    .ok_or_else(|| command_error(line_no, "insert is missing its sequence line"))?;

                Command::Insert {
                    id: (*id).to_string(),
                    length,
                    sequence: sequence.to_string(),
                }
            }
            ["remove", id] => Command::Remove { id: (*id).to_string() },
            ["search", id] => Command::Search { id: (*id).to_string() },
            ["print"] => Command::Print,
            [name @ ("insert" | "remove" | "search" | "print"), ..] => {
                return Err(command_error(
                    line_no,
                    format!("wrong number of arguments for {}", name),
                ));
            }
            [name, ..] => {
                return Err(command_error(line_no, format!("unknown command {:?}", name)));
            }
            [] => continue,
        };

        commands.push(command);
    }

    Ok(commands)
}

fn command_error(line_no: usize, message: impl Into<String>) -> DnaDbError {
    DnaDbError::Command(format!("line {}: {}", line_no, message.into()))
}
