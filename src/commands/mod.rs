//! Commands Module
//!
//! Command files driving a database run.
//!
//! ## Command File Format
//! ```text
//! insert <id> <length>
//! <sequence>
//! remove <id>
//! search <id>
//! print
//! ```
//! Tokens are separated by any whitespace and blank lines are ignored. The
//! sequence of an `insert` is the next non-blank line.

mod command;
mod parser;

pub use command::Command;
pub use parser::{parse_commands, parse_file};
