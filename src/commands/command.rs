//! Command definitions

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a sequence under an identifier
    Insert {
        id: String,
        /// Length declared in the command file
        length: usize,
        sequence: String,
    },

    /// Remove an identifier and its sequence
    Remove { id: String },

    /// Look up the sequence stored under an identifier
    Search { id: String },

    /// Report the index contents and the free list
    Print,
}

impl Command {
    /// Command keyword as written in a command file
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Remove { .. } => "remove",
            Command::Search { .. } => "search",
            Command::Print => "print",
        }
    }
}
