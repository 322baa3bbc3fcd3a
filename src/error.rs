//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Everything that can stop a Taskfile from becoming a diagram.
///
/// Only `MalformedDocument` is a plain input error. The version and shape
/// variants are hard stops: translation is abandoned and nothing is
/// written, since a half-drawn diagram would misrepresent the workflow.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Taskfile parse error: {0}")]
    MalformedDocument(#[from] serde_yaml::Error),

    #[error("Only version 3 Taskfiles are supported (found '{found}')")]
    UnsupportedVersion { found: String },

    #[error("Task '{task}' cannot have both cmd and cmds")]
    ConflictingCommands { task: String },

    #[error("Task '{task}' has a {kind} entry of unexpected shape: {entry}")]
    MalformedEntry {
        task: String,
        kind: EntryKind,
        entry: String,
    },

    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which list a malformed entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dependency,
    RequiredVariable,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Dependency => write!(f, "deps"),
            EntryKind::RequiredVariable => write!(f, "requires.vars"),
        }
    }
}

impl FixSuggestion for ConvertError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ConvertError::MalformedDocument(_) => {
                Some("Check YAML syntax: indentation and quoting")
            }
            ConvertError::UnsupportedVersion { .. } => Some("Set version: '3' at the top of the Taskfile"),
            ConvertError::ConflictingCommands { .. } => {
                Some("Keep either cmd: (single command) or cmds: (list), not both")
            }
            ConvertError::MalformedEntry { kind: EntryKind::Dependency, .. } => {
                Some("Use a task name or { task: name, vars: {...} }")
            }
            ConvertError::MalformedEntry { kind: EntryKind::RequiredVariable, .. } => {
                Some("Use a variable name or { name: VAR, enum: [...] }")
            }
            ConvertError::Config { .. } => Some("Check the TOML syntax of the config file"),
            ConvertError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_error_names_found_value() {
        let err = ConvertError::UnsupportedVersion { found: "2".into() };
        assert_eq!(
            err.to_string(),
            "Only version 3 Taskfiles are supported (found '2')"
        );
        assert!(err.fix_suggestion().is_some());
    }

    #[test]
    fn malformed_entry_mentions_list() {
        let err = ConvertError::MalformedEntry {
            task: "build".into(),
            kind: EntryKind::RequiredVariable,
            entry: "42".into(),
        };
        assert!(err.to_string().contains("requires.vars"));
        assert!(err.to_string().contains("'build'"));
    }
}
