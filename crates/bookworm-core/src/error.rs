//! Error types for the bookworm pipeline.
//!
//! Ruby parse failures are not errors: the parser adapter degrades them to
//! [`ParsedSource::Empty`](crate::parse::ParsedSource::Empty). Everything in
//! this enum is fatal to a run.

use std::path::PathBuf;

use thiserror::Error;

use crate::keys::Key;
use crate::rules::catalog::{OutputKind, RuleId};

#[derive(Error, Debug)]
pub enum BookwormError {
    /// A crawled path does not follow the naming convention of its key.
    #[error("path '{path}' does not match the {key} naming pattern '{pattern}'")]
    MalformedPath {
        key: Key,
        path: PathBuf,
        pattern: String,
    },

    /// A report or rule read the output of a rule that never ran.
    #[error("{requester} requires output of rule {rule}, which never ran")]
    MissingDependency { requester: String, rule: RuleId },

    /// Rule dependencies form a cycle.
    #[error("rule dependency cycle: {}", .rules.join(" -> "))]
    DependencyCycle { rules: Vec<String> },

    /// A stored rule output has a different shape than its reader expects.
    #[error("rule {rule} produced {found:?} output, expected {expected:?}")]
    OutputKindMismatch {
        rule: RuleId,
        expected: OutputKind,
        found: OutputKind,
    },

    #[error("unknown rule '{0}', take a look at --list-rules")]
    UnknownRule(String),

    #[error("unknown report '{0}', take a look at --list-reports")]
    UnknownReport(String),

    #[error("configuration source_dirs cannot be empty")]
    EmptySourceDirs,

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid configuration in '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The bundled Ruby grammar could not be loaded into the parser.
    #[error("failed to load Ruby grammar: {0}")]
    Grammar(String),
}

pub type Result<T> = std::result::Result<T, BookwormError>;
