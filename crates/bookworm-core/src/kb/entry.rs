use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{BookwormError, Result};
use crate::parse::ParsedSource;
use crate::rules::catalog::{OutputKind, RuleId};
use crate::rules::output::{Notification, RuleOutput};

/// One indexed source file plus the facts rules derived from it.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub cookbook: Option<String>,
    pub source: ParsedSource,
    pub facts: BTreeMap<RuleId, RuleOutput>,
}

impl FileEntry {
    pub fn new(path: PathBuf, cookbook: Option<String>, source: ParsedSource) -> Self {
        Self {
            path,
            cookbook,
            source,
            facts: BTreeMap::new(),
        }
    }

    pub fn fact(&self, rule: RuleId) -> Option<&RuleOutput> {
        self.facts.get(&rule)
    }

    pub fn set_fact(&mut self, rule: RuleId, output: RuleOutput) {
        self.facts.insert(rule, output);
    }

    /// Read a rule output, failing when the rule never ran on this entry.
    ///
    /// `requester` names the report or rule asking, for the error message.
    pub fn require(&self, rule: RuleId, requester: &str) -> Result<&RuleOutput> {
        self.fact(rule).ok_or_else(|| BookwormError::MissingDependency {
            requester: requester.to_string(),
            rule,
        })
    }

    pub fn list(&self, rule: RuleId, requester: &str) -> Result<&[String]> {
        match self.require(rule, requester)? {
            RuleOutput::List(items) => Ok(items),
            other => Err(mismatch(rule, OutputKind::List, other)),
        }
    }

    pub fn flag(&self, rule: RuleId, requester: &str) -> Result<bool> {
        match self.require(rule, requester)? {
            RuleOutput::Flag(value) => Ok(*value),
            other => Err(mismatch(rule, OutputKind::Flag, other)),
        }
    }

    pub fn text(&self, rule: RuleId, requester: &str) -> Result<&str> {
        match self.require(rule, requester)? {
            RuleOutput::Text(value) => Ok(value),
            other => Err(mismatch(rule, OutputKind::Text, other)),
        }
    }

    pub fn map(
        &self,
        rule: RuleId,
        requester: &str,
    ) -> Result<&BTreeMap<String, serde_json::Value>> {
        match self.require(rule, requester)? {
            RuleOutput::Map(map) => Ok(map),
            other => Err(mismatch(rule, OutputKind::Map, other)),
        }
    }

    pub fn notifications(&self, rule: RuleId, requester: &str) -> Result<&[Notification]> {
        match self.require(rule, requester)? {
            RuleOutput::Notifications(items) => Ok(items),
            other => Err(mismatch(rule, OutputKind::Notifications, other)),
        }
    }
}

fn mismatch(rule: RuleId, expected: OutputKind, found: &RuleOutput) -> BookwormError {
    BookwormError::OutputKindMismatch {
        rule,
        expected,
        found: found.kind(),
    }
}
