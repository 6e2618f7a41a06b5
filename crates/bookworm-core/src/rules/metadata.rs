//! Rules over `metadata.rb` and `metadata.json`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::kb::FileEntry;
use crate::parse::ParsedSource;
use crate::rules::ast::{call_arguments, calls_named, string_literal, top_level_calls_named};
use crate::rules::output::RuleOutput;
use crate::util::deterministic::sort_dedup;

/// Scalar metadata fields whose literal values are captured.
pub const SCALAR_FIELDS: [&str; 12] = [
    "name",
    "maintainer",
    "maintainer_email",
    "license",
    "description",
    "long_description",
    "version",
    "chef_version",
    "source_url",
    "issues_url",
    "privacy",
    "ohai_version",
];

pub fn attribute_literals(entry: &FileEntry) -> RuleOutput {
    let mut fields = BTreeMap::new();
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::Map(fields);
    };

    for call in top_level_calls_named(ast, ast.root(), &SCALAR_FIELDS) {
        let Some(method) = call.child_by_field_name("method") else {
            continue;
        };
        if let [arg] = call_arguments(call).as_slice() {
            if let Some(value) = string_literal(ast, *arg) {
                fields.insert(ast.text(method).to_string(), Value::String(value));
            }
        }
    }
    RuleOutput::Map(fields)
}

pub fn explicit_depends(entry: &FileEntry) -> RuleOutput {
    let depends = match &entry.source {
        ParsedSource::Ruby(ast) => calls_named(ast, ast.root(), &["depends"])
            .into_iter()
            .filter_map(|call| {
                call_arguments(call)
                    .first()
                    .and_then(|arg| string_literal(ast, *arg))
            })
            .collect(),
        ParsedSource::Json(value) => value
            .get("dependencies")
            .and_then(Value::as_object)
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default(),
        ParsedSource::Empty => Vec::new(),
    };
    RuleOutput::List(sort_dedup(depends))
}
