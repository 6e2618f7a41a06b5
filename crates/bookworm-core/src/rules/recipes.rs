//! Rules over recipe files.

use serde_json::Value;

use crate::kb::FileEntry;
use crate::parse::ParsedSource;
use crate::rules::ast::{call_arguments, call_block, calls_named, descendants, string_literal};
use crate::rules::output::RuleOutput;
use crate::util::deterministic::{qualify_recipe, sort_dedup};

const FILE_RESOURCES: [&str; 3] = ["cookbook_file", "template", "remote_directory"];

pub fn include_recipe_literals(entry: &FileEntry) -> RuleOutput {
    let cookbook = entry.cookbook.as_deref();
    let raw = match &entry.source {
        ParsedSource::Ruby(ast) => calls_named(ast, ast.root(), &["include_recipe"])
            .into_iter()
            .filter_map(|call| match call_arguments(call).as_slice() {
                [arg] => string_literal(ast, *arg),
                _ => None,
            })
            .collect(),
        ParsedSource::Json(value) => json_include_recipes(value),
        ParsedSource::Empty => Vec::new(),
    };

    RuleOutput::List(sort_dedup(
        raw.iter().map(|r| qualify_recipe(cookbook, r)).collect(),
    ))
}

/// JSON recipes list resources under `resources`; includes are entries with
/// `"type": "include_recipe"` and the recipe in `name`.
fn json_include_recipes(value: &Value) -> Vec<String> {
    let Some(resources) = value.get("resources").and_then(Value::as_array) else {
        return Vec::new();
    };
    resources
        .iter()
        .filter(|r| r.get("type").and_then(Value::as_str) == Some("include_recipe"))
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

pub fn include_recipe_dynamic(entry: &FileEntry) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::Flag(false);
    };
    let dynamic = calls_named(ast, ast.root(), &["include_recipe"])
        .into_iter()
        .any(|call| match call_arguments(call).as_slice() {
            [arg] => string_literal(ast, *arg).is_none(),
            _ => true,
        });
    RuleOutput::Flag(dynamic)
}

pub fn cookbook_property_literals(entry: &FileEntry) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::List(Vec::new());
    };

    let mut cookbooks = Vec::new();
    for resource in calls_named(ast, ast.root(), &FILE_RESOURCES) {
        let Some(block) = call_block(resource) else {
            continue;
        };
        for prop in calls_named(ast, block, &["cookbook"]) {
            if let [arg] = call_arguments(prop).as_slice() {
                cookbooks.extend(string_literal(ast, *arg));
            }
        }
    }
    RuleOutput::List(sort_dedup(cookbooks))
}

pub fn recipe_constant_assignments(entry: &FileEntry) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::List(Vec::new());
    };
    let constants = descendants(ast.root())
        .into_iter()
        .filter(|n| n.kind() == "assignment")
        .filter_map(|n| n.child_by_field_name("left"))
        .filter(|left| matches!(left.kind(), "constant" | "scope_resolution"))
        .map(|left| ast.text(left).to_string())
        .collect();
    RuleOutput::List(sort_dedup(constants))
}
