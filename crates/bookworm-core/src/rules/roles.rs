//! Rules over role files.
//!
//! Run list entries look like `recipe[cb::name]`, `role[name]` or a bare
//! recipe name. [`run_list`] keeps them raw; the other rules classify them.

use crate::error::Result;
use crate::kb::FileEntry;
use crate::rules::ast::{call_arguments, calls_named, string_list, string_literal};
use crate::rules::catalog::RuleId;
use crate::rules::output::RuleOutput;
use crate::util::deterministic::{qualify_recipe, sort_dedup};

pub fn run_list(entry: &FileEntry) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::List(Vec::new());
    };
    let mut items = Vec::new();
    for call in calls_named(ast, ast.root(), &["run_list"]) {
        for arg in call_arguments(call) {
            items.extend(string_list(ast, arg).unwrap_or_default());
        }
    }
    RuleOutput::List(items)
}

pub fn run_list_recipes(entry: &FileEntry) -> Result<RuleOutput> {
    let items = entry.list(RuleId::RoleRunList, RuleId::RoleRunListRecipes.as_str())?;
    let recipes = items
        .iter()
        .filter_map(|item| match bracketed(item) {
            Some(("recipe", name)) => Some(qualify_recipe(None, name)),
            Some(_) => None,
            None => Some(qualify_recipe(None, item)),
        })
        .collect();
    Ok(RuleOutput::List(sort_dedup(recipes)))
}

pub fn explicit_roles(entry: &FileEntry) -> Result<RuleOutput> {
    let items = entry.list(RuleId::RoleRunList, RuleId::RoleExplicitRoles.as_str())?;
    let roles = items
        .iter()
        .filter_map(|item| match bracketed(item) {
            Some(("role", name)) => Some(name.to_string()),
            _ => None,
        })
        .collect();
    Ok(RuleOutput::List(sort_dedup(roles)))
}

pub fn description(entry: &FileEntry) -> RuleOutput {
    let text = entry
        .source
        .ruby()
        .and_then(|ast| {
            calls_named(ast, ast.root(), &["description"])
                .into_iter()
                .find_map(|call| match call_arguments(call).as_slice() {
                    [arg] => string_literal(ast, *arg),
                    _ => None,
                })
        })
        .unwrap_or_default();
    RuleOutput::Text(text)
}

/// Split `kind[name]` into its parts.
fn bracketed(item: &str) -> Option<(&str, &str)> {
    let (kind, rest) = item.trim().split_once('[')?;
    let name = rest.strip_suffix(']')?;
    Some((kind, name))
}
