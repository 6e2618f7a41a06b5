use crate::kb::FileEntry;
use crate::rules::ast::descendants;
use crate::rules::output::RuleOutput;
use crate::util::deterministic::sort_dedup;

/// Names of `class` definitions at any depth, as written.
pub fn class_constants(entry: &FileEntry) -> RuleOutput {
    defined_names(entry, "class")
}

/// Names of `module` definitions at any depth, as written.
pub fn module_constants(entry: &FileEntry) -> RuleOutput {
    defined_names(entry, "module")
}

fn defined_names(entry: &FileEntry, kind: &str) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::List(Vec::new());
    };
    let names = descendants(ast.root())
        .into_iter()
        .filter(|n| n.kind() == kind)
        .filter_map(|n| n.child_by_field_name("name"))
        .map(|name| ast.text(name).to_string())
        .collect();
    RuleOutput::List(sort_dedup(names))
}
