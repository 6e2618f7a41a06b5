//! Reports about recipes and the include graph between them.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::report::catalog::ReportId;
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;

pub fn all_json_recipes(kb: &KnowledgeBase) -> Result<ReportOutput> {
    Ok(ReportOutput::Lines(kb.recipejsons().keys().cloned().collect()))
}

/// Recipes named by role run lists and by `include_recipe` in any recipe.
fn referenced_recipes(kb: &KnowledgeBase, report: ReportId) -> Result<BTreeSet<String>> {
    let requester = report.as_str();
    let mut referenced = BTreeSet::new();
    for entry in kb.roles().values() {
        referenced.extend(entry.list(RuleId::RoleRunListRecipes, requester)?.iter().cloned());
    }
    for entry in kb.recipes().values().chain(kb.recipejsons().values()) {
        referenced.extend(entry.list(RuleId::IncludeRecipeLiterals, requester)?.iter().cloned());
    }
    Ok(referenced)
}

pub fn all_referenced_recipes(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let referenced = referenced_recipes(kb, ReportId::AllReferencedRecipes)?;
    Ok(ReportOutput::Lines(referenced.into_iter().collect()))
}

pub fn not_referenced_recipes(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let referenced = referenced_recipes(kb, ReportId::NotReferencedRecipes)?;
    let all: BTreeSet<&String> = kb.recipes().keys().chain(kb.recipejsons().keys()).collect();
    Ok(ReportOutput::Lines(
        all.into_iter()
            .filter(|r| !referenced.contains(*r))
            .cloned()
            .collect(),
    ))
}

pub fn dynamic_recipe_inclusion(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::DynamicRecipeInclusion.as_str();
    let mut lines = Vec::new();
    for (name, entry) in kb.recipes() {
        if entry.flag(RuleId::IncludeRecipeDynamic, requester)? {
            lines.push(name.clone());
        }
    }
    Ok(ReportOutput::Lines(lines))
}

pub fn missing_referenced_recipes(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::MissingReferencedRecipes.as_str();
    let known: BTreeSet<&String> = kb.recipes().keys().chain(kb.recipejsons().keys()).collect();
    let missing_from = |items: &[String]| -> Vec<String> {
        items
            .iter()
            .filter(|r| !known.contains(r))
            .cloned()
            .collect()
    };

    let mut roles = BTreeMap::new();
    for (name, entry) in kb.roles() {
        let missing = missing_from(entry.list(RuleId::RoleRunListRecipes, requester)?);
        if !missing.is_empty() {
            roles.insert(name.clone(), missing);
        }
    }

    let mut recipes = BTreeMap::new();
    for (name, entry) in kb.recipes().iter().chain(kb.recipejsons()) {
        let missing = missing_from(entry.list(RuleId::IncludeRecipeLiterals, requester)?);
        if !missing.is_empty() {
            recipes.insert(name.clone(), missing);
        }
    }

    let mut plain = String::new();
    if roles.is_empty() {
        plain.push_str("No missing recipes coming from the roles files\n");
    } else {
        plain.push_str("Roles:\n");
        for (role, missing) in &roles {
            plain.push_str(&format!("\t{role}\t{}\n", missing.join(", ")));
        }
    }
    if recipes.is_empty() {
        plain.push_str("No missing recipes coming from the recipe files\n");
    } else {
        plain.push_str("Recipes:\n");
        for (recipe, missing) in &recipes {
            plain.push_str(&format!("\t{recipe}\t{}\n", missing.join(", ")));
        }
    }

    Ok(ReportOutput::Structured {
        plain,
        json: json!({ "roles": roles, "recipes": recipes }),
    })
}

/// One `recipe -> included recipe` line per include edge.
pub fn recipe_includes(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::RecipeIncludes.as_str();
    let mut lines = Vec::new();
    for (name, entry) in kb.recipes().iter().chain(kb.recipejsons()) {
        for included in entry.list(RuleId::IncludeRecipeLiterals, requester)? {
            lines.push(format!("{name} -> {included}"));
        }
    }
    lines.sort();
    Ok(ReportOutput::Lines(lines))
}

pub fn recipes_assigning_constants(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::RecipesAssigningConstants.as_str();
    let mut text = String::new();
    for (name, entry) in kb.recipes() {
        let constants = entry.list(RuleId::RecipeConstantAssignments, requester)?;
        if !constants.is_empty() {
            text.push_str(&format!("{name} {}\n", constants.join(", ")));
        }
    }
    Ok(ReportOutput::Text(text))
}
