//! Finds `depends` lines in metadata that a cookbook can likely drop.
//!
//! A dependency is a shake candidate when it is a recipe-only cookbook that
//! the shakee never reaches through `include_recipe`, a `cookbook` property
//! or dynamic inclusion. Removing it must also keep the load order intact, so
//! the dependency's own dependencies have to be covered by the shakee (or by
//! every cookbook that depends on the shakee, for cookbooks no role names).
//!
//! Results are heuristics and always need a human review.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::report::catalog::ReportId;
use crate::report::cookbooks::{cookbook_dependencies, recipe_only_cookbooks};
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;
use crate::util::deterministic::cookbook_of;

const WARNING: &str = "WARNING: CookbookDepShaker results should *always* be reviewed for correctness\n";

/// Per-cookbook facts the shaker reads.
#[derive(Debug, Default)]
struct CookbookFacts {
    role_referenced: bool,
    dynamic_inclusion: bool,
    explicitly_included: BTreeSet<String>,
    used_by: BTreeSet<String>,
}

pub fn dep_shaker(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let mut text = String::from(WARNING);
    for (shakee, dep) in shake(kb)? {
        text.push_str(&format!("Cookbook {shakee} - can likely remove {dep}\n"));
    }
    Ok(ReportOutput::Text(text))
}

/// `(shakee, dependency)` pairs in shakee order.
pub(crate) fn shake(kb: &KnowledgeBase) -> Result<Vec<(String, String)>> {
    let requester = ReportId::CookbookDepShaker.as_str();
    let deps = cookbook_dependencies(kb, requester)?;
    let facts = collect_facts(kb, &deps, requester)?;
    let property_referenced = property_referenced_cookbooks(kb, requester)?;
    let recipe_only = recipe_only_cookbooks(kb);

    let empty = BTreeSet::new();
    let deps_of = |cb: &str| deps.get(cb).unwrap_or(&empty);
    let no_facts = CookbookFacts::default();

    let mut candidates = Vec::new();
    for (shakee, shakee_deps_all) in &deps {
        let smd = facts.get(shakee).unwrap_or(&no_facts);
        if shakee_deps_all.is_empty() {
            debug!(shakee = %shakee, "no dependencies");
            continue;
        }
        if smd.dynamic_inclusion {
            debug!(shakee = %shakee, "dynamic recipe inclusion, skipping");
            continue;
        }

        let shakee_deps: BTreeSet<&String> = shakee_deps_all
            .iter()
            .filter(|dep| recipe_only.contains(*dep))
            .filter(|dep| !property_referenced.contains(*dep))
            .filter(|dep| !smd.explicitly_included.contains(*dep))
            .collect();
        if shakee_deps.is_empty() {
            continue;
        }

        for dep in shakee_deps {
            let dep_deps = deps_of(dep);
            if dep_deps.is_subset(shakee_deps_all) {
                debug!(shakee = %shakee, dep = %dep, "can likely remove");
                candidates.push((shakee.clone(), dep.clone()));
                continue;
            }
            debug!(
                shakee = %shakee,
                dep = %dep,
                wants = ?dep_deps.difference(shakee_deps_all).collect::<Vec<_>>(),
                "dependency needs more than the shakee declares"
            );
            if smd.role_referenced || smd.used_by.is_empty() {
                continue;
            }
            let parents_cover = smd.used_by.iter().all(|parent| {
                dep_deps
                    .iter()
                    .all(|d| shakee_deps_all.contains(d) || deps_of(parent).contains(d))
            });
            if parents_cover {
                debug!(shakee = %shakee, dep = %dep, "can likely remove with parent dependencies in place");
                candidates.push((shakee.clone(), dep.clone()));
            }
        }
    }
    Ok(candidates)
}

fn collect_facts(
    kb: &KnowledgeBase,
    deps: &BTreeMap<String, BTreeSet<String>>,
    requester: &str,
) -> Result<BTreeMap<String, CookbookFacts>> {
    let mut facts: BTreeMap<String, CookbookFacts> = BTreeMap::new();

    for entry in kb.roles().values() {
        for recipe in entry.list(RuleId::RoleRunListRecipes, requester)? {
            facts.entry(cookbook_of(recipe).to_string()).or_default().role_referenced = true;
        }
    }

    for (cookbook, declared) in deps {
        for dep in declared {
            facts.entry(dep.clone()).or_default().used_by.insert(cookbook.clone());
        }
    }

    for entry in kb.recipes().values() {
        let Some(cookbook) = entry.cookbook.as_deref() else {
            continue;
        };
        let included = entry.list(RuleId::IncludeRecipeLiterals, requester)?;
        let dynamic = entry.flag(RuleId::IncludeRecipeDynamic, requester)?;
        let cb = facts.entry(cookbook.to_string()).or_default();
        cb.explicitly_included
            .extend(included.iter().map(|r| cookbook_of(r).to_string()));
        cb.dynamic_inclusion |= dynamic;
    }

    Ok(facts)
}

/// Cookbooks named by a `cookbook` property in any recipe.
fn property_referenced_cookbooks(kb: &KnowledgeBase, requester: &str) -> Result<BTreeSet<String>> {
    let mut cookbooks = BTreeSet::new();
    for entry in kb.recipes().values() {
        cookbooks.extend(
            entry
                .list(RuleId::CookbookPropertyLiterals, requester)?
                .iter()
                .cloned(),
        );
    }
    Ok(cookbooks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;
    use crate::report::build;
    use crate::report::fixtures::{KbBuilder, list};
    use crate::rules::output::RuleOutput;

    fn metadata(deps: &[&str]) -> Vec<(RuleId, RuleOutput)> {
        vec![(RuleId::ExplicitMetadataDepends, list(deps))]
    }

    fn recipe(includes: &[&str], dynamic: bool, properties: &[&str]) -> Vec<(RuleId, RuleOutput)> {
        vec![
            (RuleId::IncludeRecipeLiterals, list(includes)),
            (RuleId::IncludeRecipeDynamic, RuleOutput::Flag(dynamic)),
            (RuleId::CookbookPropertyLiterals, list(properties)),
        ]
    }

    fn pairs(kb: &KnowledgeBase) -> Vec<(String, String)> {
        shake(kb).unwrap()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn unused_recipe_only_dependency_is_shaken() {
        let kb = KbBuilder::new()
            .entry(Key::Metadatarb, "app::metadata.rb", metadata(&["unused", "used", "lib"]))
            .entry(Key::Recipe, "app::default", recipe(&["used::default"], false, &[]))
            .entry(Key::Metadatarb, "unused::metadata.rb", metadata(&[]))
            .entry(Key::Recipe, "unused::default", recipe(&[], false, &[]))
            .entry(Key::Metadatarb, "used::metadata.rb", metadata(&[]))
            .entry(Key::Recipe, "used::default", recipe(&[], false, &[]))
            .entry(Key::Library, "lib::helpers", vec![])
            .build_for(ReportId::CookbookDepShaker);
        assert_eq!(pairs(&kb), vec![pair("app", "unused")]);
    }

    #[test]
    fn dynamic_inclusion_and_cookbook_properties_block_shaking() {
        let kb = KbBuilder::new()
            .entry(Key::Metadatarb, "dyn::metadata.rb", metadata(&["leaf"]))
            .entry(Key::Recipe, "dyn::default", recipe(&[], true, &[]))
            .entry(Key::Metadatarb, "prop::metadata.rb", metadata(&["leaf"]))
            .entry(Key::Recipe, "prop::default", recipe(&[], false, &["leaf"]))
            .entry(Key::Metadatarb, "leaf::metadata.rb", metadata(&[]))
            .entry(Key::Recipe, "leaf::default", recipe(&[], false, &[]))
            .build_for(ReportId::CookbookDepShaker);
        assert!(pairs(&kb).is_empty());
    }

    #[test]
    fn transitive_dependencies_must_be_covered() {
        // mid needs base, which top does not declare.
        let builder = || {
            KbBuilder::new()
                .entry(Key::Metadatarb, "top::metadata.rb", metadata(&["mid"]))
                .entry(Key::Recipe, "top::default", recipe(&[], false, &[]))
                .entry(Key::Metadatarb, "mid::metadata.rb", metadata(&["base"]))
                .entry(Key::Recipe, "mid::default", recipe(&[], false, &[]))
                .entry(Key::Metadatarb, "base::metadata.rb", metadata(&[]))
                .entry(Key::Recipe, "base::default", recipe(&[], false, &[]))
        };

        let kb = builder().build_for(ReportId::CookbookDepShaker);
        assert_eq!(pairs(&kb), vec![pair("mid", "base")]);

        // A parent of top that declares base covers the gap.
        let kb = builder()
            .entry(Key::Metadatarb, "parent::metadata.rb", metadata(&["top", "base"]))
            .entry(
                Key::Recipe,
                "parent::default",
                recipe(&["top::default", "base::default"], false, &[]),
            )
            .build_for(ReportId::CookbookDepShaker);
        assert_eq!(pairs(&kb), vec![pair("mid", "base"), pair("top", "mid")]);
    }

    #[test]
    fn role_referenced_cookbooks_do_not_borrow_parent_dependencies() {
        let kb = KbBuilder::new()
            .entry(Key::Role, "web", vec![(RuleId::RoleRunListRecipes, list(&["top::default"]))])
            .entry(Key::Metadatarb, "top::metadata.rb", metadata(&["mid"]))
            .entry(Key::Recipe, "top::default", recipe(&[], false, &[]))
            .entry(Key::Metadatarb, "mid::metadata.rb", metadata(&["base"]))
            .entry(Key::Recipe, "mid::default", recipe(&["base::default"], false, &[]))
            .entry(Key::Metadatarb, "base::metadata.rb", metadata(&[]))
            .entry(Key::Recipe, "base::default", recipe(&[], false, &[]))
            .entry(Key::Metadatarb, "parent::metadata.rb", metadata(&["top", "base"]))
            .entry(
                Key::Recipe,
                "parent::default",
                recipe(&["top::default", "base::default"], false, &[]),
            )
            .build_for(ReportId::CookbookDepShaker);
        assert!(pairs(&kb).is_empty());
    }

    #[test]
    fn text_output_starts_with_warning() {
        let kb = KbBuilder::new()
            .entry(Key::Metadatarb, "app::metadata.rb", metadata(&["unused"]))
            .entry(Key::Recipe, "app::default", recipe(&[], false, &[]))
            .entry(Key::Metadatarb, "unused::metadata.rb", metadata(&[]))
            .build_for(ReportId::CookbookDepShaker);
        assert_eq!(
            build(ReportId::CookbookDepShaker, &kb).unwrap(),
            ReportOutput::Text(format!("{WARNING}Cookbook app - can likely remove unused\n"))
        );
    }
}
