//! Cookbook-level reports built from metadata and the per-directory keys.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::report::catalog::ReportId;
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;

pub(crate) type Dependencies = BTreeMap<String, BTreeSet<String>>;

/// Declared dependencies of every known cookbook.
///
/// `metadata.rb` wins over `metadata.json`; a cookbook with neither has no
/// dependencies.
pub(crate) fn cookbook_dependencies(kb: &KnowledgeBase, requester: &str) -> Result<Dependencies> {
    let mut deps = Dependencies::new();
    for cookbook in kb.cookbooks() {
        let metadata = kb
            .metadatarbs()
            .get(&format!("{cookbook}::metadata.rb"))
            .or_else(|| kb.metadatajsons().get(&format!("{cookbook}::metadata.json")));
        let declared = match metadata {
            Some(entry) => entry
                .list(RuleId::ExplicitMetadataDepends, requester)?
                .iter()
                .cloned()
                .collect(),
            None => BTreeSet::new(),
        };
        deps.insert(cookbook.clone(), declared);
    }
    Ok(deps)
}

pub fn dependency_dot(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let deps = cookbook_dependencies(kb, ReportId::CookbookDependencyDot.as_str())?;
    let edges: Vec<String> = deps
        .iter()
        .flat_map(|(cookbook, declared)| declared.iter().map(move |dep| format!("  {cookbook}->{dep}")))
        .collect();
    Ok(ReportOutput::Text(format!(
        "digraph deps {{\n{}\n}}",
        edges.join("\n")
    )))
}

/// `name,maintainer_email` per `metadata.rb`.
pub fn name_and_maintainer_email(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::CookbookNameAndMaintainerEmail.as_str();
    let mut lines = Vec::new();
    for (key, entry) in kb.metadatarbs() {
        let fields = entry.map(RuleId::MetadatarbAttributeLiterals, requester)?;
        let field = |name: &str| fields.get(name).and_then(|v| v.as_str());
        let name = field("name")
            .or(entry.cookbook.as_deref())
            .unwrap_or(key.as_str());
        let email = field("maintainer_email").unwrap_or_default();
        lines.push(format!("{name},{email}"));
    }
    lines.sort();
    Ok(ReportOutput::Lines(lines))
}

pub fn leaf_cookbooks(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let deps = cookbook_dependencies(kb, ReportId::LeafCookbooks.as_str())?;
    let depended_on: BTreeSet<&String> = deps.values().flatten().collect();
    Ok(ReportOutput::Lines(
        kb.cookbooks()
            .iter()
            .filter(|cb| !depended_on.contains(cb))
            .cloned()
            .collect(),
    ))
}

/// Cookbooks without attribute, library, resource or provider files.
pub(crate) fn recipe_only_cookbooks(kb: &KnowledgeBase) -> BTreeSet<String> {
    let loads_ruby: BTreeSet<&str> = [
        kb.attributes(),
        kb.libraries(),
        kb.resources(),
        kb.providers(),
    ]
    .into_iter()
    .flat_map(|category| category.values())
    .filter_map(|entry| entry.cookbook.as_deref())
    .collect();

    kb.cookbooks()
        .iter()
        .filter(|cb| !loads_ruby.contains(cb.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;
    use crate::report::build;
    use crate::report::fixtures::{KbBuilder, list};
    use crate::rules::output::RuleOutput;
    use serde_json::json;

    fn depends(items: &[&str]) -> Vec<(RuleId, RuleOutput)> {
        vec![(RuleId::ExplicitMetadataDepends, list(items))]
    }

    fn metadata_graph(report: ReportId) -> KnowledgeBase {
        KbBuilder::new()
            .entry(Key::Metadatarb, "fb_init::metadata.rb", depends(&["fb_apt", "fb_helpers"]))
            .entry(Key::Metadatarb, "fb_apt::metadata.rb", depends(&["fb_helpers"]))
            .entry(Key::Metadatarb, "fb_helpers::metadata.rb", depends(&[]))
            .entry(Key::Metadatajson, "fb_json::metadata.json", depends(&["fb_init"]))
            .entry(Key::Metadatajson, "fb_apt::metadata.json", depends(&["ignored"]))
            .build_for(report)
    }

    #[test]
    fn dot_graph_edges() {
        let kb = metadata_graph(ReportId::CookbookDependencyDot);
        assert_eq!(
            build(ReportId::CookbookDependencyDot, &kb).unwrap(),
            ReportOutput::Text(
                "digraph deps {\n  fb_apt->fb_helpers\n  fb_init->fb_apt\n  fb_init->fb_helpers\n  fb_json->fb_init\n}"
                    .into()
            )
        );
    }

    #[test]
    fn dot_graph_without_cookbooks() {
        let kb = KbBuilder::new().build_for(ReportId::CookbookDependencyDot);
        assert_eq!(
            build(ReportId::CookbookDependencyDot, &kb).unwrap(),
            ReportOutput::Text("digraph deps {\n\n}".into())
        );
    }

    #[test]
    fn leaves_are_not_depended_on() {
        let kb = metadata_graph(ReportId::LeafCookbooks);
        assert_eq!(
            build(ReportId::LeafCookbooks, &kb).unwrap(),
            ReportOutput::lines(["fb_json"])
        );
    }

    #[test]
    fn maintainer_emails_fall_back() {
        let literals = |fields: serde_json::Value| {
            let map = fields
                .as_object()
                .map(|m| m.clone().into_iter().collect())
                .unwrap_or_default();
            vec![(RuleId::MetadatarbAttributeLiterals, RuleOutput::Map(map))]
        };
        let kb = KbBuilder::new()
            .entry(
                Key::Metadatarb,
                "fb_init::metadata.rb",
                literals(json!({"name": "fb_init", "maintainer_email": "noreply@example.org"})),
            )
            .entry(Key::Metadatarb, "fb_bare::metadata.rb", literals(json!({})))
            .build_for(ReportId::CookbookNameAndMaintainerEmail);
        assert_eq!(
            build(ReportId::CookbookNameAndMaintainerEmail, &kb).unwrap(),
            ReportOutput::lines(["fb_bare,", "fb_init,noreply@example.org"])
        );
    }

    #[test]
    fn recipe_only_excludes_cookbooks_loading_ruby() {
        let kb = KbBuilder::new()
            .entry(Key::Recipe, "fb_plain::default", vec![])
            .entry(Key::Recipe, "fb_attrs::default", vec![])
            .entry(Key::Attribute, "fb_attrs::default", vec![])
            .entry(Key::Library, "fb_lib::helpers", vec![])
            .entry(Key::Resource, "fb_res::thing", vec![])
            .entry(Key::Provider, "fb_prov::thing", vec![])
            .cookbook("fb_empty")
            .build_for(ReportId::RecipeOnlyCookbooks);
        assert_eq!(
            build(ReportId::RecipeOnlyCookbooks, &kb).unwrap(),
            ReportOutput::lines(["fb_empty", "fb_plain"])
        );
    }
}
