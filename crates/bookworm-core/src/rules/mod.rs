//! Inference rules.
//!
//! A rule maps one knowledge base entry to a [`RuleOutput`]. Rules never see
//! other entries, so they can run in any order once their declared
//! dependencies have been stored on the entry.

pub mod ast;
pub mod catalog;
pub mod engine;
pub mod libraries;
pub mod metadata;
pub mod output;
pub mod recipes;
pub mod resources;
pub mod roles;

use crate::error::Result;
use crate::kb::FileEntry;
use catalog::RuleId;
use output::RuleOutput;

/// Evaluate `rule` against a single entry.
pub fn apply(rule: RuleId, entry: &FileEntry) -> Result<RuleOutput> {
    let output = match rule {
        RuleId::IncludeRecipeLiterals => recipes::include_recipe_literals(entry),
        RuleId::IncludeRecipeDynamic => recipes::include_recipe_dynamic(entry),
        RuleId::CookbookPropertyLiterals => recipes::cookbook_property_literals(entry),
        RuleId::RecipeConstantAssignments => recipes::recipe_constant_assignments(entry),
        RuleId::ResourceNotifications => resources::resource_notifications(entry),
        RuleId::LibraryDefinedClassConstants => libraries::class_constants(entry),
        RuleId::LibraryDefinedModuleConstants => libraries::module_constants(entry),
        RuleId::MetadatarbAttributeLiterals => metadata::attribute_literals(entry),
        RuleId::ExplicitMetadataDepends => metadata::explicit_depends(entry),
        RuleId::RoleRunList => roles::run_list(entry),
        RuleId::RoleRunListRecipes => roles::run_list_recipes(entry)?,
        RuleId::RoleExplicitRoles => roles::explicit_roles(entry)?,
        RuleId::RoleDescription => roles::description(entry),
        RuleId::NoParsedRuby => RuleOutput::Flag(entry.source.is_empty()),
        // Presence markers: running them forces their key to be crawled.
        RuleId::MetadatarbExists
        | RuleId::RecipeExists
        | RuleId::RecipejsonExists
        | RuleId::AttributeExists
        | RuleId::LibraryExists
        | RuleId::ResourceExists
        | RuleId::ProviderExists => RuleOutput::Flag(true),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParsedSource, RubyParser};

    fn entry(text: &str) -> FileEntry {
        FileEntry::new(
            "cb/recipes/default.rb".into(),
            Some("cb".into()),
            RubyParser::new().unwrap().parse(text),
        )
    }

    #[test]
    fn no_parsed_ruby_flags_the_sentinel() {
        let comment_only = entry("# some silly comment\n");
        let has_ast = entry("name \"fake_role\"\n");
        assert_eq!(
            apply(RuleId::NoParsedRuby, &comment_only).unwrap(),
            RuleOutput::Flag(true)
        );
        assert_eq!(
            apply(RuleId::NoParsedRuby, &has_ast).unwrap(),
            RuleOutput::Flag(false)
        );
    }

    #[test]
    fn presence_rules_are_always_true() {
        let e = FileEntry::new("cb/attributes/default.rb".into(), None, ParsedSource::Empty);
        assert_eq!(
            apply(RuleId::AttributeExists, &e).unwrap(),
            RuleOutput::Flag(true)
        );
    }

    #[test]
    fn outputs_match_declared_kind() {
        let mut e = entry("include_recipe 'a'\n");
        for rule in RuleId::ALL {
            if rule.depends_on().contains(&RuleId::RoleRunList) {
                e.set_fact(RuleId::RoleRunList, RuleOutput::List(vec![]));
            }
            let out = apply(rule, &e).unwrap();
            assert_eq!(out.kind(), rule.output_kind(), "{rule}");
        }
    }
}
