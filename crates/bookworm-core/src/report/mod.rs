//! Reports aggregate rule outputs across the whole knowledge base.
//!
//! A report declares the rules it reads. [`build`] refuses to run a report
//! whose rules have not executed, and a missing fact on an individual entry
//! is the same error, so a report never silently reads nothing.

pub mod catalog;
pub mod cookbooks;
pub mod files;
pub mod model;
pub mod recipes;
pub mod render;
pub mod roles;
pub mod shaker;

use tracing::debug;

use crate::error::{BookwormError, Result};
use crate::kb::KnowledgeBase;
use catalog::ReportId;
use model::ReportOutput;

pub fn build(report: ReportId, kb: &KnowledgeBase) -> Result<ReportOutput> {
    if let Some(rule) = report
        .needs_rules()
        .iter()
        .find(|rule| !kb.has_executed(**rule))
    {
        return Err(BookwormError::MissingDependency {
            requester: report.to_string(),
            rule: *rule,
        });
    }

    debug!(report = %report, "building report");
    match report {
        ReportId::AllJsonRecipes => recipes::all_json_recipes(kb),
        ReportId::AllReferencedRecipes => recipes::all_referenced_recipes(kb),
        ReportId::DynamicRecipeInclusion => recipes::dynamic_recipe_inclusion(kb),
        ReportId::MissingReferencedRecipes => recipes::missing_referenced_recipes(kb),
        ReportId::NotReferencedRecipes => recipes::not_referenced_recipes(kb),
        ReportId::RecipeIncludes => recipes::recipe_includes(kb),
        ReportId::RecipesAssigningConstants => recipes::recipes_assigning_constants(kb),
        ReportId::CookbookDependencyDot => cookbooks::dependency_dot(kb),
        ReportId::CookbookNameAndMaintainerEmail => cookbooks::name_and_maintainer_email(kb),
        ReportId::LeafCookbooks => cookbooks::leaf_cookbooks(kb),
        ReportId::RecipeOnlyCookbooks => Ok(ReportOutput::Lines(
            cookbooks::recipe_only_cookbooks(kb).into_iter().collect(),
        )),
        ReportId::CookbookDepShaker => shaker::dep_shaker(kb),
        ReportId::AllRoleDescriptions => roles::all_role_descriptions(kb),
        ReportId::RoleReferencedRoles => roles::role_referenced_roles(kb),
        ReportId::LibraryDefinedModulesAndClassConstants => files::library_constants(kb),
        ReportId::NoParsedRuby => files::no_parsed_ruby(kb),
        ReportId::ResourceNotifications => files::resource_notifications(kb),
    }
}
