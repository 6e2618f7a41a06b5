//! Static catalog of reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookwormError;
use crate::rules::catalog::RuleId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportId {
    AllJsonRecipes,
    AllReferencedRecipes,
    AllRoleDescriptions,
    CookbookDependencyDot,
    CookbookDepShaker,
    CookbookNameAndMaintainerEmail,
    DynamicRecipeInclusion,
    LeafCookbooks,
    LibraryDefinedModulesAndClassConstants,
    MissingReferencedRecipes,
    NoParsedRuby,
    NotReferencedRecipes,
    RecipeIncludes,
    RecipeOnlyCookbooks,
    RecipesAssigningConstants,
    ResourceNotifications,
    RoleReferencedRoles,
}

impl ReportId {
    pub const ALL: [ReportId; 17] = [
        ReportId::AllJsonRecipes,
        ReportId::AllReferencedRecipes,
        ReportId::AllRoleDescriptions,
        ReportId::CookbookDepShaker,
        ReportId::CookbookDependencyDot,
        ReportId::CookbookNameAndMaintainerEmail,
        ReportId::DynamicRecipeInclusion,
        ReportId::LeafCookbooks,
        ReportId::LibraryDefinedModulesAndClassConstants,
        ReportId::MissingReferencedRecipes,
        ReportId::NoParsedRuby,
        ReportId::NotReferencedRecipes,
        ReportId::RecipeIncludes,
        ReportId::RecipeOnlyCookbooks,
        ReportId::RecipesAssigningConstants,
        ReportId::ResourceNotifications,
        ReportId::RoleReferencedRoles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportId::AllJsonRecipes => "AllJsonRecipes",
            ReportId::AllReferencedRecipes => "AllReferencedRecipes",
            ReportId::AllRoleDescriptions => "AllRoleDescriptions",
            ReportId::CookbookDependencyDot => "CookbookDependencyDot",
            ReportId::CookbookDepShaker => "CookbookDepShaker",
            ReportId::CookbookNameAndMaintainerEmail => "CookbookNameAndMaintainerEmail",
            ReportId::DynamicRecipeInclusion => "DynamicRecipeInclusion",
            ReportId::LeafCookbooks => "LeafCookbooks",
            ReportId::LibraryDefinedModulesAndClassConstants => {
                "LibraryDefinedModulesAndClassConstants"
            }
            ReportId::MissingReferencedRecipes => "MissingReferencedRecipes",
            ReportId::NoParsedRuby => "NoParsedRuby",
            ReportId::NotReferencedRecipes => "NotReferencedRecipes",
            ReportId::RecipeIncludes => "RecipeIncludes",
            ReportId::RecipeOnlyCookbooks => "RecipeOnlyCookbooks",
            ReportId::RecipesAssigningConstants => "RecipesAssigningConstants",
            ReportId::ResourceNotifications => "ResourceNotifications",
            ReportId::RoleReferencedRoles => "RoleReferencedRoles",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReportId::AllJsonRecipes => "Lists all JSON recipes",
            ReportId::AllReferencedRecipes => {
                "Lists all recipes referenced by roles and include_recipe"
            }
            ReportId::AllRoleDescriptions => "Lists every role with its description",
            ReportId::CookbookDependencyDot => {
                "Cookbook dependency graph from metadata files, in DOT format"
            }
            ReportId::CookbookDepShaker => {
                "Determines cookbooks that are safe to shake out of metadata.rb"
            }
            ReportId::CookbookNameAndMaintainerEmail => {
                "Cookbook names and maintainer emails from metadata.rb, as CSV"
            }
            ReportId::DynamicRecipeInclusion => {
                "Recipes that call include_recipe with a non-literal argument"
            }
            ReportId::LeafCookbooks => "Cookbooks that no other cookbook depends on",
            ReportId::LibraryDefinedModulesAndClassConstants => {
                "Get modules and classes constants that are explicitly defined in library files"
            }
            ReportId::MissingReferencedRecipes => {
                "Determines all recipes that are directly referenced in roles and recipes but were not found by the crawler"
            }
            ReportId::NoParsedRuby => {
                "Ruby files which are empty, comments-only, or unparseable"
            }
            ReportId::NotReferencedRecipes => {
                "Determines all recipes that are not directly referenced either in roles or recipes"
            }
            ReportId::RecipeIncludes => "Every include_recipe edge, one per line",
            ReportId::RecipeOnlyCookbooks => {
                "Determines all cookbooks that do not evaluate Ruby code on load"
            }
            ReportId::RecipesAssigningConstants => "Recipes that assign constants",
            ReportId::ResourceNotifications => "Determines resource notifications used",
            ReportId::RoleReferencedRoles => "Roles referenced from other roles' run lists",
        }
    }

    /// Rules whose output the report reads.
    pub fn needs_rules(self) -> &'static [RuleId] {
        match self {
            ReportId::AllJsonRecipes => &[RuleId::RecipejsonExists],
            ReportId::AllReferencedRecipes | ReportId::MissingReferencedRecipes => {
                &[RuleId::RoleRunListRecipes, RuleId::IncludeRecipeLiterals]
            }
            ReportId::AllRoleDescriptions => &[RuleId::RoleDescription],
            ReportId::CookbookDependencyDot | ReportId::LeafCookbooks => {
                &[RuleId::ExplicitMetadataDepends]
            }
            ReportId::CookbookDepShaker => &[
                RuleId::MetadatarbExists,
                RuleId::AttributeExists,
                RuleId::LibraryExists,
                RuleId::ResourceExists,
                RuleId::ProviderExists,
                RuleId::RecipeExists,
                RuleId::ExplicitMetadataDepends,
                RuleId::IncludeRecipeLiterals,
                RuleId::IncludeRecipeDynamic,
                RuleId::RoleRunListRecipes,
                RuleId::CookbookPropertyLiterals,
            ],
            ReportId::CookbookNameAndMaintainerEmail => &[RuleId::MetadatarbAttributeLiterals],
            ReportId::DynamicRecipeInclusion => &[RuleId::IncludeRecipeDynamic],
            ReportId::LibraryDefinedModulesAndClassConstants => &[
                RuleId::LibraryDefinedClassConstants,
                RuleId::LibraryDefinedModuleConstants,
            ],
            ReportId::NoParsedRuby => &[RuleId::NoParsedRuby],
            ReportId::NotReferencedRecipes => &[
                RuleId::RoleRunListRecipes,
                RuleId::IncludeRecipeLiterals,
                RuleId::RecipeExists,
            ],
            ReportId::RecipeIncludes => &[RuleId::IncludeRecipeLiterals],
            ReportId::RecipeOnlyCookbooks => &[
                RuleId::MetadatarbExists,
                RuleId::AttributeExists,
                RuleId::LibraryExists,
                RuleId::ResourceExists,
                RuleId::ProviderExists,
            ],
            ReportId::RecipesAssigningConstants => &[RuleId::RecipeConstantAssignments],
            ReportId::ResourceNotifications => &[RuleId::ResourceNotifications],
            ReportId::RoleReferencedRoles => &[RuleId::RoleExplicitRoles],
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = BookwormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportId::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| BookwormError::UnknownReport(s.to_string()))
    }
}
