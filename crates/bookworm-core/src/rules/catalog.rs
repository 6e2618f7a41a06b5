//! Static catalog of inference rules.
//!
//! Rules are a closed set. Each entry declares the knowledge base keys it is
//! applied to, the rules whose output it reads from the same entry, and the
//! shape of the output it stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookwormError;
use crate::keys::Key;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    IncludeRecipeLiterals,
    IncludeRecipeDynamic,
    CookbookPropertyLiterals,
    ResourceNotifications,
    LibraryDefinedClassConstants,
    LibraryDefinedModuleConstants,
    RecipeConstantAssignments,
    MetadatarbAttributeLiterals,
    ExplicitMetadataDepends,
    RoleRunList,
    RoleRunListRecipes,
    RoleExplicitRoles,
    RoleDescription,
    NoParsedRuby,
    MetadatarbExists,
    RecipeExists,
    RecipejsonExists,
    AttributeExists,
    LibraryExists,
    ResourceExists,
    ProviderExists,
}

/// Shape of a stored rule output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputKind {
    List,
    Map,
    Flag,
    Text,
    Notifications,
}

impl RuleId {
    pub const ALL: [RuleId; 21] = [
        RuleId::AttributeExists,
        RuleId::CookbookPropertyLiterals,
        RuleId::ExplicitMetadataDepends,
        RuleId::IncludeRecipeDynamic,
        RuleId::IncludeRecipeLiterals,
        RuleId::LibraryDefinedClassConstants,
        RuleId::LibraryDefinedModuleConstants,
        RuleId::LibraryExists,
        RuleId::MetadatarbAttributeLiterals,
        RuleId::MetadatarbExists,
        RuleId::NoParsedRuby,
        RuleId::ProviderExists,
        RuleId::RecipeConstantAssignments,
        RuleId::RecipeExists,
        RuleId::RecipejsonExists,
        RuleId::ResourceExists,
        RuleId::ResourceNotifications,
        RuleId::RoleDescription,
        RuleId::RoleExplicitRoles,
        RuleId::RoleRunList,
        RuleId::RoleRunListRecipes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::IncludeRecipeLiterals => "IncludeRecipeLiterals",
            RuleId::IncludeRecipeDynamic => "IncludeRecipeDynamic",
            RuleId::CookbookPropertyLiterals => "CookbookPropertyLiterals",
            RuleId::ResourceNotifications => "ResourceNotifications",
            RuleId::LibraryDefinedClassConstants => "LibraryDefinedClassConstants",
            RuleId::LibraryDefinedModuleConstants => "LibraryDefinedModuleConstants",
            RuleId::RecipeConstantAssignments => "RecipeConstantAssignments",
            RuleId::MetadatarbAttributeLiterals => "MetadatarbAttributeLiterals",
            RuleId::ExplicitMetadataDepends => "ExplicitMetadataDepends",
            RuleId::RoleRunList => "RoleRunList",
            RuleId::RoleRunListRecipes => "RoleRunListRecipes",
            RuleId::RoleExplicitRoles => "RoleExplicitRoles",
            RuleId::RoleDescription => "RoleDescription",
            RuleId::NoParsedRuby => "NoParsedRuby",
            RuleId::MetadatarbExists => "MetadatarbExists",
            RuleId::RecipeExists => "RecipeExists",
            RuleId::RecipejsonExists => "RecipejsonExists",
            RuleId::AttributeExists => "AttributeExists",
            RuleId::LibraryExists => "LibraryExists",
            RuleId::ResourceExists => "ResourceExists",
            RuleId::ProviderExists => "ProviderExists",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleId::IncludeRecipeLiterals => {
                "Extracts recipes that are used by include_recipe with string literals"
            }
            RuleId::IncludeRecipeDynamic => {
                "Detects include_recipe calls whose argument is not a plain string literal"
            }
            RuleId::CookbookPropertyLiterals => {
                "Extracts cookbooks referenced by the cookbook property common with file resources"
            }
            RuleId::ResourceNotifications => {
                "Scrapes notifications from resources in recipe and resource files"
            }
            RuleId::LibraryDefinedClassConstants => "Extracts class names defined in libraries",
            RuleId::LibraryDefinedModuleConstants => "Extracts module names defined in libraries",
            RuleId::RecipeConstantAssignments => "Extracts constants assigned in recipes",
            RuleId::MetadatarbAttributeLiterals => {
                "Extracts literal values of scalar metadata.rb fields"
            }
            RuleId::ExplicitMetadataDepends => {
                "Extracts cookbook dependencies declared in metadata files"
            }
            RuleId::RoleRunList => "Extracts raw run_list entries from roles",
            RuleId::RoleRunListRecipes => "Extracts recipes referenced in role run lists",
            RuleId::RoleExplicitRoles => "Extracts roles referenced in role run lists",
            RuleId::RoleDescription => "Extracts the description of a role",
            RuleId::NoParsedRuby => "Ruby files which are empty, comments-only, or unparseable",
            RuleId::MetadatarbExists => "Marks metadata.rb files as present",
            RuleId::RecipeExists => "Marks recipe files as present",
            RuleId::RecipejsonExists => "Marks JSON recipe files as present",
            RuleId::AttributeExists => "Marks attribute files as present",
            RuleId::LibraryExists => "Marks library files as present",
            RuleId::ResourceExists => "Marks resource files as present",
            RuleId::ProviderExists => "Marks provider files as present",
        }
    }

    /// Knowledge base keys the rule is applied to.
    pub fn keys(self) -> &'static [Key] {
        match self {
            RuleId::IncludeRecipeLiterals => &[Key::Recipe, Key::Recipejson],
            RuleId::IncludeRecipeDynamic
            | RuleId::CookbookPropertyLiterals
            | RuleId::RecipeConstantAssignments
            | RuleId::RecipeExists => &[Key::Recipe],
            RuleId::ResourceNotifications => &[Key::Recipe, Key::Resource],
            RuleId::LibraryDefinedClassConstants
            | RuleId::LibraryDefinedModuleConstants
            | RuleId::LibraryExists => &[Key::Library],
            RuleId::MetadatarbAttributeLiterals | RuleId::MetadatarbExists => &[Key::Metadatarb],
            RuleId::ExplicitMetadataDepends => &[Key::Metadatarb, Key::Metadatajson],
            RuleId::RoleRunList
            | RuleId::RoleRunListRecipes
            | RuleId::RoleExplicitRoles
            | RuleId::RoleDescription => &[Key::Role],
            RuleId::NoParsedRuby => &[
                Key::Recipe,
                Key::Attribute,
                Key::Library,
                Key::Resource,
                Key::Provider,
                Key::Metadatarb,
                Key::Role,
            ],
            RuleId::RecipejsonExists => &[Key::Recipejson],
            RuleId::AttributeExists => &[Key::Attribute],
            RuleId::ResourceExists => &[Key::Resource],
            RuleId::ProviderExists => &[Key::Provider],
        }
    }

    /// Rules whose output this rule reads from the same entry.
    pub fn depends_on(self) -> &'static [RuleId] {
        match self {
            RuleId::RoleRunListRecipes | RuleId::RoleExplicitRoles => &[RuleId::RoleRunList],
            _ => &[],
        }
    }

    pub fn output_kind(self) -> OutputKind {
        match self {
            RuleId::IncludeRecipeLiterals
            | RuleId::CookbookPropertyLiterals
            | RuleId::LibraryDefinedClassConstants
            | RuleId::LibraryDefinedModuleConstants
            | RuleId::RecipeConstantAssignments
            | RuleId::ExplicitMetadataDepends
            | RuleId::RoleRunList
            | RuleId::RoleRunListRecipes
            | RuleId::RoleExplicitRoles => OutputKind::List,
            RuleId::MetadatarbAttributeLiterals => OutputKind::Map,
            RuleId::RoleDescription => OutputKind::Text,
            RuleId::ResourceNotifications => OutputKind::Notifications,
            RuleId::IncludeRecipeDynamic
            | RuleId::NoParsedRuby
            | RuleId::MetadatarbExists
            | RuleId::RecipeExists
            | RuleId::RecipejsonExists
            | RuleId::AttributeExists
            | RuleId::LibraryExists
            | RuleId::ResourceExists
            | RuleId::ProviderExists => OutputKind::Flag,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = BookwormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| BookwormError::UnknownRule(s.to_string()))
    }
}
