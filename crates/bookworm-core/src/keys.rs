//! Knowledge base categories ("keys") and their crawl/naming conventions.
//!
//! Every crawled file belongs to exactly one key. The key decides where the
//! crawler looks, which parser is used, and how the logical name of the file
//! is derived from its path.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BookwormError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Cookbook,
    Role,
    Metadatarb,
    Metadatajson,
    Recipe,
    Recipejson,
    Attribute,
    Library,
    Resource,
    Provider,
}

/// Which configured list of search roots a key is crawled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDirKind {
    CookbookDirs,
    RoleDirs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Ruby,
    Json,
}

/// Static description of a key.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    /// A metakey is never crawled; it only collects derived information.
    pub metakey: bool,
    pub plural: &'static str,
    pub source_dirs: SourceDirKind,
    pub glob_pattern: &'static str,
    /// Captures the logical file name. Cookbook-decomposed keys get the
    /// cookbook capture prepended by [`Key::logical_name`].
    pub path_name_regex: &'static str,
    pub determine_cookbook_name: bool,
    pub parser: ParserKind,
}

const fn cookbook_file(
    plural: &'static str,
    glob_pattern: &'static str,
    path_name_regex: &'static str,
    parser: ParserKind,
) -> KeySpec {
    KeySpec {
        metakey: false,
        plural,
        source_dirs: SourceDirKind::CookbookDirs,
        glob_pattern,
        path_name_regex,
        determine_cookbook_name: true,
        parser,
    }
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::Cookbook,
        Key::Role,
        Key::Metadatarb,
        Key::Metadatajson,
        Key::Recipe,
        Key::Recipejson,
        Key::Attribute,
        Key::Library,
        Key::Resource,
        Key::Provider,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Key::Cookbook => "cookbook",
            Key::Role => "role",
            Key::Metadatarb => "metadatarb",
            Key::Metadatajson => "metadatajson",
            Key::Recipe => "recipe",
            Key::Recipejson => "recipejson",
            Key::Attribute => "attribute",
            Key::Library => "library",
            Key::Resource => "resource",
            Key::Provider => "provider",
        }
    }

    pub fn spec(self) -> KeySpec {
        use ParserKind::{Json, Ruby};

        match self {
            Key::Cookbook => KeySpec {
                metakey: true,
                plural: "cookbooks",
                source_dirs: SourceDirKind::CookbookDirs,
                glob_pattern: "",
                path_name_regex: "",
                determine_cookbook_name: false,
                parser: Ruby,
            },
            Key::Role => KeySpec {
                metakey: false,
                plural: "roles",
                source_dirs: SourceDirKind::RoleDirs,
                glob_pattern: "*.rb",
                path_name_regex: r"([\w-]+)\.rb$",
                determine_cookbook_name: false,
                parser: Ruby,
            },
            Key::Metadatarb => {
                cookbook_file("metadatarbs", "*/metadata.rb", r"(metadata\.rb)$", Ruby)
            }
            Key::Metadatajson => {
                cookbook_file("metadatajsons", "*/metadata.json", r"(metadata\.json)$", Json)
            }
            Key::Recipe => cookbook_file("recipes", "*/recipes/*.rb", r"recipes/([^/]+)\.rb$", Ruby),
            Key::Recipejson => {
                cookbook_file("recipejsons", "*/recipes/*.json", r"recipes/([^/]+)\.json$", Json)
            }
            Key::Attribute => {
                cookbook_file("attributes", "*/attributes/*.rb", r"attributes/([^/]+)\.rb$", Ruby)
            }
            Key::Library => {
                cookbook_file("libraries", "*/libraries/*.rb", r"libraries/([^/]+)\.rb$", Ruby)
            }
            Key::Resource => {
                cookbook_file("resources", "*/resources/*.rb", r"resources/([^/]+)\.rb$", Ruby)
            }
            Key::Provider => {
                cookbook_file("providers", "*/providers/*.rb", r"providers/([^/]+)\.rb$", Ruby)
            }
        }
    }

    /// Anchored regex matched against a path relative to its search root.
    pub fn name_pattern(self) -> String {
        let spec = self.spec();
        if spec.determine_cookbook_name {
            format!(r"^([\w-]+)/{}", spec.path_name_regex)
        } else {
            format!("^{}", spec.path_name_regex)
        }
    }

    /// Derive `(cookbook, logical name)` for a file crawled from `root`.
    ///
    /// Cookbook-decomposed keys yield `cookbook::file`; other keys yield the
    /// captured file token and no cookbook. Only the part of `path` below
    /// `root` is matched, so directory names above the search root never
    /// leak into the name.
    pub fn logical_name(self, root: &Path, path: &Path) -> Result<(Option<String>, String)> {
        let malformed = || BookwormError::MalformedPath {
            key: self,
            path: path.to_path_buf(),
            pattern: self.name_pattern(),
        };

        let regex = name_regex(self).ok_or_else(malformed)?;
        let relative = relative_to(root, path).ok_or_else(malformed)?;
        let text = relative.to_string_lossy().replace('\\', "/");
        let caps = regex.captures(&text).ok_or_else(malformed)?;

        if self.spec().determine_cookbook_name {
            let cookbook = caps.get(1).ok_or_else(malformed)?.as_str();
            let file = caps.get(2).ok_or_else(malformed)?.as_str();
            Ok((Some(cookbook.to_string()), format!("{cookbook}::{file}")))
        } else {
            let file = caps.get(1).ok_or_else(malformed)?.as_str();
            Ok((None, file.to_string()))
        }
    }
}

/// `path` below `root`, ignoring `.` components on either side.
fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(relative) = path.strip_prefix(root) {
        return Some(relative.to_path_buf());
    }
    let clean = |p: &Path| -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    clean(path)
        .strip_prefix(clean(root))
        .ok()
        .map(Path::to_path_buf)
}

static NAME_REGEXES: LazyLock<Vec<(Key, Regex)>> = LazyLock::new(|| {
    Key::ALL
        .iter()
        .filter(|k| !k.spec().metakey)
        .filter_map(|k| Regex::new(&k.name_pattern()).ok().map(|r| (*k, r)))
        .collect()
});

fn name_regex(key: Key) -> Option<&'static Regex> {
    NAME_REGEXES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, r)| r)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown key '{s}'"))
    }
}
