//! Filesystem crawler.
//!
//! For each requested key the crawler globs `<root>/<glob_pattern>` under
//! every configured root of the key's source dir kind, in configured order.
//! Matches are sorted per root and de-duplicated across roots, then read and
//! parsed in parallel. Results keep the crawl order and remember the root
//! each file was found under, so logical names are derived from the part of
//! the path below that root.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::{BookwormError, Result};
use crate::keys::Key;
use crate::parse::{ParsedSource, RubyParser, parse_with};

/// Crawled files per key, in crawl order.
pub type ProcessedFiles = BTreeMap<Key, Vec<CrawledFile>>;

#[derive(Debug, Clone)]
pub struct CrawledFile {
    /// Configured search root the file was found under.
    pub root: PathBuf,
    pub path: PathBuf,
    pub source: ParsedSource,
}

impl CrawledFile {
    pub fn new(root: impl Into<PathBuf>, path: impl Into<PathBuf>, source: ParsedSource) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
            source,
        }
    }
}

/// A file matched under one search root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub root: PathBuf,
    pub path: PathBuf,
}

pub fn crawl(config: &Configuration, keys: &[Key]) -> Result<ProcessedFiles> {
    let mut processed = ProcessedFiles::new();

    for key in keys {
        if key.spec().metakey || processed.contains_key(key) {
            continue;
        }
        let found = discover(config, *key)?;
        debug!(key = %key, files = found.len(), "crawled");
        processed.insert(*key, parse_all(*key, &found)?);
    }

    Ok(processed)
}

/// Files matching `key` under every configured root.
pub fn discover(config: &Configuration, key: Key) -> Result<Vec<Discovered>> {
    let spec = key.spec();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for root in config.source_dirs.for_kind(spec.source_dirs) {
        let pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            spec.glob_pattern
        );
        let entries = glob::glob(&pattern).map_err(|source| BookwormError::Glob {
            pattern: pattern.clone(),
            source,
        })?;

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable entry");
                    None
                }
            })
            .collect();
        matches.sort();

        for path in matches {
            if seen.insert(path.clone()) {
                out.push(Discovered {
                    root: root.clone(),
                    path,
                });
            }
        }
    }

    Ok(out)
}

fn parse_all(key: Key, found: &[Discovered]) -> Result<Vec<CrawledFile>> {
    let parser = key.spec().parser;

    found
        .par_iter()
        .map_init(RubyParser::new, |ruby, Discovered { root, path }| {
            let ruby = ruby
                .as_mut()
                .map_err(|e| BookwormError::Grammar(e.to_string()))?;
            let text = read_source(path)?;
            let source = parse_with(parser, ruby, path, &text)?;
            Ok(CrawledFile::new(root, path, source))
        })
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| BookwormError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceDirs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn config(cookbook_dirs: &[&Path], role_dirs: &[&Path]) -> Configuration {
        Configuration {
            source_dirs: SourceDirs {
                cookbook_dirs: cookbook_dirs.iter().map(|p| p.to_path_buf()).collect(),
                role_dirs: role_dirs.iter().map(|p| p.to_path_buf()).collect(),
            },
            debug: false,
        }
    }

    #[test]
    fn no_keys_no_files() {
        let dir = TempDir::new().unwrap();
        let processed = crawl(&config(&[dir.path()], &[]), &[]).unwrap();
        assert!(processed.is_empty());
    }

    #[test]
    fn recipes_are_parsed_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "zeta/recipes/default.rb", "include_recipe 'foo'\n");
        write(dir.path(), "alpha/recipes/b.rb", "include_recipe 'bar'\n");
        write(dir.path(), "alpha/recipes/a.rb", "");
        write(dir.path(), "alpha/attributes/default.rb", "default['x'] = 1\n");

        let processed = crawl(&config(&[dir.path()], &[]), &[Key::Recipe]).unwrap();
        let recipes = &processed[&Key::Recipe];
        let names: Vec<_> = recipes
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("alpha/recipes/a.rb"),
                PathBuf::from("alpha/recipes/b.rb"),
                PathBuf::from("zeta/recipes/default.rb"),
            ]
        );
        assert!(recipes[0].source.is_empty());
        assert!(recipes[1].source.ruby().is_some());
        assert!(recipes.iter().all(|f| f.root == dir.path()));
        assert!(!processed.contains_key(&Key::Attribute));
    }

    #[test]
    fn roles_come_from_role_dirs() {
        let cookbooks = TempDir::new().unwrap();
        let roles = TempDir::new().unwrap();
        write(roles.path(), "webserver.rb", "name 'webserver'\n");

        let processed =
            crawl(&config(&[cookbooks.path()], &[roles.path()]), &[Key::Role]).unwrap();
        assert_eq!(processed[&Key::Role].len(), 1);
        let role = &processed[&Key::Role][0];
        assert_eq!(role.path, roles.path().join("webserver.rb"));
        assert_eq!(role.root, roles.path());
    }

    #[test]
    fn json_recipes_use_the_json_parser() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mycookbook/recipes/data.json", r#"{"key": "value"}"#);

        let processed = crawl(&config(&[dir.path()], &[]), &[Key::Recipejson]).unwrap();
        let source = &processed[&Key::Recipejson][0].source;
        assert_eq!(source.json(), Some(&serde_json::json!({"key": "value"})));
    }

    #[test]
    fn invalid_json_aborts_the_crawl() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mycookbook/recipes/data.json", "{invalid}");

        let err = crawl(&config(&[dir.path()], &[]), &[Key::Recipejson]).unwrap_err();
        assert!(matches!(err, BookwormError::Json { .. }));
    }

    #[test]
    fn roots_are_visited_in_configured_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(second.path(), "b/recipes/default.rb", "x = 1\n");
        write(first.path(), "z/recipes/default.rb", "x = 1\n");

        let found = discover(&config(&[first.path(), second.path()], &[]), Key::Recipe).unwrap();
        assert_eq!(
            found,
            vec![
                Discovered {
                    root: first.path().to_path_buf(),
                    path: first.path().join("z/recipes/default.rb"),
                },
                Discovered {
                    root: second.path().to_path_buf(),
                    path: second.path().join("b/recipes/default.rb"),
                },
            ]
        );
    }

    #[test]
    fn repeated_roots_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cb/recipes/default.rb", "x = 1\n");

        let paths = discover(&config(&[dir.path(), dir.path()], &[]), Key::Recipe).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn crawl_is_identical_across_runs() {
        let dir = TempDir::new().unwrap();
        for cb in ["c", "a", "b"] {
            write(dir.path(), &format!("{cb}/recipes/default.rb"), "x = 1\n");
        }
        let cfg = config(&[dir.path()], &[]);
        let first = discover(&cfg, Key::Recipe).unwrap();
        let second = discover(&cfg, Key::Recipe).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn root_ancestors_do_not_leak_into_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("recipes/cookbooks");
        write(&root, "web/recipes/default.rb", "include_recipe 'base'\n");

        let processed = crawl(&config(&[root.as_path()], &[]), &[Key::Recipe]).unwrap();
        let kb = crate::kb::KnowledgeBase::new(processed).unwrap();
        assert_eq!(kb.recipes().keys().collect::<Vec<_>>(), vec!["web::default"]);
        assert_eq!(kb.cookbooks().iter().collect::<Vec<_>>(), vec!["web"]);
    }

    #[test]
    fn dotted_cookbook_directory_aborts_indexing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "my.cookbook/recipes/default.rb", "x = 1\n");

        let processed = crawl(&config(&[dir.path()], &[]), &[Key::Recipe]).unwrap();
        let err = crate::kb::KnowledgeBase::new(processed).unwrap_err();
        assert!(matches!(err, BookwormError::MalformedPath { .. }));
    }
}
