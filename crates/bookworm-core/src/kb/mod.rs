//! Knowledge base: crawled files indexed by key and logical name.
//!
//! Responsibilities:
//! - Derive logical names (`cookbook::file`, or a bare role name) from paths
//! - Initialize every crawlable category, even when nothing was found
//! - Seed the `cookbook` pseudo-category from cookbook-decomposed keys
//! - Track which rules have executed, so reports can validate their inputs
//!
//! When two files decompose to the same logical name the first one indexed
//! is kept and the later one is dropped with a warning. Crawl order is
//! sorted per search root and roots are visited in configured order, so an
//! earlier root shadows a later one.

pub mod backend;
pub mod entry;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::crawl::{CrawledFile, ProcessedFiles};
use crate::error::Result;
use crate::keys::Key;
use crate::rules::catalog::RuleId;

pub use backend::{Backend, Category, SimpleHash};
pub use entry::FileEntry;

macro_rules! plural_accessors {
    ($($name:ident => $key:expr),* $(,)?) => {
        $(
            pub fn $name(&self) -> &Category {
                self.get($key)
            }
        )*
    };
}

#[derive(Debug, Default)]
pub struct KnowledgeBase<B: Backend = SimpleHash> {
    backend: B,
    cookbooks: BTreeSet<String>,
    executed: BTreeSet<RuleId>,
    empty: Category,
}

impl KnowledgeBase<SimpleHash> {
    /// Index crawled files. Fails on the first path that does not follow its
    /// key's naming convention.
    pub fn new(processed_files: ProcessedFiles) -> Result<Self> {
        Self::with_backend(SimpleHash::default(), processed_files)
    }

    /// A knowledge base with every category initialized and no files.
    pub fn empty() -> Self {
        Self::with_backend(SimpleHash::default(), ProcessedFiles::new())
            .unwrap_or_default()
    }
}

impl<B: Backend> KnowledgeBase<B> {
    pub fn with_backend(backend: B, processed_files: ProcessedFiles) -> Result<Self> {
        let mut kb = Self {
            backend,
            cookbooks: BTreeSet::new(),
            executed: BTreeSet::new(),
            empty: Category::new(),
        };

        for key in Key::ALL.into_iter().filter(|k| !k.spec().metakey) {
            kb.backend.get_mut(key);
        }

        for (key, files) in processed_files {
            debug!(key = %key, files = files.len(), "indexing");
            for file in files {
                kb.index(key, file)?;
            }
        }

        Ok(kb)
    }

    fn index(&mut self, key: Key, file: CrawledFile) -> Result<()> {
        let (cookbook, name) = key.logical_name(&file.root, &file.path)?;
        if let Some(cookbook) = &cookbook {
            self.cookbooks.insert(cookbook.clone());
        }
        self.insert(key, name, FileEntry::new(file.path, cookbook, file.source));
        Ok(())
    }

    /// Add an entry unless the logical name is already taken.
    ///
    /// Returns `false` when the entry was dropped as a duplicate.
    pub fn insert(&mut self, key: Key, name: String, entry: FileEntry) -> bool {
        let category = self.backend.get_mut(key);
        if let Some(existing) = category.get(&name) {
            warn!(
                key = %key,
                name = %name,
                kept = %existing.path.display(),
                dropped = %entry.path.display(),
                "duplicate logical name"
            );
            return false;
        }
        category.insert(name, entry);
        true
    }

    pub fn get(&self, key: Key) -> &Category {
        self.backend.get(key).unwrap_or(&self.empty)
    }

    pub fn get_mut(&mut self, key: Key) -> &mut Category {
        self.backend.get_mut(key)
    }

    pub fn set(&mut self, key: Key, category: Category) {
        self.backend.set(key, category);
    }

    pub fn cookbooks(&self) -> &BTreeSet<String> {
        &self.cookbooks
    }

    pub fn add_cookbook(&mut self, name: impl Into<String>) {
        self.cookbooks.insert(name.into());
    }

    pub fn mark_executed(&mut self, rule: RuleId) {
        self.executed.insert(rule);
    }

    pub fn has_executed(&self, rule: RuleId) -> bool {
        self.executed.contains(&rule)
    }

    pub fn executed_rules(&self) -> &BTreeSet<RuleId> {
        &self.executed
    }

    plural_accessors! {
        roles => Key::Role,
        metadatarbs => Key::Metadatarb,
        metadatajsons => Key::Metadatajson,
        recipes => Key::Recipe,
        recipejsons => Key::Recipejson,
        attributes => Key::Attribute,
        libraries => Key::Library,
        resources => Key::Resource,
        providers => Key::Provider,
    }
}
