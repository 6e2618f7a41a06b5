use std::collections::{BTreeMap, HashMap};

use crate::keys::Key;
use crate::kb::entry::FileEntry;

/// Logical name → entry, ordered by name.
pub type Category = BTreeMap<String, FileEntry>;

/// Storage for knowledge base categories.
pub trait Backend: Default {
    /// Category for `key`, or `None` if it was never initialized.
    fn get(&self, key: Key) -> Option<&Category>;

    /// Category for `key`, created empty on first access.
    fn get_mut(&mut self, key: Key) -> &mut Category;

    fn set(&mut self, key: Key, category: Category);
}

/// In-memory backend; the only one there is.
#[derive(Debug, Default)]
pub struct SimpleHash {
    categories: HashMap<Key, Category>,
}

impl Backend for SimpleHash {
    fn get(&self, key: Key) -> Option<&Category> {
        self.categories.get(&key)
    }

    fn get_mut(&mut self, key: Key) -> &mut Category {
        self.categories.entry(key).or_default()
    }

    fn set(&mut self, key: Key, category: Category) {
        self.categories.insert(key, category);
    }
}
