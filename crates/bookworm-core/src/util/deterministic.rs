//! Deterministic ordering helpers.
//!
//! Rule outputs and report lines are sorted and deduplicated so identical
//! cookbook trees always produce identical output, independent of crawl or
//! traversal order.

/// Sort lexicographically and drop duplicates.
pub fn sort_dedup(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items.dedup();
    items
}

/// Fully qualify a recipe reference relative to `cookbook`.
///
/// - `::name` resolves to `<cookbook>::name`
/// - `name` (no `::`) resolves to `name::default`
/// - anything else is already qualified and returned unchanged
///
/// A `::name` reference with no known cookbook stays as `::name`.
pub fn qualify_recipe(cookbook: Option<&str>, reference: &str) -> String {
    if reference.starts_with("::") {
        format!("{}{}", cookbook.unwrap_or_default(), reference)
    } else if !reference.contains("::") {
        format!("{reference}::default")
    } else {
        reference.to_string()
    }
}

/// Cookbook part of a qualified recipe name (`cb::recipe` → `cb`).
pub fn cookbook_of(recipe: &str) -> &str {
    recipe.split("::").next().unwrap_or(recipe)
}
