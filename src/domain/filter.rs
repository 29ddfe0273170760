use crate::domain::LearningEntry;
use std::collections::BTreeSet;

/// Narrow `entries` by a free-text search and an exact tag, composed with
/// logical AND. Input order is preserved; empty filters are the identity, so
/// callers sort once per load rather than per filter pass.
///
/// The search term matches case-insensitively as a substring of the content
/// or of any tag. The tag filter is an exact, case-sensitive membership test.
pub fn filter_entries<'a>(
    entries: &'a [LearningEntry],
    search: &str,
    tag: &str,
) -> Vec<&'a LearningEntry> {
    let needle = search.to_lowercase();

    entries
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.content.to_lowercase().contains(&needle)
                || entry.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .filter(|entry| tag.is_empty() || entry.tags.iter().any(|t| t == tag))
        .collect()
}

/// Union of every tag across `entries`, deduplicated case-sensitively and
/// returned in sorted order.
pub fn all_tags(entries: &[LearningEntry]) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for entry in entries {
        for tag in &entry.tags {
            tags.insert(tag.clone());
        }
    }
    tags.into_iter().collect()
}
