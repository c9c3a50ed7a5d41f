//! Tag picker filtering.

/// Tag options containing `query`, ignoring case. An empty query keeps all.
pub fn filter_tag_options<'a>(tags: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    tags.iter()
        .map(String::as_str)
        .filter(|tag| needle.is_empty() || tag.to_lowercase().contains(&needle))
        .collect()
}
