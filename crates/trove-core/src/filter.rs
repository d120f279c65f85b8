//! Item listing filters.

/// Filters applied to an item listing. All criteria are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over item name OR text content.
    pub search: Option<String>,
    /// Exact collection name.
    pub collection: Option<String>,
    /// Required tag names; an item matches only when its tag set contains
    /// every entry (superset match). Empty means no tag filtering.
    pub tags: Vec<String>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.collection.is_none() && self.tags.is_empty()
    }
}

/// Superset match: every required tag must be present on the item.
///
/// Tag names are case-sensitive. An empty requirement matches everything,
/// including untagged items.
pub fn matches_tag_filter(item_tags: &[String], required: &[String]) -> bool {
    required
        .iter()
        .all(|want| item_tags.iter().any(|have| have == want))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_requirement_matches_all() {
        assert!(matches_tag_filter(&tags(&["work"]), &[]));
        assert!(matches_tag_filter(&[], &[]));
    }

    #[test]
    fn test_subset_matches() {
        let have = tags(&["work", "urgent"]);
        assert!(matches_tag_filter(&have, &tags(&["work"])));
        assert!(matches_tag_filter(&have, &tags(&["urgent", "work"])));
    }

    #[test]
    fn test_missing_tag_excludes() {
        let have = tags(&["work", "urgent"]);
        assert!(!matches_tag_filter(&have, &tags(&["work", "missing"])));
        assert!(!matches_tag_filter(&[], &tags(&["work"])));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(!matches_tag_filter(&tags(&["Work"]), &tags(&["work"])));
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(ItemFilter::default().is_empty());
        let filter = ItemFilter {
            search: Some("invoice".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
