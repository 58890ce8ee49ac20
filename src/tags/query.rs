//! Tag query service: prefix-free substring search and random picks

use rand::seq::SliceRandom;
use std::cmp::Reverse;

use crate::error::{Error, Result};
use crate::tags::store::{TagCategory, TagRecord, TagStore};

/// Maximum number of records a search returns
pub const SEARCH_LIMIT: usize = 8;

/// Case-insensitive substring search, ranked by descending count.
/// An empty or absent query matches every record.
pub fn search(store: &TagStore, category: TagCategory, query: Option<&str>) -> Result<Vec<TagRecord>> {
    let needle = query
        .map(str::to_lowercase)
        .filter(|q| !q.is_empty());

    let mut matches: Vec<TagRecord> = store
        .load(category)?
        .into_iter()
        .filter(|record| match &needle {
            Some(q) => record.tag.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .collect();

    matches.sort_by_key(|record| Reverse(record.count.value()));
    matches.truncate(SEARCH_LIMIT);
    Ok(matches)
}

/// Uniformly random record from a category
pub fn random(store: &TagStore, category: TagCategory) -> Result<TagRecord> {
    let records = store.load(category)?;
    records
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| Error::EmptyCategory(category.file_name().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::store::TagCount;
    use std::fs;
    use tempfile::TempDir;

    fn seeded_store(json: &str) -> (TempDir, TagStore) {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("active");
        fs::create_dir_all(&active).unwrap();
        fs::write(active.join("char.json"), json).unwrap();
        let store = TagStore::new(active, dir.path().join("default"));
        (dir, store)
    }

    fn catalog(n: usize) -> String {
        let records: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"tag": "tag{i}", "count": {i}}}"#))
            .collect();
        format!("[{}]", records.join(","))
    }

    #[test]
    fn search_caps_at_limit_sorted_by_descending_count() {
        let (_dir, store) = seeded_store(&catalog(20));

        let results = search(&store, TagCategory::Character, None).unwrap();
        assert_eq!(results.len(), SEARCH_LIMIT);
        let counts: Vec<i64> = results.iter().map(|r| r.count.value()).collect();
        assert_eq!(counts, vec![19, 18, 17, 16, 15, 14, 13, 12]);
    }

    #[test]
    fn search_filters_case_insensitively() {
        let (_dir, store) = seeded_store(
            r#"[
                {"tag": "Alice Margatroid", "count": 10},
                {"tag": "malice", "count": 3},
                {"tag": "bob", "count": 99}
            ]"#,
        );

        let results = search(&store, TagCategory::Character, Some("ALICE")).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(names, vec!["Alice Margatroid", "malice"]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let (_dir, store) = seeded_store(&catalog(3));
        let results = search(&store, TagCategory::Character, Some("")).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn search_parses_string_counts() {
        let (_dir, store) = seeded_store(
            r#"[
                {"tag": "low", "count": "1"},
                {"tag": "high", "count": "100"}
            ]"#,
        );
        let results = search(&store, TagCategory::Character, None).unwrap();
        assert_eq!(results[0].tag, "high");
    }

    #[test]
    fn random_returns_member_of_category() {
        let (_dir, store) = seeded_store(&catalog(5));
        let record = random(&store, TagCategory::Character).unwrap();
        assert!(record.tag.starts_with("tag"));
        assert_eq!(record.count, TagCount::Int(record.count.value()));
    }

    #[test]
    fn random_on_empty_category_fails() {
        let (_dir, store) = seeded_store("[]");
        let err = random(&store, TagCategory::Character).unwrap_err();
        assert!(matches!(err, Error::EmptyCategory(_)));
    }
}
