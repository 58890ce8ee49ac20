//! Tag lifecycle: soft delete into the journal, restore back out, and
//! factory reset from the default snapshot.
//!
//! Every operation is a full read-modify-write over the category files and
//! the journal. Requested names with no matching record are silent no-ops;
//! the returned report names only the tags that actually moved.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::tags::journal::Journal;
use crate::tags::store::{TagCategory, TagRecord, TagStore};

/// Per-category report of the tag names an operation actually moved
#[derive(Debug, Default, PartialEq)]
pub struct MovedTags {
    pub character_tags: Vec<String>,
    pub artist_tags: Vec<String>,
}

/// Move the requested records from the active files into the journal
pub fn remove_tags(
    store: &TagStore,
    journal: &Journal,
    character_tags: &[String],
    artist_tags: &[String],
) -> Result<MovedTags> {
    if character_tags.is_empty() && artist_tags.is_empty() {
        return Err(Error::InvalidInput(
            "No tags provided for removal".to_string(),
        ));
    }

    let mut deleted = journal.load()?;
    let moved = MovedTags {
        character_tags: extract(
            store,
            TagCategory::Character,
            character_tags,
            &mut deleted.character_tags,
        )?,
        artist_tags: extract(
            store,
            TagCategory::Artist,
            artist_tags,
            &mut deleted.artist_tags,
        )?,
    };
    journal.save(&deleted)?;
    Ok(moved)
}

/// Move requested journal entries back into the active files. The active
/// file is deduplicated by tag (first record wins) and sorted alphabetically.
pub fn restore_tags(
    store: &TagStore,
    journal: &Journal,
    character_tags: &[String],
    artist_tags: &[String],
) -> Result<MovedTags> {
    if character_tags.is_empty() && artist_tags.is_empty() {
        return Err(Error::InvalidInput(
            "No tags provided for restoration".to_string(),
        ));
    }

    let mut deleted = journal.load()?;
    let moved = MovedTags {
        character_tags: reinstate(
            store,
            TagCategory::Character,
            character_tags,
            &mut deleted.character_tags,
        )?,
        artist_tags: reinstate(
            store,
            TagCategory::Artist,
            artist_tags,
            &mut deleted.artist_tags,
        )?,
    };
    journal.save(&deleted)?;
    Ok(moved)
}

/// Overwrite the active files from the default snapshot and clear the journal
pub fn reset_to_default(store: &TagStore, journal: &Journal) -> Result<()> {
    store.reset_from_default()?;
    journal.clear()
}

fn extract(
    store: &TagStore,
    category: TagCategory,
    requested: &[String],
    journal_side: &mut Vec<TagRecord>,
) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let mut kept = Vec::new();
    let mut moved = Vec::new();
    for record in store.load(category)? {
        if requested.contains(record.tag.as_str()) {
            moved.push(record.tag.clone());
            journal_side.push(record);
        } else {
            kept.push(record);
        }
    }
    store.save(category, &kept)?;
    Ok(moved)
}

fn reinstate(
    store: &TagStore,
    category: TagCategory,
    requested: &[String],
    journal_side: &mut Vec<TagRecord>,
) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let mut active = store.load(category)?;
    let mut restored = Vec::new();
    journal_side.retain(|record| {
        if requested.contains(record.tag.as_str()) {
            restored.push(record.tag.clone());
            active.push(record.clone());
            false
        } else {
            true
        }
    });

    // Normalize: one record per tag (first wins), alphabetical order
    let mut seen = HashSet::new();
    active.retain(|record| seen.insert(record.tag.clone()));
    active.sort_by(|a, b| a.tag.cmp(&b.tag));

    store.save(category, &active)?;
    Ok(restored)
}
