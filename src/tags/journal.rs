//! Deleted-tag journal
//!
//! A single JSON object acting as the soft-delete holding area for the two
//! editable categories. Created lazily with empty arrays on first access.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tags::store::{write_json_atomic, TagRecord};

const JOURNAL_FILE: &str = "deleted_tags.json";

/// Journal contents, keyed the way the frontend expects
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTags {
    #[serde(default)]
    pub character_tags: Vec<TagRecord>,
    #[serde(default)]
    pub artist_tags: Vec<TagRecord>,
}

#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Journal lives next to the active category files
    pub fn new(tags_dir: &Path) -> Self {
        Self {
            path: tags_dir.join(JOURNAL_FILE),
        }
    }

    /// Load the journal, materializing the empty shape when absent
    pub fn load(&self) -> Result<DeletedTags> {
        if !self.path.exists() {
            let empty = DeletedTags::default();
            self.save(&empty)?;
            return Ok(empty);
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, deleted: &DeletedTags) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_json_atomic(&self.path, deleted)
    }

    /// Reset both arrays to empty
    pub fn clear(&self) -> Result<()> {
        self.save(&DeletedTags::default())
    }
}
