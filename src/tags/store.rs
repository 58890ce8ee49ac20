//! Flat-file tag catalog store
//!
//! Each category is one JSON array of tag records under the active tags
//! directory. Files are seeded lazily from the default snapshot and replaced
//! wholesale on save (temp file + rename) so readers never observe a partial
//! write.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Tag category. Only `Character` and `Artist` are journal-backed; the other
/// two are read-only catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    Character,
    Artist,
    Danbooru,
    Participant,
}

impl TagCategory {
    /// On-disk file name for this category
    pub fn file_name(self) -> &'static str {
        match self {
            TagCategory::Character => "char.json",
            TagCategory::Artist => "artist.json",
            TagCategory::Danbooru => "danbooru.json",
            TagCategory::Participant => "participant.json",
        }
    }

    /// Parse a URL path segment into a category
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "character" => Some(TagCategory::Character),
            "artist" => Some(TagCategory::Artist),
            "danbooru" => Some(TagCategory::Danbooru),
            "participant" => Some(TagCategory::Participant),
            _ => None,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagCategory::Character => "character",
            TagCategory::Artist => "artist",
            TagCategory::Danbooru => "danbooru",
            TagCategory::Participant => "participant",
        };
        write!(f, "{name}")
    }
}

/// Popularity count as stored on disk: some catalogs carry integers, others
/// carry decimal strings. Round-trips either representation unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TagCount {
    Int(i64),
    Text(String),
}

impl Default for TagCount {
    fn default() -> Self {
        TagCount::Int(0)
    }
}

impl TagCount {
    /// Lenient integer value for ranking; unparseable counts rank as 0
    pub fn value(&self) -> i64 {
        match self {
            TagCount::Int(n) => *n,
            TagCount::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// One catalog entry: a prompt label with its popularity count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagRecord {
    pub tag: String,
    #[serde(default)]
    pub count: TagCount,
}

/// Store over the active tag directory, seeded from the default snapshot
#[derive(Debug, Clone)]
pub struct TagStore {
    active_dir: PathBuf,
    default_dir: PathBuf,
}

impl TagStore {
    pub fn new(active_dir: PathBuf, default_dir: PathBuf) -> Self {
        Self {
            active_dir,
            default_dir,
        }
    }

    /// Mirror the default snapshot into the active directory on first run.
    /// Fails when the active directory is absent and there is no snapshot to
    /// seed it from.
    pub fn ensure_seeded(&self) -> Result<()> {
        if self.active_dir.exists() {
            return Ok(());
        }
        if !self.default_dir.exists() {
            return Err(Error::NotFound(format!(
                "Default tags folder not found at {}",
                self.default_dir.display()
            )));
        }
        fs::create_dir_all(&self.active_dir)?;
        for entry in fs::read_dir(&self.default_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::copy(entry.path(), self.active_dir.join(entry.file_name()))?;
            }
        }
        Ok(())
    }

    fn active_path(&self, category: TagCategory) -> PathBuf {
        self.active_dir.join(category.file_name())
    }

    /// Load the ordered records of one category, seeding the active file from
    /// the snapshot when only the snapshot has it.
    pub fn load(&self, category: TagCategory) -> Result<Vec<TagRecord>> {
        let path = self.active_path(category);
        if !path.exists() {
            let fallback = self.default_dir.join(category.file_name());
            if !fallback.exists() {
                return Err(Error::NotFound(format!(
                    "{} not found",
                    category.file_name()
                )));
            }
            fs::create_dir_all(&self.active_dir)?;
            fs::copy(&fallback, &path)?;
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Whole-file replace of one category
    pub fn save(&self, category: TagCategory, records: &[TagRecord]) -> Result<()> {
        write_json_atomic(&self.active_path(category), &records)
    }

    /// Overwrite every active file that has a snapshot counterpart, leaving
    /// active files without one untouched. Fails when the snapshot directory
    /// is missing.
    pub fn reset_from_default(&self) -> Result<()> {
        if !self.default_dir.exists() {
            return Err(Error::NotFound("Backup folder not found".to_string()));
        }
        fs::create_dir_all(&self.active_dir)?;
        for entry in fs::read_dir(&self.default_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let data = fs::read(entry.path())?;
                write_bytes_atomic(&self.active_dir.join(entry.file_name()), &data)?;
            }
        }
        Ok(())
    }
}

/// Serialize `value` as pretty JSON and replace `path` atomically
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
