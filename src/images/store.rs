//! On-disk image store
//!
//! Originals and thumbnails share a filename; the thumbnail directory simply
//! mirrors the images directory. Filenames are derived from sanitized tag
//! text plus a numeric disambiguator.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Thumbnails are bounded to this many pixels on either axis,
/// preserving aspect ratio.
pub const THUMBNAIL_MAX: u32 = 350;

const MAX_FILENAME_LEN: usize = 255;

/// One catalog entry as served by `GET /images/`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageEntry {
    pub original: String,
    pub thumbnail: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
    thumbnails_dir: PathBuf,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf, thumbnails_dir: PathBuf) -> Self {
        Self {
            images_dir,
            thumbnails_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.images_dir)?;
        fs::create_dir_all(&self.thumbnails_dir)?;
        Ok(())
    }

    /// Decode `data`, store it under the first free
    /// `{character}_{artist}_{index}.png` name, and write the matching
    /// thumbnail. Returns the stored filename.
    pub fn save(&self, data: &[u8], character: &str, artist: &str) -> Result<String> {
        let img = image::load_from_memory(data)?;

        let filename = self.unique_filename(character, artist);
        img.save(self.images_dir.join(&filename))?;

        let thumb = img.thumbnail(THUMBNAIL_MAX, THUMBNAIL_MAX);
        thumb.save(self.thumbnails_dir.join(&filename))?;

        Ok(filename)
    }

    fn unique_filename(&self, character: &str, artist: &str) -> String {
        let mut index = 1;
        loop {
            let name = sanitize_filename(&format!("{character}_{artist}_{index}.png"));
            if !self.images_dir.join(&name).exists() {
                return name;
            }
            index += 1;
        }
    }

    /// Every stored PNG with its thumbnail link (when one exists)
    pub fn list(&self) -> Result<Vec<ImageEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.images_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".png") {
                continue;
            }
            let has_thumb = self.thumbnails_dir.join(&name).exists();
            let title = name.split('.').next().unwrap_or(&name).to_string();
            entries.push(ImageEntry {
                original: format!("/images/{name}"),
                thumbnail: has_thumb.then(|| format!("/thumb/{name}")),
                title,
            });
        }
        entries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(entries)
    }

    /// Path of a stored image, or NotFound
    pub fn image_path(&self, filename: &str) -> Result<PathBuf> {
        let name = checked_name(filename)?;
        let path = self.images_dir.join(name);
        if !path.exists() {
            return Err(Error::NotFound("Image not found".to_string()));
        }
        Ok(path)
    }

    /// Path of a stored thumbnail, or NotFound
    pub fn thumbnail_path(&self, filename: &str) -> Result<PathBuf> {
        let name = checked_name(filename)?;
        let path = self.thumbnails_dir.join(name);
        if !path.exists() {
            return Err(Error::NotFound("Thumbnail not found".to_string()));
        }
        Ok(path)
    }

    /// Remove an image and, when present, its thumbnail
    pub fn delete(&self, filename: &str) -> Result<()> {
        let path = self.image_path(filename)?;
        fs::remove_file(&path)?;

        let thumb = self.thumbnails_dir.join(checked_name(filename)?);
        if thumb.exists() {
            fs::remove_file(&thumb)?;
        }
        Ok(())
    }
}

/// Reject path traversal in user-supplied filenames. Sanitized filenames may
/// legitimately contain `..` inside a tag name, so only separator-bearing
/// names and the bare dot components are refused.
fn checked_name(filename: &str) -> Result<&str> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(Error::NotFound("Image not found".to_string()));
    }
    Ok(filename)
}

/// Replace characters that are invalid in filenames and cap the length
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .take(MAX_FILENAME_LEN)
        .collect()
}
