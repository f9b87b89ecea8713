//! Media library collaborator.
//!
//! The editor hands the block a [`MediaItem`] (or an error) after the user
//! picks or uploads an image; the block only consumes the resulting values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Size variant slug every library item is expected to carry.
pub const FULL_SIZE: &str = "full";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, MediaSize>,
}

impl MediaItem {
    pub fn size(&self, slug: &str) -> Option<&MediaSize> {
        self.sizes.get(slug)
    }

    /// URL of the `slug` variant, falling back to the item's own URL for
    /// `full`.
    pub fn url_for(&self, slug: &str) -> Option<&str> {
        match self.size(slug) {
            Some(size) => Some(size.url.as_str()),
            None if slug == FULL_SIZE => self.url(),
            None => None,
        }
    }

    /// The item's URL, treating an empty string as missing.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Failure surfaced to the user as an editor notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Media item {0} was not found")]
    NotFound(u64),
    #[error("The selected media has no URL")]
    MissingUrl,
    #[error("{0}")]
    Upload(String),
}

pub trait MediaLibrary {
    fn fetch(&self, id: u64) -> Result<MediaItem, MediaError>;
}

/// In-memory library, e.g. loaded from a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCatalog {
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl MediaCatalog {
    pub fn new(media: Vec<MediaItem>) -> Self {
        Self { media }
    }
}

impl MediaLibrary for MediaCatalog {
    fn fetch(&self, id: u64) -> Result<MediaItem, MediaError> {
        self.media
            .iter()
            .find(|item| item.id == Some(id))
            .cloned()
            .ok_or(MediaError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item() -> MediaItem {
        let mut sizes = BTreeMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            MediaSize {
                url: "https://x/a-150x150.jpg".to_string(),
                width: Some(150),
                height: Some(150),
            },
        );
        MediaItem {
            id: Some(7),
            url: Some("https://x/a.jpg".to_string()),
            alt: "cat".to_string(),
            sizes,
        }
    }

    #[test]
    fn url_for_size_variants() {
        let item = item();
        assert_eq!(item.url_for("thumbnail"), Some("https://x/a-150x150.jpg"));
        assert_eq!(item.url_for(FULL_SIZE), Some("https://x/a.jpg"));
        assert_eq!(item.url_for("large"), None);
    }

    #[test]
    fn empty_url_is_missing() {
        let item = MediaItem {
            url: Some(String::new()),
            ..MediaItem::default()
        };
        assert_eq!(item.url(), None);
        assert_eq!(item.url_for(FULL_SIZE), None);
    }

    #[test]
    fn catalog_fetch() {
        let catalog = MediaCatalog::new(vec![item()]);
        assert_eq!(catalog.fetch(7).map(|i| i.alt), Ok("cat".to_string()));
        assert_eq!(catalog.fetch(8), Err(MediaError::NotFound(8)));
    }

    #[test]
    fn notices_read_naturally() {
        assert_eq!(MediaError::NotFound(3).to_string(), "Media item 3 was not found");
        assert_eq!(MediaError::Upload("File too large".into()).to_string(), "File too large");
    }
}
