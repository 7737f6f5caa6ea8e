//! Library resources: files, tags, playlists, and the payloads exchanged
//! when mutating them.

use crate::ids::{FileId, PlaylistId, TagId};
use crate::query::MediaKind;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// A file in the remote media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: FileId,
    /// Legacy rows may carry no name or type; both read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mime_type: String,
    /// Size in bytes; zero when the server could not stat the file.
    #[serde(default)]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Tag names, in server order.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<Timestamp>,
}

impl MediaFile {
    /// Creates a file record with the required fields and empty metadata.
    pub fn new(id: impl Into<FileId>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: 0,
            description: String::new(),
            tags: Vec::new(),
            is_favorite: false,
            is_private: false,
            thumbnail_url: None,
            media_url: None,
            uploaded_at: None,
        }
    }

    /// Returns true if the file carries a tag with this exact name.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Returns true if the MIME type falls under the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: MediaKind) -> bool {
        kind.prefix()
            .is_none_or(|prefix| self.mime_type.starts_with(prefix))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A tag usable for local filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

impl Tag {
    pub fn new(id: impl Into<TagId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_private: false,
        }
    }
}

/// A user playlist. The server owns item order and membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub items: Vec<MediaFile>,
}

impl Playlist {
    pub fn new(id: impl Into<PlaylistId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, file_id: &FileId) -> bool {
        self.items.iter().any(|item| &item.id == file_id)
    }
}

/// Response to `POST /files/{id}/favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub id: FileId,
    pub favorite: bool,
}

/// Flags sent with a multipart upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    /// Convert office documents to PDF on the server.
    pub convert_to_pdf: bool,
    /// Extract an audio track from uploaded videos.
    pub convert_to_audio: bool,
    /// Store the upload in the private area.
    pub private: bool,
}

impl UploadOptions {
    /// Form fields in the `"1"`/`"0"` encoding the server expects.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &'static str); 3] {
        let flag = |on: bool| if on { "1" } else { "0" };
        [
            ("convertToPdf", flag(self.convert_to_pdf)),
            ("convertToAudio", flag(self.convert_to_audio)),
            ("private", flag(self.private)),
        ]
    }
}

/// Response to `POST /files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub uploaded: Vec<MediaFile>,
    pub count: usize,
}
