//! Derived views over the resource collections. No I/O.

use dovah_types::{MediaFile, Playlist, PlaylistId, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Aggregate counters shown next to the file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total: usize,
    pub favorites: usize,
    pub private: usize,
}

/// Finds a tag by id.
pub fn resolve_tag<'a>(tags: &'a [Tag], id: &TagId) -> Option<&'a Tag> {
    tags.iter().find(|tag| &tag.id == id)
}

/// Files visible under the active tag filter.
///
/// With no tag selected, or with a tag id that no longer resolves, the input
/// is returned borrowed and untouched. Otherwise only files whose tag list
/// contains the tag's name are kept, in their original order.
pub fn visible_files<'a>(
    files: &'a [MediaFile],
    active_tag_id: Option<&TagId>,
    tags: &[Tag],
) -> Cow<'a, [MediaFile]> {
    let Some(tag) = active_tag_id.and_then(|id| resolve_tag(tags, id)) else {
        return Cow::Borrowed(files);
    };
    Cow::Owned(
        files
            .iter()
            .filter(|file| file.has_tag(&tag.name))
            .cloned()
            .collect(),
    )
}

/// Counts files, favorites and private files.
pub fn stats(files: &[MediaFile]) -> LibraryStats {
    files.iter().fold(
        LibraryStats {
            total: files.len(),
            ..Default::default()
        },
        |mut acc, file| {
            acc.favorites += usize::from(file.is_favorite);
            acc.private += usize::from(file.is_private);
            acc
        },
    )
}

/// The playlist matching the selection, if both exist.
pub fn active_playlist<'a>(
    playlists: &'a [Playlist],
    selected: Option<&PlaylistId>,
) -> Option<&'a Playlist> {
    let selected = selected?;
    playlists.iter().find(|p| &p.id == selected)
}
