//! Local copies of the server collections.
//!
//! `ResourceState` is plain data with documented mutation methods; every
//! remote round trip lives in [`ResourceStore`](crate::ResourceStore) and the
//! other services. Every mutation that targets an id tolerates the id being
//! absent (e.g. after logout cleared the collections) and does nothing.
//!
//! Loads are ticketed. Each collection has a monotonic counter bumped when a
//! load is issued, and the whole state carries an epoch bumped on reset, so
//! a response can be checked against what was issued since.

use crate::config::StaleResponsePolicy;
use crate::reload::Collection;
use dovah_types::{FileId, MediaFile, Playlist, PlaylistId, Tag};

/// Identifies one issued collection load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub collection: Collection,
    pub sequence: u64,
    pub epoch: u64,
}

/// Files, tags, playlists and the open detail record.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    files: Vec<MediaFile>,
    tags: Vec<Tag>,
    playlists: Vec<Playlist>,
    active_file: Option<MediaFile>,
    /// Last issued sequence per collection.
    issued: [u64; 3],
    epoch: u64,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// The file currently open in the detail view.
    pub fn active_file(&self) -> Option<&MediaFile> {
        self.active_file.as_ref()
    }

    /// Incremented by every [`reset`](Self::reset).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn find_file(&self, id: &FileId) -> Option<&MediaFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    pub fn find_playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    // ── Load tickets ─────────────────────────────────────────────

    /// Records that a load of `collection` is being issued.
    pub fn begin_load(&mut self, collection: Collection) -> LoadTicket {
        let slot = &mut self.issued[collection.index()];
        *slot += 1;
        LoadTicket {
            collection,
            sequence: *slot,
            epoch: self.epoch,
        }
    }

    /// Whether a response for `ticket` may be applied.
    ///
    /// Responses from before the last reset are always refused. Within the
    /// same epoch the policy decides.
    pub fn accepts(&self, ticket: &LoadTicket, policy: StaleResponsePolicy) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        match policy {
            StaleResponsePolicy::DiscardStale => {
                ticket.sequence == self.issued[ticket.collection.index()]
            }
            StaleResponsePolicy::LastResponseWins => true,
        }
    }

    // ── Wholesale replacement ────────────────────────────────────

    pub fn replace_files(&mut self, files: Vec<MediaFile>) {
        self.files = files;
    }

    pub fn replace_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub fn replace_playlists(&mut self, playlists: Vec<Playlist>) {
        self.playlists = playlists;
    }

    // ── In-place mutation ────────────────────────────────────────

    /// Sets the favorite flag on the matching file and on the detail copy.
    /// Returns true if anything matched.
    pub fn set_favorite(&mut self, id: &FileId, favorite: bool) -> bool {
        let mut matched = false;
        for file in self.files.iter_mut().filter(|f| &f.id == id) {
            file.is_favorite = favorite;
            matched = true;
        }
        if let Some(active) = self.active_file.as_mut().filter(|f| &f.id == id) {
            active.is_favorite = favorite;
            matched = true;
        }
        matched
    }

    /// Puts freshly uploaded files at the front, keeping their order.
    /// No deduplication against existing entries.
    pub fn prepend_files(&mut self, uploaded: Vec<MediaFile>) {
        self.files.splice(0..0, uploaded);
    }

    pub fn prepend_playlist(&mut self, playlist: Playlist) {
        self.playlists.insert(0, playlist);
    }

    /// Replaces the playlist with the same id. Returns false if absent.
    pub fn replace_playlist(&mut self, playlist: Playlist) -> bool {
        match self.playlists.iter_mut().find(|p| p.id == playlist.id) {
            Some(slot) => {
                *slot = playlist;
                true
            }
            None => false,
        }
    }

    /// Removes a playlist. Returns false if absent.
    pub fn remove_playlist(&mut self, id: &PlaylistId) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| &p.id != id);
        self.playlists.len() != before
    }

    pub fn set_active_file(&mut self, file: Option<MediaFile>) {
        self.active_file = file;
    }

    /// Clears every collection and starts a new epoch, so responses to
    /// requests issued before the reset are refused.
    pub fn reset(&mut self) {
        self.files.clear();
        self.tags.clear();
        self.playlists.clear();
        self.active_file = None;
        self.epoch += 1;
    }
}
