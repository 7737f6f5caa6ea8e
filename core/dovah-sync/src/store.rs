//! Remote collection loads and file-level mutations.

use crate::error::SyncResult;
use crate::notifications::{messages, Template};
use crate::reload::Collection;
use crate::shared::Shared;
use crate::state::{LoadTicket, ResourceState};
use dovah_client::{ClientError, Url};
use dovah_types::{FavoriteToggle, FileId, FileQuery, MediaFile, Playlist, Tag};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a load response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the local collection.
    Applied,
    /// A newer load was issued, or the session ended, before it arrived.
    Stale,
}

/// Loads files, tags and playlists, and applies file mutations.
#[derive(Clone)]
pub struct ResourceStore {
    shared: Arc<Shared>,
}

impl ResourceStore {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    // ── Snapshots ────────────────────────────────────────────────

    pub async fn files(&self) -> Vec<MediaFile> {
        self.shared.state.read().await.files().to_vec()
    }

    pub async fn tags(&self) -> Vec<Tag> {
        self.shared.state.read().await.tags().to_vec()
    }

    pub async fn playlists(&self) -> Vec<Playlist> {
        self.shared.state.read().await.playlists().to_vec()
    }

    pub async fn active_file(&self) -> Option<MediaFile> {
        self.shared.state.read().await.active_file().cloned()
    }

    pub async fn find_file(&self, id: &FileId) -> Option<MediaFile> {
        self.shared.state.read().await.find_file(id).cloned()
    }

    // ── Loads ────────────────────────────────────────────────────

    /// Replaces the file list with `GET /files` for `query`.
    ///
    /// On failure the previous list is kept and a notification is queued.
    pub async fn load_files(&self, query: &FileQuery) -> SyncResult<LoadOutcome> {
        let ticket = self.begin(Collection::Files).await;
        let result = self.shared.api.list_files(&self.shared.ctx, query).await;
        match result {
            Ok(files) => {
                debug!("Loaded {} files", files.len());
                Ok(self.apply(&ticket, |state| state.replace_files(files)).await)
            }
            Err(e) => self.fail(&ticket, e, &messages::FILES_LOAD_FAILED).await,
        }
    }

    /// Replaces the tag catalog with `GET /tags`.
    pub async fn load_tags(&self) -> SyncResult<LoadOutcome> {
        let ticket = self.begin(Collection::Tags).await;
        let result = self.shared.api.list_tags(&self.shared.ctx).await;
        match result {
            Ok(tags) => {
                debug!("Loaded {} tags", tags.len());
                Ok(self.apply(&ticket, |state| state.replace_tags(tags)).await)
            }
            Err(e) => self.fail(&ticket, e, &messages::TAGS_LOAD_FAILED).await,
        }
    }

    /// Replaces the playlists with `GET /playlists`.
    pub async fn load_playlists(&self) -> SyncResult<LoadOutcome> {
        let ticket = self.begin(Collection::Playlists).await;
        let result = self.shared.api.list_playlists(&self.shared.ctx).await;
        match result {
            Ok(playlists) => {
                debug!("Loaded {} playlists", playlists.len());
                Ok(self
                    .apply(&ticket, |state| state.replace_playlists(playlists))
                    .await)
            }
            Err(e) => self.fail(&ticket, e, &messages::PLAYLISTS_LOAD_FAILED).await,
        }
    }

    async fn begin(&self, collection: Collection) -> LoadTicket {
        self.shared.state.write().await.begin_load(collection)
    }

    async fn apply(
        &self,
        ticket: &LoadTicket,
        update: impl FnOnce(&mut ResourceState),
    ) -> LoadOutcome {
        let mut state = self.shared.state.write().await;
        if !state.accepts(ticket, self.shared.policy) {
            debug!(
                "Discarding stale {:?} response (seq {})",
                ticket.collection, ticket.sequence
            );
            return LoadOutcome::Stale;
        }
        update(&mut state);
        LoadOutcome::Applied
    }

    /// Failures of superseded loads are dropped like their successes.
    async fn fail(
        &self,
        ticket: &LoadTicket,
        error: ClientError,
        template: &Template,
    ) -> SyncResult<LoadOutcome> {
        let current = self
            .shared
            .state
            .read()
            .await
            .accepts(ticket, self.shared.policy);
        if !current {
            debug!("Ignoring failure of stale {:?} load: {}", ticket.collection, error);
            return Ok(LoadOutcome::Stale);
        }
        warn!("Failed to load {:?}: {}", ticket.collection, error);
        self.shared.notify(template).await;
        Err(error.into())
    }

    // ── File mutations ───────────────────────────────────────────

    /// Flips the favorite flag server-side and mirrors the returned state
    /// onto the list entry and the open detail record.
    pub async fn toggle_favorite(&self, id: &FileId) -> SyncResult<FavoriteToggle> {
        let epoch = self.shared.epoch().await;
        match self.shared.api.toggle_favorite(&self.shared.ctx, id).await {
            Ok(toggle) => {
                let mut state = self.shared.state.write().await;
                if state.epoch() == epoch {
                    state.set_favorite(&toggle.id, toggle.favorite);
                }
                debug!("File {} favorite = {}", toggle.id, toggle.favorite);
                Ok(toggle)
            }
            Err(e) => {
                warn!("Failed to toggle favorite on {}: {}", id, e);
                self.shared.notify_in(epoch, &messages::FAVORITE_FAILED).await;
                Err(e.into())
            }
        }
    }

    /// Opens the detail record for a file, fetching it when it is not in
    /// the current list.
    pub async fn open_file(&self, id: &FileId) -> SyncResult<MediaFile> {
        if let Some(file) = self.find_file(id).await {
            self.shared
                .state
                .write()
                .await
                .set_active_file(Some(file.clone()));
            return Ok(file);
        }

        let epoch = self.shared.epoch().await;
        match self.shared.api.file(&self.shared.ctx, id).await {
            Ok(file) => {
                let mut state = self.shared.state.write().await;
                if state.epoch() == epoch {
                    state.set_active_file(Some(file.clone()));
                }
                Ok(file)
            }
            Err(e) => {
                warn!("Failed to fetch file {}: {}", id, e);
                self.shared.notify_in(epoch, &messages::DETAIL_FAILED).await;
                Err(e.into())
            }
        }
    }

    pub async fn close_file(&self) {
        self.shared.state.write().await.set_active_file(None);
    }

    /// Absolute stream URL for a file.
    ///
    /// Server-relative links are resolved against the API origin. Returns
    /// `None`, with a notification, when the file has no link or is unknown.
    pub async fn media_link(&self, id: &FileId) -> Option<Url> {
        let media_url = {
            let state = self.shared.state.read().await;
            state
                .find_file(id)
                .or_else(|| state.active_file().filter(|f| &f.id == id))
                .and_then(|f| f.media_url.clone())
        };
        let resolved = media_url
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match self.shared.api.base_url().join(raw.trim()) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Unusable media link {:?}: {}", raw, e);
                    None
                }
            });
        match resolved {
            Some(url) => {
                info!("Media link for {}: {}", id, url);
                Some(url)
            }
            None => {
                self.shared.notify(&messages::PREVIEW_UNAVAILABLE).await;
                None
            }
        }
    }
}
