//! Playlist selection and mutations.
//!
//! One playlist at most is active. Item operations target it, and deletes
//! go through a confirmation that is queued as a notification: the
//! notification id doubles as the confirmation token, so a front end that
//! renders the queue can offer confirm/cancel next to the message.

use crate::error::{SyncError, SyncResult};
use crate::filter;
use crate::notifications::messages;
use crate::shared::Shared;
use dovah_types::{FileId, NotificationId, NotificationLevel, Playlist, PlaylistId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Selection {
    active: Option<PlaylistId>,
    pending_deletes: HashMap<NotificationId, PlaylistId>,
}

/// Owns the active-playlist selection and performs playlist mutations.
#[derive(Clone)]
pub struct PlaylistController {
    shared: Arc<Shared>,
    selection: Arc<RwLock<Selection>>,
}

impl PlaylistController {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            selection: Arc::new(RwLock::new(Selection::default())),
        }
    }

    // ── Selection ────────────────────────────────────────────────

    pub async fn active_id(&self) -> Option<PlaylistId> {
        self.selection.read().await.active.clone()
    }

    /// The selected playlist, if it is still in the store.
    pub async fn active_playlist(&self) -> Option<Playlist> {
        let active = self.active_id().await;
        let state = self.shared.state.read().await;
        filter::active_playlist(state.playlists(), active.as_ref()).cloned()
    }

    /// Makes `id` the active playlist. It must be a loaded playlist.
    pub async fn select(&self, id: &PlaylistId) -> SyncResult<()> {
        if self.shared.state.read().await.find_playlist(id).is_none() {
            return Err(SyncError::UnknownPlaylist(id.clone()));
        }
        self.selection.write().await.active = Some(id.clone());
        debug!("Selected playlist {}", id);
        Ok(())
    }

    pub async fn deselect(&self) {
        self.selection.write().await.active = None;
    }

    /// Drops the selection and every pending confirmation.
    /// Clears the selection and withdraws every pending delete prompt.
    pub(crate) async fn reset(&self) {
        let tokens: Vec<NotificationId> = {
            let mut selection = self.selection.write().await;
            selection.active = None;
            selection.pending_deletes.drain().map(|(token, _)| token).collect()
        };
        let mut queue = self.shared.notifications.write().await;
        for token in &tokens {
            queue.dismiss(token);
        }
    }

    // ── Create / delete ──────────────────────────────────────────

    /// Creates a playlist, puts it first, and selects it.
    pub async fn create(&self, name: &str) -> SyncResult<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SyncError::EmptyPlaylistName);
        }

        let epoch = self.shared.epoch().await;
        let created = match self.shared.api.create_playlist(&self.shared.ctx, name).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Failed to create playlist {:?}: {}", name, e);
                self.shared.notify_in(epoch, &messages::CREATE_FAILED).await;
                return Err(e.into());
            }
        };

        {
            let mut state = self.shared.state.write().await;
            if state.epoch() != epoch {
                return Ok(created);
            }
            state.prepend_playlist(created.clone());
        }
        self.selection.write().await.active = Some(created.id.clone());
        info!("Created playlist {} ({})", created.name, created.id);
        self.shared.notify(&messages::PLAYLIST_CREATED).await;
        Ok(created)
    }

    /// Queues a confirmation for deleting `id` and returns its token.
    ///
    /// Nothing is sent until [`confirm`](Self::confirm) is called with it.
    pub async fn request_delete(&self, id: &PlaylistId) -> SyncResult<NotificationId> {
        let name = match self.shared.state.read().await.find_playlist(id) {
            Some(playlist) => playlist.name.clone(),
            None => return Err(SyncError::UnknownPlaylist(id.clone())),
        };
        let token = self
            .shared
            .notify_text(
                messages::CONFIRM_DELETE_TITLE,
                format!("\"{name}\" will be removed permanently."),
                NotificationLevel::Warning,
            )
            .await;
        self.selection
            .write()
            .await
            .pending_deletes
            .insert(token, id.clone());
        Ok(token)
    }

    /// Deletes the playlist a confirmation token was issued for.
    pub async fn confirm(&self, token: &NotificationId) -> SyncResult<()> {
        let id = self
            .selection
            .write()
            .await
            .pending_deletes
            .remove(token)
            .ok_or(SyncError::UnknownConfirmation(*token))?;
        self.shared.notifications.write().await.dismiss(token);

        let epoch = self.shared.epoch().await;
        if let Err(e) = self.shared.api.delete_playlist(&self.shared.ctx, &id).await {
            warn!("Failed to delete playlist {}: {}", id, e);
            self.shared.notify_in(epoch, &messages::DELETE_FAILED).await;
            return Err(e.into());
        }

        {
            let mut state = self.shared.state.write().await;
            if state.epoch() != epoch {
                return Ok(());
            }
            state.remove_playlist(&id);
        }
        {
            let mut selection = self.selection.write().await;
            if selection.active.as_ref() == Some(&id) {
                selection.active = None;
            }
        }
        info!("Deleted playlist {}", id);
        self.shared.notify(&messages::PLAYLIST_DELETED).await;
        Ok(())
    }

    /// Drops a pending confirmation. Returns false if the token is unknown.
    pub async fn cancel(&self, token: &NotificationId) -> bool {
        let removed = self
            .selection
            .write()
            .await
            .pending_deletes
            .remove(token)
            .is_some();
        if removed {
            self.shared.notifications.write().await.dismiss(token);
        }
        removed
    }

    pub async fn pending_confirmations(&self) -> Vec<(NotificationId, PlaylistId)> {
        self.selection
            .read()
            .await
            .pending_deletes
            .iter()
            .map(|(token, id)| (*token, id.clone()))
            .collect()
    }

    // ── Items ────────────────────────────────────────────────────

    /// Adds a file to the active playlist.
    ///
    /// Without an active playlist a hint is queued and nothing is sent.
    pub async fn add_item(&self, file_id: &FileId) -> SyncResult<Playlist> {
        let Some(playlist_id) = self.active_id().await else {
            self.shared.notify(&messages::NO_ACTIVE_PLAYLIST).await;
            return Err(SyncError::NoActivePlaylist);
        };

        let epoch = self.shared.epoch().await;
        let result = self
            .shared
            .api
            .add_playlist_item(&self.shared.ctx, &playlist_id, file_id)
            .await;
        match result {
            Ok(updated) => {
                if self.apply(epoch, updated.clone()).await {
                    let name = self.file_name(file_id).await;
                    self.shared
                        .notify_text(
                            messages::ITEM_ADDED_TITLE,
                            format!("{name} is now part of the list."),
                            NotificationLevel::Success,
                        )
                        .await;
                }
                Ok(updated)
            }
            Err(e) => {
                warn!("Failed to add {} to playlist {}: {}", file_id, playlist_id, e);
                self.shared.notify_in(epoch, &messages::ADD_FAILED).await;
                Err(e.into())
            }
        }
    }

    /// Removes a file from the active playlist. Does nothing without one.
    pub async fn remove_item(&self, file_id: &FileId) -> SyncResult<Option<Playlist>> {
        let Some(playlist_id) = self.active_id().await else {
            return Ok(None);
        };

        let epoch = self.shared.epoch().await;
        let name = self.file_name(file_id).await;
        let result = self
            .shared
            .api
            .remove_playlist_item(&self.shared.ctx, &playlist_id, file_id)
            .await;
        match result {
            Ok(updated) => {
                if self.apply(epoch, updated.clone()).await {
                    self.shared
                        .notify_text(
                            messages::ITEM_REMOVED_TITLE,
                            format!("{name} no longer belongs to the playlist."),
                            NotificationLevel::Success,
                        )
                        .await;
                }
                Ok(Some(updated))
            }
            Err(e) => {
                warn!(
                    "Failed to remove {} from playlist {}: {}",
                    file_id, playlist_id, e
                );
                self.shared.notify_in(epoch, &messages::REMOVE_FAILED).await;
                Err(e.into())
            }
        }
    }

    /// Swaps in the server's copy of a playlist if the session is unchanged.
    async fn apply(&self, epoch: u64, updated: Playlist) -> bool {
        let mut state = self.shared.state.write().await;
        if state.epoch() != epoch {
            return false;
        }
        state.replace_playlist(updated);
        true
    }

    /// Display name for a file: the listed name, else a playlist item's
    /// name, else the id.
    async fn file_name(&self, file_id: &FileId) -> String {
        let state = self.shared.state.read().await;
        state
            .find_file(file_id)
            .or_else(|| {
                state
                    .playlists()
                    .iter()
                    .flat_map(|p| p.items.iter())
                    .find(|item| &item.id == file_id)
            })
            .map(|file| file.name.clone())
            .unwrap_or_else(|| file_id.to_string())
    }
}
