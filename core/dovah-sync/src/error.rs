//! Error types for the sync layer.

use dovah_client::ClientError;
use dovah_types::{NotificationId, PlaylistId};
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Network failures are reported to the notification queue before they are
/// returned; callers may ignore them. Login failures are the exception and
/// are only returned.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Login rejected. Carries the server message or a fixed fallback.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Non-2xx response or transport failure.
    #[error("network error: {0}")]
    Network(#[from] ClientError),

    /// An item operation was attempted with no playlist selected.
    #[error("no playlist is selected")]
    NoActivePlaylist,

    /// Upload requested with no files.
    #[error("no files selected for upload")]
    EmptySelection,

    #[error("playlist name must not be empty")]
    EmptyPlaylistName,

    #[error("unknown playlist: {0}")]
    UnknownPlaylist(PlaylistId),

    /// Confirmation token that was never issued or was already used.
    #[error("no pending confirmation {0}")]
    UnknownConfirmation(NotificationId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// True for errors raised before any request was issued.
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            SyncError::NoActivePlaylist
                | SyncError::EmptySelection
                | SyncError::EmptyPlaylistName
                | SyncError::UnknownPlaylist(_)
                | SyncError::UnknownConfirmation(_)
        )
    }
}
