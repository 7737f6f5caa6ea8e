//! Core type definitions for the DovahCloud client.
//!
//! This crate defines the types shared by the network client and the sync
//! engine:
//! - Resource identifiers (opaque, server-assigned)
//! - Wire models for sessions, files, tags and playlists
//! - Client-side notifications
//! - Filter criteria and the server-side file query derived from them
//!
//! Nothing here performs I/O.

mod ids;
mod media;
mod notification;
mod query;
mod session;
mod timestamp;

pub use ids::{FileId, PlaylistId, TagId, UserId};
pub use media::{FavoriteToggle, MediaFile, Playlist, Tag, UploadOptions, UploadResult};
pub use notification::{Notification, NotificationId, NotificationLevel};
pub use query::{FileQuery, FilterCriteria, MediaKind, SortOrder};
pub use session::{Credentials, Session, User};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),
}
