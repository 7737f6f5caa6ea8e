//! The library API surface consumed by the sync engine.
//!
//! [`HttpClient`](crate::HttpClient) implements it over reqwest; tests and
//! alternative transports can provide their own implementation.

use crate::credentials::CredentialContext;
use crate::error::ClientResult;
use crate::upload::UploadFile;
use async_trait::async_trait;
use dovah_types::{
    Credentials, FavoriteToggle, FileId, FileQuery, MediaFile, Playlist, PlaylistId, Session, Tag,
    UploadOptions, UploadResult,
};
use reqwest::Url;

/// Typed access to every backend endpoint.
///
/// Every call receives the credential context explicitly. Implementations
/// must turn non-2xx responses into [`ClientError::Status`](crate::ClientError::Status).
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Base URL endpoint paths are appended to.
    fn base_url(&self) -> &Url;

    /// `GET /session`.
    async fn session(&self, ctx: &CredentialContext) -> ClientResult<Session>;

    /// `POST /login`.
    async fn login(&self, ctx: &CredentialContext, credentials: &Credentials)
    -> ClientResult<Session>;

    /// `POST /logout`.
    async fn logout(&self, ctx: &CredentialContext) -> ClientResult<()>;

    /// `GET /files` with server-side filters.
    async fn list_files(&self, ctx: &CredentialContext, query: &FileQuery)
    -> ClientResult<Vec<MediaFile>>;

    /// `GET /files/{id}`.
    async fn file(&self, ctx: &CredentialContext, id: &FileId) -> ClientResult<MediaFile>;

    /// `POST /files/{id}/favorite`. The server decides the new state.
    async fn toggle_favorite(&self, ctx: &CredentialContext, id: &FileId)
    -> ClientResult<FavoriteToggle>;

    /// `POST /files` as one multipart submission.
    async fn upload(
        &self,
        ctx: &CredentialContext,
        files: Vec<UploadFile>,
        options: UploadOptions,
    ) -> ClientResult<UploadResult>;

    /// `GET /tags`.
    async fn list_tags(&self, ctx: &CredentialContext) -> ClientResult<Vec<Tag>>;

    /// `GET /playlists`.
    async fn list_playlists(&self, ctx: &CredentialContext) -> ClientResult<Vec<Playlist>>;

    /// `POST /playlists`.
    async fn create_playlist(&self, ctx: &CredentialContext, name: &str) -> ClientResult<Playlist>;

    /// `DELETE /playlists/{id}`.
    async fn delete_playlist(&self, ctx: &CredentialContext, id: &PlaylistId) -> ClientResult<()>;

    /// `POST /playlists/{id}/items`.
    async fn add_playlist_item(
        &self,
        ctx: &CredentialContext,
        playlist_id: &PlaylistId,
        file_id: &FileId,
    ) -> ClientResult<Playlist>;

    /// `DELETE /playlists/{id}/items/{fileId}`.
    async fn remove_playlist_item(
        &self,
        ctx: &CredentialContext,
        playlist_id: &PlaylistId,
        file_id: &FileId,
    ) -> ClientResult<Playlist>;
}
