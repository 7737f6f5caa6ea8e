//! reqwest implementation of [`LibraryApi`].

use crate::api::LibraryApi;
use crate::config::ClientConfig;
use crate::credentials::CredentialContext;
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::upload::UploadFile;
use async_trait::async_trait;
use dovah_types::{
    Credentials, FavoriteToggle, FileId, FileQuery, MediaFile, Playlist, PlaylistId, Session, Tag,
    UploadOptions, UploadResult,
};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for the library API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    /// `base_url` as text without a trailing slash.
    base: String,
}

impl HttpClient {
    /// Creates a client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Attaches credentials, sends, absorbs cookies and rejects non-2xx.
    async fn send(&self, ctx: &CredentialContext, request: RequestBuilder) -> ClientResult<Response> {
        let request = match ctx.cookie_header().await {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };

        let response = request.send().await?;
        ctx.absorb(response.headers()).await;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            debug!("Request rejected with {}: {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        ctx: &CredentialContext,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(ctx, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_error_body(response: Response) -> ErrorBody {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        return ErrorBody::Empty;
    }
    if is_json {
        if let Ok(value) = serde_json::from_str(&text) {
            return ErrorBody::Json(value);
        }
    }
    ErrorBody::Text(text)
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl LibraryApi for HttpClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn session(&self, ctx: &CredentialContext) -> ClientResult<Session> {
        debug!("Probing session");
        self.send_json(ctx, self.client.get(self.url("/session"))).await
    }

    async fn login(
        &self,
        ctx: &CredentialContext,
        credentials: &Credentials,
    ) -> ClientResult<Session> {
        debug!("Logging in as {}", credentials.username);
        let request = self.client.post(self.url("/login")).json(credentials);
        let session: Session = self.send_json(ctx, request).await?;
        if session.is_authenticated() {
            info!("Authenticated as {}", credentials.username);
        }
        Ok(session)
    }

    async fn logout(&self, ctx: &CredentialContext) -> ClientResult<()> {
        let request = self
            .client
            .post(self.url("/logout"))
            .json(&serde_json::json!({}));
        self.send(ctx, request).await?;
        info!("Logged out");
        Ok(())
    }

    async fn list_files(
        &self,
        ctx: &CredentialContext,
        query: &FileQuery,
    ) -> ClientResult<Vec<MediaFile>> {
        let pairs = query.to_pairs();
        debug!("Listing files with {:?}", pairs);
        let mut request = self.client.get(self.url("/files"));
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        self.send_json(ctx, request).await
    }

    async fn file(&self, ctx: &CredentialContext, id: &FileId) -> ClientResult<MediaFile> {
        let path = format!("/files/{}", segment(id.as_str()));
        self.send_json(ctx, self.client.get(self.url(&path))).await
    }

    async fn toggle_favorite(
        &self,
        ctx: &CredentialContext,
        id: &FileId,
    ) -> ClientResult<FavoriteToggle> {
        let path = format!("/files/{}/favorite", segment(id.as_str()));
        let request = self.client.post(self.url(&path)).json(&serde_json::json!({}));
        let toggle: FavoriteToggle = self.send_json(ctx, request).await?;
        debug!("File {} favorite is now {}", toggle.id, toggle.favorite);
        Ok(toggle)
    }

    async fn upload(
        &self,
        ctx: &CredentialContext,
        files: Vec<UploadFile>,
        options: UploadOptions,
    ) -> ClientResult<UploadResult> {
        let total = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part("files", part);
        }
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }

        debug!("Uploading {} file(s) with {:?}", total, options);
        let request = self.client.post(self.url("/files")).multipart(form);
        let result: UploadResult = self.send_json(ctx, request).await?;
        info!("Uploaded {} file(s)", result.count);
        Ok(result)
    }

    async fn list_tags(&self, ctx: &CredentialContext) -> ClientResult<Vec<Tag>> {
        self.send_json(ctx, self.client.get(self.url("/tags"))).await
    }

    async fn list_playlists(&self, ctx: &CredentialContext) -> ClientResult<Vec<Playlist>> {
        self.send_json(ctx, self.client.get(self.url("/playlists"))).await
    }

    async fn create_playlist(&self, ctx: &CredentialContext, name: &str) -> ClientResult<Playlist> {
        let request = self
            .client
            .post(self.url("/playlists"))
            .json(&serde_json::json!({ "name": name }));
        let playlist: Playlist = self.send_json(ctx, request).await?;
        info!("Created playlist {} ({})", playlist.name, playlist.id);
        Ok(playlist)
    }

    async fn delete_playlist(&self, ctx: &CredentialContext, id: &PlaylistId) -> ClientResult<()> {
        let path = format!("/playlists/{}", segment(id.as_str()));
        self.send(ctx, self.client.delete(self.url(&path))).await?;
        info!("Deleted playlist {}", id);
        Ok(())
    }

    async fn add_playlist_item(
        &self,
        ctx: &CredentialContext,
        playlist_id: &PlaylistId,
        file_id: &FileId,
    ) -> ClientResult<Playlist> {
        let path = format!("/playlists/{}/items", segment(playlist_id.as_str()));
        let request = self
            .client
            .post(self.url(&path))
            .json(&serde_json::json!({ "fileId": file_id }));
        self.send_json(ctx, request).await
    }

    async fn remove_playlist_item(
        &self,
        ctx: &CredentialContext,
        playlist_id: &PlaylistId,
        file_id: &FileId,
    ) -> ClientResult<Playlist> {
        let path = format!(
            "/playlists/{}/items/{}",
            segment(playlist_id.as_str()),
            segment(file_id.as_str())
        );
        self.send_json(ctx, self.client.delete(self.url(&path))).await
    }
}
