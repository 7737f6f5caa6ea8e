//! Out-of-order responses and responses that outlive the session.
//!
//! A scripted [`LibraryApi`] holds every list/upload response until the test
//! releases it, so arrival order is fully controlled.

use async_trait::async_trait;
use dovah_client::{ClientError, ClientResult, CredentialContext, LibraryApi, UploadFile, Url};
use dovah_sync::{Library, LibraryConfig, LoadOutcome, StaleResponsePolicy};
use dovah_types::{
    Credentials, FavoriteToggle, FileId, FileQuery, MediaFile, Playlist, PlaylistId, Session,
    Tag, UploadOptions, UploadResult, User,
};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

type Gate<T> = oneshot::Receiver<ClientResult<T>>;

struct ScriptedApi {
    base_url: Url,
    files: Mutex<VecDeque<Gate<Vec<MediaFile>>>>,
    uploads: Mutex<VecDeque<Gate<UploadResult>>>,
    started: mpsc::UnboundedSender<&'static str>,
}

impl ScriptedApi {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<&'static str>) {
        let (started, rx) = mpsc::unbounded_channel();
        let api = Arc::new(Self {
            base_url: Url::parse("http://scripted.test/api").unwrap(),
            files: Mutex::new(VecDeque::new()),
            uploads: Mutex::new(VecDeque::new()),
            started,
        });
        (api, rx)
    }

    async fn queue_files(&self) -> oneshot::Sender<ClientResult<Vec<MediaFile>>> {
        let (tx, rx) = oneshot::channel();
        self.files.lock().await.push_back(rx);
        tx
    }

    async fn queue_upload(&self) -> oneshot::Sender<ClientResult<UploadResult>> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().await.push_back(rx);
        tx
    }
}

fn unsupported<T>() -> ClientResult<T> {
    Err(ClientError::Config("not scripted".into()))
}

async fn release<T>(gate: Option<Gate<T>>) -> ClientResult<T> {
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ClientError::Config("gate dropped".into()))),
        None => unsupported(),
    }
}

#[async_trait]
impl LibraryApi for ScriptedApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn session(&self, _ctx: &CredentialContext) -> ClientResult<Session> {
        Ok(Session::anonymous())
    }

    async fn login(&self, _ctx: &CredentialContext, c: &Credentials) -> ClientResult<Session> {
        Ok(Session::authenticated(User::new(1u64, c.username.clone())))
    }

    async fn logout(&self, _ctx: &CredentialContext) -> ClientResult<()> {
        Ok(())
    }

    async fn list_files(
        &self,
        _ctx: &CredentialContext,
        _query: &FileQuery,
    ) -> ClientResult<Vec<MediaFile>> {
        let gate = self.files.lock().await.pop_front();
        let _ = self.started.send("files");
        release(gate).await
    }

    async fn file(&self, _ctx: &CredentialContext, _id: &FileId) -> ClientResult<MediaFile> {
        unsupported()
    }

    async fn toggle_favorite(
        &self,
        _ctx: &CredentialContext,
        _id: &FileId,
    ) -> ClientResult<FavoriteToggle> {
        unsupported()
    }

    async fn upload(
        &self,
        _ctx: &CredentialContext,
        _files: Vec<UploadFile>,
        _options: UploadOptions,
    ) -> ClientResult<UploadResult> {
        let gate = self.uploads.lock().await.pop_front();
        let _ = self.started.send("upload");
        release(gate).await
    }

    async fn list_tags(&self, _ctx: &CredentialContext) -> ClientResult<Vec<Tag>> {
        Ok(Vec::new())
    }

    async fn list_playlists(&self, _ctx: &CredentialContext) -> ClientResult<Vec<Playlist>> {
        Ok(Vec::new())
    }

    async fn create_playlist(&self, _ctx: &CredentialContext, _name: &str) -> ClientResult<Playlist> {
        unsupported()
    }

    async fn delete_playlist(&self, _ctx: &CredentialContext, _id: &PlaylistId) -> ClientResult<()> {
        unsupported()
    }

    async fn add_playlist_item(
        &self,
        _ctx: &CredentialContext,
        _playlist_id: &PlaylistId,
        _file_id: &FileId,
    ) -> ClientResult<Playlist> {
        unsupported()
    }

    async fn remove_playlist_item(
        &self,
        _ctx: &CredentialContext,
        _playlist_id: &PlaylistId,
        _file_id: &FileId,
    ) -> ClientResult<Playlist> {
        unsupported()
    }
}

fn named(id: u64, name: &str) -> MediaFile {
    MediaFile::new(id, name, "text/plain")
}

fn library(api: Arc<ScriptedApi>, policy: StaleResponsePolicy) -> Library {
    let config = LibraryConfig {
        stale_responses: policy,
        ..Default::default()
    };
    Library::new(api, config)
}

async fn names(library: &Library) -> Vec<String> {
    library
        .store()
        .files()
        .await
        .into_iter()
        .map(|f| f.name)
        .collect()
}

// ── Stale loads ─────────────────────────────────────────────────

#[tokio::test]
async fn older_response_arriving_last_is_discarded() {
    let (api, mut started) = ScriptedApi::new();
    let first = api.queue_files().await;
    let second = api.queue_files().await;
    let library = library(api, StaleResponsePolicy::DiscardStale);

    let store = library.store().clone();
    let a = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();
    let store = library.store().clone();
    let b = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();

    second.send(Ok(vec![named(2, "newer")])).unwrap();
    assert_eq!(b.await.unwrap().unwrap(), LoadOutcome::Applied);
    first.send(Ok(vec![named(1, "older")])).unwrap();
    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Stale);

    assert_eq!(names(&library).await, vec!["newer"]);
}

#[tokio::test]
async fn last_response_wins_when_configured() {
    let (api, mut started) = ScriptedApi::new();
    let first = api.queue_files().await;
    let second = api.queue_files().await;
    let library = library(api, StaleResponsePolicy::LastResponseWins);

    let store = library.store().clone();
    let a = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();
    let store = library.store().clone();
    let b = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();

    second.send(Ok(vec![named(2, "newer")])).unwrap();
    b.await.unwrap().unwrap();
    first.send(Ok(vec![named(1, "older")])).unwrap();
    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Applied);

    assert_eq!(names(&library).await, vec!["older"]);
}

#[tokio::test]
async fn stale_failure_is_silent() {
    let (api, mut started) = ScriptedApi::new();
    let first = api.queue_files().await;
    let second = api.queue_files().await;
    let library = library(api, StaleResponsePolicy::DiscardStale);

    let store = library.store().clone();
    let a = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();
    let store = library.store().clone();
    let b = tokio::spawn(async move { store.load_files(&FileQuery::default()).await });
    started.recv().await.unwrap();

    second.send(Ok(vec![named(2, "newer")])).unwrap();
    b.await.unwrap().unwrap();
    first
        .send(Err(ClientError::Config("late failure".into())))
        .unwrap();

    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Stale);
    assert!(library.notifications().await.is_empty());
    assert_eq!(names(&library).await, vec!["newer"]);
}

// ── Session boundary ────────────────────────────────────────────

#[tokio::test]
async fn load_in_flight_across_logout_is_dropped() {
    let (api, mut started) = ScriptedApi::new();
    let library = library(api.clone(), StaleResponsePolicy::LastResponseWins);
    let initial = api.queue_files().await;
    initial.send(Ok(vec![named(1, "mine")])).unwrap();
    library
        .login(&Credentials::new("ana", "secret"))
        .await
        .unwrap();
    started.recv().await.unwrap();
    assert_eq!(names(&library).await, vec!["mine"]);

    let pending = api.queue_files().await;
    let lib = library.clone();
    let refresh = tokio::spawn(async move { lib.refresh().await });
    started.recv().await.unwrap();

    library.logout().await.unwrap();
    pending.send(Ok(vec![named(9, "previous user")])).unwrap();
    refresh.await.unwrap().unwrap();

    assert!(library.store().files().await.is_empty());
}

#[tokio::test]
async fn upload_in_flight_across_logout_is_dropped() {
    let (api, mut started) = ScriptedApi::new();
    let library = library(api.clone(), StaleResponsePolicy::DiscardStale);
    api.queue_files().await.send(Ok(Vec::new())).unwrap();
    library
        .login(&Credentials::new("ana", "secret"))
        .await
        .unwrap();
    started.recv().await.unwrap();

    let gate = api.queue_upload().await;
    let lib = library.clone();
    let upload = tokio::spawn(async move {
        lib.upload(
            vec![UploadFile::new("a.txt", b"a".to_vec())],
            UploadOptions::default(),
        )
        .await
    });
    started.recv().await.unwrap();

    library.logout().await.unwrap();
    gate.send(Ok(UploadResult {
        uploaded: vec![named(5, "a.txt")],
        count: 1,
    }))
    .unwrap();
    upload.await.unwrap().unwrap();

    assert!(library.store().files().await.is_empty());
    let titles: Vec<_> = library
        .notifications()
        .await
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec![dovah_sync::messages::SIGNED_OUT.title]);
}
