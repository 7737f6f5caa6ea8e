//! The composition root.
//!
//! A [`Library`] owns the shared resource state, the notification queue and
//! the credential context, and hands the same handles to each service. It
//! also owns the filter criteria and turns criteria changes into reloads
//! through the [rule table](crate::reload::RULES).

use crate::config::LibraryConfig;
use crate::error::SyncResult;
use crate::filter::{self, LibraryStats};
use crate::notifications::messages;
use crate::playlists::PlaylistController;
use crate::reload::{self, ReloadPlan, Trigger};
use crate::session::SessionManager;
use crate::shared::Shared;
use crate::store::ResourceStore;
use crate::upload::UploadCoordinator;
use dovah_client::{CredentialContext, HttpClient, LibraryApi, UploadFile, Url};
use dovah_types::{
    Credentials, FavoriteToggle, FileId, FilterCriteria, MediaFile, MediaKind, Notification,
    NotificationId, Session, SortOrder, TagId, UploadOptions, UploadResult, User,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Client-side view of one user's media library.
#[derive(Clone)]
pub struct Library {
    config: LibraryConfig,
    shared: Arc<Shared>,
    criteria: Arc<RwLock<FilterCriteria>>,
    session: SessionManager,
    store: ResourceStore,
    playlists: PlaylistController,
    uploads: UploadCoordinator,
}

impl Library {
    /// Builds a library over any [`LibraryApi`] implementation.
    pub fn new(api: Arc<dyn LibraryApi>, config: LibraryConfig) -> Self {
        let shared = Arc::new(Shared::new(
            api,
            config.stale_responses,
            config.notification_limit,
        ));
        Self {
            session: SessionManager::new(shared.clone()),
            store: ResourceStore::new(shared.clone()),
            playlists: PlaylistController::new(shared.clone()),
            uploads: UploadCoordinator::new(shared.clone()),
            criteria: Arc::new(RwLock::new(FilterCriteria::default())),
            shared,
            config,
        }
    }

    /// Builds a library talking HTTP to `config.client.base_url`.
    pub fn connect(config: LibraryConfig) -> SyncResult<Self> {
        let client = HttpClient::new(&config.client)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn playlists(&self) -> &PlaylistController {
        &self.playlists
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    /// Cookies replayed on every request.
    pub fn credentials(&self) -> &CredentialContext {
        &self.shared.ctx
    }

    pub fn base_url(&self) -> &Url {
        self.shared.api.base_url()
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Probes the server session and, when it is live, loads everything.
    pub async fn start(&self) -> Session {
        let session = self.session.probe().await;
        if session.is_authenticated() {
            self.run_triggers(&[Trigger::SessionStarted]).await;
        }
        session
    }

    /// Signs in, then loads files, tags and playlists.
    ///
    /// Load failures after a successful login are reported through the
    /// notification queue and do not fail the login.
    ///
    /// A rejected login leaves the session anonymous, so anything loaded for
    /// a previous user is dropped as on logout. Queued notifications stay.
    pub async fn login(&self, credentials: &Credentials) -> SyncResult<User> {
        match self.session.login(credentials).await {
            Ok(user) => {
                self.run_triggers(&[Trigger::SessionStarted]).await;
                Ok(user)
            }
            Err(e) => {
                self.reset_session_scope().await;
                Err(e)
            }
        }
    }

    /// Signs out and resets every piece of session-scoped state.
    ///
    /// Collections, the open file, the playlist selection, pending delete
    /// confirmations, the tag filter and all queued notifications are
    /// cleared, then a single "signed out" notification is queued. Responses
    /// to requests issued before this point are ignored.
    pub async fn logout(&self) -> SyncResult<()> {
        self.session.logout().await?;
        self.reset_session_scope().await;
        let mut queue = self.shared.notifications.write().await;
        queue.clear();
        queue.push_template(&messages::SIGNED_OUT);
        Ok(())
    }

    async fn reset_session_scope(&self) {
        self.shared.state.write().await.reset();
        self.playlists.reset().await;
        self.criteria.write().await.tag_id = None;
    }

    // ── Filter criteria ──────────────────────────────────────────

    pub async fn criteria(&self) -> FilterCriteria {
        self.criteria.read().await.clone()
    }

    /// Applies `change` to the criteria and reloads what it invalidated.
    ///
    /// Reloads only run while signed in. Returns the plan derived from the
    /// change, whether or not it ran.
    pub async fn update_criteria(
        &self,
        change: impl FnOnce(&mut FilterCriteria),
    ) -> SyncResult<ReloadPlan> {
        let triggers = {
            let mut criteria = self.criteria.write().await;
            let before = criteria.clone();
            change(&mut criteria);
            criteria_triggers(&before, &criteria)
        };
        let plan = reload::plan(&triggers);
        self.execute(plan).await?;
        Ok(plan)
    }

    pub async fn set_search(&self, text: impl Into<String>) -> SyncResult<ReloadPlan> {
        let text = text.into();
        self.update_criteria(|c| c.search_text = text).await
    }

    pub async fn set_favorites_only(&self, on: bool) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.favorites_only = on).await
    }

    pub async fn toggle_favorites_only(&self) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.favorites_only = !c.favorites_only)
            .await
    }

    pub async fn set_mime_type_prefix(&self, prefix: Option<String>) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.mime_type_prefix = prefix).await
    }

    pub async fn set_kind(&self, kind: MediaKind) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.set_kind(kind)).await
    }

    pub async fn set_order(&self, order: SortOrder) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.order = order).await
    }

    /// Selects the tag used for local filtering. Never reloads.
    pub async fn select_tag(&self, tag: Option<TagId>) -> SyncResult<ReloadPlan> {
        self.update_criteria(|c| c.tag_id = tag).await
    }

    // ── Reloads ──────────────────────────────────────────────────

    /// Reloads files and playlists.
    pub async fn refresh(&self) -> SyncResult<()> {
        self.execute(reload::plan(&[Trigger::Refresh])).await
    }

    /// Runs [`refresh`](Self::refresh) on the runtime without waiting.
    pub fn spawn_refresh(&self) -> JoinHandle<SyncResult<()>> {
        let library = self.clone();
        tokio::spawn(async move { library.refresh().await })
    }

    async fn run_triggers(&self, triggers: &[Trigger]) {
        if let Err(e) = self.execute(reload::plan(triggers)).await {
            debug!("Reload after {:?} incomplete: {}", triggers, e);
        }
    }

    /// Issues the planned loads concurrently. Returns the first failure.
    async fn execute(&self, plan: ReloadPlan) -> SyncResult<()> {
        if plan.is_empty() {
            return Ok(());
        }
        if !self.session.is_authenticated().await {
            debug!("Skipping reload while signed out");
            return Ok(());
        }
        debug!("Reloading {:?}", plan);

        let query = self.criteria.read().await.file_query();
        let files = async {
            if plan.files {
                self.store.load_files(&query).await?;
            }
            SyncResult::Ok(())
        };
        let tags = async {
            if plan.tags {
                self.store.load_tags().await?;
            }
            SyncResult::Ok(())
        };
        let playlists = async {
            if plan.playlists {
                self.store.load_playlists().await?;
            }
            SyncResult::Ok(())
        };
        let (files, tags, playlists) = tokio::join!(files, tags, playlists);
        files.and(tags).and(playlists)
    }

    // ── Views ────────────────────────────────────────────────────

    /// Files that pass the local tag filter.
    pub async fn visible_files(&self) -> Vec<MediaFile> {
        let tag_id = self.criteria.read().await.tag_id.clone();
        let state = self.shared.state.read().await;
        filter::visible_files(state.files(), tag_id.as_ref(), state.tags()).into_owned()
    }

    /// Counters over every loaded file, ignoring the tag filter.
    pub async fn stats(&self) -> LibraryStats {
        filter::stats(self.shared.state.read().await.files())
    }

    // ── Delegated operations ─────────────────────────────────────

    pub async fn toggle_favorite(&self, id: &FileId) -> SyncResult<FavoriteToggle> {
        self.store.toggle_favorite(id).await
    }

    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        options: UploadOptions,
    ) -> SyncResult<UploadResult> {
        self.uploads.upload(files, options).await
    }

    // ── Notifications ────────────────────────────────────────────

    /// Pending notifications, oldest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.shared.notifications.read().await.iter().cloned().collect()
    }

    /// Removes one notification. Returns false if it was not queued.
    pub async fn dismiss(&self, id: &NotificationId) -> bool {
        self.shared.notifications.write().await.dismiss(id)
    }

    /// Removes and returns every pending notification.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        let drained = self.shared.notifications.write().await.drain();
        if !drained.is_empty() {
            info!("Delivering {} notification(s)", drained.len());
        }
        drained
    }
}

/// Triggers implied by a criteria change.
fn criteria_triggers(before: &FilterCriteria, after: &FilterCriteria) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if before.search_text.trim() != after.search_text.trim() {
        triggers.push(Trigger::SearchChanged);
    }
    if before.favorites_only != after.favorites_only {
        triggers.push(Trigger::FavoritesOnlyChanged);
    }
    if before.mime_type_prefix != after.mime_type_prefix {
        triggers.push(Trigger::MimeTypeChanged);
    }
    if before.order != after.order {
        triggers.push(Trigger::OrderChanged);
    }
    if before.tag_id != after.tag_id {
        triggers.push(Trigger::TagChanged);
    }
    triggers
}
