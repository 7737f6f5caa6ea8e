//! Ordered queue of user-facing notifications.
//!
//! Entries stay until dismissed. Insertion order is preserved, and
//! dismissal removes at most one entry by id.

use dovah_types::{Notification, NotificationId, NotificationLevel};

/// A fixed title/body pair for an operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub title: &'static str,
    pub body: &'static str,
    pub level: NotificationLevel,
}

impl Template {
    const fn new(title: &'static str, body: &'static str, level: NotificationLevel) -> Self {
        Self { title, body, level }
    }
}

/// Messages for every operation outcome.
pub mod messages {
    use super::Template;
    use dovah_types::NotificationLevel::{Error, Info, Success, Warning};

    pub const WELCOME: Template = Template::new("Welcome", "Signed in successfully.", Success);
    pub const LOGIN_FALLBACK: &str =
        "We could not verify your credentials, please check them and try again.";
    pub const INCOMPLETE_CREDENTIALS: &str = "Incomplete credentials.";
    pub const SIGNED_OUT: Template =
        Template::new("Signed out", "You have left DovahCloud successfully.", Info);
    pub const LOGOUT_FAILED: Template =
        Template::new("Warning", "Could not sign out properly.", Warning);

    pub const FILES_LOAD_FAILED: Template =
        Template::new("Error", "The files could not be loaded.", Error);
    pub const TAGS_LOAD_FAILED: Template =
        Template::new("Warning", "The tags could not be loaded.", Warning);
    pub const PLAYLISTS_LOAD_FAILED: Template =
        Template::new("Warning", "The playlists could not be synchronized.", Warning);
    pub const FAVORITE_FAILED: Template =
        Template::new("Warning", "The favorite could not be updated.", Warning);
    pub const DETAIL_FAILED: Template =
        Template::new("Warning", "The file details could not be loaded.", Warning);
    pub const PREVIEW_UNAVAILABLE: Template = Template::new(
        "Preview unavailable",
        "This file has no direct stream.",
        Info,
    );

    pub const UPLOAD_TITLE: &str = "Upload complete";
    pub const UPLOAD_FAILED: Template =
        Template::new("Upload failed", "The files could not be uploaded.", Error);
    pub const EMPTY_UPLOAD: Template =
        Template::new("Nothing to upload", "Select at least one file first.", Info);

    pub const NO_ACTIVE_PLAYLIST: Template = Template::new(
        "Select a playlist",
        "Choose a playlist in the sidebar to add content.",
        Info,
    );
    pub const PLAYLIST_CREATED: Template = Template::new(
        "Playlist created",
        "Organize your files with this new list.",
        Success,
    );
    pub const CREATE_FAILED: Template =
        Template::new("Warning", "The playlist could not be created.", Warning);
    pub const CONFIRM_DELETE_TITLE: &str = "Delete playlist?";
    pub const PLAYLIST_DELETED: Template = Template::new(
        "Playlist deleted",
        "The list is no longer available.",
        Success,
    );
    pub const DELETE_FAILED: Template =
        Template::new("Warning", "The playlist could not be deleted.", Warning);
    pub const ITEM_ADDED_TITLE: &str = "Playlist updated";
    pub const ADD_FAILED: Template = Template::new(
        "Warning",
        "The file could not be added to the playlist.",
        Warning,
    );
    pub const ITEM_REMOVED_TITLE: &str = "Item removed";
    pub const REMOVE_FAILED: Template = Template::new(
        "Warning",
        "The file could not be removed from the playlist.",
        Warning,
    );
}

/// FIFO list of pending notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
    limit: Option<usize>,
}

impl NotificationQueue {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue that evicts its oldest entry beyond `limit`.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    /// Appends an info notification and returns its id.
    pub fn push(&mut self, title: impl Into<String>, body: impl Into<String>) -> NotificationId {
        self.push_notification(Notification::new(title, body))
    }

    /// Appends a notification built from a template.
    pub fn push_template(&mut self, template: &Template) -> NotificationId {
        self.push_notification(
            Notification::new(template.title, template.body).with_level(template.level),
        )
    }

    /// Appends a prepared notification.
    pub fn push_notification(&mut self, notification: Notification) -> NotificationId {
        let id = notification.id;
        self.entries.push(notification);
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let overflow = self.entries.len() - limit;
                self.entries.drain(..overflow);
            }
        }
        id
    }

    /// Removes the entry with this id. Returns false if none was queued.
    pub fn dismiss(&mut self, id: &NotificationId) -> bool {
        match self.entries.iter().position(|n| &n.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| &n.id == id)
    }

    /// Pending notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns every pending notification.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}
