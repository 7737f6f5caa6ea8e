use dovah_types::{
    Credentials, FavoriteToggle, FileId, MediaFile, MediaKind, Playlist, Session, Tag,
    UploadOptions, UploadResult, User,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn server_file() -> serde_json::Value {
    json!({
        "id": 5,
        "name": "holiday.mp4",
        "description": "",
        "mimeType": "video/mp4",
        "size": 1048576,
        "uploadedAt": "2024-05-01T10:22:03.120394",
        "isPrivate": false,
        "isFavorite": true,
        "thumbnailUrl": "/media/thumb_holiday.mp4",
        "mediaUrl": "/media/holiday.mp4",
        "tags": ["travel", "family"]
    })
}

// ── MediaFile ─────────────────────────────────────────────────────

#[test]
fn media_file_from_server_payload() {
    let file: MediaFile = serde_json::from_value(server_file()).unwrap();
    assert_eq!(file.id, FileId::from("5"));
    assert_eq!(file.mime_type, "video/mp4");
    assert_eq!(file.size, 1_048_576);
    assert!(file.is_favorite);
    assert_eq!(file.tags, vec!["travel".to_string(), "family".to_string()]);
    assert_eq!(file.media_url.as_deref(), Some("/media/holiday.mp4"));
    assert!(file.uploaded_at.is_some());
}

#[test]
fn media_file_tolerates_null_urls_and_date() {
    let mut raw = server_file();
    raw["mediaUrl"] = serde_json::Value::Null;
    raw["thumbnailUrl"] = serde_json::Value::Null;
    raw["uploadedAt"] = serde_json::Value::Null;
    let file: MediaFile = serde_json::from_value(raw).unwrap();
    assert!(file.media_url.is_none());
    assert!(file.thumbnail_url.is_none());
    assert!(file.uploaded_at.is_none());
}

#[test]
fn media_file_reads_null_name_and_type_as_empty() {
    let mut raw = server_file();
    raw["name"] = serde_json::Value::Null;
    raw["mimeType"] = serde_json::Value::Null;
    raw["description"] = serde_json::Value::Null;
    let file: MediaFile = serde_json::from_value(raw).unwrap();
    assert_eq!(file.name, "");
    assert_eq!(file.mime_type, "");
    assert_eq!(file.description, "");
    assert!(file.is_kind(MediaKind::All));
    assert!(!file.is_kind(MediaKind::Video));
}

#[test]
fn one_untyped_row_does_not_break_the_list() {
    let mut legacy = server_file();
    legacy["id"] = json!(6);
    legacy["mimeType"] = serde_json::Value::Null;
    let files: Vec<MediaFile> = serde_json::from_value(json!([server_file(), legacy])).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].mime_type, "");
}

#[test]
fn media_file_has_tag_is_exact() {
    let file: MediaFile = serde_json::from_value(server_file()).unwrap();
    assert!(file.has_tag("travel"));
    assert!(!file.has_tag("Travel"));
    assert!(!file.has_tag("trav"));
}

#[test]
fn media_file_kind_matching() {
    let file = MediaFile::new("1", "a.png", "image/png");
    assert!(file.is_kind(MediaKind::All));
    assert!(file.is_kind(MediaKind::Image));
    assert!(!file.is_kind(MediaKind::Video));
}

// ── Tag / Playlist ────────────────────────────────────────────────

#[test]
fn tag_from_server_payload() {
    let tag: Tag = serde_json::from_value(json!({"id": 3, "name": "travel", "isPrivate": true}))
        .unwrap();
    assert_eq!(tag.name, "travel");
    assert!(tag.is_private);
}

#[test]
fn playlist_from_server_payload() {
    let playlist: Playlist = serde_json::from_value(json!({
        "id": 9,
        "name": "Road trip",
        "createdAt": "2024-06-01T08:00:00",
        "items": [server_file()]
    }))
    .unwrap();
    assert_eq!(playlist.name, "Road trip");
    assert!(playlist.contains(&FileId::from("5")));
    assert!(!playlist.contains(&FileId::from("6")));
}

#[test]
fn playlist_without_items_field() {
    let playlist: Playlist =
        serde_json::from_value(json!({"id": 1, "name": "Empty"})).unwrap();
    assert!(playlist.items.is_empty());
}

// ── Session ───────────────────────────────────────────────────────

#[test]
fn anonymous_session_payload() {
    let session: Session = serde_json::from_value(json!({"authenticated": false})).unwrap();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[test]
fn authenticated_session_payload() {
    let session: Session = serde_json::from_value(json!({
        "authenticated": true,
        "user": {"id": 1, "username": "ana", "isAdmin": false, "hasPrivateAccess": true}
    }))
    .unwrap();
    assert!(session.is_authenticated());
    let user = session.user().unwrap();
    assert_eq!(user.username, "ana");
    assert!(user.has_private_access);
}

#[test]
fn authenticated_without_user_collapses_to_anonymous() {
    let session: Session = serde_json::from_value(json!({"authenticated": true})).unwrap();
    assert_eq!(session, Session::anonymous());
}

#[test]
fn user_without_authenticated_flag_is_anonymous() {
    let session: Session =
        serde_json::from_value(json!({"user": {"id": 1, "username": "ana"}})).unwrap();
    assert!(!session.is_authenticated());
}

#[test]
fn session_constructor_keeps_user() {
    let session = Session::authenticated(User::new("1", "ana"));
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("ana"));
}

// ── Credentials ───────────────────────────────────────────────────

#[test]
fn credentials_debug_redacts_password() {
    let creds = Credentials::new("ana", "hunter2");
    let debug = format!("{creds:?}");
    assert!(debug.contains("ana"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn credentials_incomplete() {
    assert!(Credentials::new("  ", "pw").is_incomplete());
    assert!(Credentials::new("ana", "").is_incomplete());
    assert!(!Credentials::new("ana", "pw").is_incomplete());
}

#[test]
fn credentials_wire_shape() {
    let value = serde_json::to_value(Credentials::new("ana", "wrong")).unwrap();
    assert_eq!(value, json!({"username": "ana", "password": "wrong"}));
}

// ── Favorite / upload payloads ────────────────────────────────────

#[test]
fn favorite_toggle_payload() {
    let toggle: FavoriteToggle =
        serde_json::from_value(json!({"id": 5, "favorite": false})).unwrap();
    assert_eq!(toggle.id, FileId::from("5"));
    assert!(!toggle.favorite);
}

#[test]
fn upload_options_form_fields() {
    let opts = UploadOptions {
        convert_to_pdf: true,
        convert_to_audio: false,
        private: false,
    };
    assert_eq!(
        opts.form_fields(),
        [("convertToPdf", "1"), ("convertToAudio", "0"), ("private", "0")]
    );
}

#[test]
fn upload_result_payload() {
    let result: UploadResult =
        serde_json::from_value(json!({"uploaded": [server_file()], "count": 1})).unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.uploaded[0].name, "holiday.mp4");
}
