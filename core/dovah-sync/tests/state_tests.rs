use dovah_sync::reload::{plan, RULES};
use dovah_sync::state::ResourceState;
use dovah_sync::{Collection, ReloadPlan, StaleResponsePolicy, Trigger};
use dovah_types::{FileId, MediaFile, Playlist, PlaylistId, Tag};
use pretty_assertions::assert_eq;

fn file(id: &str, name: &str) -> MediaFile {
    MediaFile::new(id, name, "image/png")
}

fn ids(files: &[MediaFile]) -> Vec<&str> {
    files.iter().map(|f| f.id.as_str()).collect()
}

// ── Collections ─────────────────────────────────────────────────

#[test]
fn new_state_is_empty() {
    let state = ResourceState::new();
    assert!(state.files().is_empty());
    assert!(state.tags().is_empty());
    assert!(state.playlists().is_empty());
    assert!(state.active_file().is_none());
    assert_eq!(state.epoch(), 0);
}

#[test]
fn replace_files_is_wholesale() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "a"), file("2", "b")]);
    state.replace_files(vec![file("3", "c")]);
    assert_eq!(ids(state.files()), vec!["3"]);
}

#[test]
fn set_favorite_updates_list_and_detail() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "a"), file("2", "b")]);
    state.set_active_file(Some(file("1", "a")));

    assert!(state.set_favorite(&FileId::from("1"), true));
    assert!(state.find_file(&FileId::from("1")).unwrap().is_favorite);
    assert!(state.active_file().unwrap().is_favorite);
    assert!(!state.find_file(&FileId::from("2")).unwrap().is_favorite);
}

#[test]
fn set_favorite_on_absent_id_is_noop() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "a")]);
    assert!(!state.set_favorite(&FileId::from("99"), true));
    assert!(!state.files()[0].is_favorite);
}

#[test]
fn set_favorite_skips_detail_for_other_file() {
    let mut state = ResourceState::new();
    state.set_active_file(Some(file("2", "b")));
    state.set_favorite(&FileId::from("1"), true);
    assert!(!state.active_file().unwrap().is_favorite);
}

#[test]
fn prepend_files_keeps_upload_order() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "old")]);
    state.prepend_files(vec![file("10", "a"), file("11", "b")]);
    assert_eq!(ids(state.files()), vec!["10", "11", "1"]);
}

#[test]
fn prepend_files_does_not_deduplicate() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "a")]);
    state.prepend_files(vec![file("1", "a")]);
    assert_eq!(state.files().len(), 2);
}

#[test]
fn playlist_mutations() {
    let mut state = ResourceState::new();
    state.replace_playlists(vec![Playlist::new("1", "Old")]);
    state.prepend_playlist(Playlist::new("2", "New"));
    assert_eq!(state.playlists()[0].name, "New");

    let mut updated = Playlist::new("1", "Old");
    updated.items.push(file("5", "song"));
    assert!(state.replace_playlist(updated));
    assert!(state
        .find_playlist(&PlaylistId::from("1"))
        .unwrap()
        .contains(&FileId::from("5")));

    assert!(!state.replace_playlist(Playlist::new("9", "Ghost")));
    assert_eq!(state.playlists().len(), 2);

    assert!(state.remove_playlist(&PlaylistId::from("2")));
    assert!(!state.remove_playlist(&PlaylistId::from("2")));
    assert_eq!(state.playlists().len(), 1);
}

#[test]
fn reset_clears_everything_and_bumps_epoch() {
    let mut state = ResourceState::new();
    state.replace_files(vec![file("1", "a")]);
    state.replace_tags(vec![Tag::new("1", "beach")]);
    state.replace_playlists(vec![Playlist::new("1", "p")]);
    state.set_active_file(Some(file("1", "a")));

    state.reset();

    assert!(state.files().is_empty());
    assert!(state.tags().is_empty());
    assert!(state.playlists().is_empty());
    assert!(state.active_file().is_none());
    assert_eq!(state.epoch(), 1);
}

// ── Load tickets ────────────────────────────────────────────────

#[test]
fn latest_ticket_is_accepted() {
    let mut state = ResourceState::new();
    let ticket = state.begin_load(Collection::Files);
    assert!(state.accepts(&ticket, StaleResponsePolicy::DiscardStale));
}

#[test]
fn superseded_ticket_is_discarded() {
    let mut state = ResourceState::new();
    let first = state.begin_load(Collection::Files);
    let second = state.begin_load(Collection::Files);

    assert!(!state.accepts(&first, StaleResponsePolicy::DiscardStale));
    assert!(state.accepts(&second, StaleResponsePolicy::DiscardStale));
}

#[test]
fn superseded_ticket_accepted_when_last_response_wins() {
    let mut state = ResourceState::new();
    let first = state.begin_load(Collection::Files);
    let _second = state.begin_load(Collection::Files);
    assert!(state.accepts(&first, StaleResponsePolicy::LastResponseWins));
}

#[test]
fn tickets_are_per_collection() {
    let mut state = ResourceState::new();
    let files = state.begin_load(Collection::Files);
    let tags = state.begin_load(Collection::Tags);
    let _more_tags = state.begin_load(Collection::Tags);

    assert!(state.accepts(&files, StaleResponsePolicy::DiscardStale));
    assert!(!state.accepts(&tags, StaleResponsePolicy::DiscardStale));
}

#[test]
fn reset_invalidates_outstanding_tickets_under_any_policy() {
    let mut state = ResourceState::new();
    let ticket = state.begin_load(Collection::Playlists);
    state.reset();

    assert!(!state.accepts(&ticket, StaleResponsePolicy::DiscardStale));
    assert!(!state.accepts(&ticket, StaleResponsePolicy::LastResponseWins));

    let fresh = state.begin_load(Collection::Playlists);
    assert!(state.accepts(&fresh, StaleResponsePolicy::DiscardStale));
}

// ── Reload rules ────────────────────────────────────────────────

#[test]
fn session_start_loads_everything() {
    assert_eq!(
        plan(&[Trigger::SessionStarted]),
        ReloadPlan {
            files: true,
            tags: true,
            playlists: true,
        }
    );
}

#[test]
fn filter_changes_reload_files_only() {
    for trigger in [
        Trigger::SearchChanged,
        Trigger::FavoritesOnlyChanged,
        Trigger::MimeTypeChanged,
        Trigger::OrderChanged,
    ] {
        let p = plan(&[trigger]);
        assert!(p.files, "{trigger:?}");
        assert!(!p.tags && !p.playlists, "{trigger:?}");
    }
}

#[test]
fn tag_change_reloads_nothing() {
    assert!(plan(&[Trigger::TagChanged]).is_empty());
}

#[test]
fn refresh_reloads_files_and_playlists() {
    let p = plan(&[Trigger::Refresh]);
    assert!(p.contains(Collection::Files));
    assert!(p.contains(Collection::Playlists));
    assert!(!p.contains(Collection::Tags));
}

#[test]
fn combined_triggers_merge() {
    let p = plan(&[Trigger::SearchChanged, Trigger::OrderChanged, Trigger::TagChanged]);
    assert_eq!(
        p,
        ReloadPlan {
            files: true,
            tags: false,
            playlists: false,
        }
    );
}

#[test]
fn every_trigger_has_a_rule() {
    for trigger in [
        Trigger::SessionStarted,
        Trigger::SearchChanged,
        Trigger::FavoritesOnlyChanged,
        Trigger::MimeTypeChanged,
        Trigger::OrderChanged,
        Trigger::TagChanged,
        Trigger::Refresh,
    ] {
        assert_eq!(
            RULES.iter().filter(|rule| rule.when == trigger).count(),
            1,
            "{trigger:?}"
        );
    }
}
