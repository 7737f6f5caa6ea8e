use dovah_types::{FileQuery, FilterCriteria, MediaKind, SortOrder, TagId, Timestamp};
use std::str::FromStr;

// ── FileQuery ─────────────────────────────────────────────────────

#[test]
fn default_criteria_produce_no_params() {
    let query = FilterCriteria::default().file_query();
    assert!(query.to_pairs().is_empty());
}

#[test]
fn search_is_trimmed_and_blank_omitted() {
    let criteria = FilterCriteria {
        search_text: "   ".into(),
        ..Default::default()
    };
    assert_eq!(criteria.file_query().search, None);

    let criteria = FilterCriteria {
        search_text: "  beach ".into(),
        ..Default::default()
    };
    assert_eq!(criteria.file_query().search.as_deref(), Some("beach"));
}

#[test]
fn all_server_params_in_order() {
    let criteria = FilterCriteria {
        search_text: "beach".into(),
        favorites_only: true,
        mime_type_prefix: Some("image/".into()),
        tag_id: None,
        order: SortOrder::NameDesc,
    };
    let pairs = criteria.file_query().to_pairs();
    assert_eq!(
        pairs,
        vec![
            ("search", "beach".to_string()),
            ("favorites", "1".to_string()),
            ("type", "image/".to_string()),
            ("order", "name_desc".to_string()),
        ]
    );
}

#[test]
fn tag_never_reaches_the_query() {
    let criteria = FilterCriteria {
        tag_id: Some(TagId::from("3")),
        ..Default::default()
    };
    assert_eq!(criteria.file_query(), FileQuery::default());
}

#[test]
fn set_kind_updates_prefix() {
    let mut criteria = FilterCriteria::default();
    criteria.set_kind(MediaKind::Pdf);
    assert_eq!(criteria.mime_type_prefix.as_deref(), Some("application/pdf"));
    criteria.set_kind(MediaKind::All);
    assert_eq!(criteria.mime_type_prefix, None);
}

// ── SortOrder ─────────────────────────────────────────────────────

#[test]
fn sort_order_parse_roundtrip() {
    for order in [SortOrder::Recent, SortOrder::Oldest, SortOrder::Name, SortOrder::NameDesc] {
        assert_eq!(SortOrder::from_str(order.as_param()).unwrap(), order);
    }
    assert!(SortOrder::from_str("size").is_err());
}

// ── Timestamp ─────────────────────────────────────────────────────

#[test]
fn timestamp_parses_naive_server_format() {
    let ts = Timestamp::parse("2024-05-01T10:22:03.120394").unwrap();
    assert_eq!(ts.as_datetime().to_rfc3339(), "2024-05-01T10:22:03.120394+00:00");
}

#[test]
fn timestamp_parses_rfc3339_with_offset() {
    let ts = Timestamp::parse("2024-05-01T12:00:00+02:00").unwrap();
    assert_eq!(ts, Timestamp::parse("2024-05-01T10:00:00").unwrap());
}

#[test]
fn timestamp_rejects_garbage() {
    assert!(Timestamp::parse("yesterday").is_err());
}
