use jotpad_core::db::open_db_in_memory;
use jotpad_core::{
    query_notes, NoteDraft, NoteId, NoteQuery, NoteService, SortDirection, SortField,
    SqliteNoteRepository,
};
use rusqlite::{params, Connection};
use std::collections::HashSet;

fn create_note(conn: &mut Connection, title: &str, content: &str, tags: &[&str]) -> NoteId {
    let repo = SqliteNoteRepository::try_new(conn).unwrap();
    let mut service = NoteService::new(repo);
    service
        .create_note(&NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        })
        .unwrap()
        .id
}

/// Seeds the canonical three-note fixture: Apple/Banana/Carrot.
fn seed_fruit_store(conn: &mut Connection) -> (NoteId, NoteId, NoteId) {
    let a = create_note(conn, "Apple", "a crisp red apple", &["fruit"]);
    let b = create_note(conn, "Banana", "a ripe banana", &["fruit", "yellow"]);
    let c = create_note(conn, "Carrot", "an orange carrot", &["vegetable"]);
    (a, b, c)
}

#[test]
fn tag_filter_matches_any_listed_tag() {
    let mut conn = open_db_in_memory().unwrap();
    let (a, b, _c) = seed_fruit_store(&mut conn);

    let query = NoteQuery {
        tags: vec!["fruit".to_string()],
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();

    assert_eq!(result.pagination.total, 2);
    let ids: HashSet<NoteId> = result.notes.iter().map(|note| note.id).collect();
    assert_eq!(ids, HashSet::from([a, b]));
}

#[test]
fn tag_filter_is_case_insensitive_and_or_semantics() {
    let mut conn = open_db_in_memory().unwrap();
    let (a, b, c) = seed_fruit_store(&mut conn);

    let query = NoteQuery {
        tags: vec!["YELLOW".to_string(), "vegetable".to_string()],
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();

    let ids: HashSet<NoteId> = result.notes.iter().map(|note| note.id).collect();
    assert_eq!(ids, HashSet::from([b, c]));
    assert!(!ids.contains(&a));
}

#[test]
fn untagged_note_never_matches_a_tag_filter() {
    let mut conn = open_db_in_memory().unwrap();
    let untagged = create_note(&mut conn, "Loose thought", "no tags here", &[]);

    let query = NoteQuery {
        tags: vec!["anything".to_string()],
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();

    assert_eq!(result.pagination.total, 0);
    assert!(result.notes.iter().all(|note| note.id != untagged));
}

#[test]
fn search_matches_title_or_content_case_insensitively() {
    let mut conn = open_db_in_memory().unwrap();
    let (a, b, _c) = seed_fruit_store(&mut conn);

    let query = NoteQuery {
        search: Some("Banana".to_string()),
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 1);
    assert_eq!(result.notes[0].id, b);

    // Substring matching: an inner fragment still matches.
    let query = NoteQuery {
        search: Some("RISP".to_string()),
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 1);
    assert_eq!(result.notes[0].id, a);
}

#[test]
fn multi_term_search_requires_every_term() {
    let mut conn = open_db_in_memory().unwrap();
    let (_a, b, _c) = seed_fruit_store(&mut conn);

    let query = NoteQuery {
        search: Some("ripe banana".to_string()),
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 1);
    assert_eq!(result.notes[0].id, b);

    let query = NoteQuery {
        search: Some("ripe carrot".to_string()),
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 0);
}

#[test]
fn blank_search_is_no_constraint() {
    let mut conn = open_db_in_memory().unwrap();
    seed_fruit_store(&mut conn);

    let query = NoteQuery {
        search: Some("   ".to_string()),
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 3);
}

#[test]
fn search_and_tag_filter_combine_conjunctively() {
    let mut conn = open_db_in_memory().unwrap();
    let (_a, b, _c) = seed_fruit_store(&mut conn);

    let query = NoteQuery {
        search: Some("ripe".to_string()),
        tags: vec!["fruit".to_string()],
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 1);
    assert_eq!(result.notes[0].id, b);

    let query = NoteQuery {
        search: Some("ripe".to_string()),
        tags: vec!["vegetable".to_string()],
        ..NoteQuery::default()
    };
    let result = query_notes(&conn, &query).unwrap();
    assert_eq!(result.pagination.total, 0);
}

#[test]
fn unfiltered_pages_union_to_the_whole_store() {
    let mut conn = open_db_in_memory().unwrap();
    let mut expected = HashSet::new();
    for idx in 0..25 {
        expected.insert(create_note(
            &mut conn,
            &format!("note {idx:02}"),
            "filler body",
            &[],
        ));
    }

    let first = query_notes(&conn, &NoteQuery::default()).unwrap();
    assert_eq!(first.pagination.total, 25);
    assert_eq!(first.pagination.pages, 3);

    let mut seen = HashSet::new();
    for page in 1..=first.pagination.pages {
        let result = query_notes(
            &conn,
            &NoteQuery {
                page,
                ..NoteQuery::default()
            },
        )
        .unwrap();
        assert_eq!(result.pagination.has_prev, page > 1);
        assert_eq!(result.pagination.has_next, page < first.pagination.pages);
        for note in result.notes {
            assert!(seen.insert(note.id), "note appeared on two pages");
        }
    }
    assert_eq!(seen, expected);
}

#[test]
fn title_sort_ascending_reversed_equals_descending() {
    let mut conn = open_db_in_memory().unwrap();
    seed_fruit_store(&mut conn);

    let ascending = query_notes(
        &conn,
        &NoteQuery {
            sort: SortField::Title,
            direction: SortDirection::Ascending,
            ..NoteQuery::default()
        },
    )
    .unwrap();
    let descending = query_notes(
        &conn,
        &NoteQuery {
            sort: SortField::Title,
            direction: SortDirection::Descending,
            ..NoteQuery::default()
        },
    )
    .unwrap();

    let titles_asc: Vec<&str> = ascending.notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles_asc, vec!["Apple", "Banana", "Carrot"]);

    let mut reversed: Vec<&str> = descending.notes.iter().map(|n| n.title.as_str()).collect();
    reversed.reverse();
    assert_eq!(titles_asc, reversed);
}

#[test]
fn default_sort_is_updated_at_descending_with_stable_ties() {
    let mut conn = open_db_in_memory().unwrap();
    let first = create_note(&mut conn, "first", "body", &[]);
    let second = create_note(&mut conn, "second", "body", &[]);
    let third = create_note(&mut conn, "third", "body", &[]);

    // Two rows share a timestamp; the tie breaks by insertion order.
    conn.execute(
        "UPDATE notes SET updated_at = 1000 WHERE uuid IN (?1, ?2);",
        params![first.to_string(), second.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET updated_at = 2000 WHERE uuid = ?1;",
        params![third.to_string()],
    )
    .unwrap();

    let result = query_notes(&conn, &NoteQuery::default()).unwrap();
    let ids: Vec<NoteId> = result.notes.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![third, first, second]);
}

#[test]
fn created_at_sort_orders_numerically() {
    let mut conn = open_db_in_memory().unwrap();
    let first = create_note(&mut conn, "older", "body", &[]);
    let second = create_note(&mut conn, "newer", "body", &[]);

    conn.execute(
        "UPDATE notes SET created_at = 1000 WHERE uuid = ?1;",
        params![first.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 2000 WHERE uuid = ?1;",
        params![second.to_string()],
    )
    .unwrap();

    let result = query_notes(
        &conn,
        &NoteQuery {
            sort: SortField::CreatedAt,
            direction: SortDirection::Ascending,
            ..NoteQuery::default()
        },
    )
    .unwrap();
    let ids: Vec<NoteId> = result.notes.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn second_page_of_three_notes_by_title() {
    let mut conn = open_db_in_memory().unwrap();
    let (_a, _b, c) = seed_fruit_store(&mut conn);

    let result = query_notes(
        &conn,
        &NoteQuery {
            page: 2,
            page_size: 2,
            sort: SortField::Title,
            direction: SortDirection::Ascending,
            ..NoteQuery::default()
        },
    )
    .unwrap();

    assert_eq!(result.notes.len(), 1);
    assert_eq!(result.notes[0].id, c);
    assert_eq!(result.pagination.pages, 2);
    assert_eq!(result.pagination.total, 3);
    assert!(!result.pagination.has_next);
    assert!(result.pagination.has_prev);
}

#[test]
fn page_beyond_total_pages_is_empty_not_error() {
    let mut conn = open_db_in_memory().unwrap();
    seed_fruit_store(&mut conn);

    let result = query_notes(
        &conn,
        &NoteQuery {
            page: 9,
            page_size: 2,
            ..NoteQuery::default()
        },
    )
    .unwrap();

    assert!(result.notes.is_empty());
    assert_eq!(result.pagination.total, 3);
    assert_eq!(result.pagination.pages, 2);
    assert_eq!(result.pagination.current, 9);
    assert!(!result.pagination.has_next);
    assert!(result.pagination.has_prev);
}

#[test]
fn empty_store_reports_a_single_empty_page() {
    let conn = open_db_in_memory().unwrap();

    let result = query_notes(&conn, &NoteQuery::default()).unwrap();
    assert!(result.notes.is_empty());
    assert_eq!(result.pagination.total, 0);
    assert_eq!(result.pagination.pages, 1);
    assert_eq!(result.pagination.current, 1);
    assert!(!result.pagination.has_next);
    assert!(!result.pagination.has_prev);
}

#[test]
fn out_of_range_numeric_parameters_are_clamped() {
    let mut conn = open_db_in_memory().unwrap();
    seed_fruit_store(&mut conn);

    let result = query_notes(
        &conn,
        &NoteQuery {
            page: 0,
            page_size: 0,
            ..NoteQuery::default()
        },
    )
    .unwrap();

    assert_eq!(result.pagination.current, 1);
    assert_eq!(result.notes.len(), 3);
    assert!(!result.pagination.has_prev);
}

#[test]
fn query_reflects_live_store_state() {
    let mut conn = open_db_in_memory().unwrap();
    seed_fruit_store(&mut conn);

    let before = query_notes(&conn, &NoteQuery::default()).unwrap();
    assert_eq!(before.pagination.total, 3);

    create_note(&mut conn, "Damson", "a late addition", &["fruit"]);

    let after = query_notes(&conn, &NoteQuery::default()).unwrap();
    assert_eq!(after.pagination.total, 4);
}
