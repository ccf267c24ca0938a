use corrtrack_core::db::open_db_in_memory;
use corrtrack_core::{
    parse_range_end, parse_timestamp, ContactDirectory, ContactId, CorrespondenceLog, DateRange,
    Direction, EntryListQuery, LogEntryRequest, NewContact, RepoError, SqliteContactRepository,
    SqliteEntryRepository, ValidationError,
};
use rusqlite::Connection;

fn add_contact(conn: &Connection, name: &str) -> ContactId {
    ContactDirectory::new(SqliteContactRepository::new(conn))
        .add_contact(NewContact::new(name))
        .unwrap()
        .id
}

fn request(contact_id: ContactId, direction: &str, timestamp: &str) -> LogEntryRequest {
    LogEntryRequest {
        contact_id,
        direction: direction.to_string(),
        timestamp: timestamp.to_string(),
        ..LogEntryRequest::default()
    }
}

fn entry_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM correspondences;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn logged_entry_roundtrips_through_unfiltered_listing() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let created = log
        .log_entry(&LogEntryRequest {
            medium: Some("letter".to_string()),
            subject: Some("Analytical engine".to_string()),
            body: Some("Thanks for the notes on Bernoulli numbers.".to_string()),
            tags: vec!["math".to_string(), "engine".to_string()],
            follow_up_date: Some("2024-04-01T09:00:00".to_string()),
            sentiment: Some("warm".to_string()),
            related_topic: Some("notes".to_string()),
            ..request(ada, "incoming", "2024-03-01T10:15:30")
        })
        .unwrap();

    assert_eq!(created.contact_id, ada);
    assert_eq!(created.direction, Direction::Incoming);
    assert_eq!(created.timestamp, parse_timestamp("2024-03-01T10:15:30").unwrap());
    assert_eq!(
        created.follow_up_date,
        Some(parse_timestamp("2024-04-01T09:00:00").unwrap())
    );
    assert_eq!(
        created.tags.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["engine", "math"]
    );
    assert_eq!(created.response_status, "pending");

    let listed = log.list_entries(&EntryListQuery::default()).unwrap();
    let matching = listed
        .iter()
        .filter(|entry| entry.id == created.id)
        .collect::<Vec<_>>();
    assert_eq!(matching.len(), 1);
    assert_eq!(*matching[0], created);
    assert_eq!(log.get_entry(created.id).unwrap(), created);
}

#[test]
fn message_text_is_stored_verbatim_including_surrounding_whitespace() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let body = "Dear Ada,\n\nThanks.\n";
    let created = log
        .log_entry(&LogEntryRequest {
            medium: Some(" letter".to_string()),
            subject: Some("  Re: engine  ".to_string()),
            body: Some(body.to_string()),
            ..request(ada, "outgoing", "2024-03-01")
        })
        .unwrap();

    let listed = log.list_entries(&EntryListQuery::for_contact(ada)).unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(listed[0].body.as_deref(), Some(body));
    assert_eq!(listed[0].subject.as_deref(), Some("  Re: engine  "));
    assert_eq!(listed[0].medium.as_deref(), Some(" letter"));

    let blank = log
        .log_entry(&LogEntryRequest {
            body: Some(" \n\t".to_string()),
            ..request(ada, "outgoing", "2024-03-02")
        })
        .unwrap();
    assert_eq!(log.get_entry(blank.id).unwrap().body, None);
}

#[test]
fn log_entry_for_missing_contact_is_not_found_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let mut with_tags = request(77, "outgoing", "2024-03-01");
    with_tags.tags = vec!["orphan".to_string()];
    let err = log.log_entry(&with_tags).unwrap_err();

    assert!(matches!(err, RepoError::ContactNotFound(77)));
    assert_eq!(entry_count(&conn), 0);
    let tag_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM correspondence_tags;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(tag_rows, 0);
}

#[test]
fn log_entry_rejects_bad_direction_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let err = log
        .log_entry(&request(ada, "sideways", "2024-03-01"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidDirection(_))
    ));

    let err = log
        .log_entry(&request(ada, "outgoing", "yesterday-ish"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidTimestamp(_))
    ));

    let mut bad_follow_up = request(ada, "outgoing", "2024-03-01");
    bad_follow_up.follow_up_date = Some("soon".to_string());
    let err = log.log_entry(&bad_follow_up).unwrap_err();
    assert!(err.is_validation());

    assert_eq!(entry_count(&conn), 0);
}

#[test]
fn follow_up_before_timestamp_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let mut backdated = request(ada, "outgoing", "2024-03-10");
    backdated.follow_up_date = Some("2024-03-01".to_string());
    let created = log.log_entry(&backdated).unwrap();
    assert!(created.follow_up_date.unwrap() < created.timestamp);
}

#[test]
fn contact_filter_returns_only_that_contact_newest_first_with_id_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let grace = add_contact(&conn, "Grace");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let old = log.log_entry(&request(ada, "outgoing", "2024-01-01")).unwrap();
    let tie_first = log.log_entry(&request(ada, "incoming", "2024-02-01")).unwrap();
    let tie_second = log.log_entry(&request(ada, "outgoing", "2024-02-01")).unwrap();
    log.log_entry(&request(grace, "outgoing", "2024-03-01")).unwrap();

    let listed = log.list_entries(&EntryListQuery::for_contact(ada)).unwrap();
    assert!(listed.iter().all(|entry| entry.contact_id == ada));
    let ids = listed.iter().map(|entry| entry.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![tie_first.id, tie_second.id, old.id]);
}

#[test]
fn direction_and_date_range_filters_combine() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    log.log_entry(&request(ada, "outgoing", "2024-02-28T23:59:59")).unwrap();
    let in_range_out = log.log_entry(&request(ada, "outgoing", "2024-03-01")).unwrap();
    log.log_entry(&request(ada, "incoming", "2024-03-15")).unwrap();
    let end_bound = log
        .log_entry(&request(ada, "outgoing", "2024-03-31T00:00:00"))
        .unwrap();
    log.log_entry(&request(ada, "outgoing", "2024-04-01")).unwrap();

    let query = EntryListQuery {
        direction: Some(Direction::Outgoing),
        date_range: Some(
            DateRange::new(
                Some(parse_timestamp("2024-03-01").unwrap()),
                Some(parse_timestamp("2024-03-31").unwrap()),
            )
            .unwrap(),
        ),
        ..EntryListQuery::default()
    };
    let ids = log
        .list_entries(&query)
        .unwrap()
        .iter()
        .map(|entry| entry.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![end_bound.id, in_range_out.id]);
}

#[test]
fn date_only_upper_bound_includes_the_rest_of_that_day() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));

    let evening = log
        .log_entry(&request(ada, "outgoing", "2024-03-31T18:45:00"))
        .unwrap();
    log.log_entry(&request(ada, "outgoing", "2024-04-01")).unwrap();

    let query = EntryListQuery {
        date_range: Some(
            DateRange::new(None, Some(parse_range_end("2024-03-31").unwrap())).unwrap(),
        ),
        ..EntryListQuery::default()
    };
    let ids = log
        .list_entries(&query)
        .unwrap()
        .iter()
        .map(|entry| entry.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![evening.id]);
}

#[test]
fn update_response_status_corrects_metadata() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));
    let created = log.log_entry(&request(ada, "outgoing", "2024-03-01")).unwrap();

    let updated = log.update_response_status(created.id, " replied ").unwrap();
    assert_eq!(updated.response_status, "replied");
    assert_eq!(updated.timestamp, created.timestamp);

    let err = log.update_response_status(created.id, "  ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyResponseStatus)
    ));

    let err = log.update_response_status(555, "replied").unwrap_err();
    assert!(matches!(err, RepoError::EntryNotFound(555)));
    assert!(log.get_entry(555).unwrap_err().is_not_found());
}

#[test]
fn corrupted_timestamp_row_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let log = CorrespondenceLog::new(SqliteEntryRepository::new(&conn));
    let created = log.log_entry(&request(ada, "outgoing", "2024-03-01")).unwrap();

    conn.execute(
        "UPDATE correspondences SET sent_at = 'garbage' WHERE id = ?1;",
        [created.id],
    )
    .unwrap();

    let err = log.get_entry(created.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
