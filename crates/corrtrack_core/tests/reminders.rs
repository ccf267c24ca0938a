use corrtrack_core::db::open_db_in_memory;
use corrtrack_core::{
    parse_timestamp, ContactDirectory, ContactId, CorrespondenceLog, EntryId, LogEntryRequest,
    NewContact, ReminderEngine, ReminderQuery, ReminderStatus, SqliteContactRepository,
    SqliteEntryRepository, Timestamp,
};
use rusqlite::Connection;

fn add_contact(conn: &Connection, name: &str) -> ContactId {
    ContactDirectory::new(SqliteContactRepository::new(conn))
        .add_contact(NewContact::new(name))
        .unwrap()
        .id
}

fn log_with_follow_up(
    conn: &Connection,
    contact_id: ContactId,
    sent_at: &str,
    follow_up: Option<&str>,
) -> EntryId {
    CorrespondenceLog::new(SqliteEntryRepository::new(conn))
        .log_entry(&LogEntryRequest {
            contact_id,
            direction: "outgoing".to_string(),
            timestamp: sent_at.to_string(),
            follow_up_date: follow_up.map(str::to_string),
            ..LogEntryRequest::default()
        })
        .unwrap()
        .id
}

fn engine(conn: &Connection) -> ReminderEngine<SqliteContactRepository<'_>, SqliteEntryRepository<'_>> {
    ReminderEngine::new(
        SqliteContactRepository::new(conn),
        SqliteEntryRepository::new(conn),
    )
}

fn now() -> Timestamp {
    parse_timestamp("2024-03-15").unwrap()
}

#[test]
fn classifies_overdue_and_pending_with_signed_day_delta() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let overdue_id = log_with_follow_up(&conn, ada, "2024-03-01", Some("2024-03-10"));
    let pending_id = log_with_follow_up(&conn, ada, "2024-03-02", Some("2024-03-20"));
    log_with_follow_up(&conn, ada, "2024-03-03", None);

    let reminders = engine(&conn)
        .reminders(now(), &ReminderQuery::default())
        .unwrap();
    assert_eq!(reminders.len(), 2);

    assert_eq!(reminders[0].entry.id, overdue_id);
    assert_eq!(reminders[0].status, ReminderStatus::Overdue);
    assert_eq!(reminders[0].days_until_due, -5);
    assert_eq!(reminders[0].contact.name, "Ada");

    assert_eq!(reminders[1].entry.id, pending_id);
    assert_eq!(reminders[1].status, ReminderStatus::Pending);
    assert_eq!(reminders[1].days_until_due, 5);
}

#[test]
fn output_is_sorted_by_due_date_then_id() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let grace = add_contact(&conn, "Grace");
    let later = log_with_follow_up(&conn, ada, "2024-01-01", Some("2024-04-01"));
    let tie_a = log_with_follow_up(&conn, grace, "2024-01-02", Some("2024-03-01"));
    let tie_b = log_with_follow_up(&conn, ada, "2024-01-03", Some("2024-03-01"));

    let ids = engine(&conn)
        .reminders(now(), &ReminderQuery::default())
        .unwrap()
        .iter()
        .map(|reminder| reminder.entry.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![tie_a, tie_b, later]);
}

#[test]
fn overdue_only_is_a_strict_idempotent_restriction() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    log_with_follow_up(&conn, ada, "2024-03-01", Some("2024-03-10"));
    log_with_follow_up(&conn, ada, "2024-03-01", Some("2024-03-12"));
    log_with_follow_up(&conn, ada, "2024-03-01", Some("2024-03-20"));

    let engine = engine(&conn);
    let all = engine.reminders(now(), &ReminderQuery::default()).unwrap();
    let overdue = engine
        .reminders(now(), &ReminderQuery::overdue_only())
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(overdue.len(), 2);
    assert!(overdue
        .iter()
        .all(|reminder| reminder.status == ReminderStatus::Overdue));
    assert!(overdue.iter().all(|reminder| all.contains(reminder)));

    let twice = ReminderQuery::overdue_only().apply(overdue.clone());
    assert_eq!(twice, overdue);
}

#[test]
fn status_is_rederived_from_reference_time_and_ignores_response_status() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    let id = log_with_follow_up(&conn, ada, "2024-03-01", Some("2024-03-10"));
    CorrespondenceLog::new(SqliteEntryRepository::new(&conn))
        .update_response_status(id, "replied")
        .unwrap();

    let engine = engine(&conn);
    let before = engine
        .reminders(parse_timestamp("2024-03-05").unwrap(), &ReminderQuery::default())
        .unwrap();
    assert_eq!(before[0].status, ReminderStatus::Pending);

    let after = engine
        .reminders(parse_timestamp("2024-03-11").unwrap(), &ReminderQuery::default())
        .unwrap();
    assert_eq!(after[0].status, ReminderStatus::Overdue);
    assert_eq!(after[0].entry.response_status, "replied");
}

#[test]
fn no_follow_ups_yields_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let ada = add_contact(&conn, "Ada");
    log_with_follow_up(&conn, ada, "2024-03-01", None);

    let reminders = engine(&conn)
        .reminders(now(), &ReminderQuery::overdue_only())
        .unwrap();
    assert!(reminders.is_empty());
}
