use rooted_core::db::migrations::latest_version;
use rooted_core::db::open_db_in_memory;
use rooted_core::repo::settings_repo::ACCOUNTABILITY_INTERVALS_KEY;
use rooted_core::{RepoError, SettingsRepository, SqliteSettingsRepository};
use rusqlite::Connection;

#[test]
fn missing_setting_falls_back_to_default_interval() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    let intervals = repo.accountability_intervals().unwrap();
    assert_eq!(intervals.days(), &[5]);
}

#[test]
fn set_normalizes_sorts_and_dedupes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    let stored = repo.set_accountability_intervals(&[20, 3, 3, 400, -1]).unwrap();
    assert_eq!(stored.days(), &[3, 20]);

    let reread = repo.accountability_intervals().unwrap();
    assert_eq!(reread.days(), &[3, 20]);
}

#[test]
fn set_with_no_valid_day_is_rejected_and_keeps_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    repo.set_accountability_intervals(&[7]).unwrap();

    let err = repo.set_accountability_intervals(&[]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo.set_accountability_intervals(&[0, 366, -3]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let intervals = repo.accountability_intervals().unwrap();
    assert_eq!(intervals.days(), &[7]);
}

#[test]
fn unparseable_stored_value_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
        (ACCOUNTABILITY_INTERVALS_KEY, "not json"),
    )
    .unwrap();

    let intervals = repo.accountability_intervals().unwrap();
    assert_eq!(intervals.days(), &[5]);
}

#[test]
fn stored_value_with_only_invalid_days_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
        (ACCOUNTABILITY_INTERVALS_KEY, "[0, 9999]"),
    )
    .unwrap();

    let intervals = repo.accountability_intervals().unwrap();
    assert_eq!(intervals.days(), &[5]);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteSettingsRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_settings_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSettingsRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("settings"))
    ));
}
