use stampbook_core::db::open_db_in_memory;
use stampbook_core::{Record, RecordRepository, RepoError, SqliteRecordRepository};
use uuid::Uuid;

fn memory_repo() -> SqliteRecordRepository {
    SqliteRecordRepository::new(open_db_in_memory().unwrap())
}

#[test]
fn insert_and_list_roundtrip() {
    let repo = memory_repo();

    let record = Record::with_id(Uuid::new_v4(), 1_700_000_000_000);
    let id = repo.insert_record(&record).unwrap();
    assert_eq!(id, record.uuid);

    let listed = repo.list_records_desc().unwrap();
    assert_eq!(listed, vec![record]);
}

#[test]
fn list_orders_newest_first_with_uuid_tiebreak() {
    let repo = memory_repo();

    let oldest = Record::with_id(Uuid::new_v4(), 1_000);
    let newest = Record::with_id(Uuid::new_v4(), 3_000);
    let middle = Record::with_id(Uuid::new_v4(), 2_000);
    for record in [&oldest, &newest, &middle] {
        repo.insert_record(record).unwrap();
    }

    let listed = repo.list_records_desc().unwrap();
    assert_eq!(listed, vec![newest, middle, oldest]);

    let tied_a = Record::with_id(
        Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap(),
        3_000,
    );
    let tied_b = Record::with_id(
        Uuid::parse_str("00000000-0000-4000-8000-000000000002").unwrap(),
        3_000,
    );
    repo.insert_record(&tied_b).unwrap();
    repo.insert_record(&tied_a).unwrap();

    let listed = repo.list_records_desc().unwrap();
    let tied: Vec<_> = listed
        .iter()
        .filter(|record| record.created_at == 3_000 && record.uuid != newest.uuid)
        .collect();
    assert_eq!(tied, vec![&tied_a, &tied_b]);
}

#[test]
fn delete_removes_row_by_identity() {
    let repo = memory_repo();

    let keep = Record::with_id(Uuid::new_v4(), 1_000);
    let doomed = Record::with_id(Uuid::new_v4(), 2_000);
    repo.insert_record(&keep).unwrap();
    repo.insert_record(&doomed).unwrap();

    repo.delete_record(doomed.uuid).unwrap();

    let listed = repo.list_records_desc().unwrap();
    assert_eq!(listed, vec![keep]);
}

#[test]
fn delete_missing_record_returns_not_found() {
    let repo = memory_repo();

    let ghost = Uuid::new_v4();
    let err = repo.delete_record(ghost).unwrap_err();
    match err {
        RepoError::NotFound(id) => assert_eq!(id, ghost),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn insert_rejects_invalid_timestamp() {
    let repo = memory_repo();

    let invalid = Record::with_id(Uuid::new_v4(), 0);
    let err = repo.insert_record(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_records_desc().unwrap().is_empty());
}

#[test]
fn corrupt_uuid_in_storage_surfaces_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO records (uuid, created_at) VALUES ('not-a-uuid', 1000);",
        [],
    )
    .unwrap();

    let repo = SqliteRecordRepository::new(conn);
    let err = repo.list_records_desc().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn corrupt_timestamp_in_storage_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        &format!(
            "INSERT INTO records (uuid, created_at) VALUES ('{}', 0);",
            Uuid::new_v4()
        ),
        [],
    )
    .unwrap();

    let repo = SqliteRecordRepository::new(conn);
    let err = repo.list_records_desc().unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn commit_succeeds_in_autocommit_mode() {
    let repo = memory_repo();

    let record = Record::with_id(Uuid::new_v4(), 1_000);
    repo.insert_record(&record).unwrap();
    repo.commit().unwrap();

    assert_eq!(repo.list_records_desc().unwrap(), vec![record]);
}
