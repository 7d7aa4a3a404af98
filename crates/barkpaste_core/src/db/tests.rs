//! Store contract tests against both redb backends.

use super::*;
use crate::models::paste::never_expires;
use chrono::{Duration, TimeZone};
use tempfile::TempDir;

fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn regular(id: &str, expires_at: DateTime<Utc>) -> Paste {
    Paste::regular(id.to_string(), id.as_bytes().to_vec(), expires_at)
}

#[test]
fn paste_create_get_update_delete_roundtrip() {
    let (db, _temp) = setup_test_db();

    let paste = regular("abcd1234", t0());
    db.pastes.create(&paste).expect("create");
    assert_eq!(db.pastes.get_by_id("abcd1234").expect("get"), paste);

    let mut changed = paste.clone();
    changed.content = b"Updated".to_vec();
    changed.expires_at = t0() + Duration::hours(1);
    let updated = db.pastes.update(&changed).expect("update");
    assert_eq!(updated.content, b"Updated");
    assert_eq!(
        db.pastes.get_by_id("abcd1234").expect("get").expires_at,
        t0() + Duration::hours(1)
    );

    let deleted = db.pastes.delete("abcd1234").expect("delete");
    assert_eq!(deleted.content, b"Updated");
    assert!(matches!(
        db.pastes.get_by_id("abcd1234"),
        Err(AppError::NotFound)
    ));
}

#[test]
fn paste_create_rejects_duplicate_id_without_overwrite() {
    let db = Database::in_memory().expect("db");

    let original = Paste::persistent("mydoc".into(), b"original".to_vec(), never_expires());
    db.pastes.create(&original).expect("create original");

    let conflicting = regular("mydoc", t0());
    let err = db
        .pastes
        .create(&conflicting)
        .expect_err("duplicate id create must fail");
    assert!(matches!(err, AppError::Exists), "unexpected error: {err}");

    assert_eq!(db.pastes.get_by_id("mydoc").expect("lookup"), original);
    assert_eq!(db.pastes.list().expect("list").len(), 1);
}

#[test]
fn update_and_delete_missing_paste_report_not_found() {
    let db = Database::in_memory().expect("db");
    assert!(matches!(
        db.pastes.update(&regular("ghost", t0())),
        Err(AppError::NotFound)
    ));
    assert!(matches!(db.pastes.delete("ghost"), Err(AppError::NotFound)));
}

#[test]
fn update_cannot_flip_persistence() {
    let db = Database::in_memory().expect("db");
    let original = regular("flip", t0());
    db.pastes.create(&original).expect("create");

    let attempt = Paste::persistent("flip".into(), b"x".to_vec(), t0());
    let stored = db.pastes.update(&attempt).expect("update");
    assert!(!stored.is_persistent);

    assert_eq!(db.pastes.clean_expired(t0() + Duration::seconds(1)).unwrap(), 1);
}

#[test]
fn clean_expired_removes_only_expired_regular_pastes() {
    let db = Database::in_memory().expect("db");
    let now = t0();

    db.pastes
        .create(&regular("old", now - Duration::minutes(5)))
        .unwrap();
    db.pastes
        .create(&regular("fresh", now + Duration::minutes(5)))
        .unwrap();
    db.pastes
        .create(&regular("edge", now))
        .unwrap();
    db.pastes
        .create(&Paste::persistent(
            "kept".into(),
            b"x".to_vec(),
            now - Duration::days(30),
        ))
        .unwrap();

    assert_eq!(db.pastes.clean_expired(now).expect("sweep"), 1);

    let mut ids: Vec<String> = db
        .pastes
        .list()
        .unwrap()
        .into_iter()
        .map(|paste| paste.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["edge", "fresh", "kept"]);

    assert_eq!(db.pastes.clean_expired(now).expect("second sweep"), 0);
    assert_eq!(db.pastes.list().unwrap().len(), 3);
}

#[test]
fn clean_expired_follows_updated_expiry() {
    let db = Database::in_memory().expect("db");
    let now = t0();
    let mut paste = regular("moved", now + Duration::hours(1));
    db.pastes.create(&paste).unwrap();

    paste.expires_at = now - Duration::hours(1);
    db.pastes.update(&paste).unwrap();
    assert_eq!(db.pastes.clean_expired(now).unwrap(), 1);

    let mut extended = regular("extended", now - Duration::hours(1));
    db.pastes.create(&extended).unwrap();
    extended.expires_at = now + Duration::hours(1);
    db.pastes.update(&extended).unwrap();
    assert_eq!(db.pastes.clean_expired(now).unwrap(), 0);
    assert!(db.pastes.get_by_id("extended").is_ok());
}

#[test]
fn deleted_regular_paste_is_not_swept_twice() {
    let db = Database::in_memory().expect("db");
    db.pastes
        .create(&regular("gone", t0() - Duration::hours(1)))
        .unwrap();
    db.pastes.delete("gone").unwrap();
    assert_eq!(db.pastes.clean_expired(t0()).unwrap(), 0);
}

#[test]
fn data_survives_reopen() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("db");
    let path = path.to_str().expect("db path");
    {
        let db = Database::new(path).expect("open");
        db.pastes.create(&regular("keep", t0())).unwrap();
        db.tokens.create(&Token::new("tok")).unwrap();
    }
    let db = Database::new(path).expect("reopen");
    assert!(db.pastes.get_by_id("keep").is_ok());
    assert!(db.tokens.exists("tok").unwrap());
}

#[test]
fn token_create_exists_delete() {
    let db = Database::in_memory().expect("db");

    assert!(!db.tokens.exists("alpha").unwrap());
    db.tokens.create(&Token::new("alpha")).unwrap();
    assert!(db.tokens.exists("alpha").unwrap());
    assert!(matches!(
        db.tokens.create(&Token::new("alpha")),
        Err(AppError::Exists)
    ));
    assert_eq!(db.tokens.list().unwrap(), vec![Token::new("alpha")]);

    db.tokens.delete("alpha").unwrap();
    assert!(!db.tokens.exists("alpha").unwrap());
    assert!(matches!(db.tokens.delete("alpha"), Err(AppError::NotFound)));
}

#[test]
fn empty_token_never_exists() {
    let db = Database::in_memory().expect("db");
    assert!(!db.tokens.exists("").unwrap());
}

#[test]
fn bootstrap_seeds_only_an_empty_store() {
    let db = Database::in_memory().expect("db");
    let tokens = db.token_store();

    assert!(bootstrap_default_token(tokens.as_ref(), "seed").unwrap());
    assert!(tokens.exists("seed").unwrap());

    assert!(!bootstrap_default_token(tokens.as_ref(), "other").unwrap());
    assert!(!tokens.exists("other").unwrap());
    assert_eq!(tokens.list().unwrap().len(), 1);
}

#[test]
fn bootstrap_skips_empty_default() {
    let db = Database::in_memory().expect("db");
    assert!(!bootstrap_default_token(db.tokens.as_ref(), "").unwrap());
    assert!(db.tokens.list().unwrap().is_empty());
}

#[test]
fn concurrent_creates_with_same_id_admit_exactly_one() {
    use std::sync::Barrier;
    use std::thread;

    let db = Arc::new(Database::in_memory().expect("db"));
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let db = db.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let paste = Paste::regular("race".into(), vec![n as u8 + 1], t0());
                db.pastes.create(&paste)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();
    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| matches!(err, AppError::Exists)));
}
