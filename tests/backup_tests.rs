mod common;
use chrono::Duration as ChronoDuration;
use common::{open_store, sample, utc};
use practicelog::core::backup::{BackupLogic, is_snapshot_name};
use practicelog::core::scheduler::BackupScheduler;
use practicelog::db::Store;
use practicelog::models::LogEntry;
use practicelog::utils::logging::TEST_LOGGING;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn snapshot_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| is_snapshot_name(n))
        .collect();
    names.sort();
    names
}

#[test]
fn test_backup_of_empty_store_is_empty_array() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let logic = BackupLogic::new(dir.path().join("backups"), 3);

    let path = logic.run_tick(&store).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!([]));
    let parsed: Vec<LogEntry> = serde_json::from_str(&content).unwrap();
    assert!(parsed.is_empty());
}

#[test]
fn test_backup_contains_all_entries_pretty_printed() {
    let dir = tempdir().unwrap();
    let (store, clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    store.insert(&mut sample("A", 10)).unwrap();
    clock.advance(ChronoDuration::minutes(1));
    store.insert(&mut sample("B", 20)).unwrap();

    let logic = BackupLogic::new(dir.path().join("backups"), 3);
    let path = logic.run_tick(&store).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "backup-2025-09-01_10-01-00.json"
    );
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  "));
    let parsed: Vec<LogEntry> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, store.get_all().unwrap());
}

#[test]
fn test_same_second_snapshots_do_not_collide() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let backups = dir.path().join("backups");
    let logic = BackupLogic::new(&backups, 10);

    let first = logic.run_tick(&store).unwrap();
    let second = logic.run_tick(&store).unwrap();
    let third = logic.run_tick(&store).unwrap();

    assert_ne!(first, second);
    assert_ne!(second, third);
    let names = snapshot_names(&backups);
    assert_eq!(
        names,
        vec![
            "backup-2025-09-01_10-00-00.json",
            "backup-2025-09-01_10-00-00_000001.json",
            "backup-2025-09-01_10-00-00_000002.json",
        ]
    );
}

#[test]
fn test_same_second_ticks_keep_the_newest_snapshots() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    store.insert(&mut sample("A", 10)).unwrap();
    let backups = dir.path().join("backups");
    let logic = BackupLogic::new(&backups, 2);

    let mut written = Vec::new();
    for _ in 0..4 {
        let path = logic.run_tick(&store).unwrap();
        // rotation must never remove the snapshot the tick just wrote
        assert!(path.exists(), "{} was pruned", path.display());
        written.push(path.file_name().unwrap().to_string_lossy().to_string());
    }

    let unique: std::collections::HashSet<_> = written.iter().collect();
    assert_eq!(unique.len(), 4);
    assert_eq!(snapshot_names(&backups), written[2..].to_vec());
    assert_eq!(
        written[2..],
        [
            "backup-2025-09-01_10-00-00_000002.json",
            "backup-2025-09-01_10-00-00_000003.json",
        ]
    );
}

#[test]
fn test_suffix_continues_after_existing_wide_numbers() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let backups = dir.path().join("backups");
    fs::create_dir_all(&backups).unwrap();
    fs::write(backups.join("backup-2025-09-01_10-00-00_000999.json"), "[]").unwrap();
    // other seconds do not count
    fs::write(backups.join("backup-2025-09-01_10-00-01_004000.json"), "[]").unwrap();

    let logic = BackupLogic::new(&backups, 10);
    let path = logic.run_tick(&store).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "backup-2025-09-01_10-00-00_001000.json"
    );
    let names = snapshot_names(&backups);
    let pos = names
        .iter()
        .position(|n| n == "backup-2025-09-01_10-00-00_001000.json")
        .unwrap();
    assert_eq!(names[pos - 1], "backup-2025-09-01_10-00-00_000999.json");
}

#[test]
fn test_rotation_keeps_most_recent() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let backups = dir.path().join("backups");
    fs::create_dir_all(&backups).unwrap();

    let retention = 4;
    for day in 1..=(retention + 5) {
        fs::write(
            backups.join(format!("backup-2025-08-{day:02}_12-00-00.json")),
            "[]",
        )
        .unwrap();
    }
    // not ours: must survive rotation
    fs::write(backups.join("notes.txt"), "keep").unwrap();
    fs::write(backups.join("backup-manual.zip"), "keep").unwrap();
    fs::create_dir(backups.join("backup-dir.json")).unwrap();

    let logic = BackupLogic::new(&backups, retention);
    let newest = logic.run_tick(&store).unwrap();

    let names = snapshot_names(&backups);
    assert_eq!(names.len(), retention);
    assert_eq!(
        names,
        vec![
            "backup-2025-08-07_12-00-00.json",
            "backup-2025-08-08_12-00-00.json",
            "backup-2025-08-09_12-00-00.json",
            "backup-2025-09-01_10-00-00.json",
        ]
    );
    assert!(newest.exists());
    assert!(backups.join("notes.txt").exists());
    assert!(backups.join("backup-manual.zip").exists());
    assert!(backups.join("backup-dir.json").is_dir());
}

#[test]
fn test_rotate_alone_prunes_to_retention() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    fs::create_dir_all(&backups).unwrap();
    let n = 3;
    for i in 0..(n + 5) {
        fs::write(
            backups.join(format!("backup-2025-01-01_00-00-{i:02}.json")),
            "[]",
        )
        .unwrap();
    }

    let logic = BackupLogic::new(&backups, n);
    let deleted = logic.rotate().unwrap();

    assert_eq!(deleted.len(), 5);
    assert_eq!(
        snapshot_names(&backups),
        vec![
            "backup-2025-01-01_00-00-05.json",
            "backup-2025-01-01_00-00-06.json",
            "backup-2025-01-01_00-00-07.json",
        ]
    );
    // nothing else to do on a second pass
    assert!(logic.rotate().unwrap().is_empty());
}

#[test]
fn test_zero_retention_keeps_the_new_snapshot() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let logic = BackupLogic::new(dir.path().join("backups"), 0);
    assert_eq!(logic.retention(), 1);

    let path = logic.run_tick(&store).unwrap();
    assert!(path.exists());
}

#[test]
fn test_tick_on_closed_store_reports_error() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    store.close().unwrap();

    let logic = BackupLogic::new(dir.path().join("backups"), 3);
    assert!(logic.run_tick(&store).is_err());
    assert!(!dir.path().join("backups").exists());
}

#[tokio::test]
async fn test_scheduler_writes_snapshots_until_stopped() {
    *TEST_LOGGING;
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("practicelog.db")).unwrap());
    store.insert(&mut sample("A", 10)).unwrap();

    let backups = dir.path().join("backups");
    let scheduler = BackupScheduler::spawn(
        Arc::clone(&store),
        BackupLogic::new(&backups, 2),
        Duration::from_millis(50),
        CancellationToken::new(),
    );

    tokio::time::sleep(Duration::from_millis(400)).await;
    scheduler.stop().await.unwrap();

    let after_stop = snapshot_names(&backups);
    assert!(!after_stop.is_empty());
    assert!(after_stop.len() <= 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(snapshot_names(&backups), after_stop);
}

#[tokio::test]
async fn test_scheduler_stops_on_external_cancel() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("practicelog.db")).unwrap());
    let token = CancellationToken::new();
    let backups = dir.path().join("backups");

    let scheduler = BackupScheduler::spawn(
        store,
        BackupLogic::new(&backups, 2),
        Duration::from_secs(3600),
        token.clone(),
    );

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !scheduler.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("scheduler did not stop");

    // first tick is one full interval away: nothing written
    assert!(!backups.exists());
    scheduler.stop().await.unwrap();
}

#[tokio::test]
async fn test_scheduler_survives_failing_ticks() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("practicelog.db")).unwrap());
    store.close().unwrap();

    let scheduler = BackupScheduler::spawn(
        Arc::clone(&store),
        BackupLogic::new(dir.path().join("backups"), 2),
        Duration::from_millis(20),
        CancellationToken::new(),
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!scheduler.is_finished());
    scheduler.stop().await.unwrap();
}

#[test]
fn test_tracker_backup_tick_uses_configured_dir() {
    let dir = tempdir().unwrap();
    let (store, _clock) = open_store(dir.path(), utc(2025, 9, 1, 10, 0, 0));
    let backups = dir.path().join("backups");
    let tracker = practicelog::core::Tracker::new(
        Arc::new(store),
        BackupLogic::new(&backups, 3),
        dir.path().join("export.xlsx"),
    );
    tracker.insert(&mut sample("A", 10)).unwrap();

    let path = tracker.run_backup_tick().unwrap();

    assert_eq!(path.parent().unwrap(), backups.as_path());
    let parsed: Vec<LogEntry> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].external_ref, "A");
}
