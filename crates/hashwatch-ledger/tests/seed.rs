use std::fs;

use hashwatch_fingerprint::{Fingerprint, fingerprint};
use hashwatch_ledger::Ledger;
use tempfile::tempdir;

#[test]
fn seed_takes_tagged_stems_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rsXYZ.png"), b"png").unwrap();
    fs::write(dir.path().join("rsABC.unknown"), b"???").unwrap();
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let mut ledger = Ledger::new();
    let added = ledger.seed(dir.path()).unwrap();

    assert_eq!(added, 2);
    assert_eq!(ledger.len(), 2);

    let xyz = Fingerprint::from_file_name("rsXYZ").unwrap();
    let abc = Fingerprint::from_file_name("rsABC").unwrap();
    assert!(ledger.has(&xyz));
    assert!(ledger.has(&abc));
    assert!(Fingerprint::from_file_name("notes").is_none());
}

#[test]
fn seed_ignores_subdirectories_without_tag() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("collisions")).unwrap();
    fs::write(dir.path().join(".rs+0x0.tmp"), b"partial").unwrap();

    let ledger = Ledger::seeded(dir.path()).unwrap();
    assert!(ledger.is_empty());
}

#[test]
fn seeded_fingerprint_is_a_collision() {
    let dir = tempdir().unwrap();
    let fp = fingerprint(b"hello");
    fs::write(dir.path().join(fp.file_name("txt")), b"hello").unwrap();

    let mut ledger = Ledger::seeded(dir.path()).unwrap();
    assert!(ledger.has(&fingerprint(b"hello")));

    ledger.record_collision();
    assert_eq!(ledger.collision_count(), 1);
    assert_eq!(ledger.success_count(), 0);
    assert_eq!(ledger.time_to_collide(), &[0]);
}

#[test]
fn seeding_twice_adds_nothing_new() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rsXYZ.png"), b"png").unwrap();

    let mut ledger = Ledger::new();
    assert_eq!(ledger.seed(dir.path()).unwrap(), 1);
    assert_eq!(ledger.seed(dir.path()).unwrap(), 0);
}
