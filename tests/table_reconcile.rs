use globwatch::fs::mock::MockFileSystem;
use globwatch::watch::{Event, WatchTable, WatchedFile};

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn first_observation_adds_without_size_event() {
    let fs = MockFileSystem::new();
    fs.add_file("logs/a.log", b"hello".to_vec());

    let mut table = WatchTable::new();
    let events = table.reconcile(&fs, &names(&["logs/a.log"]));

    assert_eq!(events, vec![Event::added("logs/a.log")]);
    let file = table.get("logs/a.log").copied();
    assert_eq!(file, Some(WatchedFile::new(5)));
    assert_eq!(file.and_then(|f| f.previous_size()), Some(5));
}

#[test]
fn shrink_truncates_and_growth_is_silent() {
    let fs = MockFileSystem::new();
    fs.add_file("a.log", b"0123456789".to_vec());
    let candidates = names(&["a.log"]);

    let mut table = WatchTable::new();
    table.reconcile(&fs, &candidates);

    fs.set_len("a.log", 4).unwrap();
    assert_eq!(table.reconcile(&fs, &candidates), vec![Event::truncated("a.log")]);

    fs.set_len("a.log", 12).unwrap();
    assert!(table.reconcile(&fs, &candidates).is_empty());

    // Only the immediately preceding size counts: 12 -> 8 is a shrink even
    // though 8 is above the earlier low point.
    fs.set_len("a.log", 8).unwrap();
    assert_eq!(table.reconcile(&fs, &candidates), vec![Event::truncated("a.log")]);
    assert_eq!(table.get("a.log").map(|f| f.current_size()), Some(8));
}

#[test]
fn unchanged_file_is_reported_once() {
    let fs = MockFileSystem::new();
    fs.add_file("steady.log", b"same".to_vec());
    let candidates = names(&["steady.log"]);

    let mut table = WatchTable::new();
    let mut all = Vec::new();
    for _ in 0..20 {
        all.extend(table.reconcile(&fs, &candidates));
    }

    assert_eq!(all, vec![Event::added("steady.log")]);
}

#[test]
fn stat_failure_on_tracked_file_is_a_delete() {
    let fs = MockFileSystem::new();
    fs.add_file("gone.log", b"x".to_vec());

    let mut table = WatchTable::new();
    table.reconcile(&fs, &names(&["gone.log"]));

    fs.remove("gone.log");
    // The glob no longer reports it either.
    let events = table.reconcile(&fs, &[]);

    assert_eq!(events, vec![Event::deleted("gone.log")]);
    assert!(table.is_empty());
    assert!(table.reconcile(&fs, &[]).is_empty());
}

#[test]
fn candidate_that_vanished_before_stat_is_skipped() {
    let fs = MockFileSystem::new();

    let mut table = WatchTable::new();
    let events = table.reconcile(&fs, &names(&["ghost.log"]));

    assert!(events.is_empty());
    assert!(!table.contains("ghost.log"));
}

#[test]
fn existing_files_are_checked_before_new_ones_are_added() {
    let fs = MockFileSystem::new();
    fs.add_file("b.log", b"bbbb".to_vec());
    fs.add_file("c.log", b"cccc".to_vec());

    let mut table = WatchTable::new();
    table.reconcile(&fs, &names(&["b.log", "c.log"]));

    fs.remove("b.log");
    fs.set_len("c.log", 1).unwrap();
    fs.add_file("a.log", b"a".to_vec());

    let events = table.reconcile(&fs, &names(&["a.log", "c.log"]));
    assert_eq!(
        events,
        vec![
            Event::deleted("b.log"),
            Event::truncated("c.log"),
            Event::added("a.log"),
        ]
    );
    assert_eq!(table.filenames().collect::<Vec<_>>(), vec!["a.log", "c.log"]);
}

#[test]
fn recreated_file_is_added_again() {
    let fs = MockFileSystem::new();
    fs.add_file("r.log", b"old".to_vec());
    let candidates = names(&["r.log"]);

    let mut table = WatchTable::new();
    table.reconcile(&fs, &candidates);

    fs.remove("r.log");
    assert_eq!(table.reconcile(&fs, &[]), vec![Event::deleted("r.log")]);

    fs.add_file("r.log", b"new contents".to_vec());
    assert_eq!(table.reconcile(&fs, &candidates), vec![Event::added("r.log")]);
}

#[test]
fn tracked_file_outside_the_glob_keeps_being_checked() {
    // Tracking is driven by stat, not by the glob: a file that stops matching
    // but still exists stays tracked.
    let fs = MockFileSystem::new();
    fs.add_file("a.log", b"abc".to_vec());

    let mut table = WatchTable::new();
    table.reconcile(&fs, &names(&["a.log"]));

    fs.set_len("a.log", 1).unwrap();
    assert_eq!(table.reconcile(&fs, &[]), vec![Event::truncated("a.log")]);
    assert!(table.contains("a.log"));
}

#[test]
fn watched_file_observe_compares_with_previous_tick_only() {
    let mut file = WatchedFile::new(10);
    assert!(!file.observe(10));
    assert!(!file.observe(11));
    assert!(file.observe(3));
    assert_eq!(file.previous_size(), Some(11));
    assert_eq!(file.current_size(), 3);
    assert!(!file.observe(3));
}
