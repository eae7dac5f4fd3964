mod common;
use crate::common::{assert_quiet, init_tracing, next_event, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use globwatch::fs::mock::MockFileSystem;
use globwatch::watch::{spawn_watcher, Event, GlobWatcher};

#[tokio::test]
async fn mock_filesystem_drives_the_full_lifecycle() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("var/log/a.log", b"aaaa".to_vec());

    let (mut events, cancel) = spawn_watcher("var/log/*.log", Duration::ZERO, Arc::new(fs.clone()));

    assert_eq!(next_event(&mut events).await, Event::added("var/log/a.log"));

    fs.add_file("var/log/b.log", b"bb".to_vec());
    assert_eq!(next_event(&mut events).await, Event::added("var/log/b.log"));

    fs.set_len("var/log/a.log", 1).unwrap();
    assert_eq!(next_event(&mut events).await, Event::truncated("var/log/a.log"));

    fs.remove("var/log/b.log");
    assert_eq!(next_event(&mut events).await, Event::deleted("var/log/b.log"));

    cancel.cancel();
    assert!(with_timeout(events.recv()).await.is_none());
}

#[tokio::test]
async fn one_tick_emits_deletes_before_adds() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("z.log", b"z".to_vec());

    let (mut events, cancel) = GlobWatcher::new("*.log", Duration::from_millis(20))
        .with_filesystem(Arc::new(fs.clone()))
        .start();

    assert_eq!(next_event(&mut events).await, Event::added("z.log"));

    // Both changes land before the next tick runs.
    fs.remove("z.log");
    fs.add_file("a.log", b"a".to_vec());

    assert_eq!(next_event(&mut events).await, Event::deleted("z.log"));
    assert_eq!(next_event(&mut events).await, Event::added("a.log"));

    cancel.cancel();
}

#[tokio::test]
async fn slow_consumer_holds_back_the_watcher() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.log", b"a".to_vec());
    fs.add_file("b.log", b"b".to_vec());

    let (mut events, cancel) = spawn_watcher("*.log", Duration::ZERO, Arc::new(fs.clone()));

    // Nothing is consumed for a while; the watcher must stay blocked on the
    // first hand-off instead of racing ahead.
    tokio::time::sleep(Duration::from_millis(50)).await;
    fs.remove("a.log");
    fs.remove("b.log");

    // a.log was found before the removal and is delivered, followed by its
    // deletion once the watcher gets to tick again. b.log's add was computed in
    // the same tick, so it is delivered too.
    assert_eq!(next_event(&mut events).await, Event::added("a.log"));
    assert_eq!(next_event(&mut events).await, Event::added("b.log"));
    assert_eq!(next_event(&mut events).await, Event::deleted("a.log"));
    assert_eq!(next_event(&mut events).await, Event::deleted("b.log"));

    assert_quiet(&mut events, Duration::from_millis(50)).await;
    cancel.cancel();
}

#[tokio::test]
async fn dropping_the_stream_stops_the_watcher() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.log", b"a".to_vec());

    let (mut events, cancel) = spawn_watcher("*.log", Duration::ZERO, Arc::new(fs.clone()));
    assert_eq!(next_event(&mut events).await, Event::added("a.log"));

    // Still polling while the stream is alive.
    let running = fs.read_dir_calls();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(fs.read_dir_calls() > running);

    drop(events);
    tokio::time::sleep(Duration::from_millis(20)).await;
    let stopped = fs.read_dir_calls();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fs.read_dir_calls(), stopped, "watcher kept polling after drop");

    cancel.cancel();
}
