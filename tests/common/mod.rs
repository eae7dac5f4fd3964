#![allow(dead_code)]

use std::path::Path;

pub use globwatch_test_utils::{assert_quiet, init_tracing, next_event, with_timeout};

/// Write `content` to `dir/name` and return the path the way the watcher will
/// spell it for a `dir/*.ext` pattern.
pub fn write_test_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write test file");
    path.to_string_lossy().into_owned()
}

/// `<dir>/*.log`
pub fn log_pattern(dir: &Path) -> String {
    format!("{}/*.log", dir.display())
}
