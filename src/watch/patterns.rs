// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::trace;

use crate::errors::{GlobwatchError, Result};
use crate::fs::FileSystem;

/// Characters that make a path component a wildcard rather than a literal.
const META_CHARS: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// A compiled shell-style glob that can be expanded against a filesystem.
///
/// Semantics follow the usual shell rules:
///
/// - `*` and `?` never cross a `/`.
/// - `[...]` and `{a,b}` work within a single component.
/// - `**` matches any number of directories.
///
/// Expansion starts from the longest literal directory prefix of the pattern
/// (e.g. `/var/log` for `/var/log/*.log`) and only descends as deep as the
/// pattern has components, so `logs/*.log` never reads `logs/old/`.
/// Under `**` the walk does not descend into symlinked directories, so link
/// cycles terminate. Entries whose names are not
/// valid UTF-8 are skipped, since filenames are reported as strings.
#[derive(Clone)]
pub struct GlobPattern {
    raw: String,
    matcher: GlobMatcher,
    /// Literal directory prefix, spelled as in the pattern. Empty means cwd.
    base: String,
    /// Components below `base`. `None` when the pattern contains `**`.
    max_depth: Option<usize>,
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobPattern")
            .field("raw", &self.raw)
            .field("base", &self.base)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl GlobPattern {
    /// Compile `pattern`, failing for malformed input such as an unterminated
    /// character class (`logs/[a-z.log`).
    pub fn compile(pattern: &str) -> Result<Self> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| GlobwatchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?
            .compile_matcher();

        let components: Vec<&str> = pattern.split('/').collect();
        let literal_len = components
            .iter()
            .take(components.len().saturating_sub(1))
            .take_while(|c| !c.contains(META_CHARS))
            .count();

        let mut base = components[..literal_len].join("/");
        if base.is_empty() && pattern.starts_with('/') {
            base = "/".to_string();
        }

        let rest = &components[literal_len..];
        let max_depth = if rest.iter().any(|c| c.contains("**")) {
            None
        } else {
            Some(rest.len())
        };

        Ok(Self {
            raw: pattern.to_string(),
            matcher,
            base,
            max_depth,
        })
    }

    /// The pattern as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if `path` (spelled like the pattern) matches.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// List every path currently matching the pattern, sorted.
    ///
    /// Directories that cannot be read are skipped; a pattern whose base
    /// directory does not exist simply yields nothing.
    pub fn expand(&self, fs: &dyn FileSystem) -> Vec<String> {
        let mut matches = Vec::new();
        let mut stack = vec![(self.base.clone(), 0usize)];

        while let Some((dir, depth)) = stack.pop() {
            let read_from = if dir.is_empty() { "." } else { dir.as_str() };
            let entries = match fs.read_dir(Path::new(read_from)) {
                Ok(entries) => entries,
                Err(err) => {
                    trace!(dir = %read_from, error = %err, "skipping unreadable directory");
                    continue;
                }
            };

            let depth = depth + 1;
            for entry in entries {
                let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                    trace!(entry = %entry.display(), "skipping non UTF-8 name");
                    continue;
                };
                let candidate = join_display(&dir, name);

                if self.matches(&candidate) {
                    matches.push(candidate.clone());
                }

                let descend = match self.max_depth {
                    Some(max) => depth < max,
                    None => !fs.is_symlink(Path::new(&candidate)),
                };
                if descend && fs.is_dir(Path::new(&candidate)) {
                    stack.push((candidate, depth));
                }
            }
        }

        matches.sort();
        matches.dedup();
        matches
    }
}

fn join_display(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}
