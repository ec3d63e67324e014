//! Expansion of shell-style input patterns.
//!
//! Arguments like `exports/*.zip` are expanded here rather than relying on
//! the shell, so quoting a pattern (or running on a shell that does not
//! glob) still works. Arguments without glob metacharacters are passed
//! through untouched, so a missing file surfaces as an error when it is
//! opened instead of being silently dropped.

use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{Result, TweetpackError};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Returns `true` if `s` contains a glob metacharacter.
pub fn has_glob_meta(s: &str) -> bool {
    s.contains(GLOB_META)
}

/// Expands every pattern, keeping argument order.
///
/// Matches of a single pattern are sorted lexicographically. A pattern that
/// matches nothing contributes nothing.
pub fn expand_inputs<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        paths.extend(expand_pattern(pattern.as_ref())?);
    }
    Ok(paths)
}

/// Expands a single pattern into existing files.
///
/// Directories that cannot be read while walking are skipped with a warning.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !has_glob_meta(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| TweetpackError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let (base, depth) = split_base(pattern);
    let relative = base.as_os_str().is_empty();
    let root = if relative { Path::new(".") } else { base.as_path() };
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).min_depth(1);
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let candidate = if relative {
            entry.path().strip_prefix(".").unwrap_or(entry.path())
        } else {
            entry.path()
        };
        if matcher.is_match(candidate) {
            matches.push(candidate.to_path_buf());
        }
    }
    matches.sort();
    Ok(matches)
}

/// Splits a pattern into the literal directory prefix to walk from and the
/// maximum walk depth (`None` when a `**` component allows any depth).
fn split_base(pattern: &str) -> (PathBuf, Option<usize>) {
    let mut base = PathBuf::new();
    let mut components = Path::new(pattern).components().peekable();
    while let Some(component) = components.peek() {
        let literal = match component {
            Component::Normal(part) => !has_glob_meta(&part.to_string_lossy()),
            _ => true,
        };
        if !literal {
            break;
        }
        base.push(component.as_os_str());
        components.next();
    }

    let rest: Vec<_> = components.collect();
    let recursive = rest.iter().any(|c| c.as_os_str() == "**");
    let depth = (!recursive).then_some(rest.len());
    (base, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_has_glob_meta() {
        assert!(has_glob_meta("*.zip"));
        assert!(has_glob_meta("a/twitter-?.zip"));
        assert!(!has_glob_meta("a/twitter.zip"));
    }

    #[test]
    fn test_literal_passthrough() {
        let paths = expand_pattern("does/not/exist.zip").unwrap();
        assert_eq!(paths, [PathBuf::from("does/not/exist.zip")]);
    }

    #[test]
    fn test_split_base() {
        let (base, depth) = split_base("exports/2021/*.zip");
        assert_eq!(base, PathBuf::from("exports/2021"));
        assert_eq!(depth, Some(1));

        let (base, depth) = split_base("exports/**/*.zip");
        assert_eq!(base, PathBuf::from("exports"));
        assert_eq!(depth, None);

        let (base, depth) = split_base("*/twitter.zip");
        assert_eq!(base, PathBuf::new());
        assert_eq!(depth, Some(2));
    }

    #[test]
    fn test_expand_sorted_matches() {
        let dir = tempdir().unwrap();
        for name in ["b.zip", "a.zip", "c.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.zip"), "").unwrap();

        let pattern = format!("{}/*.zip", dir.path().display());
        let paths = expand_pattern(&pattern).unwrap();
        assert_eq!(paths, [dir.path().join("a.zip"), dir.path().join("b.zip")]);
    }

    #[test]
    fn test_expand_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x").join("y")).unwrap();
        fs::write(dir.path().join("x").join("y").join("deep.zip"), "").unwrap();

        let pattern = format!("{}/**/*.zip", dir.path().display());
        let paths = expand_pattern(&pattern).unwrap();
        assert_eq!(paths, [dir.path().join("x").join("y").join("deep.zip")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("open")).unwrap();
        fs::write(dir.path().join("open").join("a.zip"), "").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("b.zip"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let pattern = format!("{}/**/*.zip", dir.path().display());
        let result = expand_pattern(&pattern);
        let still_readable = fs::read_dir(&locked).is_ok();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let paths = result.unwrap();
        assert!(paths.contains(&dir.path().join("open").join("a.zip")));
        if !still_readable {
            assert_eq!(paths, [dir.path().join("open").join("a.zip")]);
        }
    }

    #[test]
    fn test_expand_no_match_is_empty() {
        let dir = tempdir().unwrap();
        let pattern = format!("{}/*.zip", dir.path().display());
        assert!(expand_pattern(&pattern).unwrap().is_empty());
    }

    #[test]
    fn test_expand_inputs_keeps_argument_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.zip"), "").unwrap();
        let z = dir.path().join("z.zip").display().to_string();
        let glob = format!("{}/a*.zip", dir.path().display());
        let paths = expand_inputs(&[z.clone(), glob]).unwrap();
        assert_eq!(paths, [PathBuf::from(z), dir.path().join("a.zip")]);
    }
}
