//! String-level path helpers.
//!
//! Job and root paths are compared as plain strings, so every comparison goes
//! through [`normalize`] first. None of these functions touch the filesystem.

use std::path::PathBuf;

/// Collapses every run of `/` into a single separator, then strips one
/// trailing separator if present.
///
/// `normalize("/")` yields the empty string; callers must not rely on the
/// root being preserved.
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut previous_was_separator = false;
    for c in path.chars() {
        if c == '/' {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        normalized.push(c);
    }
    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Joins `relative` under `base` and normalizes the result.
///
/// A leading separator on `relative` does not make it absolute:
/// `join("/home/data/", "/media/")` is `/home/data/media`.
pub fn join(base: &str, relative: &str) -> String {
    normalize(&format!("{base}/{relative}"))
}

/// Returns true if `path` starts with `prefix` once both are normalized.
pub fn has_prefix(path: &str, prefix: &str) -> bool {
    normalize(path).starts_with(&normalize(prefix))
}

/// Expands a leading `~` or `$HOME` to the user's home directory.
pub fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(format!("{}{rest}", home.to_string_lossy()));
        }
    } else if let Some(rest) = input.strip_prefix("$HOME") {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(format!("{}{rest}", home.to_string_lossy()));
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let cases = [
            ("/path/to//normalize/", "/path/to/normalize"),
            ("/path//with//double/slashes/", "/path/with/double/slashes"),
            ("/trailing/slash/", "/trailing/slash"),
            ("/no/trailing/slash", "/no/trailing/slash"),
            ("/a///b////", "/a/b"),
            ("relative//dir/", "relative/dir"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_normalize_doubled_separator_position() {
        assert_eq!(normalize("/a//b/"), "/a/b");
        assert_eq!(normalize("/a/b/"), "/a/b");
        assert_eq!(normalize("//a/b"), "/a/b");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["/a//b/", "//", "/", "", "x/", "/x///y//z///", "a"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_normalize_root_is_not_preserved() {
        assert_eq!(normalize("/"), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/home/data", "media"), "/home/data/media");
        assert_eq!(join("/home/data/", "/projects/P1/"), "/home/data/projects/P1");
        assert_eq!(join("/home/data", ""), "/home/data");
    }

    #[test]
    fn test_has_prefix() {
        assert!(has_prefix("/home/user/documents", "/home/user"));
        assert!(has_prefix("/home/user//documents/", "/home/user/"));
        assert!(has_prefix("/home/user", "/home/user"));
        assert!(!has_prefix("/home", "/home/user"));
        // Plain string prefix, not component-wise.
        assert!(has_prefix("/home/user2", "/home/user"));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home("~/backup.yaml"),
            PathBuf::from(format!("{}/backup.yaml", home.to_string_lossy()))
        );
        assert_eq!(
            expand_home("$HOME/backup.yaml"),
            PathBuf::from(format!("{}/backup.yaml", home.to_string_lossy()))
        );
        assert_eq!(expand_home("config.yaml"), PathBuf::from("config.yaml"));
    }
}
