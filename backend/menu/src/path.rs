//! Path algebra.
//!
//! A menu path always ends with `/` (`/settings/language/`), an action path
//! never does (`/settings/language/lang:de`). Buttons and actions refer to
//! their targets with paths relative to the menu they live in.

use crate::error::{MenuError, Result};

/// Resolve `relative` against the absolute `parent` path.
///
/// * `/…` is absolute and returned as is.
/// * `..` goes up one menu; `../..` two, `../x` into a sibling.
/// * `.` is the menu `parent` belongs to.
/// * anything else is placed inside that menu.
pub fn combine_path(parent: &str, relative: &str) -> Result<String> {
    if relative.is_empty() {
        return Err(MenuError::EmptyRelativePath);
    }
    if relative.starts_with("./") {
        return Err(MenuError::AmbiguousRelativePath(relative.to_string()));
    }
    if relative.starts_with('/') {
        return Ok(relative.to_string());
    }

    if let Some(rest) = relative.strip_prefix("..") {
        let mut parts: Vec<&str> = parent.split('/').collect();
        parts.truncate(parts.len().saturating_sub(2));
        let upper = format!("{}/", parts.join("/"));

        let rest = rest.strip_prefix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(upper);
        }
        return combine_path(&upper, rest);
    }

    let menu = menu_of_path(parent);
    if relative == "." {
        return Ok(menu.to_string());
    }
    Ok(format!("{menu}{relative}"))
}

/// The menu part of a path: everything up to and including the last `/`.
pub fn menu_of_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..=index],
        None => "",
    }
}

/// The root menu of a path: everything up to and including the first `/`.
pub fn root_of_path(path: &str) -> &str {
    match path.find('/') {
        Some(index) => &path[..=index],
        None => "",
    }
}

/// Last non-empty segment of a path (`/a/b:c/` and `/a/b:c` both give `b:c`).
pub(crate) fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Whether the path addresses a menu.
pub fn is_menu_path(path: &str) -> bool {
    path.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_is_kept() {
        assert_eq!(combine_path("/foo/bar/", "/baz/").unwrap(), "/baz/");
    }

    #[test]
    fn relative_inside_menu() {
        assert_eq!(combine_path("/foo", "bar").unwrap(), "/bar");
        assert_eq!(combine_path("/foo/", "bar").unwrap(), "/foo/bar");
        assert_eq!(combine_path("/foo/action", "sub/").unwrap(), "/foo/sub/");
    }

    #[test]
    fn dot_is_current_menu() {
        assert_eq!(combine_path("/foo/", ".").unwrap(), "/foo/");
        assert_eq!(combine_path("/foo/bar", ".").unwrap(), "/foo/");
        for path in ["/", "/a/", "/a/b/c/"] {
            let once = combine_path(path, ".").unwrap();
            assert_eq!(once, path);
            assert_eq!(combine_path(&once, ".").unwrap(), path);
        }
    }

    #[test]
    fn parent_navigation() {
        assert_eq!(combine_path("/foo/bar/stuff/", "../..").unwrap(), "/foo/");
        assert_eq!(combine_path("/foo/bar", "..").unwrap(), "/");
        assert_eq!(combine_path("/foo/bar/", "..").unwrap(), "/foo/");
        assert_eq!(combine_path("/foo/bar/", "../").unwrap(), "/foo/");
        assert_eq!(combine_path("/foo/bar/", "../baz").unwrap(), "/foo/baz");
        assert_eq!(combine_path("/foo/bar/", "../baz/").unwrap(), "/foo/baz/");
    }

    #[test]
    fn parent_of_root_stays_root() {
        assert_eq!(combine_path("/", "..").unwrap(), "/");
        assert_eq!(combine_path("/", "../..").unwrap(), "/");
    }

    #[test]
    fn rejects_empty_and_dot_slash() {
        assert!(matches!(combine_path("/foo/", ""), Err(MenuError::EmptyRelativePath)));
        assert!(matches!(
            combine_path("/foo/", "./bar"),
            Err(MenuError::AmbiguousRelativePath(_))
        ));
    }

    #[test]
    fn segment_helpers() {
        assert_eq!(menu_of_path("/a/b"), "/a/");
        assert_eq!(root_of_path("main/a/b/"), "main/");
        assert_eq!(last_segment("/a/lang:de/"), "lang:de");
        assert_eq!(last_segment("/a/lang:de"), "lang:de");
        assert!(is_menu_path("/a/"));
        assert!(!is_menu_path("/a/b"));
    }
}
