//! Triggers decide which menu or action a callback path belongs to.
//!
//! A trigger is a regular-expression source plus a flag set. Child triggers
//! are always relative to their parent and are combined by concatenating the
//! sources; they never re-anchor and never bring their own flags.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::{MenuError, Result};

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TriggerFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
}

impl TriggerFlags {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Compiled trigger. Equality only looks at source and flags.
#[derive(Debug, Clone)]
pub struct Trigger {
    source: String,
    flags: TriggerFlags,
    regex: Regex,
}

impl Trigger {
    /// Trigger from a regular-expression source without flags.
    pub fn pattern(source: impl Into<String>) -> Result<Self> {
        Self::with_flags(source, TriggerFlags::default())
    }

    pub fn with_flags(source: impl Into<String>, flags: TriggerFlags) -> Result<Self> {
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line)
            .build()
            .map_err(|e| MenuError::InvalidTrigger {
                source_text: source.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { source, flags, regex })
    }

    /// Trigger matching `text` literally.
    pub fn literal(text: &str) -> Result<Self> {
        Self::pattern(regex::escape(text))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> TriggerFlags {
        self.flags
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The part of `path` matched by this trigger.
    pub fn find<'p>(&self, path: &'p str) -> Option<&'p str> {
        self.regex.find(path).map(|m| m.as_str())
    }

    /// Source without the leading `^` and trailing `$` anchors.
    pub fn display_source(&self) -> &str {
        let source = self.source.strip_prefix('^').unwrap_or(&self.source);
        source.strip_suffix('$').unwrap_or(source)
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Trigger {}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ---------------------------------------------------------------------------
// Root trigger
// ---------------------------------------------------------------------------

/// How the root menu is addressed: a literal path like `/` or `main/`, or a
/// pattern like `^(main|start)/`.
#[derive(Debug, Clone)]
pub enum RootTrigger {
    Literal(String),
    Pattern(Trigger),
}

impl RootTrigger {
    /// The literal root path, if the root is not a pattern.
    pub fn literal_path(&self) -> Option<&str> {
        match self {
            RootTrigger::Literal(path) => Some(path),
            RootTrigger::Pattern(_) => None,
        }
    }
}

impl Default for RootTrigger {
    fn default() -> Self {
        RootTrigger::Literal("/".into())
    }
}

impl From<&str> for RootTrigger {
    fn from(path: &str) -> Self {
        RootTrigger::Literal(path.to_string())
    }
}

impl From<String> for RootTrigger {
    fn from(path: String) -> Self {
        RootTrigger::Literal(path)
    }
}

impl From<Trigger> for RootTrigger {
    fn from(trigger: Trigger) -> Self {
        RootTrigger::Pattern(trigger)
    }
}

/// Build the anchored trigger of the root menu.
///
/// The result matches exactly one slash so the root can never swallow the
/// path of one of its submenus.
pub fn create_root_menu_trigger(root: &RootTrigger) -> Result<Trigger> {
    match root {
        RootTrigger::Literal(path) => {
            if !path.ends_with('/') {
                return Err(root_error(path, "has to end with a slash, for example '/'"));
            }
            if path.matches('/').count() != 1 {
                return Err(root_error(path, "has to contain exactly one slash"));
            }
            Trigger::pattern(format!("^{}", regex::escape(path)))
        }
        RootTrigger::Pattern(trigger) => {
            let source = trigger.source();
            if !trigger.flags().is_empty() {
                return Err(root_error(source, "flags are not supported on the root trigger"));
            }
            if !source.starts_with('^') {
                return Err(root_error(source, "has to start with ^"));
            }
            if !source.ends_with('/') {
                return Err(root_error(source, "has to end with a slash"));
            }
            let scan = scan_source(source);
            if scan.literal_slashes != 1 {
                return Err(root_error(source, "has to contain exactly one slash"));
            }
            if scan.may_match_slash {
                return Err(root_error(source, "may match a slash and would catch submenu paths"));
            }
            Ok(trigger.clone())
        }
    }
}

fn root_error(source: &str, reason: &str) -> MenuError {
    MenuError::InvalidRootTrigger(source.to_string(), reason.to_string())
}

// ---------------------------------------------------------------------------
// Combination
// ---------------------------------------------------------------------------

/// Append a relative child trigger to an absolute menu trigger.
pub fn combine_trigger(parent: &Trigger, child: &Trigger) -> Result<Trigger> {
    if !parent.source().starts_with('^') || !parent.source().ends_with('/') {
        return Err(MenuError::InvalidParentTrigger(parent.source().to_string()));
    }
    if !child.flags().is_empty() {
        return Err(MenuError::ChildTriggerFlags(child.source().to_string()));
    }
    Trigger::with_flags(format!("{}{}", parent.source(), child.source()), parent.flags())
}

/// Relative action triggers stay within one path segment.
pub fn ensure_action_trigger(child: &Trigger) -> Result<()> {
    ensure_relative(child)?;
    if scan_source(child.source()).literal_slashes > 0 {
        return Err(MenuError::InvalidChildTrigger(
            child.source().to_string(),
            "action triggers can not contain a slash".into(),
        ));
    }
    Ok(())
}

/// Relative submenu triggers are one segment followed by exactly one slash.
pub fn ensure_submenu_trigger(child: &Trigger) -> Result<()> {
    ensure_relative(child)?;
    let source = child.source();
    if !source.ends_with('/') || source.ends_with("//") {
        return Err(MenuError::InvalidChildTrigger(
            source.to_string(),
            "submenu triggers have to end with exactly one slash".into(),
        ));
    }
    if scan_source(source).literal_slashes != 1 {
        return Err(MenuError::InvalidChildTrigger(
            source.to_string(),
            "submenu triggers can only contain the trailing slash".into(),
        ));
    }
    Ok(())
}

fn ensure_relative(child: &Trigger) -> Result<()> {
    if !child.flags().is_empty() {
        return Err(MenuError::ChildTriggerFlags(child.source().to_string()));
    }
    if child.source().starts_with('^') {
        return Err(MenuError::InvalidChildTrigger(
            child.source().to_string(),
            "relative triggers are not anchored".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Source scanning
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SourceScan {
    /// `/` outside of character classes, escaped or not.
    literal_slashes: usize,
    /// A construct that can match `/` without spelling it out (`.`, `\S`, `[^a]`, ...).
    may_match_slash: bool,
}

fn scan_source(source: &str) -> SourceScan {
    let mut scan = SourceScan::default();
    let mut chars = source.chars().peekable();

    let mut in_class = false;
    let mut class_negated = false;
    let mut class_has_slash = false;
    let mut class_has_wide = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else { break };
                match escaped {
                    '/' if in_class => class_has_slash = true,
                    '/' => scan.literal_slashes += 1,
                    'W' | 'S' | 'D' if in_class => class_has_wide = true,
                    'W' | 'S' | 'D' => scan.may_match_slash = true,
                    _ => {}
                }
            }
            '[' if !in_class => {
                in_class = true;
                class_negated = chars.peek() == Some(&'^');
                if class_negated {
                    chars.next();
                }
                class_has_slash = false;
                class_has_wide = false;
            }
            ']' if in_class => {
                in_class = false;
                let matches_slash = if class_negated {
                    !class_has_slash
                } else {
                    class_has_slash || class_has_wide
                };
                if matches_slash {
                    scan.may_match_slash = true;
                }
            }
            '/' if in_class => class_has_slash = true,
            '/' => scan.literal_slashes += 1,
            '.' if !in_class => scan.may_match_slash = true,
            _ => {}
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_root() {
        let trigger = create_root_menu_trigger(&"/".into()).unwrap();
        assert_eq!(trigger.source(), "^/");
        assert!(trigger.is_match("/a/b"));

        let trigger = create_root_menu_trigger(&"main/".into()).unwrap();
        assert!(trigger.is_match("main/"));
        assert!(!trigger.is_match("other/"));
    }

    #[test]
    fn literal_root_needs_exactly_one_trailing_slash() {
        assert!(create_root_menu_trigger(&"main".into()).is_err());
        assert!(create_root_menu_trigger(&"/main/".into()).is_err());
    }

    #[test]
    fn pattern_root() {
        let root = RootTrigger::Pattern(Trigger::pattern("^(main|start)/").unwrap());
        let trigger = create_root_menu_trigger(&root).unwrap();
        assert!(trigger.is_match("start/a/"));
    }

    #[test]
    fn pattern_root_rejects_slash_matching_constructs() {
        for source in ["main/", "^main", "^.+/", "^[^a]+/", "^\\S+/", "^a/b/", "^[a/]+/"] {
            let root = RootTrigger::Pattern(Trigger::pattern(source).unwrap());
            assert!(create_root_menu_trigger(&root).is_err(), "accepted {source}");
        }
        let root = RootTrigger::Pattern(Trigger::pattern("^[^/]+/").unwrap());
        assert!(create_root_menu_trigger(&root).is_ok());
    }

    #[test]
    fn pattern_root_rejects_flags() {
        let flags = TriggerFlags { case_insensitive: true, ..Default::default() };
        let root = RootTrigger::Pattern(Trigger::with_flags("^main/", flags).unwrap());
        assert!(matches!(
            create_root_menu_trigger(&root),
            Err(MenuError::InvalidRootTrigger(..))
        ));
    }

    #[test]
    fn combine_concatenates_sources() {
        let root = create_root_menu_trigger(&"/".into()).unwrap();
        let child = Trigger::pattern("settings/").unwrap();
        let combined = combine_trigger(&root, &child).unwrap();
        assert_eq!(combined.source(), "^/settings/");
        assert!(combined.is_match("/settings/lang/"));
        assert!(!combined.is_match("/other/settings/"));
    }

    #[test]
    fn combine_inherits_parent_flags() {
        let flags = TriggerFlags { case_insensitive: true, ..Default::default() };
        let parent = Trigger::with_flags("^/", flags).unwrap();
        let combined = combine_trigger(&parent, &Trigger::pattern("abc$").unwrap()).unwrap();
        assert_eq!(combined.flags(), flags);
        assert!(combined.is_match("/ABC"));
    }

    #[test]
    fn combine_rejects_bad_parent_and_flagged_child() {
        let child = Trigger::pattern("a").unwrap();
        assert!(matches!(
            combine_trigger(&Trigger::pattern("/").unwrap(), &child),
            Err(MenuError::InvalidParentTrigger(_))
        ));
        assert!(matches!(
            combine_trigger(&Trigger::pattern("^/a").unwrap(), &child),
            Err(MenuError::InvalidParentTrigger(_))
        ));

        let flags = TriggerFlags { multi_line: true, ..Default::default() };
        let flagged = Trigger::with_flags("a", flags).unwrap();
        assert!(matches!(
            combine_trigger(&Trigger::pattern("^/").unwrap(), &flagged),
            Err(MenuError::ChildTriggerFlags(_))
        ));
    }

    #[test]
    fn child_trigger_shapes() {
        assert!(ensure_action_trigger(&Trigger::pattern("lang:([^/]+)$").unwrap()).is_ok());
        assert!(ensure_action_trigger(&Trigger::pattern("a/b$").unwrap()).is_err());
        assert!(ensure_action_trigger(&Trigger::pattern("^a$").unwrap()).is_err());

        assert!(ensure_submenu_trigger(&Trigger::pattern("item:([^/]+)/").unwrap()).is_ok());
        assert!(ensure_submenu_trigger(&Trigger::pattern("a").unwrap()).is_err());
        assert!(ensure_submenu_trigger(&Trigger::pattern("a//").unwrap()).is_err());
        assert!(ensure_submenu_trigger(&Trigger::pattern("a/b/").unwrap()).is_err());
    }

    #[test]
    fn display_source_strips_anchors() {
        let trigger = Trigger::pattern("^/a/b$").unwrap();
        assert_eq!(trigger.display_source(), "/a/b");
    }

    #[test]
    fn equality_ignores_compiled_state() {
        assert_eq!(Trigger::literal("a.b").unwrap(), Trigger::pattern("a\\.b").unwrap());
    }
}
