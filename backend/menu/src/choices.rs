//! Ordered `key → label` sets used by the choose/select generators.
use std::collections::BTreeMap;

use crate::error::{MenuError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices {
    entries: Vec<(String, String)>,
}

impl Choices {
    /// Each key is its own label.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = keys
            .into_iter()
            .map(|k| {
                let key = k.into();
                (key.clone(), key)
            })
            .collect();
        Self { entries }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<&str>> for Choices {
    fn from(keys: Vec<&str>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<Vec<String>> for Choices {
    fn from(keys: Vec<String>) -> Self {
        Self::from_keys(keys)
    }
}

impl<K: ToString, V: Into<String>> From<BTreeMap<K, V>> for Choices {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_pairs(map.into_iter().map(|(k, v)| (k.to_string(), v)))
    }
}

/// Action prefixes end up inside a single path segment.
pub fn ensure_action_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(MenuError::InvalidChildTrigger(prefix.into(), "action prefix can not be empty".into()));
    }
    if prefix.contains('/') {
        return Err(MenuError::InvalidChildTrigger(prefix.into(), "action prefix can not contain a slash".into()));
    }
    Ok(())
}

/// Keys become part of callback paths: non-empty and slash-free.
pub fn ensure_correct_choice_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for key in keys {
        if key.is_empty() {
            return Err(MenuError::InvalidChoiceKey(key.into(), "choice keys can not be empty".into()));
        }
        if key.contains('/') {
            return Err(MenuError::InvalidChoiceKey(key.into(), "choice keys can not contain a slash".into()));
        }
    }
    Ok(())
}
