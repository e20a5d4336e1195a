// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Stable identity of a catalog item: its path relative to the catalog root,
/// always joined with `/` regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds a key from a path relative to the catalog root. Returns `None`
    /// for paths that escape the root or contain non-UTF-8 segments.
    pub fn from_relative_path(path: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, e.g. `duke.jpg` for `1982/duke.jpg`.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Lower-cased file name without its extension, used to reconcile catalog
    /// items with sale listings that live in a different identity space.
    pub fn normalized_stem(&self) -> String {
        let file_name = self.file_name();
        let stem = match file_name.rfind('.') {
            Some(0) | None => file_name,
            Some(index) => &file_name[..index],
        };
        stem.to_lowercase()
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
