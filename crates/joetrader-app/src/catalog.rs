// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::{ItemKey, ItemMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: ItemKey,
    pub path: PathBuf,
}

/// Items discovered at session start. The set never changes during a session;
/// only `BrowseState` re-orders its own copy of the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
}

impl ItemCatalog {
    /// Builds a catalog from entries in discovery order. Duplicate keys keep
    /// their first occurrence.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut seen = BTreeSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.key.clone()))
            .collect();
        Self { entries }
    }

    /// Catalog whose entries live directly under `root`.
    pub fn from_keys(root: impl Into<PathBuf>, keys: impl IntoIterator<Item = ItemKey>) -> Self {
        let root = root.into();
        let entries = keys
            .into_iter()
            .map(|key| CatalogEntry {
                path: root.join(key.as_str()),
                key,
            })
            .collect::<Vec<_>>();
        Self::new(entries)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path_of(&self, key: &ItemKey) -> Option<&Path> {
        self.entries
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| entry.path.as_path())
    }
}

/// Read-only metadata lookup keyed by item identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataIndex {
    records: BTreeMap<ItemKey, ItemMetadata>,
}

impl MetadataIndex {
    pub fn get(&self, key: &ItemKey) -> Option<&ItemMetadata> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_year(&self, key: &ItemKey) -> i32 {
        self.get(key).map_or(0, ItemMetadata::sort_year)
    }

    pub fn sort_name(&self, key: &ItemKey) -> &str {
        self.get(key).map_or("", ItemMetadata::sort_name)
    }
}

impl FromIterator<(ItemKey, ItemMetadata)> for MetadataIndex {
    fn from_iter<T: IntoIterator<Item = (ItemKey, ItemMetadata)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
