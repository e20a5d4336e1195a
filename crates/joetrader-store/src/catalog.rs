// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use joetrader_app::{CatalogEntry, ItemCatalog, ItemKey, ItemMetadata, MetadataIndex};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_EXTENSIONS, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, read_json_lossy};

/// Where catalog images live: one sub-folder per year under `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub base_dir: PathBuf,
    pub first_year: i32,
    pub last_year: i32,
    pub extensions: Vec<String>,
}

impl CatalogSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

/// Eagerly lists every image in the year folders, year by year, file names in
/// sorted order within a year. Missing folders are skipped.
pub fn scan_catalog(source: &CatalogSource) -> ItemCatalog {
    if !source.base_dir.is_dir() {
        log::warn!(
            "catalog directory {} does not exist; starting with an empty catalog",
            source.base_dir.display()
        );
        return ItemCatalog::new(Vec::new());
    }

    let mut entries = Vec::new();
    for year in source.first_year..=source.last_year {
        let folder = source.base_dir.join(year.to_string());
        if !folder.is_dir() {
            continue;
        }
        let listing = match fs::read_dir(&folder) {
            Ok(listing) => listing,
            Err(error) => {
                log::warn!("skipping unreadable folder {}: {error}", folder.display());
                continue;
            }
        };

        let mut paths = listing
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && source.accepts(path))
            .collect::<Vec<_>>();
        paths.sort();

        for path in paths {
            let Some(key) = path
                .strip_prefix(&source.base_dir)
                .ok()
                .and_then(ItemKey::from_relative_path)
            else {
                log::warn!("skipping file with non UTF-8 name {}", path.display());
                continue;
            };
            entries.push(CatalogEntry { key, path });
        }
    }

    log::info!(
        "scanned {} catalog items under {}",
        entries.len(),
        source.base_dir.display()
    );
    ItemCatalog::new(entries)
}

/// Loads the metadata file keyed by relative item path. A missing or
/// malformed file yields an empty index; malformed entries are skipped.
pub fn load_metadata(path: &Path) -> MetadataIndex {
    let Some(raw) = read_json_lossy::<Value>(path, "metadata file") else {
        return MetadataIndex::default();
    };
    let Value::Object(records) = raw else {
        log::warn!("metadata file {} is not a JSON object", path.display());
        return MetadataIndex::default();
    };
    decode_metadata(records, path)
}

fn decode_metadata(records: Map<String, Value>, path: &Path) -> MetadataIndex {
    records
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<ItemMetadata>(value) {
            Ok(metadata) => Some((ItemKey::new(key), metadata)),
            Err(error) => {
                log::warn!(
                    "skipping metadata for {key} in {}: {error}",
                    path.display()
                );
                None
            }
        })
        .collect()
}
