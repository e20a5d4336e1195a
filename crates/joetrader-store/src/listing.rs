// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use joetrader_app::{CompareError, SaleListing, SellerListFormat, parse_seller_list};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::read_json_lossy;

/// Loads the sale listing. Missing or malformed files read as an empty
/// listing; entries that are not objects are skipped.
pub fn load_listing(path: &Path) -> Vec<SaleListing> {
    let Some(raw) = read_json_lossy::<Value>(path, "sale listing") else {
        return Vec::new();
    };
    let Value::Array(values) = raw else {
        log::warn!("sale listing {} is not a JSON array", path.display());
        return Vec::new();
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(error) => {
                log::warn!(
                    "skipping sale listing entry {index} in {}: {error}",
                    path.display()
                );
                None
            }
        })
        .collect()
}

/// Reads a seller's id list. Unlike bookkeeping files, a broken seller list is
/// reported to the caller so the comparison can be aborted.
pub fn read_seller_list(path: &Path) -> Result<BTreeSet<String>, CompareError> {
    let raw = fs::read_to_string(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let ids = parse_seller_list(&raw, SellerListFormat::detect(path))?;
    log::info!("read {} ids from seller list {}", ids.len(), path.display());
    Ok(ids)
}
