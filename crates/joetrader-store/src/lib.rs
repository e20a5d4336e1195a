// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod catalog;
mod demo;
mod listing;
mod user;
mod validation;

pub use catalog::{CatalogSource, load_metadata, scan_catalog};
pub use demo::{DemoPaths, seed_demo_data};
pub use listing::{load_listing, read_seller_list};
pub use user::UserStore;
pub use validation::validate_username;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "joetrader";
pub const DEFAULT_FIRST_YEAR: i32 = 1982;
pub const DEFAULT_LAST_YEAR: i32 = 1994;
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
pub const METADATA_FILE_NAME: &str = "figures.json";
pub const LISTING_FILE_NAME: &str = "sale_items.json";
pub const USERS_DIR_NAME: &str = "users";
pub const LOG_FILE_NAME: &str = "joetrader.log";

pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(override_dir) = env::var_os("JOETRADER_DATA_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set JOETRADER_DATA_DIR to a writable directory")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

/// Reads and decodes a JSON file, treating a missing or undecodable file as
/// absent. Bookkeeping files must never block browsing.
fn read_json_lossy<T: DeserializeOwned>(path: &Path, what: &str) -> Option<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            log::debug!("no {what} at {}", path.display());
            return None;
        }
        Err(error) => {
            log::warn!("ignoring unreadable {what} {}: {error}", path.display());
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            log::warn!("ignoring malformed {what} {}: {error}", path.display());
            None
        }
    }
}

fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut encoded = serde_json::to_string_pretty(value)
        .with_context(|| format!("encode {}", path.display()))?;
    encoded.push('\n');
    fs::write(path, encoded).with_context(|| format!("write {}", path.display()))
}
