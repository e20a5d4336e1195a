// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use joetrader_app::ItemKey;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FIGURE_NAMES: [&str; 8] = [
    "Duke",
    "Scarlett",
    "Snake Eyes",
    "Flint",
    "Roadblock",
    "Lady Jaye",
    "Destro",
    "Baroness",
];

/// Scratch directory laid out like a real install: year folders under
/// `images/`, plus metadata, listing and users locations next to it.
#[derive(Debug)]
pub struct CatalogFixture {
    temp: TempDir,
}

impl CatalogFixture {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create fixture directory")?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.root().join("images")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root().join("figures.json")
    }

    pub fn listing_path(&self) -> PathBuf {
        self.root().join("sale_items.json")
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root().join("users")
    }

    /// Creates an empty placeholder image and returns its catalog key.
    pub fn add_image(&self, year: i32, file: &str) -> Result<ItemKey> {
        let folder = self.base_dir().join(year.to_string());
        fs::create_dir_all(&folder)
            .with_context(|| format!("create year folder {}", folder.display()))?;
        let path = folder.join(file);
        fs::write(&path, b"").with_context(|| format!("write image {}", path.display()))?;
        Ok(ItemKey::new(format!("{year}/{file}")))
    }

    /// Adds one image per name for `year`, using `<lowercase-name>.jpg`.
    pub fn add_figures(&self, year: i32, names: &[&str]) -> Result<Vec<ItemKey>> {
        names
            .iter()
            .map(|name| self.add_image(year, &format!("{}.jpg", name.to_lowercase())))
            .collect()
    }

    pub fn write_metadata(&self, metadata: &Value) -> Result<PathBuf> {
        self.write_json(&self.metadata_path(), metadata)
    }

    pub fn write_listing(&self, listing: &Value) -> Result<PathBuf> {
        self.write_json(&self.listing_path(), listing)
    }

    /// Writes arbitrary text relative to the fixture root, creating parents.
    pub fn write_raw(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<PathBuf> {
        let encoded = serde_json::to_string_pretty(value)?;
        fs::write(path, encoded).with_context(|| format!("write {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

/// Metadata record in the on-disk format.
pub fn figure_record(id: i64, name: &str, year: i32, weapons: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "year": year,
        "weapons": weapons
    })
}

/// Sale listing entry in the on-disk format.
pub fn listing_record(id: &str, name: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "description": format!("{name} for sale"),
        "image": format!("{}.jpg", name.to_lowercase())
    })
}
