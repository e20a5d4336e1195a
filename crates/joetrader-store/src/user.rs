// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use joetrader_app::{CategoryStore, ItemKey, Mark, ScrollGate, UserState, UserStateSink};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{read_json_lossy, validate_username, write_json_pretty};

pub const SCROLLED_FILE_NAME: &str = "scrolled.json";

#[derive(Debug, Serialize)]
struct ScrolledFlag {
    scrolled: bool,
}

/// Per-user JSON files under `<users_dir>/<username>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStore {
    username: String,
    dir: PathBuf,
}

impl UserStore {
    /// Validates the username and creates its directory on first use.
    pub fn open(users_dir: &Path, username: &str) -> Result<Self> {
        let username = validate_username(username)?;
        let dir = users_dir.join(&username);
        fs::create_dir_all(&dir)
            .with_context(|| format!("create user directory {}", dir.display()))?;
        Ok(Self { username, dir })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn category_path(&self, mark: Mark) -> PathBuf {
        self.dir.join(mark.file_name())
    }

    pub fn scrolled_path(&self) -> PathBuf {
        self.dir.join(SCROLLED_FILE_NAME)
    }

    pub fn load(&self) -> UserState {
        UserState {
            categories: self.load_categories(),
            gate: ScrollGate::from_persisted(self.load_scrolled()),
        }
    }

    /// Each category file is read independently; an unreadable one counts as
    /// an empty set without affecting the others.
    pub fn load_categories(&self) -> CategoryStore {
        CategoryStore::from_loaded(
            Mark::ALL
                .into_iter()
                .map(|mark| (mark, self.load_category_file(mark))),
        )
    }

    fn load_category_file(&self, mark: Mark) -> BTreeSet<ItemKey> {
        let path = self.category_path(mark);
        let Some(raw) = read_json_lossy::<Value>(&path, "category file") else {
            return BTreeSet::new();
        };
        let Value::Array(values) = raw else {
            log::warn!("category file {} is not a JSON array", path.display());
            return BTreeSet::new();
        };

        let mut items = BTreeSet::new();
        for value in values {
            match value {
                Value::String(key) => {
                    items.insert(ItemKey::new(key));
                }
                other => log::warn!("ignoring non-string entry {other} in {}", path.display()),
            }
        }
        items
    }

    pub fn load_scrolled(&self) -> bool {
        read_json_lossy::<Value>(&self.scrolled_path(), "scroll flag")
            .and_then(|value| value.get("scrolled").and_then(Value::as_bool))
            .unwrap_or(false)
    }
}

impl UserStateSink for UserStore {
    fn save_categories(&mut self, categories: &CategoryStore) -> Result<()> {
        for mark in Mark::ALL {
            let items = categories
                .set(mark)
                .iter()
                .map(ItemKey::as_str)
                .collect::<Vec<_>>();
            write_json_pretty(&self.category_path(mark), &items)?;
        }
        log::debug!("saved categories for {}", self.username);
        Ok(())
    }

    fn save_scroll_gate(&mut self, gate: ScrollGate) -> Result<()> {
        write_json_pretty(
            &self.scrolled_path(),
            &ScrolledFlag {
                scrolled: gate.is_scrolled(),
            },
        )
    }
}
