// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use joetrader_app::{CompareError, SaleListing};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Serves the front end straight from the data files on disk.
pub struct FsRuntime {
    listing_path: PathBuf,
}

impl FsRuntime {
    pub fn new(listing_path: impl Into<PathBuf>) -> Self {
        Self {
            listing_path: listing_path.into(),
        }
    }
}

impl joetrader_tui::AppRuntime for FsRuntime {
    fn load_listing(&mut self) -> Result<Vec<SaleListing>> {
        Ok(joetrader_store::load_listing(&self.listing_path))
    }

    fn read_seller_list(&mut self, path: &Path) -> Result<BTreeSet<String>, CompareError> {
        joetrader_store::read_seller_list(path)
    }
}
