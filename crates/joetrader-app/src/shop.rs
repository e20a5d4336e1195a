// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ItemKey;
use crate::model::lenient_text;

/// One entry of a seller's listing. Listing ids are unrelated to catalog keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaleListing {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl SaleListing {
    /// Numeric price; anything unparseable counts as free.
    pub fn price_amount(&self) -> f64 {
        self.price
            .as_deref()
            .and_then(|price| price.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} (${})",
            self.display_name(),
            self.price.as_deref().unwrap_or("0")
        )
    }

    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("ID: {}", self.id.as_deref().unwrap_or("")),
            format!("Name: {}", self.name),
            format!("Price: ${}", self.price.as_deref().unwrap_or("")),
        ];
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        if !self.image.is_empty() {
            lines.push(format!("Image: {}", self.image));
        }
        lines
    }

    fn matches_any(&self, wanted_stems: &BTreeSet<String>) -> bool {
        let id = self.id.as_deref().unwrap_or("").to_lowercase();
        wanted_stems.contains(&id) || wanted_stems.contains(&self.name.to_lowercase())
    }
}

/// Wanted items that also appear in an externally supplied identity set.
pub fn intersect_wants(wants: &BTreeSet<ItemKey>, external: &BTreeSet<String>) -> BTreeSet<ItemKey> {
    wants
        .iter()
        .filter(|key| external.contains(key.as_str()))
        .cloned()
        .collect()
}

/// Listing entries whose lower-cased id or name equals the extension-less,
/// lower-cased file name of some wanted item. Listing order is kept.
pub fn filter_listing_by_want<'a>(
    listing: &'a [SaleListing],
    wants: &BTreeSet<ItemKey>,
) -> Vec<&'a SaleListing> {
    let stems = wants.iter().map(ItemKey::normalized_stem).collect::<BTreeSet<_>>();
    listing
        .iter()
        .filter(|entry| entry.matches_any(&stems))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ListingQuery {
    /// Builds a query from free-text inputs. Blank or unparseable prices
    /// impose no bound.
    pub fn from_inputs(name: &str, min_price: &str, max_price: &str) -> Self {
        let name = name.trim();
        Self {
            name: (!name.is_empty()).then(|| name.to_lowercase()),
            min_price: min_price.trim().parse().ok(),
            max_price: max_price.trim().parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_price.is_none() && self.max_price.is_none()
    }

    pub fn matches(&self, entry: &SaleListing) -> bool {
        if let Some(name) = &self.name
            && !entry.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        let price = entry.price_amount();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        true
    }
}

pub fn search_listing<'a, I>(entries: I, query: &ListingQuery) -> Vec<&'a SaleListing>
where
    I: IntoIterator<Item = &'a SaleListing>,
{
    entries
        .into_iter()
        .filter(|entry| query.matches(entry))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerListFormat {
    JsonArray,
    Lines,
}

impl SellerListFormat {
    /// `.json` files are JSON arrays; anything else is one id per line.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::JsonArray,
            _ => Self::Lines,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to read seller list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seller list as a JSON array of strings: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_seller_list(
    raw: &str,
    format: SellerListFormat,
) -> Result<BTreeSet<String>, CompareError> {
    match format {
        SellerListFormat::JsonArray => {
            let ids: Vec<String> = serde_json::from_str(raw)?;
            Ok(ids.into_iter().collect())
        }
        SellerListFormat::Lines => Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()),
    }
}
