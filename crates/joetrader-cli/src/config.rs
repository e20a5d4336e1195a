// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use joetrader_store::{
    APP_NAME, CatalogSource, DEFAULT_EXTENSIONS, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR,
    LISTING_FILE_NAME, LOG_FILE_NAME, METADATA_FILE_NAME, USERS_DIR_NAME,
};
use log::LevelFilter;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub shop: Shop,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: Catalog::default(),
            storage: Storage::default(),
            shop: Shop::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    pub base_dir: Option<String>,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub extensions: Option<Vec<String>>,
    pub metadata_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub users_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shop {
    pub listing_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("JOETRADER_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set JOETRADER_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [catalog], [storage], [shop], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_dir) = &self.catalog.base_dir
            && base_dir.trim().is_empty()
        {
            bail!("catalog.base_dir in {} must not be empty", path.display());
        }

        if self.first_year() > self.last_year() {
            bail!(
                "catalog.first_year ({}) in {} is after catalog.last_year ({})",
                self.first_year(),
                path.display(),
                self.last_year()
            );
        }

        if let Some(extensions) = &self.catalog.extensions
            && extensions.iter().all(|ext| ext.trim().is_empty())
        {
            bail!(
                "catalog.extensions in {} must list at least one file extension, for example [\"jpg\", \"png\"]",
                path.display()
            );
        }

        if let Some(level) = &self.logging.level {
            parse_level(level).with_context(|| format!("logging.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn first_year(&self) -> i32 {
        self.catalog.first_year.unwrap_or(DEFAULT_FIRST_YEAR)
    }

    pub fn last_year(&self) -> i32 {
        self.catalog.last_year.unwrap_or(DEFAULT_LAST_YEAR)
    }

    pub fn extensions(&self) -> Vec<String> {
        match &self.catalog.extensions {
            Some(extensions) => extensions
                .iter()
                .map(|ext| ext.trim().to_owned())
                .filter(|ext| !ext.is_empty())
                .collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
        }
    }

    /// Year range and extension filter applied to an explicit image root.
    pub fn catalog_source_at(&self, base_dir: impl Into<PathBuf>) -> CatalogSource {
        CatalogSource {
            first_year: self.first_year(),
            last_year: self.last_year(),
            extensions: self.extensions(),
            ..CatalogSource::new(base_dir)
        }
    }

    pub fn catalog_source(&self) -> Result<CatalogSource> {
        let base_dir = self.catalog.base_dir.as_deref().ok_or_else(|| {
            anyhow!(
                "catalog.base_dir is not set; point it at the folder holding the year sub-folders, or run with --demo"
            )
        })?;
        Ok(self.catalog_source_at(base_dir))
    }

    pub fn metadata_path(&self, data_dir: &Path) -> PathBuf {
        resolve(self.catalog.metadata_path.as_deref(), data_dir, METADATA_FILE_NAME)
    }

    pub fn users_dir(&self, data_dir: &Path) -> PathBuf {
        resolve(self.storage.users_dir.as_deref(), data_dir, USERS_DIR_NAME)
    }

    pub fn listing_path(&self, data_dir: &Path) -> PathBuf {
        resolve(self.shop.listing_path.as_deref(), data_dir, LISTING_FILE_NAME)
    }

    pub fn log_file(&self, data_dir: &Path) -> PathBuf {
        resolve(self.logging.file.as_deref(), data_dir, LOG_FILE_NAME)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.logging
            .level
            .as_deref()
            .and_then(|level| parse_level(level).ok())
            .unwrap_or(LevelFilter::Warn)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# joetrader config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\n# Folder holding one sub-folder per year (1982, 1983, ...)\nbase_dir = \"/absolute/path/to/images\"\nfirst_year = {}\nlast_year = {}\nextensions = [{}]\n# Optional. Default is <data dir>/{}\n# metadata_path = \"/absolute/path/to/{}\"\n\n[storage]\n# Optional. Default is <data dir>/{}\n# users_dir = \"/absolute/path/to/users\"\n\n[shop]\n# Optional. Default is <data dir>/{}\n# listing_path = \"/absolute/path/to/{}\"\n\n[logging]\n# error | warn | info | debug | trace | off (RUST_LOG overrides)\nlevel = \"{}\"\n# Optional. Default is <data dir>/{}\n# file = \"/absolute/path/to/{}\"\n",
            path.display(),
            DEFAULT_FIRST_YEAR,
            DEFAULT_LAST_YEAR,
            DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| format!("\"{ext}\""))
                .collect::<Vec<_>>()
                .join(", "),
            METADATA_FILE_NAME,
            METADATA_FILE_NAME,
            USERS_DIR_NAME,
            LISTING_FILE_NAME,
            LISTING_FILE_NAME,
            DEFAULT_LOG_LEVEL,
            LOG_FILE_NAME,
            LOG_FILE_NAME,
        )
    }
}

fn resolve(configured: Option<&str>, data_dir: &Path, default_name: &str) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(path),
        None => data_dir.join(default_name),
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter> {
    raw.trim().parse::<LevelFilter>().map_err(|_| {
        anyhow!("unknown log level {raw:?}; use one of: error, warn, info, debug, trace, off")
    })
}
