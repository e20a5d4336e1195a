// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer};

const UNKNOWN: &str = "Unknown";

/// Where an item sits for the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Want,
    Have,
    DontWant,
    Uncategorized,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Want => "want",
            Self::Have => "have",
            Self::DontWant => "dont_want",
            Self::Uncategorized => "uncategorized",
        }
    }

    /// Order used by the category sort.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Want => 0,
            Self::Have => 1,
            Self::DontWant => 2,
            Self::Uncategorized => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Want => "want",
            Self::Have => "have",
            Self::DontWant => "don't want",
            Self::Uncategorized => "uncategorized",
        }
    }
}

/// The categories a user can assign. `Uncategorized` is only ever the absence
/// of a mark, so it is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Want,
    Have,
    DontWant,
}

impl Mark {
    pub const ALL: [Self; 3] = [Self::Want, Self::Have, Self::DontWant];

    pub const fn category(self) -> Category {
        match self {
            Self::Want => Category::Want,
            Self::Have => Category::Have,
            Self::DontWant => Category::DontWant,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.category().as_str()
    }

    /// Persisted file name for this mark's set.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Want => "want.json",
            Self::Have => "have.json",
            Self::DontWant => "dont_want.json",
        }
    }
}

impl From<Mark> for Category {
    fn from(mark: Mark) -> Self {
        mark.category()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    All,
    WantOnly,
}

impl BrowseMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::All => Self::WantOnly,
            Self::WantOnly => Self::All,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::WantOnly => "WANT LIST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    None,
    ByYear,
    ByName,
    ByCategory,
}

impl SortMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "catalog order",
            Self::ByYear => "year",
            Self::ByName => "name",
            Self::ByCategory => "category",
        }
    }
}

/// Descriptive record for one catalog item. Every field is optional; the
/// accessors fall back to the defaults the sorts and the display use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemMetadata {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
}

impl ItemMetadata {
    pub fn sort_year(&self) -> i32 {
        self.year.unwrap_or(0)
    }

    pub fn sort_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Text block shown under an item. Items without metadata render every field
/// as unknown and omit the id.
pub fn describe_item(metadata: Option<&ItemMetadata>) -> Vec<String> {
    let Some(meta) = metadata else {
        return vec![
            format!("Name: {UNKNOWN}"),
            format!("Year: {UNKNOWN}"),
            format!("Weapons: {UNKNOWN}"),
        ];
    };

    let weapons = if meta.weapons.is_empty() {
        UNKNOWN.to_owned()
    } else {
        meta.weapons.join(", ")
    };
    let mut lines = vec![
        format!("ID: {}", meta.id.as_deref().unwrap_or(UNKNOWN)),
        format!("Name: {}", meta.name.as_deref().unwrap_or(UNKNOWN)),
        format!(
            "Year: {}",
            meta.year
                .map_or_else(|| UNKNOWN.to_owned(), |year| year.to_string())
        ),
        format!("Weapons: {weapons}"),
    ];
    if let Some(vehicle) = meta.vehicle.as_deref().filter(|v| !v.is_empty()) {
        lines.push(format!("Vehicle: {vehicle}"));
    }
    lines
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

/// Accepts `"12"`, `12`, `12.5` or `null`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(TextOrNumber::into_text))
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(TextOrNumber::Integer(year)) => i32::try_from(year).ok(),
        Some(TextOrNumber::Float(year)) => Some(year as i32),
        Some(TextOrNumber::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
