// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{LISTING_FILE_NAME, METADATA_FILE_NAME, USERS_DIR_NAME, write_json_pretty};

struct DemoFigure {
    year: i32,
    file: &'static str,
    id: i64,
    name: &'static str,
    weapons: &'static [&'static str],
    vehicle: Option<&'static str>,
}

const DEMO_FIGURES: [DemoFigure; 12] = [
    DemoFigure {
        year: 1982,
        file: "scarlett.jpg",
        id: 1,
        name: "Scarlett",
        weapons: &["XK-1 Power Crossbow"],
        vehicle: None,
    },
    DemoFigure {
        year: 1982,
        file: "snake-eyes.jpg",
        id: 2,
        name: "Snake Eyes",
        weapons: &["Uzi", "Explosives"],
        vehicle: None,
    },
    DemoFigure {
        year: 1982,
        file: "breaker.png",
        id: 3,
        name: "Breaker",
        weapons: &["M-16"],
        vehicle: None,
    },
    DemoFigure {
        year: 1982,
        file: "cobra-soldier.jpg",
        id: 4,
        name: "Cobra Soldier",
        weapons: &["AK-47"],
        vehicle: None,
    },
    DemoFigure {
        year: 1983,
        file: "duke.jpg",
        id: 5,
        name: "Duke",
        weapons: &["M-32 Pulverizer"],
        vehicle: None,
    },
    DemoFigure {
        year: 1983,
        file: "destro.jpg",
        id: 6,
        name: "Destro",
        weapons: &["Pistol", "Briefcase"],
        vehicle: None,
    },
    DemoFigure {
        year: 1983,
        file: "wild-bill.gif",
        id: 7,
        name: "Wild Bill",
        weapons: &["Revolver"],
        vehicle: Some("Dragonfly"),
    },
    DemoFigure {
        year: 1984,
        file: "roadblock.jpg",
        id: 8,
        name: "Roadblock",
        weapons: &["M2 Browning", "Tripod"],
        vehicle: None,
    },
    DemoFigure {
        year: 1984,
        file: "baroness.jpg",
        id: 9,
        name: "Baroness",
        weapons: &["Laser Rifle"],
        vehicle: None,
    },
    DemoFigure {
        year: 1984,
        file: "storm-shadow.png",
        id: 10,
        name: "Storm Shadow",
        weapons: &["Bow", "Sword", "Nunchucks"],
        vehicle: None,
    },
    DemoFigure {
        year: 1985,
        file: "flint.jpg",
        id: 11,
        name: "Flint",
        weapons: &["Shotgun"],
        vehicle: None,
    },
    DemoFigure {
        year: 1985,
        file: "lady-jaye.bmp",
        id: 12,
        name: "Lady Jaye",
        weapons: &["Javelin"],
        vehicle: None,
    },
];

/// An unmapped image so the demo shows the "Unknown" metadata fallback.
const DEMO_UNMAPPED: (i32, &str) = (1986, "mystery-figure.jpg");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPaths {
    pub base_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub listing_path: PathBuf,
    pub users_dir: PathBuf,
}

/// Writes a small sample catalog (empty placeholder images), its metadata
/// file and a sale listing under `root`.
pub fn seed_demo_data(root: &Path) -> Result<DemoPaths> {
    let paths = DemoPaths {
        base_dir: root.join("images"),
        metadata_path: root.join(METADATA_FILE_NAME),
        listing_path: root.join(LISTING_FILE_NAME),
        users_dir: root.join(USERS_DIR_NAME),
    };

    let mut metadata = Map::new();
    for figure in &DEMO_FIGURES {
        touch_image(&paths.base_dir, figure.year, figure.file)?;
        metadata.insert(
            format!("{}/{}", figure.year, figure.file),
            json!({
                "id": figure.id,
                "name": figure.name,
                "year": figure.year,
                "weapons": figure.weapons,
                "vehicle": figure.vehicle
            }),
        );
    }
    touch_image(&paths.base_dir, DEMO_UNMAPPED.0, DEMO_UNMAPPED.1)?;
    write_json_pretty(&paths.metadata_path, &Value::Object(metadata))?;

    let listing = json!([
        {"id": "duke", "name": "Duke", "price": "24.99", "description": "Complete with file card", "image": "duke.jpg"},
        {"id": "snake-eyes", "name": "Snake Eyes", "price": 89.5, "description": "Original 1982 straight-arm", "image": "snake-eyes.jpg"},
        {"id": 103, "name": "Baroness", "price": "35", "description": "Missing rifle", "image": "baroness.jpg"},
        {"id": 104, "name": "Flint", "price": "18", "description": "Loose, tight joints", "image": "flint.jpg"},
        {"id": 105, "name": "Zartan", "price": "42", "description": "Color-change works", "image": "zartan.jpg"}
    ]);
    write_json_pretty(&paths.listing_path, &listing)?;

    fs::create_dir_all(&paths.users_dir)
        .with_context(|| format!("create users directory {}", paths.users_dir.display()))?;
    log::info!("seeded demo catalog under {}", root.display());
    Ok(paths)
}

fn touch_image(base_dir: &Path, year: i32, file: &str) -> Result<()> {
    let folder = base_dir.join(year.to_string());
    fs::create_dir_all(&folder)
        .with_context(|| format!("create demo folder {}", folder.display()))?;
    let path = folder.join(file);
    fs::write(&path, b"").with_context(|| format!("write demo image {}", path.display()))
}
