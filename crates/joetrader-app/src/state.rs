// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

use crate::{
    BrowseMode, BrowseState, Category, CategoryStore, ItemCatalog, ItemKey, ItemMetadata,
    LIST_COMPLETE_MESSAGE, Mark, MetadataIndex, SaleListing, ScrollGate, SortMode,
    filter_listing_by_want, intersect_wants,
};

/// Write-through persistence for one user's state. Every call must complete
/// before the command that triggered it returns.
pub trait UserStateSink {
    fn save_categories(&mut self, categories: &CategoryStore) -> Result<()>;
    fn save_scroll_gate(&mut self, gate: ScrollGate) -> Result<()>;
}

/// State restored for a user at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    pub categories: CategoryStore,
    pub gate: ScrollGate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Next,
    Previous,
    /// Marks the active item, then moves on when it is still in the active list.
    Categorize(Mark),
    ToggleMode,
    Sort(SortMode),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CursorMoved {
        mode: BrowseMode,
        index: usize,
    },
    Categorized {
        item: ItemKey,
        previous: Category,
        current: Category,
    },
    WantListChanged(usize),
    ModeChanged(BrowseMode),
    Sorted(SortMode),
    ShopUnlocked,
    StatusUpdated(String),
    StatusCleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    NoMatches,
    Matches(BTreeSet<ItemKey>),
}

impl CompareOutcome {
    /// File names of matched items, in key order.
    pub fn match_names(&self) -> Vec<String> {
        match self {
            Self::NoMatches => Vec::new(),
            Self::Matches(items) => items
                .iter()
                .map(|item| item.file_name().to_owned())
                .collect(),
        }
    }
}

/// One user's browsing session over a catalog.
#[derive(Debug)]
pub struct Session<S> {
    username: String,
    catalog: ItemCatalog,
    metadata: MetadataIndex,
    categories: CategoryStore,
    browse: BrowseState,
    gate: ScrollGate,
    sink: S,
    pub status_line: Option<String>,
}

impl<S: UserStateSink> Session<S> {
    pub fn new(
        username: impl Into<String>,
        catalog: ItemCatalog,
        metadata: MetadataIndex,
        user: UserState,
        sink: S,
    ) -> Self {
        let browse = BrowseState::new(&catalog, &user.categories);
        Self {
            username: username.into(),
            catalog,
            metadata,
            categories: user.categories,
            browse,
            gate: user.gate,
            sink,
            status_line: None,
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Result<Vec<AppEvent>> {
        log::debug!("dispatch {command:?} for {}", self.username);
        match command {
            AppCommand::Next => self.step(true),
            AppCommand::Previous => self.step(false),
            AppCommand::Categorize(mark) => self.categorize_active(mark),
            AppCommand::ToggleMode => {
                let mode = self.browse.toggle_mode();
                Ok(vec![AppEvent::ModeChanged(mode)])
            }
            AppCommand::Sort(sort) => {
                self.browse
                    .set_sort(sort, &self.categories, &self.metadata);
                Ok(vec![AppEvent::Sorted(sort)])
            }
            AppCommand::SetStatus(message) => Ok(vec![self.set_status(message)]),
            AppCommand::ClearStatus => {
                self.status_line = None;
                Ok(vec![AppEvent::StatusCleared])
            }
        }
    }

    /// Assigns `mark` to `item` and flushes all three sets before returning.
    /// Items outside the catalog are accepted.
    pub fn categorize(&mut self, item: &ItemKey, mark: Mark) -> Result<Vec<AppEvent>> {
        let previous = self.categories.categorize(item, mark);
        let wants_before = self.browse.want_list().len();
        self.browse.recompute_want_list(&self.categories);
        self.sink.save_categories(&self.categories)?;

        let mut events = vec![AppEvent::Categorized {
            item: item.clone(),
            previous,
            current: mark.category(),
        }];
        let wants_after = self.browse.want_list().len();
        if wants_after != wants_before {
            events.push(AppEvent::WantListChanged(wants_after));
        }
        Ok(events)
    }

    fn categorize_active(&mut self, mark: Mark) -> Result<Vec<AppEvent>> {
        let Some(item) = self.browse.active_item().cloned() else {
            return Ok(Vec::new());
        };
        let mut events = self.categorize(&item, mark)?;
        // In want-only mode an item marked away from Want has already left
        // the list, so the cursor sits on the next item.
        let still_listed = self.browse.mode() == BrowseMode::All || mark == Mark::Want;
        if still_listed {
            events.extend(self.step(true)?);
        }
        Ok(events)
    }

    fn step(&mut self, forward: bool) -> Result<Vec<AppEvent>> {
        let step = if forward {
            self.browse.advance()
        } else {
            self.browse.retreat()
        };
        let Some(step) = step else {
            return Ok(Vec::new());
        };

        let mut events = vec![AppEvent::CursorMoved {
            mode: step.mode,
            index: step.index,
        }];
        // The gate only latches once its new state is on disk, so a failed
        // write is retried on the next wrap.
        let mut gate = self.gate;
        if gate.observe(&step) {
            self.sink.save_scroll_gate(gate)?;
            self.gate = gate;
            log::info!("{} completed a full pass; shop unlocked", self.username);
            events.push(AppEvent::ShopUnlocked);
            events.push(self.set_status(LIST_COMPLETE_MESSAGE));
        }
        Ok(events)
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn gate(&self) -> ScrollGate {
        self.gate
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn active_item(&self) -> Option<&ItemKey> {
        self.browse.active_item()
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active_item().and_then(|item| self.catalog.path_of(item))
    }

    pub fn metadata_of(&self, item: &ItemKey) -> Option<&ItemMetadata> {
        self.metadata.get(item)
    }

    pub fn category_of(&self, item: &ItemKey) -> Category {
        self.categories.category_of(item)
    }

    pub fn shop_access_permitted(&self) -> bool {
        self.gate.shop_access_permitted()
    }

    /// Wanted items that the seller also lists.
    pub fn compare_with_seller(&self, seller: &BTreeSet<String>) -> CompareOutcome {
        let matches = intersect_wants(self.categories.wants(), seller);
        log::info!(
            "seller comparison for {}: {} of {} wants matched",
            self.username,
            matches.len(),
            self.categories.wants().len()
        );
        if matches.is_empty() {
            CompareOutcome::NoMatches
        } else {
            CompareOutcome::Matches(matches)
        }
    }

    /// Listing entries shown in the shop, optionally narrowed to wanted items.
    pub fn shop_entries<'a>(&self, listing: &'a [SaleListing], want_only: bool) -> Vec<&'a SaleListing> {
        if want_only {
            filter_listing_by_want(listing, self.categories.wants())
        } else {
            listing.iter().collect()
        }
    }
}
