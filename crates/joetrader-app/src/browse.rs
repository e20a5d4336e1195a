// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{BrowseMode, CategoryStore, ItemCatalog, ItemKey, MetadataIndex, SortMode};

/// A step that crossed the end of the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// last -> first
    Forward,
    /// first -> last
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub mode: BrowseMode,
    pub index: usize,
    /// Only reported while browsing the full list.
    pub wrap: Option<Wrap>,
}

/// Two independent cursors over the full catalog order and its want-only
/// subsequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    full: Vec<ItemKey>,
    wants: Vec<ItemKey>,
    mode: BrowseMode,
    cursor_all: usize,
    cursor_want: usize,
    sort: SortMode,
}

impl BrowseState {
    pub fn new(catalog: &ItemCatalog, categories: &CategoryStore) -> Self {
        let mut state = Self {
            full: catalog.keys().cloned().collect(),
            wants: Vec::new(),
            mode: BrowseMode::All,
            cursor_all: 0,
            cursor_want: 0,
            sort: SortMode::None,
        };
        state.recompute_want_list(categories);
        state
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn full_list(&self) -> &[ItemKey] {
        &self.full
    }

    pub fn want_list(&self) -> &[ItemKey] {
        &self.wants
    }

    pub fn cursor_all(&self) -> usize {
        self.cursor_all
    }

    pub fn cursor_want(&self) -> usize {
        self.cursor_want
    }

    pub fn active_list(&self) -> &[ItemKey] {
        match self.mode {
            BrowseMode::All => &self.full,
            BrowseMode::WantOnly => &self.wants,
        }
    }

    pub fn active_index(&self) -> usize {
        match self.mode {
            BrowseMode::All => self.cursor_all,
            BrowseMode::WantOnly => self.cursor_want,
        }
    }

    pub fn active_item(&self) -> Option<&ItemKey> {
        self.active_list().get(self.active_index())
    }

    /// 1-based position and length of the active list, for display.
    pub fn position(&self) -> Option<(usize, usize)> {
        let len = self.active_list().len();
        (len > 0).then(|| (self.active_index() + 1, len))
    }

    pub fn advance(&mut self) -> Option<Step> {
        self.step(true)
    }

    pub fn retreat(&mut self) -> Option<Step> {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> Option<Step> {
        let len = self.active_list().len();
        if len == 0 {
            return None;
        }
        let last = len - 1;
        let mode = self.mode;
        let cursor = match mode {
            BrowseMode::All => &mut self.cursor_all,
            BrowseMode::WantOnly => &mut self.cursor_want,
        };
        let old = *cursor;
        let (next, wrap) = if forward {
            if old >= last {
                (0, Some(Wrap::Forward))
            } else {
                (old + 1, None)
            }
        } else if old == 0 {
            (last, Some(Wrap::Backward))
        } else {
            (old - 1, None)
        };
        *cursor = next;

        Some(Step {
            mode,
            index: next,
            wrap: wrap.filter(|_| mode == BrowseMode::All),
        })
    }

    /// Flips the mode and restarts the newly active list at its first item.
    pub fn toggle_mode(&mut self) -> BrowseMode {
        self.mode = self.mode.toggled();
        match self.mode {
            BrowseMode::All => self.cursor_all = 0,
            BrowseMode::WantOnly => self.cursor_want = 0,
        }
        self.mode
    }

    /// Re-orders the full list in place with a stable sort, re-derives the want
    /// list from the new order and rewinds both cursors. `SortMode::None`
    /// keeps the current order: there is no unsort.
    pub fn set_sort(&mut self, sort: SortMode, categories: &CategoryStore, metadata: &MetadataIndex) {
        match sort {
            SortMode::None => {}
            SortMode::ByYear => self.full.sort_by_key(|key| metadata.sort_year(key)),
            SortMode::ByName => self
                .full
                .sort_by(|a, b| metadata.sort_name(a).cmp(metadata.sort_name(b))),
            SortMode::ByCategory => self
                .full
                .sort_by_key(|key| categories.category_of(key).rank()),
        }
        self.sort = sort;
        self.recompute_want_list(categories);
        self.cursor_all = 0;
        self.cursor_want = 0;
    }

    /// Rebuilds the want list from the full list's current order. The want
    /// cursor is kept when still in range, otherwise rewound to 0.
    pub fn recompute_want_list(&mut self, categories: &CategoryStore) {
        self.wants = self
            .full
            .iter()
            .filter(|key| categories.is_wanted(key))
            .cloned()
            .collect();
        if self.cursor_want >= self.wants.len() {
            self.cursor_want = 0;
        }
    }
}
