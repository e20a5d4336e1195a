// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{Category, ItemKey, Mark};

/// One user's want/have/don't-want sets. The sets are pairwise disjoint; every
/// mutation goes through [`CategoryStore::categorize`], which moves an item
/// rather than copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStore {
    want: BTreeSet<ItemKey>,
    have: BTreeSet<ItemKey>,
    dont_want: BTreeSet<ItemKey>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from independently loaded sets. An item listed in
    /// more than one set keeps the first mark in `Mark::ALL` order so the
    /// disjointness invariant survives hand-edited files.
    pub fn from_loaded(loaded: impl IntoIterator<Item = (Mark, BTreeSet<ItemKey>)>) -> Self {
        let mut by_mark = [BTreeSet::new(), BTreeSet::new(), BTreeSet::new()];
        for (mark, items) in loaded {
            by_mark[slot(mark)].extend(items);
        }

        let mut store = Self::default();
        for mark in Mark::ALL {
            for item in std::mem::take(&mut by_mark[slot(mark)]) {
                let existing = store.category_of(&item);
                if existing == Category::Uncategorized {
                    store.set_mut(mark).insert(item);
                } else {
                    log::warn!(
                        "item {item} is listed as both {} and {}; keeping {}",
                        existing.as_str(),
                        mark.as_str(),
                        existing.as_str()
                    );
                }
            }
        }
        store
    }

    /// Moves `item` into `mark`'s set, returning the category it had before.
    pub fn categorize(&mut self, item: &ItemKey, mark: Mark) -> Category {
        let previous = self.category_of(item);
        for other in Mark::ALL {
            self.set_mut(other).remove(item);
        }
        self.set_mut(mark).insert(item.clone());
        previous
    }

    pub fn category_of(&self, item: &ItemKey) -> Category {
        Mark::ALL
            .into_iter()
            .find(|mark| self.set(*mark).contains(item))
            .map_or(Category::Uncategorized, Mark::category)
    }

    pub fn is_wanted(&self, item: &ItemKey) -> bool {
        self.want.contains(item)
    }

    pub fn set(&self, mark: Mark) -> &BTreeSet<ItemKey> {
        match mark {
            Mark::Want => &self.want,
            Mark::Have => &self.have,
            Mark::DontWant => &self.dont_want,
        }
    }

    pub fn wants(&self) -> &BTreeSet<ItemKey> {
        &self.want
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            want: self.want.len(),
            have: self.have.len(),
            dont_want: self.dont_want.len(),
        }
    }

    pub fn is_disjoint(&self) -> bool {
        self.want.is_disjoint(&self.have)
            && self.want.is_disjoint(&self.dont_want)
            && self.have.is_disjoint(&self.dont_want)
    }

    fn set_mut(&mut self, mark: Mark) -> &mut BTreeSet<ItemKey> {
        match mark {
            Mark::Want => &mut self.want,
            Mark::Have => &mut self.have,
            Mark::DontWant => &mut self.dont_want,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub want: usize,
    pub have: usize,
    pub dont_want: usize,
}

const fn slot(mark: Mark) -> usize {
    match mark {
        Mark::Want => 0,
        Mark::Have => 1,
        Mark::DontWant => 2,
    }
}
