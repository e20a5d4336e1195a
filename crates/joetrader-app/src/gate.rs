// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{BrowseMode, Step};

pub const SHOP_LOCKED_MESSAGE: &str =
    "Please scroll through the whole list before browsing items for sale.";
pub const LIST_COMPLETE_MESSAGE: &str =
    "You have viewed every item! The shop is now open.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotScrolled,
    Scrolled,
}

/// One-way latch that opens the shop after a full pass over the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollGate {
    state: GateState,
}

impl Default for ScrollGate {
    fn default() -> Self {
        Self {
            state: GateState::NotScrolled,
        }
    }
}

impl ScrollGate {
    pub fn from_persisted(scrolled: bool) -> Self {
        Self {
            state: if scrolled {
                GateState::Scrolled
            } else {
                GateState::NotScrolled
            },
        }
    }

    pub fn state(self) -> GateState {
        self.state
    }

    pub fn is_scrolled(self) -> bool {
        self.state == GateState::Scrolled
    }

    /// Whether the shop view may be opened.
    pub fn shop_access_permitted(self) -> bool {
        self.is_scrolled()
    }

    /// Feeds a browse step to the gate. Returns `true` only on the single
    /// transition to `Scrolled`.
    pub fn observe(&mut self, step: &Step) -> bool {
        if self.is_scrolled() || step.mode != BrowseMode::All || step.wrap.is_none() {
            return false;
        }
        self.state = GateState::Scrolled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{GateState, ScrollGate};
    use crate::{BrowseMode, Step, Wrap};

    fn step(mode: BrowseMode, wrap: Option<Wrap>) -> Step {
        Step {
            mode,
            index: 0,
            wrap,
        }
    }

    #[test]
    fn fires_once_on_first_wrap() {
        let mut gate = ScrollGate::default();
        assert!(!gate.shop_access_permitted());
        assert!(!gate.observe(&step(BrowseMode::All, None)));
        assert!(gate.observe(&step(BrowseMode::All, Some(Wrap::Backward))));
        assert_eq!(gate.state(), GateState::Scrolled);

        for wrap in [None, Some(Wrap::Forward), Some(Wrap::Backward)] {
            assert!(!gate.observe(&step(BrowseMode::All, wrap)));
            assert!(gate.shop_access_permitted());
        }
    }

    #[test]
    fn want_only_steps_never_fire() {
        let mut gate = ScrollGate::default();
        assert!(!gate.observe(&step(BrowseMode::WantOnly, Some(Wrap::Forward))));
        assert_eq!(gate.state(), GateState::NotScrolled);
    }

    #[test]
    fn persisted_flag_restores_state() {
        assert!(ScrollGate::from_persisted(true).is_scrolled());
        assert!(!ScrollGate::from_persisted(false).is_scrolled());
    }
}
