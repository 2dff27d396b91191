use std::cmp::Ordering;

use prospect_registry::{Role, Tier};
use serde::{Deserialize, Serialize};

use crate::comparator::SortKey;

/// Sort direction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Flip an ascending comparison for descending order
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Every user-controlled input to ranking and display, as one value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub role: Option<Role>,
    pub tier: Option<Tier>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// Sort tier-first, `sort_key` second
    pub tier_lock: bool,
    /// Narrows the displayed list only
    pub search_text: String,
}

/// The part of [`FilterState`] that decides ranks. Search text is not in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingInputs {
    pub role: Option<Role>,
    pub tier: Option<Tier>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub tier_lock: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn with_tier(mut self, tier: Option<Tier>) -> Self {
        self.tier = tier;
        self
    }

    pub fn sorted_by(mut self, sort_key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = sort_key;
        self.direction = direction;
        self
    }

    pub fn with_tier_lock(mut self, tier_lock: bool) -> Self {
        self.tier_lock = tier_lock;
        self
    }

    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    pub fn ranking_inputs(&self) -> RankingInputs {
        RankingInputs {
            role: self.role,
            tier: self.tier,
            sort_key: self.sort_key.clone(),
            direction: self.direction,
            tier_lock: self.tier_lock,
        }
    }
}
