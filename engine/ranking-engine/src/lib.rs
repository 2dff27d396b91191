//! Ranking Engine
//!
//! Computes a contiguous name→rank map for the active role/tier/sort
//! filters, orders the displayed list with the same comparator, and narrows
//! it by search text without touching the ranks.

pub mod columns;
pub mod comparator;
pub mod filter;
pub mod ranking;

pub use columns::{ColumnCategory, ColumnConfig, ColumnPreferences, ColumnSet};
pub use comparator::{compare, SortItem, SortKey};
pub use filter::{FilterState, RankingInputs, SortDirection};
pub use ranking::{build_ranking_system, sorted_and_filtered, RankedProspect, Ranker, RankingSystem};
