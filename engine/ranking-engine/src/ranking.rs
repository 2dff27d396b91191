use std::cmp::Ordering;
use std::collections::HashMap;

use prospect_registry::{Prospect, Tier};
use tracing::debug;

use crate::comparator::{compare, SortItem};
use crate::filter::{FilterState, RankingInputs};

/// Severity given to prospects with no recognised tier, after every real tier
const UNTIERED_SEVERITY: u8 = 8;

/// Name→rank map for one set of ranking inputs.
///
/// Ranks are contiguous `1..=N` over the prospects that pass the role and
/// tier filters and are not quality-flagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingSystem {
    ranks: HashMap<String, u32>,
}

impl RankingSystem {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ranks.get(name).copied()
    }

    /// Rank as shown in the card and table views
    pub fn display_rank(&self, name: &str) -> String {
        self.get(name).map(|rank| rank.to_string()).unwrap_or_else(|| "N/A".to_string())
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ranks.iter().map(|(name, &rank)| (name.as_str(), rank))
    }
}

/// Prospects eligible for a rank under the role and tier filters
fn passes_filters(prospect: &Prospect, filters: &FilterState) -> bool {
    filters.role.map_or(true, |role| prospect.role == Some(role))
        && filters.tier.map_or(true, |tier| prospect.tier == Some(tier))
}

fn tier_severity(tier: Option<Tier>) -> u8 {
    tier.map(|t| t.severity()).unwrap_or(UNTIERED_SEVERITY)
}

/// Order under the active sort, tier-first when tier lock is on
fn compare_with_filters(a: SortItem<'_>, b: SortItem<'_>, filters: &FilterState) -> Ordering {
    let by_key = || compare(a, b, &filters.sort_key, filters.direction);
    if filters.tier_lock {
        tier_severity(a.prospect.tier).cmp(&tier_severity(b.prospect.tier)).then_with(by_key)
    } else {
        by_key()
    }
}

/// Filter, then stable-sort. Indices handed to the comparator are positions
/// in the filtered list.
fn sorted_population<'a, F>(prospects: &'a [Prospect], filters: &FilterState, keep: F) -> Vec<&'a Prospect>
where
    F: Fn(&Prospect) -> bool,
{
    let mut items: Vec<SortItem<'a>> = prospects
        .iter()
        .filter(|p| passes_filters(p, filters) && keep(p))
        .enumerate()
        .map(|(index, prospect)| SortItem::new(prospect, index))
        .collect();

    items.sort_by(|a, b| compare_with_filters(*a, *b, filters));
    items.into_iter().map(|item| item.prospect).collect()
}

/// Compute ranks for the active role/tier/sort/tier-lock inputs.
///
/// Quality-flagged prospects get no rank. Search text is ignored.
pub fn build_ranking_system(prospects: &[Prospect], filters: &FilterState) -> RankingSystem {
    let ranked = sorted_population(prospects, filters, |p| !p.excluded);

    let ranks = ranked
        .into_iter()
        .enumerate()
        .map(|(i, prospect)| (prospect.name.clone(), (i + 1) as u32))
        .collect::<HashMap<_, _>>();

    debug!("Built ranking system over {} of {} prospects", ranks.len(), prospects.len());
    RankingSystem { ranks }
}

/// A displayed prospect and the rank it was assigned before search
#[derive(Debug, Clone, Copy)]
pub struct RankedProspect<'a> {
    pub prospect: &'a Prospect,
    pub rank: Option<u32>,
}

/// Case-insensitive substring match on the prospect name; empty text matches all
pub fn matches_search(prospect: &Prospect, search_text: &str) -> bool {
    let needle = search_text.trim().to_lowercase();
    needle.is_empty() || prospect.name.to_lowercase().contains(&needle)
}

/// Ordered display list.
///
/// Ranked prospects come first in rank order, then quality-flagged ones under
/// the same comparator. Search narrows the list last and never re-ranks.
pub fn sorted_and_filtered<'a>(
    prospects: &'a [Prospect],
    filters: &FilterState,
    ranking: &RankingSystem,
) -> Vec<RankedProspect<'a>> {
    // Ranked prospects in rank order
    let mut ranked: Vec<RankedProspect<'a>> = prospects
        .iter()
        .filter(|p| passes_filters(p, filters))
        .filter_map(|p| ranking.get(&p.name).map(|rank| RankedProspect { prospect: p, rank: Some(rank) }))
        .collect();
    ranked.sort_by_key(|item| item.rank);

    // Flagged prospects follow, ordered by the active sort
    let unranked = sorted_population(prospects, filters, |p| ranking.get(&p.name).is_none())
        .into_iter()
        .map(|prospect| RankedProspect { prospect, rank: None });

    // Search narrows last
    ranked
        .into_iter()
        .chain(unranked)
        .filter(|item| matches_search(item.prospect, &filters.search_text))
        .collect()
}

/// Holds the ranking for the last ranking inputs and rebuilds only when they change
#[derive(Debug, Default)]
pub struct Ranker {
    cached: Option<(RankingInputs, RankingSystem)>,
    rebuilds: u64,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranking for `filters`; a change in search text alone reuses the cached map
    pub fn ranking_for(&mut self, prospects: &[Prospect], filters: &FilterState) -> &RankingSystem {
        let inputs = filters.ranking_inputs();
        let stale = self.cached.as_ref().map_or(true, |(cached, _)| *cached != inputs);

        if stale {
            self.cached = None;
        }

        let rebuilds = &mut self.rebuilds;
        let (_, ranking) = self.cached.get_or_insert_with(|| {
            *rebuilds += 1;
            (inputs, build_ranking_system(prospects, filters))
        });
        ranking
    }

    /// Drop the cached ranking, e.g. when a different year's prospects load
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// How many times a ranking has been computed
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
