//! Board session
//!
//! Owns the selected year, every registry loaded so far, the active filters
//! and the column preferences. Each load is tagged with a generation number
//! and a response is applied only if no newer load began after it, so rapid
//! year switching can never show an older request's data.

use std::collections::HashMap;

use consensus_engine::{ConsensusConfig, ConsensusEngine, ProspectConsensus};
use prospect_registry::{Prospect, ProspectRegistry};
use ranking_engine::{
    sorted_and_filtered, ColumnPreferences, ColumnSet, FilterState, RankedProspect, Ranker, RankingSystem,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::fetcher::BoardFetcher;

/// Identifies one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub year: u16,
    pub generation: u64,
}

/// What happened to a completed load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadOutcome {
    /// The registry is now displayed
    Applied { year: u16, prospects: usize },
    /// A newer load started first; the response was dropped
    Stale { year: u16, generation: u64 },
    /// Fetch or parse failed; the previous board stays displayed
    Failed { year: u16, reason: String },
}

pub struct BoardSession {
    engine: ConsensusEngine,
    selected_year: u16,
    displayed_year: Option<u16>,
    generation: u64,
    registries: HashMap<u16, ProspectRegistry>,
    filters: FilterState,
    ranker: Ranker,
    preferences: ColumnPreferences,
}

impl BoardSession {
    pub fn new(default_year: u16, consensus: ConsensusConfig) -> Self {
        Self {
            engine: ConsensusEngine::new(consensus),
            selected_year: default_year,
            displayed_year: None,
            generation: 0,
            registries: HashMap::new(),
            filters: FilterState::default(),
            ranker: Ranker::new(),
            preferences: ColumnPreferences::new(default_year),
        }
    }

    pub fn selected_year(&self) -> u16 {
        self.selected_year
    }

    /// Year of the board currently shown; `None` before the first successful load
    pub fn displayed_year(&self) -> Option<u16> {
        self.displayed_year
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a load for `year`, superseding every earlier ticket
    pub fn begin_load(&mut self, year: u16) -> LoadTicket {
        self.generation += 1;
        self.selected_year = year;

        debug!("Began load of {} (generation {})", year, self.generation);
        LoadTicket { year, generation: self.generation }
    }

    /// Apply the result of a load unless a newer one has begun since
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<ProspectRegistry>) -> LoadOutcome {
        if ticket.generation != self.generation {
            info!(
                "Discarding stale {} board response (generation {}, current {})",
                ticket.year, ticket.generation, self.generation
            );
            return LoadOutcome::Stale { year: ticket.year, generation: ticket.generation };
        }

        match result {
            Ok(registry) => {
                let prospects = registry.len();
                self.registries.insert(ticket.year, registry);
                self.show(ticket.year);
                LoadOutcome::Applied { year: ticket.year, prospects }
            }
            Err(e) => {
                error!("Keeping previous board after failed {} load: {}", ticket.year, e);
                LoadOutcome::Failed { year: ticket.year, reason: e.to_string() }
            }
        }
    }

    /// Switch to `year`, fetching it unless it was loaded before
    pub async fn select_year(&mut self, fetcher: &BoardFetcher, year: u16) -> LoadOutcome {
        let ticket = self.begin_load(year);

        // Already loaded years are shown without a fetch
        if let Some(registry) = self.registries.get(&year) {
            let prospects = registry.len();
            self.show(year);
            return LoadOutcome::Applied { year, prospects };
        }

        let result = fetcher.fetch_year(year).await;
        self.complete_load(ticket, result)
    }

    /// Fetch the selected year again, replacing any cached copy
    pub async fn reload(&mut self, fetcher: &BoardFetcher) -> LoadOutcome {
        let ticket = self.begin_load(self.selected_year);
        let result = fetcher.fetch_year(ticket.year).await;
        self.complete_load(ticket, result)
    }

    /// Display a loaded year; showing a different year drops the column preferences
    fn show(&mut self, year: u16) {
        self.preferences.set_year(year);
        self.displayed_year = Some(year);
        self.ranker.invalidate();
    }

    pub fn registry(&self) -> Option<&ProspectRegistry> {
        self.displayed_year.and_then(|year| self.registries.get(&year))
    }

    /// Prospects of the displayed board, empty before the first load
    pub fn prospects(&self) -> &[Prospect] {
        self.registry().map(|r| r.prospects()).unwrap_or(&[])
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn set_search(&mut self, search_text: impl Into<String>) {
        self.filters.search_text = search_text.into();
    }

    /// Rank map for the current filters
    pub fn ranking(&mut self) -> &RankingSystem {
        let prospects: &[Prospect] = match self.displayed_year.and_then(|year| self.registries.get(&year)) {
            Some(registry) => registry.prospects(),
            None => &[],
        };
        self.ranker.ranking_for(prospects, &self.filters)
    }

    /// Ordered, searched display list with ranks
    pub fn display_list(&mut self) -> Vec<RankedProspect<'_>> {
        let prospects: &[Prospect] = match self.displayed_year.and_then(|year| self.registries.get(&year)) {
            Some(registry) => registry.prospects(),
            None => &[],
        };
        let ranking = self.ranker.ranking_for(prospects, &self.filters);
        sorted_and_filtered(prospects, &self.filters, ranking)
    }

    /// Histogram, sparse flag, y-axis, range chart and statistics for one prospect
    pub fn consensus(&self, name: &str) -> Option<ProspectConsensus> {
        let registry = self.registry()?;
        let prospect = registry.get_by_name(name).ok()?;
        Some(self.engine.analyze(prospect, registry.consensus_for(name), registry.year()))
    }

    /// Table columns: defaults, the board's contributors, then the user's visibility choices
    pub fn columns(&self) -> ColumnSet {
        let contributors =
            self.registry().map(|r| r.contributor_keys(self.engine.discovery())).unwrap_or_default();

        let mut columns = ColumnSet::defaults().with_contributors(&contributors);
        self.preferences.apply(&mut columns);
        columns
    }

    pub fn set_column_visible(&mut self, key: impl Into<String>, visible: bool) {
        self.preferences.set_visible(key, visible);
    }

    pub fn ranker_rebuilds(&self) -> u64 {
        self.ranker.rebuilds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::error::BoardError;
    use crate::source::FileCsvSource;
    use ranking_engine::{SortDirection, SortKey};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    const BOARD_2024: &str = "\
Name,Role,Tier,Actual Pick,Low GP,ESPN,Ringer
Zach Edey,Big,Starter,9,,8,10
Reed Sheppard,Guard,All-Star,3,,3,2
Stephon Castle,Guard,Starter,4,,5,4
";

    const BOARD_2025: &str = "\
Name,Role,Tier,Actual Pick,Low GP,ContribA,ContribB
Al,Guard,Starter,1,,1,2
Bo,Wing,Bench,UDFA,,,3
Cy,Big,Role Player,2,yes,2,2
";

    fn create_test_fetcher() -> (TempDir, BoardFetcher) {
        let temp_dir = TempDir::new().unwrap();
        for (year, body) in [(2024u16, BOARD_2024), (2025, BOARD_2025)] {
            let dir = temp_dir.path().join(year.to_string());
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("prospects.csv"), body).unwrap();
        }

        let source = Box::new(FileCsvSource::new(temp_dir.path()));
        let fetcher = BoardFetcher::new(source, FileConfig::default(), vec![2023, 2024, 2025]);
        (temp_dir, fetcher)
    }

    fn create_test_session() -> BoardSession {
        BoardSession::new(2025, ConsensusConfig::default())
    }

    fn names(list: &[RankedProspect<'_>]) -> Vec<String> {
        list.iter().map(|item| item.prospect.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_select_year_loads_and_ranks() {
        let (_dir, fetcher) = create_test_fetcher();
        let mut session = create_test_session();

        let outcome = session.select_year(&fetcher, 2025).await;
        assert_eq!(outcome, LoadOutcome::Applied { year: 2025, prospects: 3 });
        assert_eq!(session.displayed_year(), Some(2025));

        let ranking = session.ranking().clone();
        assert_eq!(ranking.get("Al"), Some(1));
        assert_eq!(ranking.get("Bo"), Some(2));
        assert_eq!(ranking.display_rank("Cy"), "N/A");

        let cy = session.consensus("Cy").unwrap();
        assert_eq!(cy.histogram.bins.len(), 3);
        assert!(cy.is_sparse);
        assert!(session.consensus("Nobody").is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (_dir, fetcher) = create_test_fetcher();
        let fetcher = Arc::new(fetcher);
        let mut session = create_test_session();

        let first = session.begin_load(2024);
        let second = session.begin_load(2025);

        let slow = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch_year(2024).await })
        };
        let fast = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch_year(2025).await })
        };

        let fast_result = fast.await.unwrap();
        assert_eq!(session.complete_load(second, fast_result), LoadOutcome::Applied { year: 2025, prospects: 3 });

        let slow_result = slow.await.unwrap();
        assert_eq!(session.complete_load(first, slow_result), LoadOutcome::Stale { year: 2024, generation: 1 });

        assert_eq!(session.displayed_year(), Some(2025));
        assert!(session.registry().unwrap().get_by_name("Zach Edey").is_err());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_board() {
        let (_dir, fetcher) = create_test_fetcher();
        let mut session = create_test_session();

        session.select_year(&fetcher, 2025).await;
        session.set_column_visible("ContribA", true);

        let outcome = session.select_year(&fetcher, 2023).await;
        assert!(matches!(outcome, LoadOutcome::Failed { year: 2023, .. }));
        assert_eq!(session.selected_year(), 2023);
        assert_eq!(session.displayed_year(), Some(2025));
        assert_eq!(session.prospects().len(), 3);
        assert!(session.columns().get("ContribA").unwrap().visible);

        // Choices made after the failed switch still belong to the shown board
        session.set_column_visible("ContribB", true);
        session.select_year(&fetcher, 2025).await;
        let columns = session.columns();
        assert!(columns.get("ContribA").unwrap().visible);
        assert!(columns.get("ContribB").unwrap().visible);

        let ticket = session.begin_load(2025);
        let outcome = session.complete_load(ticket, Err(BoardError::UnknownYear(2025)));
        assert!(matches!(outcome, LoadOutcome::Failed { .. }));
        assert_eq!(session.prospects().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_session_before_first_load() {
        let mut session = create_test_session();
        assert!(session.prospects().is_empty());
        assert!(session.ranking().is_empty());
        assert!(session.display_list().is_empty());
        assert!(session.columns().in_category(ranking_engine::ColumnCategory::Contributors).next().is_none());
    }

    #[tokio::test]
    async fn test_search_narrows_without_rerank() {
        let (_dir, fetcher) = create_test_fetcher();
        let mut session = create_test_session();
        session.select_year(&fetcher, 2024).await;

        session.set_filters(
            FilterState::new().sorted_by(SortKey::ActualPick, SortDirection::Ascending),
        );
        assert_eq!(names(&session.display_list()), vec!["Reed Sheppard", "Stephon Castle", "Zach Edey"]);

        session.set_search("EDEY");
        let list = session.display_list();
        assert_eq!(names(&list), vec!["Zach Edey"]);
        assert_eq!(list[0].rank, Some(3));
        assert_eq!(session.ranker_rebuilds(), 1);
    }

    #[tokio::test]
    async fn test_year_change_clears_column_preferences() {
        let (_dir, fetcher) = create_test_fetcher();
        let mut session = create_test_session();
        assert_ok!(fetcher.fetch_year(2024).await);

        session.select_year(&fetcher, 2025).await;
        session.set_column_visible("ContribA", true);
        assert!(session.columns().get("ContribA").unwrap().visible);

        session.select_year(&fetcher, 2025).await;
        assert!(session.columns().get("ContribA").unwrap().visible);

        session.select_year(&fetcher, 2024).await;
        let columns = session.columns();
        assert!(columns.get("ContribA").is_none());
        assert!(!columns.get("ESPN").unwrap().visible);

        session.select_year(&fetcher, 2025).await;
        assert!(!session.columns().get("ContribA").unwrap().visible);
    }

    #[tokio::test]
    async fn test_cached_year_is_not_refetched() {
        let (dir, fetcher) = create_test_fetcher();
        let mut session = create_test_session();

        session.select_year(&fetcher, 2025).await;
        session.select_year(&fetcher, 2024).await;
        std::fs::remove_file(dir.path().join("2025/prospects.csv")).unwrap();

        let outcome = session.select_year(&fetcher, 2025).await;
        assert_eq!(outcome, LoadOutcome::Applied { year: 2025, prospects: 3 });

        let outcome = session.reload(&fetcher).await;
        assert!(matches!(outcome, LoadOutcome::Failed { year: 2025, .. }));
        assert_eq!(session.prospects().len(), 3);
    }
}
