use tracing::{debug, info, warn};

use crate::api::{self, SegmentSource};
use crate::error::{Result, VlrError};
use crate::model::{Match, RecentMatch, TeamStanding, Tournament};
use crate::standings;
use crate::view::{self, StageGroup};

/// One independently loaded list.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T> {
    data: Option<Vec<T>>,
    error: Option<String>,
    loading: bool,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> Panel<T> {
    /// Last successful result, kept through later failures.
    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// User-facing message for the last failure, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn start(&mut self) {
        self.loading = true;
    }

    fn finish(&mut self, result: Result<Vec<T>>, what: &str) {
        self.loading = false;
        match result {
            Ok(data) => {
                debug!(what, count = data.len(), "panel loaded");
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                warn!(what, error = %e, "panel failed to load");
                self.error = Some(format!("Failed to load {what}. Please try again later."));
            }
        }
    }
}

/// A completed fetch, ready to be applied.
#[derive(Debug)]
pub enum FetchOutcome {
    Tournaments(Result<Vec<Tournament>>),
    Standings {
        tournament_id: String,
        result: Result<Vec<TeamStanding>>,
    },
    Matches {
        tournament_id: String,
        result: Result<Vec<Match>>,
    },
}

pub async fn fetch_tournaments<S: SegmentSource>(source: &S) -> FetchOutcome {
    FetchOutcome::Tournaments(api::load_tournaments(source).await)
}

pub async fn fetch_standings<S: SegmentSource>(source: &S, tournament_id: String) -> FetchOutcome {
    let result = api::load_standings(source, &tournament_id).await;
    FetchOutcome::Standings {
        tournament_id,
        result,
    }
}

pub async fn fetch_matches<S: SegmentSource>(source: &S, tournament_id: String) -> FetchOutcome {
    let result = api::load_matches(source, &tournament_id).await;
    FetchOutcome::Matches {
        tournament_id,
        result,
    }
}

#[derive(Debug, Default)]
pub struct Dashboard {
    selected: Option<String>,
    tournaments: Panel<Tournament>,
    standings: Panel<TeamStanding>,
    matches: Panel<Match>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn tournaments(&self) -> &Panel<Tournament> {
        &self.tournaments
    }

    pub fn standings(&self) -> &Panel<TeamStanding> {
        &self.standings
    }

    pub fn matches(&self) -> &Panel<Match> {
        &self.matches
    }

    /// Select a tournament. Returns `false` when `id` is already selected.
    ///
    /// Standings and matches of the previous selection are dropped and both
    /// panels wait for fetches keyed by `id`. An empty id clears the selection.
    pub fn select_tournament(&mut self, id: &str) -> bool {
        let id = Some(id).filter(|id| !id.is_empty());
        if self.selected.as_deref() == id {
            return false;
        }
        info!(tournament = ?id, "tournament selected");
        self.selected = id.map(str::to_owned);
        self.standings = Panel::default();
        self.matches = Panel::default();
        if self.selected.is_some() {
            self.standings.start();
            self.matches.start();
        }
        true
    }

    /// Mark the tournaments panel as loading.
    pub fn begin_tournaments(&mut self) {
        self.tournaments.start();
    }

    /// Record a completed fetch. Returns `false` if it was for a tournament
    /// that is no longer selected.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Tournaments(result) => {
                self.tournaments.finish(result, "tournaments");
                true
            }
            FetchOutcome::Standings {
                tournament_id,
                result,
            } => {
                if !self.is_current(&tournament_id) {
                    return false;
                }
                self.standings.finish(result, "standings");
                true
            }
            FetchOutcome::Matches {
                tournament_id,
                result,
            } => {
                if !self.is_current(&tournament_id) {
                    return false;
                }
                self.matches.finish(result, "matches");
                true
            }
        }
    }

    /// Reload the tournament list.
    pub async fn refresh_tournaments<S: SegmentSource>(&mut self, source: &S) {
        self.begin_tournaments();
        let outcome = fetch_tournaments(source).await;
        self.apply(outcome);
    }

    /// Reload standings and matches of the selected tournament concurrently.
    pub async fn refresh_selection<S: SegmentSource>(&mut self, source: &S) -> Result<()> {
        let id = self
            .selected
            .clone()
            .ok_or(VlrError::NoTournamentSelected)?;
        self.standings.start();
        self.matches.start();
        let (standings, matches) = tokio::join!(
            fetch_standings(source, id.clone()),
            fetch_matches(source, id),
        );
        self.apply(standings);
        self.apply(matches);
        Ok(())
    }

    /// Select `id` and load its standings and matches, unless already selected.
    /// An empty id only clears the selection.
    pub async fn select_and_load<S: SegmentSource>(&mut self, source: &S, id: &str) -> Result<bool> {
        if !self.select_tournament(id) {
            return Ok(false);
        }
        if self.selected.is_some() {
            self.refresh_selection(source).await?;
        }
        Ok(true)
    }

    /// The deduplicated recent matches of the current standings.
    pub fn recent_matches(&self) -> Vec<RecentMatch> {
        self.standings
            .data()
            .map(standings::dedupe)
            .unwrap_or_default()
    }

    /// The current matches in display order, grouped by stage.
    pub fn stage_groups(&self) -> Vec<StageGroup<'_>> {
        self.matches
            .data()
            .map(view::display_groups)
            .unwrap_or_default()
    }

    fn is_current(&self, tournament_id: &str) -> bool {
        let current = self.selected.as_deref() == Some(tournament_id);
        if !current {
            debug!(tournament_id, selected = ?self.selected, "dropping stale result");
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{sample_source, StaticSource};
    use crate::model::{Outcome, SegmentQuery};
    use serde_json::json;

    #[test]
    fn test_select_is_noop_when_unchanged() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.select_tournament("Masters"));
        assert!(dashboard.standings().is_loading());
        assert!(!dashboard.select_tournament("Masters"));
        assert_eq!(dashboard.selected(), Some("Masters"));
        assert!(dashboard.select_tournament(""));
        assert_eq!(dashboard.selected(), None);
        assert!(!dashboard.matches().is_loading());
    }

    #[tokio::test]
    async fn test_refresh_without_selection() {
        let mut dashboard = Dashboard::new();
        let err = dashboard
            .refresh_selection(&sample_source())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DataAbsent);
    }

    #[tokio::test]
    async fn test_select_and_load() {
        let source = sample_source();
        let mut dashboard = Dashboard::new();
        dashboard.refresh_tournaments(&source).await;
        assert_eq!(dashboard.tournaments().data().map(<[_]>::len), Some(2));

        assert!(dashboard.select_and_load(&source, "Masters").await.unwrap());
        assert!(!dashboard.standings().is_loading());
        assert_eq!(dashboard.standings().data().map(<[_]>::len), Some(4));
        assert_eq!(dashboard.matches().data().map(<[_]>::len), Some(3));

        let recent = dashboard.recent_matches();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].outcome(), Outcome::Team1Won);

        let stages: Vec<_> = dashboard.stage_groups().iter().map(|g| g.stage).collect();
        assert_eq!(stages, ["Upper Final", "Upper Semifinal"]);

        assert!(!dashboard.select_and_load(&source, "Masters").await.unwrap());
    }

    #[tokio::test]
    async fn test_select_and_load_empty_clears() {
        let source = sample_source();
        let mut dashboard = Dashboard::new();
        dashboard.select_and_load(&source, "Masters").await.unwrap();
        let before = source.requests.load(std::sync::atomic::Ordering::SeqCst);

        assert!(dashboard.select_and_load(&source, "").await.unwrap());
        assert_eq!(dashboard.selected(), None);
        assert!(dashboard.standings().data().is_none());
        assert!(!dashboard.matches().is_loading());
        assert_eq!(
            source.requests.load(std::sync::atomic::Ordering::SeqCst),
            before
        );
    }

    #[tokio::test]
    async fn test_stale_outcome_is_dropped() {
        let source = sample_source();
        let mut dashboard = Dashboard::new();
        dashboard.select_tournament("Masters");
        let stale = fetch_standings(&source, "Masters".to_owned()).await;
        dashboard.select_tournament("Challengers KR");
        assert!(!dashboard.apply(stale));
        assert!(dashboard.standings().data().is_none());

        let current = fetch_standings(&source, "Challengers KR".to_owned()).await;
        assert!(dashboard.apply(current));
        let names: Vec<_> = dashboard
            .standings()
            .data()
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["DRX", "T1"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let mut dashboard = Dashboard::new();
        dashboard.select_tournament("Masters");
        let loaded = fetch_standings(&sample_source(), "Masters".to_owned()).await;
        dashboard.apply(loaded);

        let broken = StaticSource::default().with_feed(SegmentQuery::Upcoming, json!([]));
        dashboard.refresh_selection(&broken).await.unwrap();

        let standings = dashboard.standings();
        assert_eq!(standings.data().map(<[_]>::len), Some(4));
        assert_eq!(
            standings.error(),
            Some("Failed to load standings. Please try again later.")
        );
        assert_eq!(
            dashboard.matches().error(),
            Some("Failed to load matches. Please try again later.")
        );
        assert!(dashboard.matches().data().is_none());
    }

    #[tokio::test]
    async fn test_panels_fail_independently() {
        let source = StaticSource::default().with_feed(
            SegmentQuery::Upcoming,
            json!([{"team1": "A", "team2": "B", "match_event": "Cup"}]),
        );
        let mut dashboard = Dashboard::new();
        dashboard.refresh_tournaments(&source).await;
        assert!(dashboard.tournaments().error().is_none());
        dashboard.select_and_load(&source, "Cup").await.unwrap();
        assert!(dashboard.standings().error().is_some());
        assert!(dashboard.matches().error().is_some());
        assert_eq!(dashboard.tournaments().data().map(<[_]>::len), Some(1));
    }
}
