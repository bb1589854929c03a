use std::future::Future;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{Match, RawMatchRecord, SegmentQuery, TeamStanding, Tournament};
use crate::normalize;

/// Anything that can hand out match feed segments.
///
/// [`VlrClient`](crate::VlrClient) is the network implementation.
pub trait SegmentSource {
    fn fetch_segments(
        &self,
        query: SegmentQuery,
    ) -> impl Future<Output = Result<Vec<RawMatchRecord>>> + Send;
}

/// Tournaments announced in the upcoming feed.
#[instrument(skip(source))]
pub async fn load_tournaments<S: SegmentSource>(source: &S) -> Result<Vec<Tournament>> {
    let segments = source.fetch_segments(SegmentQuery::Upcoming).await?;
    Ok(normalize::to_tournaments(&segments))
}

/// Standings from the results feed, restricted to `tournament_id` by tournament name.
#[instrument(skip(source))]
pub async fn load_standings<S: SegmentSource>(
    source: &S,
    tournament_id: &str,
) -> Result<Vec<TeamStanding>> {
    let segments = source
        .fetch_segments(SegmentQuery::Results)
        .await?
        .into_iter()
        .filter(|segment| segment.tournament_name.as_deref() == Some(tournament_id))
        .collect_vec();
    debug!(count = segments.len(), "results for tournament");
    Ok(normalize::to_standings(&segments))
}

/// Upcoming and finished matches of `tournament_id`, upcoming first.
#[instrument(skip(source))]
pub async fn load_matches<S: SegmentSource>(source: &S, tournament_id: &str) -> Result<Vec<Match>> {
    let (upcoming, results) = tokio::try_join!(
        source.fetch_segments(SegmentQuery::Upcoming),
        source.fetch_segments(SegmentQuery::Results),
    )?;
    let segments = upcoming
        .into_iter()
        .chain(results)
        .filter(|segment| segment.belongs_to(tournament_id))
        .collect_vec();
    debug!(count = segments.len(), "segments for tournament");
    Ok(normalize::to_matches(&segments))
}
