use chrono::NaiveDate;
use serde::Serialize;

/// Lifecycle state of a tournament.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

/// A tournament derived from the events seen in the match feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tournament {
    /// The event name, used as a natural key.
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub prize_pool: String,
    pub status: TournamentStatus,
    pub team_count: u32,
}
