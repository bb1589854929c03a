use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::flag::{self, FlagGlyph};

/// A list of matches belonging to one tournament.
pub type MatchList = Vec<Match>;

/// Where a match is in its lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

/// Summary information for a single match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: String,
    pub team1: MatchTeam,
    pub team2: MatchTeam,
    pub date: DateTime<Utc>,
    pub status: MatchStatus,
    pub tournament_id: Option<String>,
    pub stage: String,
    pub match_page: Option<String>,
}

/// A side of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTeam {
    pub name: String,
    pub flag: Option<String>,
}

impl MatchTeam {
    pub fn glyph(&self) -> FlagGlyph {
        flag::resolve(self.flag.as_deref())
    }
}
