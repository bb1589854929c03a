use serde::Serialize;

use crate::flag::{self, FlagGlyph};

/// Win/loss record and match history of one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    pub name: String,
    pub flag: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub match_history: Vec<HistoryEntry>,
}

impl TeamStanding {
    pub fn glyph(&self) -> FlagGlyph {
        flag::resolve(self.flag.as_deref())
    }
}

/// One match from the perspective of the team that owns the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub opponent: String,
    pub opponent_flag: Option<String>,
    pub won: bool,
    /// Team-relative, `own-opponent`.
    pub score: String,
}

/// A distinct pairing in the recent matches view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentMatch {
    pub team1: String,
    pub team1_flag: Option<String>,
    pub team2: String,
    pub team2_flag: Option<String>,
    pub score: String,
    pub team1_won: bool,
}

/// How a recent match is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Team1Won,
    Team2Won,
    Draw,
}
