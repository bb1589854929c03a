use std::collections::{HashMap, HashSet};

use crate::model::{HistoryEntry, Outcome, RecentMatch, Scalar, TeamStanding};

/// One side of a played match as read from a segment.
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub name: &'a str,
    pub flag: Option<&'a str>,
    pub score: Option<&'a Scalar>,
}

impl Side<'_> {
    /// `NaN` when the score is missing or not a number.
    fn points(&self) -> f64 {
        self.score.map(Scalar::as_f64).unwrap_or(f64::NAN)
    }

    fn score_text(&self) -> String {
        self.score.map(ToString::to_string).unwrap_or_default()
    }
}

/// Standings keyed by team name, kept in order of first appearance.
#[derive(Debug, Default)]
pub struct StandingsTable {
    teams: Vec<TeamStanding>,
    index: HashMap<String, usize>,
}

impl StandingsTable {
    /// Add one result to both teams.
    ///
    /// Team 1 wins only on a strictly greater numeric score, so equal or
    /// unreadable scores count as a team 2 win.
    pub fn record(&mut self, team1: Side<'_>, team2: Side<'_>) {
        let team1_won = team1.points() > team2.points();
        let home = self.entry(team1);
        let away = self.entry(team2);
        self.push(home, team2, team1_won, format!("{}-{}", team1.score_text(), team2.score_text()));
        self.push(away, team1, !team1_won, format!("{}-{}", team2.score_text(), team1.score_text()));
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn into_standings(self) -> Vec<TeamStanding> {
        self.teams
    }

    fn entry(&mut self, side: Side<'_>) -> usize {
        if let Some(&position) = self.index.get(side.name) {
            return position;
        }
        let position = self.teams.len();
        self.teams.push(TeamStanding {
            name: side.name.to_owned(),
            flag: side.flag.map(str::to_owned),
            wins: 0,
            losses: 0,
            match_history: Vec::new(),
        });
        self.index.insert(side.name.to_owned(), position);
        position
    }

    fn push(&mut self, position: usize, opponent: Side<'_>, won: bool, score: String) {
        let team = &mut self.teams[position];
        if won {
            team.wins += 1;
        } else {
            team.losses += 1;
        }
        team.match_history.push(HistoryEntry {
            opponent: opponent.name.to_owned(),
            opponent_flag: opponent.flag.map(str::to_owned),
            won,
            score,
        });
    }
}

/// Every distinct pairing across all histories, once.
///
/// Teams are walked in standings order and each history in order; the first
/// team to mention a pairing is shown as `team1`.
pub fn dedupe(standings: &[TeamStanding]) -> Vec<RecentMatch> {
    let mut seen = HashSet::new();
    let mut recent = Vec::new();
    for team in standings {
        for entry in &team.match_history {
            if !seen.insert(pair_key(&team.name, &entry.opponent)) {
                continue;
            }
            recent.push(RecentMatch {
                team1: team.name.clone(),
                team1_flag: team.flag.clone(),
                team2: entry.opponent.clone(),
                team2_flag: entry.opponent_flag.clone(),
                score: entry.score.clone(),
                team1_won: entry.won,
            });
        }
    }
    recent
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A `score1-score2` string split for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub left: String,
    pub right: Option<String>,
}

impl ScoreLine {
    pub fn parse(score: &str) -> Self {
        let mut parts = score.split('-').map(str::trim);
        Self {
            left: parts.next().unwrap_or_default().to_owned(),
            right: parts.next().map(str::to_owned),
        }
    }

    /// Both sides read the same, whatever the win flags say.
    pub fn is_draw(&self) -> bool {
        self.right.as_deref() == Some(self.left.as_str())
    }
}

impl RecentMatch {
    pub fn score_line(&self) -> ScoreLine {
        ScoreLine::parse(&self.score)
    }

    pub fn outcome(&self) -> Outcome {
        if self.score_line().is_draw() {
            Outcome::Draw
        } else if self.team1_won {
            Outcome::Team1Won
        } else {
            Outcome::Team2Won
        }
    }
}
