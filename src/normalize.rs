use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use itertools::Itertools;
use tracing::debug;

use crate::model::{
    Match, MatchStatus, MatchTeam, RawMatchRecord, Scalar, TeamStanding, Tournament,
    TournamentStatus,
};
use crate::standings::{Side, StandingsTable};

/// Shown wherever the source has nothing to say yet.
pub const PLACEHOLDER: &str = "TBD";
pub const UNKNOWN_STAGE: &str = "Unknown Stage";
pub const DEFAULT_TEAM_COUNT: u32 = 8;

/// `unix_timestamp` as vlrggapi formats it, in UTC.
const SOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UPCOMING_MARKER: &str = "from now";

pub fn to_tournaments(raw: &[RawMatchRecord]) -> Vec<Tournament> {
    to_tournaments_at(raw, Utc::now())
}

/// One tournament per distinct event, in order of first appearance.
///
/// The start date is the processing date and only the first record of an
/// event is looked at.
pub fn to_tournaments_at(raw: &[RawMatchRecord], now: DateTime<Utc>) -> Vec<Tournament> {
    let mut seen = HashSet::new();
    let mut tournaments = Vec::new();
    for record in raw {
        let Some(event) = record.event_key() else {
            debug!(team1 = ?record.team1, team2 = ?record.team2, "segment without event name");
            continue;
        };
        if !seen.insert(event) {
            continue;
        }
        let end = record
            .unix_timestamp
            .as_ref()
            .and_then(parse_timestamp)
            .unwrap_or(now);
        tournaments.push(Tournament {
            id: event.to_owned(),
            name: event.to_owned(),
            start_date: now.date_naive(),
            end_date: end.date_naive(),
            location: PLACEHOLDER.to_owned(),
            prize_pool: PLACEHOLDER.to_owned(),
            status: TournamentStatus::Upcoming,
            team_count: DEFAULT_TEAM_COUNT,
        });
    }
    debug!(count = tournaments.len(), segments = raw.len(), "derived tournaments");
    tournaments
}

pub fn to_matches(raw: &[RawMatchRecord]) -> Vec<Match> {
    to_matches_at(raw, Utc::now())
}

pub fn to_matches_at(raw: &[RawMatchRecord], now: DateTime<Utc>) -> Vec<Match> {
    let matches = raw.iter().map(|record| to_match(record, now)).collect_vec();
    debug!(count = matches.len(), "derived matches");
    matches
}

fn to_match(record: &RawMatchRecord, now: DateTime<Utc>) -> Match {
    let team = |name: &Option<String>, flag: &Option<String>| MatchTeam {
        name: name.clone().unwrap_or_else(|| PLACEHOLDER.to_owned()),
        flag: flag.clone(),
    };
    Match {
        id: match_id(record.match_page.as_deref()),
        team1: team(&record.team1, &record.flag1),
        team2: team(&record.team2, &record.flag2),
        date: record
            .unix_timestamp
            .as_ref()
            .and_then(parse_timestamp)
            .unwrap_or(now),
        status: match_status(record.time_until_match.as_deref()),
        tournament_id: record
            .match_event
            .clone()
            .or_else(|| record.tournament_name.clone()),
        stage: record
            .match_series
            .clone()
            .or_else(|| record.round_info.clone())
            .unwrap_or_else(|| UNKNOWN_STAGE.to_owned()),
        match_page: record.match_page.clone(),
    }
}

/// Win/loss tallies for every team that appears on both sides of a record.
pub fn to_standings(raw: &[RawMatchRecord]) -> Vec<TeamStanding> {
    let mut table = StandingsTable::default();
    for record in raw {
        let (Some(team1), Some(team2)) = (record.team1.as_deref(), record.team2.as_deref()) else {
            continue;
        };
        table.record(
            Side {
                name: team1,
                flag: record.flag1.as_deref(),
                score: record.score1.as_ref(),
            },
            Side {
                name: team2,
                flag: record.flag2.as_deref(),
                score: record.score2.as_ref(),
            },
        );
    }
    let standings = table.into_standings();
    debug!(teams = standings.len(), segments = raw.len(), "derived standings");
    standings
}

/// The numeric id in `https://www.vlr.gg/<id>/<slug>`, or a random stand-in.
fn match_id(match_page: Option<&str>) -> String {
    match_page
        .and_then(|page| page.split('/').nth(3))
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| rand::random::<u64>().to_string())
}

/// Only the relative-time text tells upcoming from finished; `Live` never comes from here.
fn match_status(time_until_match: Option<&str>) -> MatchStatus {
    match time_until_match {
        Some(text) if text.contains(UPCOMING_MARKER) => MatchStatus::Upcoming,
        _ => MatchStatus::Finished,
    }
}

/// Numbers are epoch milliseconds. Text may be RFC 3339, the feed's own
/// `YYYY-MM-DD HH:MM:SS` in UTC, or epoch milliseconds.
pub(crate) fn parse_timestamp(value: &Scalar) -> Option<DateTime<Utc>> {
    match value {
        Scalar::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Scalar::Text(text) => {
            let text = text.trim();
            DateTime::parse_from_rfc3339(text)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, SOURCE_TIMESTAMP_FORMAT)
                        .ok()
                        .map(|d| d.and_utc())
                })
                .or_else(|| {
                    text.parse::<i64>()
                        .ok()
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<RawMatchRecord> {
        RawMatchRecord::list_from_value(&value)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(to_tournaments(&[]).is_empty());
        assert!(to_matches(&[]).is_empty());
        assert!(to_standings(&records(Value::Null)).is_empty());
    }

    #[test]
    fn test_one_tournament_per_event() {
        let raw = records(json!([
            {"team1": "A", "team2": "B", "match_event": "Cup", "unix_timestamp": "2025-03-04 17:00:00"},
            {"team1": "C", "team2": "D", "match_event": "Cup", "unix_timestamp": "2025-03-09 17:00:00"},
        ]));
        let tournaments = to_tournaments_at(&raw, now());
        assert_eq!(tournaments.len(), 1);
        let cup = &tournaments[0];
        assert_eq!(cup.id, "Cup");
        assert_eq!(cup.name, "Cup");
        assert_eq!(cup.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(cup.end_date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(cup.location, "TBD");
        assert_eq!(cup.prize_pool, "TBD");
        assert_eq!(cup.status, TournamentStatus::Upcoming);
        assert_eq!(cup.team_count, 8);

        assert_eq!(to_matches_at(&raw, now()).len(), 2);
    }

    #[test]
    fn test_tournaments_keep_first_appearance_order() {
        let raw = records(json!([
            {"match_event": "Zeta"},
            {"match_event": "Alpha"},
            {"team1": "no event"},
            {"match_event": "Zeta"},
            {"match_event": "Mid"},
        ]));
        let ids: Vec<_> = to_tournaments_at(&raw, now())
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_tournament_end_date_falls_back_to_now() {
        let raw = records(json!([{"match_event": "Cup", "unix_timestamp": "soon"}]));
        let tournaments = to_tournaments_at(&raw, now());
        assert_eq!(tournaments[0].end_date, now().date_naive());
    }

    #[test]
    fn test_match_defaults() {
        let raw = records(json!([{"team2": "B", "flag2": "flag_br"}]));
        let matches = to_matches_at(&raw, now());
        let m = &matches[0];
        assert_eq!(m.team1.name, "TBD");
        assert_eq!(m.team1.flag, None);
        assert_eq!(m.team2.name, "B");
        assert_eq!(m.team2.flag.as_deref(), Some("flag_br"));
        assert_eq!(m.date, now());
        assert_eq!(m.status, MatchStatus::Finished);
        assert_eq!(m.tournament_id, None);
        assert_eq!(m.stage, "Unknown Stage");
        assert_eq!(m.match_page, None);
        assert!(!m.id.is_empty());
    }

    #[test]
    fn test_match_fields() {
        let raw = records(json!([{
            "team1": "Sentinels",
            "team2": "G2 Esports",
            "time_until_match": "2h 15m from now",
            "match_series": "Playoffs: Upper Final",
            "round_info": "Playoffs",
            "tournament_name": "Masters Toronto",
            "unix_timestamp": "2025-06-20 21:00:00",
            "match_page": "https://www.vlr.gg/498628/sentinels-vs-g2-esports-masters-toronto-ubf",
        }]));
        let m = &to_matches_at(&raw, now())[0];
        assert_eq!(m.id, "498628");
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.stage, "Playoffs: Upper Final");
        assert_eq!(m.tournament_id.as_deref(), Some("Masters Toronto"));
        assert_eq!(m.date, Utc.with_ymd_and_hms(2025, 6, 20, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_stage_falls_back_to_round_info() {
        let raw = records(json!([{"round_info": "Group Stage", "time_completed": "3h ago"}]));
        assert_eq!(to_matches_at(&raw, now())[0].stage, "Group Stage");
    }

    #[test]
    fn test_match_id_fallback() {
        assert_eq!(match_id(Some("https://www.vlr.gg/42/a-vs-b")), "42");
        assert_ne!(match_id(Some("/42/a-vs-b")), "");
        assert!(!match_id(None).is_empty());
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let millis = expected.timestamp_millis();
        assert_eq!(parse_timestamp(&Scalar::Number(millis.into())), Some(expected));
        assert_eq!(
            parse_timestamp(&Scalar::Text("2025-01-02 03:04:05".to_owned())),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&Scalar::Text("2025-01-02T04:04:05+01:00".to_owned())),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&Scalar::Text(millis.to_string())), Some(expected));
        assert_eq!(parse_timestamp(&Scalar::Text("yesterday".to_owned())), None);
    }

    #[test]
    fn test_standings_scenario() {
        let raw = records(json!([
            {"team1": "A", "team2": "B", "score1": "13", "score2": "7", "match_event": "Cup"},
        ]));
        let standings = to_standings(&raw);
        assert_eq!(standings.len(), 2);
        assert_eq!((standings[0].name.as_str(), standings[0].wins, standings[0].losses), ("A", 1, 0));
        assert_eq!((standings[1].name.as_str(), standings[1].wins, standings[1].losses), ("B", 0, 1));
        assert_eq!(standings[0].match_history[0].score, "13-7");
        assert_eq!(standings[1].match_history[0].score, "7-13");
        assert!(!standings[1].match_history[0].won);
    }

    #[test]
    fn test_standings_skip_missing_team() {
        let raw = records(json!([
            {"team2": "B", "score1": "2", "score2": "0", "match_event": "Cup"},
            {"team1": "C", "team2": "D", "score1": "2", "score2": "1", "match_event": "Cup"},
        ]));
        let names: Vec<_> = to_standings(&raw).into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["C", "D"]);

        let matches = to_matches_at(&raw, now());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].team1.name, "TBD");
    }

    #[test]
    fn test_standings_balance() {
        let raw = records(json!([
            {"team1": "A", "team2": "B", "score1": "2", "score2": "1"},
            {"team1": "B", "team2": "C", "score1": "1", "score2": "1"},
            {"team1": "C", "team2": "A", "score1": "x", "score2": "2"},
            {"team1": "A", "team2": "A", "score1": "0", "score2": "2"},
            {"team1": "D", "team2": "B"},
        ]));
        for team in to_standings(&raw) {
            assert_eq!(
                team.wins + team.losses,
                team.match_history.len() as u32,
                "{}",
                team.name
            );
        }
    }
}
