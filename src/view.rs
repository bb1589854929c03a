use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::model::Match;

/// Matches that share a stage label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageGroup<'a> {
    pub stage: &'a str,
    pub matches: Vec<&'a Match>,
}

/// Stage ascending, then most recent first.
pub fn display_order(a: &Match, b: &Match) -> Ordering {
    a.stage.cmp(&b.stage).then_with(|| b.date.cmp(&a.date))
}

pub fn sort_for_display(matches: &mut [Match]) {
    matches.sort_by(display_order);
}

/// Group by stage, stages in order of first appearance.
pub fn group_by_stage<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Vec<StageGroup<'a>> {
    let mut groups: Vec<StageGroup<'a>> = Vec::new();
    let mut index = HashMap::new();
    for m in matches {
        let position = *index.entry(m.stage.as_str()).or_insert_with(|| {
            groups.push(StageGroup {
                stage: &m.stage,
                matches: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].matches.push(m);
    }
    groups
}

/// The match list as the tournament page shows it.
pub fn display_groups(matches: &[Match]) -> Vec<StageGroup<'_>> {
    group_by_stage(matches.iter().sorted_by(|a, b| display_order(a, b)))
}
