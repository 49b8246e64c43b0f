use super::common::*;

use crate::review::domain::AnswerId;
use crate::review::{visible_answers, visible_groups, PendingRemovals, ScoreStore};

fn ids(answers: &[&crate::review::Answer]) -> Vec<u32> {
    answers.iter().map(|answer| answer.id.0).collect()
}

#[test]
fn showing_scored_answers_keeps_catalog_order() {
    let catalog = catalog();
    let mut scores = ScoreStore::new();
    scores.initialize(&catalog);
    scores.set_score(&catalog, AnswerId(4), 1).expect("valid");
    let pending = PendingRemovals::new();

    let group = catalog.group("G").expect("group");
    assert_eq!(ids(&visible_answers(group, false, &scores, &pending)), vec![3, 4, 5]);
}

#[test]
fn hiding_scored_answers_keeps_pending_ones() {
    let catalog = catalog();
    let mut scores = ScoreStore::new();
    scores.set_score(&catalog, AnswerId(3), 1).expect("valid");
    scores.set_score(&catalog, AnswerId(4), 0).expect("valid");
    let mut pending = PendingRemovals::new();
    pending.mark(AnswerId(4));

    let group = catalog.group("G").expect("group");
    assert_eq!(ids(&visible_answers(group, true, &scores, &pending)), vec![4, 5]);
}

#[test]
fn fully_scored_groups_are_omitted() {
    let catalog = catalog();
    let mut scores = ScoreStore::new();
    scores.initialize(&catalog);
    let pending = PendingRemovals::new();

    let groups = visible_groups(&catalog, true, &scores, &pending);
    let labels: Vec<&str> = groups.iter().map(|(group, _)| group.label.as_str()).collect();
    assert_eq!(labels, vec!["G"]);

    let groups = visible_groups(&catalog, false, &scores, &pending);
    assert_eq!(groups.len(), 2);
}
