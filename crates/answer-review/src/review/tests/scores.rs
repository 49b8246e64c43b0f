use super::common::*;

use crate::review::domain::AnswerId;
use crate::review::{ReviewError, ScoreChange, ScoreStore};

#[test]
fn initialize_seeds_model_answer_matches() {
    let catalog = catalog();
    let mut store = ScoreStore::new();

    assert_eq!(store.initialize(&catalog), 2);
    assert_eq!(store.get(AnswerId(1)), Some(2));
    assert_eq!(store.get(AnswerId(2)), Some(2));
    assert_eq!(store.len(), 2);
}

#[test]
fn initialize_runs_once_and_keeps_manual_scores() {
    let catalog = catalog();
    let mut store = ScoreStore::new();
    store.set_score(&catalog, AnswerId(1), 1).expect("valid score");

    assert_eq!(store.initialize(&catalog), 1);
    assert_eq!(store.get(AnswerId(1)), Some(1));

    store.clear_score(AnswerId(2));
    assert_eq!(store.initialize(&catalog), 0);
    assert_eq!(store.get(AnswerId(2)), None);
}

#[test]
fn same_score_twice_toggles_back_to_unscored() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();

    let first = store.set_score(&catalog, AnswerId(3), 2).expect("valid");
    assert_eq!(first, ScoreChange::Assigned { score: 2 });

    let second = store.set_score(&catalog, AnswerId(3), 2).expect("valid");
    assert_eq!(second, ScoreChange::Cleared { previous: 2 });
    assert!(store.is_empty());
}

#[test]
fn different_score_overwrites() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();

    store.set_score(&catalog, AnswerId(4), 0).expect("valid");
    let change = store.set_score(&catalog, AnswerId(4), 1).expect("valid");

    assert_eq!(change, ScoreChange::Replaced { previous: 0, score: 1 });
    assert_eq!(change.stored(), Some(1));
    assert_eq!(store.get(AnswerId(4)), Some(1));
}

#[test]
fn zero_is_a_real_score() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();

    store.set_score(&catalog, AnswerId(5), 0).expect("valid");
    assert!(store.is_scored(AnswerId(5)));
    assert_eq!(store.progress(&catalog).scored, 1);
}

#[test]
fn rejected_mutations_leave_state_untouched() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();
    store.set_score(&catalog, AnswerId(3), 1).expect("valid");

    let error = store
        .set_score(&catalog, AnswerId(3), 3)
        .expect_err("above max");
    assert_eq!(
        error,
        ReviewError::InvalidScore {
            answer: AnswerId(3),
            score: 3,
            max: 2
        }
    );

    let error = store
        .set_score(&catalog, AnswerId(42), 1)
        .expect_err("unknown answer");
    assert_eq!(error, ReviewError::AnswerNotFound(AnswerId(42)));

    assert_eq!(store.get(AnswerId(3)), Some(1));
    assert_eq!(store.len(), 1);
}

#[test]
fn group_score_overrides_without_toggling() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();
    store.set_score(&catalog, AnswerId(3), 2).expect("valid");
    store.set_score(&catalog, AnswerId(4), 1).expect("valid");

    let updated = store
        .apply_group_score(&catalog, "G", 1)
        .expect("group exists");

    assert_eq!(updated, vec![AnswerId(3), AnswerId(4), AnswerId(5)]);
    for id in [3, 4, 5] {
        assert_eq!(store.get(AnswerId(id)), Some(1));
    }

    store
        .apply_group_score(&catalog, "G", 1)
        .expect("group exists");
    assert_eq!(store.len(), 3, "repeating the group score keeps every entry");
}

#[test]
fn group_score_validates_before_writing() {
    let catalog = unseeded_catalog();
    let mut store = ScoreStore::new();

    assert_eq!(
        store.apply_group_score(&catalog, "Missing", 1),
        Err(ReviewError::GroupNotFound("Missing".to_string()))
    );
    assert!(matches!(
        store.apply_group_score(&catalog, "G", 5),
        Err(ReviewError::InvalidScore { score: 5, .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn apply_all_adopts_every_defined_ai_score() {
    let catalog = catalog();
    let mut store = ScoreStore::new();
    store.initialize(&catalog);
    store.set_score(&catalog, AnswerId(3), 2).expect("valid");

    let adopted = store.apply_all_ai_suggestions(&catalog);

    assert_eq!(adopted, vec![AnswerId(1), AnswerId(3), AnswerId(4)]);
    assert_eq!(store.get(AnswerId(3)), Some(1), "manual score is overwritten");
    assert_eq!(store.get(AnswerId(4)), Some(1), "low confidence still has a score");
    assert_eq!(store.get(AnswerId(5)), None);
}

#[test]
fn progress_counts_scored_answers() {
    let catalog = catalog();
    let mut store = ScoreStore::new();
    assert_eq!(store.progress(&catalog).percent, 0.0);

    store.initialize(&catalog);
    store.set_score(&catalog, AnswerId(5), 0).expect("valid");
    let progress = store.progress(&catalog);

    assert_eq!(progress.scored, 3);
    assert_eq!(progress.total, 5);
    assert!((progress.percent - 60.0).abs() < f64::EPSILON);
}

#[test]
fn reset_allows_seeding_again() {
    let catalog = catalog();
    let mut store = ScoreStore::new();
    store.initialize(&catalog);
    store.set_score(&catalog, AnswerId(3), 1).expect("valid");

    store.reset();
    assert!(store.is_empty());
    assert_eq!(store.initialize(&catalog), 2);
}
