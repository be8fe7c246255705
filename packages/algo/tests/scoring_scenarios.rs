//! End-to-end scoring scenarios.
//!
//! Three-task activity (multiple choice, true/false, info card) scored with
//! and without the IRT path, with and without a rapid guess.

use std::collections::HashMap;

use xp_scoring::{
    build_key, put_attempt, AttemptRecord, LossReason, ScoreCalculator, ScoringOptions,
    SessionSnapshot, TaskContent, TaskDescriptor, TaskKind,
};

fn activity() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor::multiple_choice(["Paris", "Rome", "Madrid", "Berlin"]).with_id("mc"),
        TaskDescriptor::new(TaskContent::TrueFalse).with_id("tf"),
        TaskDescriptor::new(TaskContent::InfoCard).with_id("card"),
    ]
}

fn attempts(mc_time: &str) -> HashMap<String, AttemptRecord> {
    let mut map = HashMap::new();
    map.insert(
        "mc".to_string(),
        AttemptRecord::default()
            .with_score_ratio(1.0)
            .with_hints_used(false)
            .with_retries(0)
            .with_time_spent(mc_time),
    );
    map.insert(
        "tf".to_string(),
        AttemptRecord::default().with_success(true).with_time_spent("00:10"),
    );
    map
}

#[test]
fn scenario_irt_disabled() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let score = calc.score(&activity(), &attempts("00:30"));

    assert_eq!(score.earned_xp, 30);
    assert_eq!(score.total_xp, 35);
    assert_eq!(score.lost_xp(), 5);

    let reasons: Vec<LossReason> = score.breakdown.iter().map(|e| e.loss_reason).collect();
    assert_eq!(
        reasons,
        vec![LossReason::None, LossReason::None, LossReason::NotAttempted]
    );
}

#[test]
fn scenario_rapid_guess_excluded() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let score = calc.score(&activity(), &attempts("00:01"));

    assert_eq!(score.earned_xp, 10);
    assert_eq!(score.total_xp, 15);

    let mc = &score.breakdown[0];
    assert!(mc.rapid_guess);
    assert_eq!((mc.total_xp, mc.earned_xp, mc.lost_xp), (0, 0, 0));
    assert_eq!(mc.loss_reason, LossReason::RapidGuess);
}

#[test]
fn scenario_irt_enabled_discounts_single_item() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(true));
    let score = calc.score(&activity(), &attempts("00:30"));

    let ability = score.ability.expect("ability estimated");
    assert_eq!(ability.item_count, 1);
    assert!(ability.theta > 0.0);

    // a lone correct answer only partly separates skill from a 1-in-4 guess
    assert_eq!(score.breakdown[0].earned_xp, 14);
    assert_eq!(score.breakdown[0].loss_reason, LossReason::PartiallyCorrect);
    assert_eq!(score.earned_xp, 24);
    assert_eq!(score.total_xp, 35);
}

#[test]
fn effort_penalties_compose() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let tasks = vec![TaskDescriptor::multiple_choice(["a", "b", "c", "d"]).with_id("mc")];
    let mut map = HashMap::new();
    map.insert(
        "mc".to_string(),
        AttemptRecord::default()
            .with_score_ratio(1.0)
            .with_hints_used(true)
            .with_retries(2)
            .with_time_spent("00:45"),
    );

    let entry = &calc.task_breakdown(&tasks, &map)[0];
    assert!((entry.score_ratio - 0.525).abs() < 1e-9);
    // 20 × 0.525 lands a hair under 10.5 in binary floating point
    assert_eq!(entry.earned_xp, 10);
    assert_eq!(entry.loss_reason, LossReason::PartiallyCorrect);
}

#[test]
fn unattempted_tasks_contribute_baseline_to_total() {
    let calc = ScoreCalculator::default();
    let tasks: Vec<TaskDescriptor> = [
        TaskContent::FillInBlank,
        TaskContent::MatchingPair,
        TaskContent::Ordering,
        TaskContent::SpotTheError { options: vec![] },
        TaskContent::CodingChallenge,
        TaskContent::Unknown,
    ]
    .into_iter()
    .map(TaskDescriptor::new)
    .collect();

    let score = calc.score(&tasks, &HashMap::<String, AttemptRecord>::new());
    assert_eq!(score.earned_xp, 0);
    assert_eq!(score.total_xp, 15 + 25 + 25 + 30 + 40 + 10);
    assert_eq!(score.total_xp, ScoreCalculator::preview_total_xp(&tasks));
    assert!(score
        .breakdown
        .iter()
        .all(|e| e.loss_reason == LossReason::NotAttempted && e.lost_xp == e.total_xp));
}

#[test]
fn corrupted_ratios_stay_in_range() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let tasks = vec![
        TaskDescriptor::new(TaskContent::CodingChallenge).with_id("big"),
        TaskDescriptor::new(TaskContent::Ordering).with_id("neg"),
    ];
    let mut map = HashMap::new();
    map.insert("big".to_string(), AttemptRecord::default().with_score_ratio(3.5));
    map.insert("neg".to_string(), AttemptRecord::default().with_score_ratio(-2.0));

    let score = calc.score(&tasks, &map);
    assert_eq!(score.breakdown[0].earned_xp, 40);
    assert_eq!(score.breakdown[1].earned_xp, 0);
    assert_eq!(score.breakdown[1].loss_reason, LossReason::Incorrect);
}

#[test]
fn unknown_duration_policy() {
    let tasks = vec![TaskDescriptor::new(TaskContent::TrueFalse).with_id("tf")];
    let mut map = HashMap::new();
    map.insert("tf".to_string(), AttemptRecord::default().with_success(true));

    let lenient = ScoreCalculator::new(ScoringOptions::default());
    assert_eq!(lenient.score(&tasks, &map).earned_xp, 10);

    let strict = ScoreCalculator::new(ScoringOptions {
        unknown_duration_is_rapid: true,
        ..ScoringOptions::default()
    });
    let score = strict.score(&tasks, &map);
    assert_eq!((score.earned_xp, score.total_xp), (0, 0));
    assert!(score.breakdown[0].rapid_guess);
}

#[test]
fn fingerprint_keys_match_tasks_without_ids() {
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let task = TaskDescriptor::new(TaskContent::MatchingPair).with_title("Capitals");
    let mut map = HashMap::new();
    put_attempt(
        &mut map,
        &task,
        AttemptRecord {
            completion_ratio: Some(0.6),
            time_spent: Some("01:10".to_string()),
            ..Default::default()
        },
    );
    assert!(map.contains_key(&build_key(&task)));

    let entry = &calc.task_breakdown(std::slice::from_ref(&task), &map)[0];
    assert_eq!(entry.kind, TaskKind::MatchingPair);
    assert_eq!(entry.earned_xp, 15);
    assert_eq!(entry.lost_xp, 10);
    assert_eq!(entry.loss_reason, LossReason::PartiallyCorrect);
}

#[test]
fn session_snapshot_from_json() {
    let json = r#"{
        "tasks": [
            {"id": "mc", "type": "MULTIPLE_CHOICE", "options": ["a", "b", "c", "d"]},
            {"id": "tf", "type": "TRUE_FALSE", "statement": "The sky is blue"},
            {"id": "card", "type": "INFO_CARD"}
        ],
        "attempts": {
            "mc": {"scoreRatio": 1.0, "timeSpent": "00:30"},
            "tf": {"success": true, "timeSpent": "00:10"}
        }
    }"#;
    let session = SessionSnapshot::from_json(json).unwrap();
    let calc = ScoreCalculator::new(ScoringOptions::with_irt(false));
    let scores = calc.score_sessions(&[session.clone(), session]);

    assert_eq!(scores.len(), 2);
    for score in scores {
        assert_eq!((score.earned_xp, score.total_xp), (30, 35));
    }
}
