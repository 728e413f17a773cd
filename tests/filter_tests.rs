use chrono::{Duration, Utc};

use announcement_service::{filter::filter_recipients, models::filter::RecipientFilter};

use crate::support::{enrollment, enrollment_active_at};

/// Test: The `all` policy is the identity and preserves order
#[test]
fn test_all_policy_returns_input_unchanged() {
    let now = Utc::now();
    let enrollments = vec![
        enrollment(0, false),
        enrollment(50, false),
        enrollment(100, true),
    ];
    let expected_ids: Vec<_> = enrollments.iter().map(|e| e.student_id).collect();

    let selected = filter_recipients(enrollments, RecipientFilter::All, now);

    let selected_ids: Vec<_> = selected.iter().map(|e| e.student_id).collect();
    assert_eq!(selected_ids, expected_ids, "Order and content must match");
}

/// Test: The `completed` policy selects exactly the completed records
#[test]
fn test_completed_policy_partitions_records() {
    let now = Utc::now();
    let done = enrollment(100, true);
    let also_done = enrollment(80, true);
    let in_progress = enrollment(80, false);

    let selected = filter_recipients(
        vec![done.clone(), in_progress, also_done.clone()],
        RecipientFilter::Completed,
        now,
    );

    assert_eq!(selected.len(), 2);
    assert!(selected.iter().all(|e| e.completed));
    assert_eq!(selected[0].student_id, done.student_id);
    assert_eq!(selected[1].student_id, also_done.student_id);
}

/// Test: The `active` policy requires started and not finished
#[test]
fn test_active_scenario_three_enrollments() {
    let now = Utc::now();
    let not_started = enrollment(0, false);
    let halfway = enrollment(50, false);
    let finished = enrollment(100, true);

    let selected = filter_recipients(
        vec![not_started, halfway.clone(), finished],
        RecipientFilter::Active,
        now,
    );

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].student_id, halfway.student_id);
}

/// Test: The `struggling` band is open at both ends
#[test]
fn test_struggling_excludes_boundaries() {
    let now = Utc::now();
    let untouched = enrollment(0, false);
    let barely_started = enrollment(1, false);
    let nearly_out = enrollment(24, false);
    let at_threshold = enrollment(25, false);

    let selected = filter_recipients(
        vec![
            untouched,
            barely_started.clone(),
            nearly_out.clone(),
            at_threshold,
        ],
        RecipientFilter::Struggling,
        now,
    );

    let ids: Vec<_> = selected.iter().map(|e| e.student_id).collect();
    assert_eq!(ids, vec![barely_started.student_id, nearly_out.student_id]);
}

/// Test: The `inactive` cutoff is strictly older than seven days
#[test]
fn test_inactive_boundary_is_strict() {
    let now = Utc::now();
    let exactly_on_boundary = enrollment_active_at(50, false, now - Duration::days(7));
    let just_past_boundary =
        enrollment_active_at(50, false, now - Duration::days(7) - Duration::seconds(1));
    let recent = enrollment_active_at(50, false, now - Duration::days(1));

    let selected = filter_recipients(
        vec![exactly_on_boundary, just_past_boundary.clone(), recent],
        RecipientFilter::Inactive,
        now,
    );

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].student_id, just_past_boundary.student_id);
}

/// Test: An unrecognized policy name behaves exactly like `all`
#[test]
fn test_unrecognized_name_falls_back_to_all() {
    assert_eq!(
        RecipientFilter::from_name(Some("actve")),
        RecipientFilter::All
    );
    assert_eq!(RecipientFilter::from_name(None), RecipientFilter::All);

    let now = Utc::now();
    let enrollments = vec![enrollment(0, false), enrollment(100, true)];
    let expected_ids: Vec<_> = enrollments.iter().map(|e| e.student_id).collect();

    let selected = filter_recipients(
        enrollments,
        RecipientFilter::from_name(Some("everyone")),
        now,
    );

    let ids: Vec<_> = selected.iter().map(|e| e.student_id).collect();
    assert_eq!(ids, expected_ids);
}

/// Test: An empty enrollment list filters to an empty result
#[test]
fn test_empty_list_yields_empty_result() {
    let now = Utc::now();

    for policy in [
        RecipientFilter::All,
        RecipientFilter::Active,
        RecipientFilter::Completed,
        RecipientFilter::Struggling,
        RecipientFilter::Inactive,
    ] {
        let selected = filter_recipients(Vec::new(), policy, now);
        assert!(selected.is_empty(), "Policy {} must return empty", policy);
    }
}

/// Test: Inconsistent upstream records pass through without a panic
#[test]
fn test_inconsistent_records_are_tolerated() {
    let now = Utc::now();

    // completed without full progress, and progress out of range
    let odd_complete = enrollment(40, true);
    let over_range = enrollment(140, false);
    let negative = enrollment(-5, false);

    let selected = filter_recipients(
        vec![odd_complete.clone(), over_range.clone(), negative],
        RecipientFilter::Active,
        now,
    );

    let ids: Vec<_> = selected.iter().map(|e| e.student_id).collect();
    assert_eq!(ids, vec![over_range.student_id]);

    let completed = filter_recipients(vec![odd_complete.clone()], RecipientFilter::Completed, now);
    assert_eq!(completed[0].student_id, odd_complete.student_id);
}
