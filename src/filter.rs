use chrono::{DateTime, Duration, Utc};

use crate::models::{course::EnrollmentRecord, filter::RecipientFilter};

const INACTIVITY_WINDOW_DAYS: i64 = 7;

/// Narrows an enrollment list to the recipients a policy selects.
///
/// Pure and order-preserving. `now` is passed in rather than read from the
/// clock; the `inactive` cutoff is strictly older than seven days. Records
/// with out-of-range progress values pass through the predicates without
/// panicking.
pub fn filter_recipients(
    enrollments: Vec<EnrollmentRecord>,
    policy: RecipientFilter,
    now: DateTime<Utc>,
) -> Vec<EnrollmentRecord> {
    match policy {
        RecipientFilter::All => enrollments,
        RecipientFilter::Active => enrollments
            .into_iter()
            .filter(|e| e.progress_percent > 0 && !e.completed)
            .collect(),
        RecipientFilter::Completed => enrollments.into_iter().filter(|e| e.completed).collect(),
        RecipientFilter::Struggling => enrollments
            .into_iter()
            .filter(|e| e.progress_percent > 0 && e.progress_percent < 25)
            .collect(),
        RecipientFilter::Inactive => {
            let cutoff = now - Duration::days(INACTIVITY_WINDOW_DAYS);
            enrollments
                .into_iter()
                .filter(|e| e.last_active_at < cutoff)
                .collect()
        }
    }
}
