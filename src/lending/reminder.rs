use chrono::{DateTime, Duration, Utc};

/// Where a borrowed book's due date sits relative to a sweep time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due more than a day from now.
    NotDue,
    /// Due within `[now, now + 1 day)`.
    DueSoon,
    /// Due date already passed.
    Overdue,
}

/// Buckets a due date for the reminder and overdue sweeps.
pub fn classify_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> DueStatus {
    if due_date < now {
        DueStatus::Overdue
    } else if due_date < now + Duration::days(1) {
        DueStatus::DueSoon
    } else {
        DueStatus::NotDue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn buckets_by_distance_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 8, 0, 0).unwrap();

        assert_eq!(classify_due(now - Duration::minutes(1), now), DueStatus::Overdue);
        assert_eq!(classify_due(now, now), DueStatus::DueSoon);
        assert_eq!(classify_due(now + Duration::hours(23), now), DueStatus::DueSoon);
        assert_eq!(classify_due(now + Duration::days(1), now), DueStatus::NotDue);
        assert_eq!(classify_due(now + Duration::days(6), now), DueStatus::NotDue);
    }
}
