use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed session in the day's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub completed_at: DateTime<Utc>,
    pub minutes: u64,
    /// Text of the task under study, or "General" when none was selected.
    pub subject: String,
}

impl SessionRecord {
    pub fn new(completed_at: DateTime<Utc>, minutes: u64, subject: Option<String>) -> Self {
        Self {
            completed_at,
            minutes,
            subject: subject.unwrap_or_else(|| "General".to_string()),
        }
    }
}

/// Sum of focus minutes across records.
pub fn total_minutes(records: &[SessionRecord]) -> u64 {
    records.iter().map(|r| r.minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subject_defaults_to_general() {
        let record = SessionRecord::new(Utc::now(), 15, None);
        assert_eq!(record.subject, "General");
    }

    #[test]
    fn sums_minutes() {
        let records = vec![
            SessionRecord::new(Utc::now(), 15, Some("a".into())),
            SessionRecord::new(Utc::now(), 25, Some("b".into())),
        ];
        assert_eq!(total_minutes(&records), 40);
    }
}
