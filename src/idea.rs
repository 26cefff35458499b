use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum IdeaStatus {
    New,
    InProgress,
    Implemented,
    Duplicate,
    Invalid,
}

impl IdeaStatus {
    pub fn lang_key(self) -> &'static str {
        match self {
            IdeaStatus::New => "IDEA_STATUS_NEW",
            IdeaStatus::InProgress => "IDEA_STATUS_IN_PROGRESS",
            IdeaStatus::Implemented => "IDEA_STATUS_IMPLEMENTED",
            IdeaStatus::Duplicate => "IDEA_STATUS_DUPLICATE",
            IdeaStatus::Invalid => "IDEA_STATUS_INVALID",
        }
    }
}

/// An idea as stored by the host extension. One idea per topic; the
/// topic's first post carries the idea text, so renaming that post
/// renames the idea.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdeaRecord {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub title: String,
    pub status: IdeaStatus,
    pub votes_up: i64,
    pub votes_down: i64,
    pub submitted_at: DateTime<Utc>,
}

impl IdeaRecord {
    pub fn score(&self) -> i64 {
        self.votes_up - self.votes_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys_are_distinct() {
        let statuses = [
            IdeaStatus::New,
            IdeaStatus::InProgress,
            IdeaStatus::Implemented,
            IdeaStatus::Duplicate,
            IdeaStatus::Invalid,
        ];
        let mut keys: Vec<_> = statuses.iter().map(|s| s.lang_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), statuses.len());
    }

    #[test]
    fn score_subtracts_downvotes() {
        let idea = IdeaRecord {
            id: 1,
            topic_id: 1,
            author_id: 1,
            title: String::from("Dark theme"),
            status: IdeaStatus::New,
            votes_up: 5,
            votes_down: 2,
            submitted_at: Utc::now(),
        };
        assert_eq!(idea.score(), 3);
    }
}
